//! Terminal shell: the grid widget, the filter editor modal, and key
//! dispatch

pub mod actions;
pub mod filter_editor;
pub mod grid;
pub mod keys;

pub use actions::GridAction;
pub use filter_editor::{EditorEvent, FilterEditor};
pub use grid::{empty_state, GridPlaceholder, GridViewport, ScanGrid};
