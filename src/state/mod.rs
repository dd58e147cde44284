//! Durable view state: selection, per-table state, and the per-panel store

pub mod selection;
pub mod store;
pub mod table_state;

pub use selection::SelectionState;
pub use store::{AppStore, Panel, PanelState};
pub use table_state::{DropSide, TableViewState};
