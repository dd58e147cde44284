//! Scroll-window machinery: the row virtualizer, infinite-scroll watcher,
//! and column sizing strategies

pub mod column_sizing;
pub mod fetch_watcher;
pub mod virtualizer;

pub use column_sizing::{ColumnSizing, SizingStrategy};
pub use fetch_watcher::FetchWatcher;
pub use virtualizer::{Align, RowVirtualizer, VirtualItem};
