//! scanview: a terminal viewer for model scan results
//!
//! The core is a headless data-grid model: typed per-column filters, multi
//! column sorting, virtualized row windows, column sizing strategies, and
//! anchor-based selection. A thin ratatui shell renders it over paged data
//! sources for the scans, transcripts, and validation panels.

pub mod app;
pub mod config;
pub mod data;
pub mod filter;
pub mod logging;
pub mod state;
pub mod ui;
pub mod viewport;

pub use app::App;
pub use config::Config;
pub use data::{DataColumn, DataRow, DataTable, DataType, DataValue, DataView, SortSpec};
pub use filter::{FilterCondition, FilterDraft, FilterEdit, FilterOperator, FilterType};
