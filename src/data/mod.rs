//! Data model: cell values, tables, filtered/sorted views, loaders, and
//! paged sources

pub mod compare;
pub mod data_view;
pub mod datatable;
pub mod formatter;
pub mod loaders;
pub mod source;

pub use data_view::{DataView, SortSpec};
pub use datatable::{DataColumn, DataRow, DataTable, DataType, DataValue};
pub use formatter::CellFormatter;
pub use source::{DataSource, Page, PageRequest, RouteResolver};
