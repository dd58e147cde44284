//! Per-column filter model: typed operators, staged edits, and the
//! condition-tree evaluator

pub mod condition;
pub mod edit;
pub mod evaluator;

pub use condition::{
    format_duration_secs, format_value, parse_duration_secs, parse_value, FilterCondition,
    FilterOperand, FilterOperator, FilterType, FilterValue, OperandArity, ValueParseError,
};
pub use edit::{FilterDraft, FilterEdit};
pub use evaluator::{evaluate, filter_rows};
