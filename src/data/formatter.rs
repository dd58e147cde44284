use crate::data::datatable::DataValue;
use crate::filter::FilterType;

/// Placeholder rendered for missing or null cells
pub const MISSING_PLACEHOLDER: &str = "-";

/// Closed set of cell text formatters, selected by a column's filter type
///
/// `format` returns None when the value has no sensible text rendering for
/// this formatter (the "unmeasurable" sentinel); content-based column sizing
/// skips such columns and rendering falls back to the plain text formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormatter {
    Text,
    Numeric,
    Boolean,
    Date,
    DateTime,
    Duration,
}

impl CellFormatter {
    pub fn for_filter_type(filter_type: FilterType) -> Self {
        match filter_type {
            FilterType::String | FilterType::Unknown => CellFormatter::Text,
            FilterType::Number => CellFormatter::Numeric,
            FilterType::Boolean => CellFormatter::Boolean,
            FilterType::Date => CellFormatter::Date,
            FilterType::DateTime => CellFormatter::DateTime,
            FilterType::Duration => CellFormatter::Duration,
        }
    }

    /// Format a cell for display; None means the value is unmeasurable here
    pub fn format(&self, value: Option<&DataValue>) -> Option<String> {
        let value = match value {
            None | Some(DataValue::Null) => return Some(MISSING_PLACEHOLDER.to_string()),
            Some(v) => v,
        };

        match (self, value) {
            (CellFormatter::Text, v) => Some(v.to_string()),
            (CellFormatter::Numeric, DataValue::Integer(i)) => Some(i.to_string()),
            (CellFormatter::Numeric, DataValue::Float(f)) => Some(format!("{:.3}", f)),
            (CellFormatter::Boolean, DataValue::Boolean(b)) => Some(b.to_string()),
            (CellFormatter::Date, DataValue::Date(d)) => {
                Some(d.format("%Y-%m-%d").to_string())
            }
            (CellFormatter::DateTime, DataValue::DateTime(dt)) => {
                Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            (CellFormatter::Duration, DataValue::Duration(secs)) => {
                Some(format_elapsed(*secs))
            }
            // Kind mismatch: this formatter cannot measure the value
            _ => None,
        }
    }
}

/// Human-oriented elapsed time, coarser as the value grows
pub fn format_elapsed(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let minutes = (secs / 60.0).floor() as u64;
        let rest = secs - (minutes as f64) * 60.0;
        format!("{}m {:.0}s", minutes, rest)
    }
}
