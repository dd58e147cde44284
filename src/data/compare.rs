use crate::data::datatable::DataValue;
use std::cmp::Ordering;

/// Total ordering over cell values used by the sort machinery
///
/// Nulls sort first in ascending order. Integers, floats, and durations
/// compare numerically with each other; otherwise mismatched kinds fall
/// back to their display strings so sorting never panics on mixed columns.
pub fn compare_values(a: &DataValue, b: &DataValue) -> Ordering {
    use DataValue::*;

    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => Ordering::Less,
        (_, Null) => Ordering::Greater,

        (String(x), String(y)) => x.cmp(y),
        (Boolean(x), Boolean(y)) => x.cmp(y),
        (Date(x), Date(y)) => x.cmp(y),
        (DateTime(x), DateTime(y)) => x.cmp(y),
        (Date(x), DateTime(y)) => x
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.cmp(y))
            .unwrap_or(Ordering::Equal),
        (DateTime(x), Date(y)) => y
            .and_hms_opt(0, 0, 0)
            .map(|dt| x.cmp(&dt))
            .unwrap_or(Ordering::Equal),

        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}
