use crate::data::datatable::{DataTable, DataValue};
use crate::filter::condition::{FilterCondition, FilterOperand, FilterOperator, FilterValue};
use regex::Regex;
use std::cmp::Ordering;

/// Evaluate a condition tree against one row of a table
pub fn evaluate(condition: &FilterCondition, table: &DataTable, row_idx: usize) -> bool {
    match condition {
        FilterCondition::And(left, right) => {
            evaluate(left, table, row_idx) && evaluate(right, table, row_idx)
        }
        FilterCondition::Or(left, right) => {
            evaluate(left, table, row_idx) || evaluate(right, table, row_idx)
        }
        FilterCondition::Not(inner) => !evaluate(inner, table, row_idx),
        FilterCondition::Compare {
            column,
            operator,
            operand,
        } => {
            let cell = table.get_value_by_name(row_idx, column);
            compare_cell(cell, *operator, operand)
        }
    }
}

/// Row indices of the table passing the condition; all rows when None
pub fn filter_rows(table: &DataTable, condition: Option<&FilterCondition>) -> Vec<usize> {
    match condition {
        None => (0..table.row_count()).collect(),
        Some(cond) => (0..table.row_count())
            .filter(|&idx| evaluate(cond, table, idx))
            .collect(),
    }
}

fn compare_cell(cell: Option<&DataValue>, operator: FilterOperator, operand: &FilterOperand) -> bool {
    use FilterOperator::*;

    // A missing column reads as null
    let is_null = cell.map(DataValue::is_null).unwrap_or(true);

    match operator {
        IsNull => return is_null,
        IsNotNull => return !is_null,
        _ => {}
    }

    let cell = match cell {
        Some(v) if !v.is_null() => v,
        // Null never matches a value comparison; NOT IN is the one exception
        _ => return matches!(operator, NotIn),
    };

    match (operator, operand) {
        (Equal, FilterOperand::Single(v)) => value_cmp(cell, v) == Some(Ordering::Equal),
        (NotEqual, FilterOperand::Single(v)) => {
            // Comparable and unequal; incomparable types stay unmatched
            matches!(value_cmp(cell, v), Some(ord) if ord != Ordering::Equal)
        }
        (LessThan, FilterOperand::Single(v)) => value_cmp(cell, v) == Some(Ordering::Less),
        (LessThanOrEqual, FilterOperand::Single(v)) => {
            matches!(value_cmp(cell, v), Some(Ordering::Less | Ordering::Equal))
        }
        (GreaterThan, FilterOperand::Single(v)) => value_cmp(cell, v) == Some(Ordering::Greater),
        (GreaterThanOrEqual, FilterOperand::Single(v)) => {
            matches!(value_cmp(cell, v), Some(Ordering::Greater | Ordering::Equal))
        }
        (Like, FilterOperand::Single(FilterValue::Text(pattern))) => {
            like_match(&cell.to_string(), pattern, false)
        }
        (NotLike, FilterOperand::Single(FilterValue::Text(pattern))) => {
            !like_match(&cell.to_string(), pattern, false)
        }
        (ILike, FilterOperand::Single(FilterValue::Text(pattern))) => {
            like_match(&cell.to_string(), pattern, true)
        }
        (NotILike, FilterOperand::Single(FilterValue::Text(pattern))) => {
            !like_match(&cell.to_string(), pattern, true)
        }
        (In, FilterOperand::List(values)) => values
            .iter()
            .any(|v| value_cmp(cell, v) == Some(Ordering::Equal)),
        (NotIn, FilterOperand::List(values)) => !values
            .iter()
            .any(|v| value_cmp(cell, v) == Some(Ordering::Equal)),
        (Between, FilterOperand::Range(lo, hi)) => in_range(cell, lo, hi),
        (NotBetween, FilterOperand::Range(lo, hi)) => !in_range(cell, lo, hi),
        // Operator/operand arity mismatch: nothing matches
        _ => false,
    }
}

fn in_range(cell: &DataValue, lo: &FilterValue, hi: &FilterValue) -> bool {
    matches!(
        value_cmp(cell, lo),
        Some(Ordering::Greater | Ordering::Equal)
    ) && matches!(value_cmp(cell, hi), Some(Ordering::Less | Ordering::Equal))
}

/// Compare a cell against a typed operand, coercing across numeric kinds
fn value_cmp(cell: &DataValue, operand: &FilterValue) -> Option<Ordering> {
    match (cell, operand) {
        (DataValue::String(s), FilterValue::Text(t)) => Some(s.as_str().cmp(t.as_str())),
        (DataValue::Boolean(a), FilterValue::Bool(b)) => Some(a.cmp(b)),
        (DataValue::Date(a), FilterValue::Date(b)) => Some(a.cmp(b)),
        (DataValue::DateTime(a), FilterValue::DateTime(b)) => Some(a.cmp(b)),
        // A date operand against a datetime column compares by calendar day
        (DataValue::DateTime(a), FilterValue::Date(b)) => Some(a.date().cmp(b)),
        (DataValue::Date(a), FilterValue::DateTime(b)) => Some(a.cmp(&b.date())),
        (_, FilterValue::Number(n)) => cell.as_f64().and_then(|v| v.partial_cmp(n)),
        (_, FilterValue::Duration(n)) => cell.as_f64().and_then(|v| v.partial_cmp(n)),
        _ => None,
    }
}

/// SQL LIKE semantics: % matches any run, _ matches a single character
fn like_match(text: &str, pattern: &str, case_insensitive: bool) -> bool {
    let mut regex_pattern = String::with_capacity(pattern.len() + 8);
    if case_insensitive {
        regex_pattern.push_str("(?i)");
    }
    regex_pattern.push('^');
    for ch in pattern.chars() {
        match ch {
            '%' => regex_pattern.push_str(".*"),
            '_' => regex_pattern.push('.'),
            other => regex_pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex_pattern.push('$');

    match Regex::new(&regex_pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataColumn, DataRow, DataTable, DataType};
    use crate::filter::condition::FilterCondition;

    fn scan_table() -> DataTable {
        let mut table = DataTable::new("scans");
        table.add_column(DataColumn::new("model").with_type(DataType::String));
        table.add_column(DataColumn::new("score").with_type(DataType::Float));
        table.add_column(DataColumn::new("total_time").with_type(DataType::Duration));

        let rows = [
            ("s0", "gpt-4o", Some(0.91), 12.5),
            ("s1", "claude-3", Some(0.84), 30.0),
            ("s2", "llama-3", None, 45.0),
            ("s3", "gpt-4o-mini", Some(0.73), 2.0),
        ];
        for (id, model, score, time) in rows {
            table
                .add_row(DataRow::new(
                    id,
                    vec![
                        DataValue::String(model.to_string()),
                        score.map(DataValue::Float).unwrap_or(DataValue::Null),
                        DataValue::Duration(time),
                    ],
                ))
                .unwrap();
        }
        table
    }

    fn leaf(column: &str, operator: FilterOperator, operand: FilterOperand) -> FilterCondition {
        FilterCondition::compare(column, operator, operand)
    }

    #[test]
    fn test_like_and_ilike() {
        let table = scan_table();
        let cond = leaf(
            "model",
            FilterOperator::Like,
            FilterOperand::Single(FilterValue::Text("%gpt%".into())),
        );
        assert_eq!(filter_rows(&table, Some(&cond)), vec![0, 3]);

        let cond = leaf(
            "model",
            FilterOperator::ILike,
            FilterOperand::Single(FilterValue::Text("%GPT%".into())),
        );
        assert_eq!(filter_rows(&table, Some(&cond)), vec![0, 3]);

        let cond = leaf(
            "model",
            FilterOperator::NotLike,
            FilterOperand::Single(FilterValue::Text("%gpt%".into())),
        );
        assert_eq!(filter_rows(&table, Some(&cond)), vec![1, 2]);
    }

    #[test]
    fn test_like_escapes_regex_metachars() {
        let mut table = DataTable::new("t");
        table.add_column(DataColumn::new("name"));
        table
            .add_row(DataRow::new(
                "0",
                vec![DataValue::String("a.b".to_string())],
            ))
            .unwrap();
        table
            .add_row(DataRow::new(
                "1",
                vec![DataValue::String("axb".to_string())],
            ))
            .unwrap();

        let cond = leaf(
            "name",
            FilterOperator::Like,
            FilterOperand::Single(FilterValue::Text("%a.b%".into())),
        );
        // The dot is literal, not a regex wildcard
        assert_eq!(filter_rows(&table, Some(&cond)), vec![0]);
    }

    #[test]
    fn test_null_handling() {
        let table = scan_table();

        let cond = leaf("score", FilterOperator::IsNull, FilterOperand::None);
        assert_eq!(filter_rows(&table, Some(&cond)), vec![2]);

        let cond = leaf("score", FilterOperator::IsNotNull, FilterOperand::None);
        assert_eq!(filter_rows(&table, Some(&cond)), vec![0, 1, 3]);

        // Null cells never satisfy value comparisons
        let cond = leaf(
            "score",
            FilterOperator::LessThan,
            FilterOperand::Single(FilterValue::Number(1.0)),
        );
        assert_eq!(filter_rows(&table, Some(&cond)), vec![0, 1, 3]);

        // A missing column reads as null
        let cond = leaf("nonexistent", FilterOperator::IsNull, FilterOperand::None);
        assert_eq!(filter_rows(&table, Some(&cond)), vec![0, 1, 2, 3]);

        // Null is not in any list
        let cond = leaf(
            "score",
            FilterOperator::NotIn,
            FilterOperand::List(vec![FilterValue::Number(0.91)]),
        );
        assert_eq!(filter_rows(&table, Some(&cond)), vec![1, 2, 3]);
    }

    #[test]
    fn test_between_durations() {
        let table = scan_table();
        let cond = leaf(
            "total_time",
            FilterOperator::Between,
            FilterOperand::Range(FilterValue::Duration(10.0), FilterValue::Duration(40.0)),
        );
        assert_eq!(filter_rows(&table, Some(&cond)), vec![0, 1]);

        let cond = leaf(
            "total_time",
            FilterOperator::NotBetween,
            FilterOperand::Range(FilterValue::Duration(10.0), FilterValue::Duration(40.0)),
        );
        assert_eq!(filter_rows(&table, Some(&cond)), vec![2, 3]);
    }

    #[test]
    fn test_compound_and_or_not() {
        let table = scan_table();
        let gpt = leaf(
            "model",
            FilterOperator::Like,
            FilterOperand::Single(FilterValue::Text("%gpt%".into())),
        );
        let fast = leaf(
            "total_time",
            FilterOperator::LessThan,
            FilterOperand::Single(FilterValue::Duration(10.0)),
        );

        let both = FilterCondition::And(Box::new(gpt.clone()), Box::new(fast.clone()));
        assert_eq!(filter_rows(&table, Some(&both)), vec![3]);

        let either = FilterCondition::Or(Box::new(gpt.clone()), Box::new(fast));
        assert_eq!(filter_rows(&table, Some(&either)), vec![0, 3]);

        let neither = FilterCondition::Not(Box::new(either));
        assert_eq!(filter_rows(&table, Some(&neither)), vec![1, 2]);
    }

    #[test]
    fn test_no_condition_passes_everything() {
        let table = scan_table();
        assert_eq!(filter_rows(&table, None), vec![0, 1, 2, 3]);
    }
}
