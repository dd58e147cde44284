use std::sync::Arc;

use scanview::data::datatable::{DataColumn, DataRow, DataTable, DataType, DataValue};
use scanview::data::{DataView, SortSpec};
use scanview::filter::{
    filter_rows, FilterCondition, FilterOperand, FilterOperator, FilterValue,
};

/// A scans table with a spread of models, scores, and durations
fn scan_table(rows: usize) -> Arc<DataTable> {
    let mut table = DataTable::new("scans");
    table.add_column(DataColumn::new("model").with_type(DataType::String));
    table.add_column(DataColumn::new("score").with_type(DataType::Float));
    table.add_column(DataColumn::new("total_time").with_type(DataType::Duration));

    let models = ["gpt-4o", "claude-3", "llama-3", "gpt-4o-mini"];
    for i in 0..rows {
        let score = if i % 7 == 0 {
            DataValue::Null
        } else {
            DataValue::Float((i % 100) as f64 / 100.0)
        };
        table
            .add_row(DataRow::new(
                format!("s{}", i),
                vec![
                    DataValue::String(models[i % models.len()].to_string()),
                    score,
                    DataValue::Duration((i % 60) as f64 + 0.5),
                ],
            ))
            .unwrap();
    }
    Arc::new(table)
}

fn score_at_least(threshold: f64) -> FilterCondition {
    FilterCondition::compare(
        "score",
        FilterOperator::GreaterThanOrEqual,
        FilterOperand::Single(FilterValue::Number(threshold)),
    )
}

#[test]
fn test_filter_is_idempotent() {
    let table = scan_table(200);
    let cond = score_at_least(0.5);

    let mut once = DataView::new(Arc::clone(&table));
    once.apply(Some(&cond), &[]);

    // Applying the identical condition again changes nothing
    let mut twice = DataView::new(Arc::clone(&table));
    twice.apply(Some(&cond), &[]);
    twice.apply(Some(&cond), &[]);

    assert_eq!(once.visible_row_indices(), twice.visible_row_indices());
}

#[test]
fn test_and_filter_is_monotonic() {
    let table = scan_table(200);
    let base = score_at_least(0.25);

    let baseline = filter_rows(&table, Some(&base)).len();

    let extras = vec![
        FilterCondition::compare(
            "model",
            FilterOperator::Like,
            FilterOperand::Single(FilterValue::Text("%gpt%".into())),
        ),
        FilterCondition::compare(
            "total_time",
            FilterOperator::Between,
            FilterOperand::Range(FilterValue::Duration(5.0), FilterValue::Duration(30.0)),
        ),
        FilterCondition::compare("score", FilterOperator::IsNull, FilterOperand::None),
    ];

    for extra in extras {
        let narrowed = FilterCondition::And(Box::new(base.clone()), Box::new(extra));
        let count = filter_rows(&table, Some(&narrowed)).len();
        assert!(
            count <= baseline,
            "AND-ing a condition must never grow the result ({} > {})",
            count,
            baseline
        );
    }
}

#[test]
fn test_missing_accessor_renders_placeholder() {
    use scanview::data::CellFormatter;

    let table = scan_table(10);
    let view = DataView::new(Arc::clone(&table));

    // A column index past the projection yields no value: formatted as "-"
    let missing = view.get_value(0, 99);
    assert!(missing.is_none());
    assert_eq!(
        CellFormatter::Text.format(missing),
        Some("-".to_string())
    );
}

#[test]
fn test_sort_stability_across_pages_of_ties() {
    let table = scan_table(40);
    let mut view = DataView::new(Arc::clone(&table));
    view.apply(None, &[SortSpec::ascending("model")]);

    // Within one model group the source order is preserved
    let ids: Vec<&str> = (0..view.row_count())
        .filter(|&i| {
            view.get_value_by_name(i, "model")
                == Some(&DataValue::String("claude-3".to_string()))
        })
        .filter_map(|i| view.row_id(i))
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_by_key(|id| id[1..].parse::<usize>().unwrap());
    assert_eq!(ids, sorted);
}

#[test]
fn test_nulls_sort_first_ascending() {
    let table = scan_table(30);
    let mut view = DataView::new(Arc::clone(&table));
    view.apply(None, &[SortSpec::ascending("score")]);

    let first = view.get_value_by_name(0, "score");
    assert_eq!(first, Some(&DataValue::Null));

    view.apply(None, &[SortSpec::descending("score")]);
    let last = view.get_value_by_name(view.row_count() - 1, "score");
    assert_eq!(last, Some(&DataValue::Null));
}
