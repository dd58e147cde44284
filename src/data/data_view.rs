use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::data::compare::compare_values;
use crate::data::datatable::{DataColumn, DataRow, DataTable, DataValue};
use crate::filter::{evaluator, FilterCondition};
use serde::{Deserialize, Serialize};

/// One entry of a multi-column sort; earlier entries win, later ones break ties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// A view over a DataTable that filters, sorts, and projects columns
/// without modifying the underlying data
///
/// Rows keep their identity across recomputation: a display index resolves
/// to the same source `DataRow` as long as the underlying table is unchanged.
#[derive(Clone)]
pub struct DataView {
    /// The underlying immutable data source
    source: Arc<DataTable>,

    /// Source row indices that pass the filter, in display order
    visible_rows: Vec<usize>,

    /// Source column indices in display order (hidden columns excluded)
    visible_columns: Vec<usize>,
}

impl DataView {
    /// Create a new view showing all data from the table
    pub fn new(source: Arc<DataTable>) -> Self {
        let row_count = source.row_count();
        let col_count = source.column_count();

        Self {
            source,
            visible_rows: (0..row_count).collect(),
            visible_columns: (0..col_count).collect(),
        }
    }

    /// Recompute visible rows from a filter predicate and sort spec
    ///
    /// Filtering starts from the full table, so re-applying the same state
    /// is idempotent, and sorting is stable with ties broken by the earlier
    /// entry in `sorting`, then by source order.
    pub fn apply(&mut self, filter: Option<&FilterCondition>, sorting: &[SortSpec]) {
        self.visible_rows = evaluator::filter_rows(&self.source, filter);
        self.sort_rows(sorting);
    }

    fn sort_rows(&mut self, sorting: &[SortSpec]) {
        if sorting.is_empty() {
            return;
        }

        let keys: Vec<(Option<usize>, bool)> = sorting
            .iter()
            .map(|s| (self.source.get_column_index(&s.column), s.descending))
            .collect();

        let source = Arc::clone(&self.source);
        self.visible_rows.sort_by(|&a, &b| {
            for (col_idx, descending) in &keys {
                let Some(col_idx) = col_idx else { continue };
                let va = source.get_value(a, *col_idx).unwrap_or(&DataValue::Null);
                let vb = source.get_value(b, *col_idx).unwrap_or(&DataValue::Null);
                let cmp = compare_values(va, vb);
                let cmp = if *descending { cmp.reverse() } else { cmp };
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });
    }

    /// Project the columns in `order`, skipping hidden and unknown names
    pub fn set_column_order(&mut self, order: &[String], hidden: &HashSet<String>) {
        self.visible_columns = order
            .iter()
            .filter(|name| !hidden.contains(*name))
            .filter_map(|name| self.source.get_column_index(name))
            .collect();
    }

    pub fn row_count(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.visible_columns.len()
    }

    /// Visible column definitions in display order
    pub fn columns(&self) -> Vec<&DataColumn> {
        self.visible_columns
            .iter()
            .filter_map(|&idx| self.source.columns.get(idx))
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns().iter().map(|c| c.name.clone()).collect()
    }

    /// Get a source row by display index
    pub fn get_row(&self, index: usize) -> Option<&DataRow> {
        let row_idx = *self.visible_rows.get(index)?;
        self.source.rows.get(row_idx)
    }

    pub fn row_id(&self, index: usize) -> Option<&str> {
        self.get_row(index).map(|r| r.id.as_str())
    }

    /// Display index of the row with the given id, if it passed the filter
    pub fn display_index_of_id(&self, id: &str) -> Option<usize> {
        (0..self.row_count()).find(|&i| self.row_id(i) == Some(id))
    }

    /// Get a cell by display row and display column
    pub fn get_value(&self, row: usize, col: usize) -> Option<&DataValue> {
        let row_idx = *self.visible_rows.get(row)?;
        let col_idx = *self.visible_columns.get(col)?;
        self.source.get_value(row_idx, col_idx)
    }

    /// Get a cell by display row and column name
    pub fn get_value_by_name(&self, row: usize, col_name: &str) -> Option<&DataValue> {
        let row_idx = *self.visible_rows.get(row)?;
        self.source.get_value_by_name(row_idx, col_name)
    }

    /// Row ids in display order; the ordering selection ranges are taken over
    pub fn visible_row_ids(&self) -> Vec<String> {
        (0..self.row_count())
            .filter_map(|i| self.row_id(i).map(str::to_string))
            .collect()
    }

    pub fn source(&self) -> &DataTable {
        &self.source
    }

    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible_rows
    }

    pub fn visible_column_indices(&self) -> &[usize] {
        &self.visible_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataColumn, DataRow, DataTable, DataType};
    use crate::filter::{FilterOperand, FilterOperator, FilterValue};

    fn scans() -> Arc<DataTable> {
        let mut table = DataTable::new("scans");
        table.add_column(DataColumn::new("model").with_type(DataType::String));
        table.add_column(DataColumn::new("score").with_type(DataType::Float));

        let rows = [
            ("s0", "beta", 0.5),
            ("s1", "alpha", 0.9),
            ("s2", "alpha", 0.1),
            ("s3", "gamma", 0.7),
        ];
        for (id, model, score) in rows {
            table
                .add_row(DataRow::new(
                    id,
                    vec![
                        DataValue::String(model.to_string()),
                        DataValue::Float(score),
                    ],
                ))
                .unwrap();
        }
        Arc::new(table)
    }

    #[test]
    fn test_multi_column_sort_tie_break() {
        let mut view = DataView::new(scans());
        view.apply(
            None,
            &[
                SortSpec::ascending("model"),
                SortSpec::descending("score"),
            ],
        );

        let ids: Vec<_> = (0..view.row_count())
            .map(|i| view.row_id(i).unwrap().to_string())
            .collect();
        // alpha(0.9), alpha(0.1), beta, gamma
        assert_eq!(ids, vec!["s1", "s2", "s0", "s3"]);
    }

    #[test]
    fn test_filter_then_sort() {
        let mut view = DataView::new(scans());
        let cond = FilterCondition::compare(
            "score",
            FilterOperator::GreaterThanOrEqual,
            FilterOperand::Single(FilterValue::Number(0.5)),
        );
        view.apply(Some(&cond), &[SortSpec::descending("score")]);

        let ids: Vec<_> = (0..view.row_count())
            .map(|i| view.row_id(i).unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["s1", "s3", "s0"]);
        assert_eq!(view.display_index_of_id("s3"), Some(1));
        assert_eq!(view.display_index_of_id("s2"), None);
    }

    #[test]
    fn test_column_projection() {
        let mut view = DataView::new(scans());
        let hidden: HashSet<String> = ["score".to_string()].into_iter().collect();
        view.set_column_order(
            &["score".to_string(), "model".to_string()],
            &hidden,
        );

        assert_eq!(view.column_count(), 1);
        assert_eq!(view.column_names(), vec!["model"]);
        assert_eq!(
            view.get_value(0, 0),
            Some(&DataValue::String("beta".to_string()))
        );
    }

    #[test]
    fn test_row_identity_stable_across_apply() {
        let mut view = DataView::new(scans());
        view.apply(None, &[SortSpec::ascending("score")]);
        let before = view.get_row(view.display_index_of_id("s3").unwrap()).unwrap() as *const _;

        view.apply(None, &[SortSpec::descending("score")]);
        let after = view.get_row(view.display_index_of_id("s3").unwrap()).unwrap() as *const _;

        // Same source row object, regardless of display position
        assert_eq!(before, after);
    }
}
