use std::collections::{BTreeMap, HashSet};

use crate::data::data_view::SortSpec;
use crate::data::datatable::DataColumn;
use crate::filter::FilterCondition;
use crate::state::selection::SelectionState;
use crate::viewport::column_sizing::ColumnSizing;

/// Which side of the target a dragged column header lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSide {
    Left,
    Right,
}

/// Durable per-panel view state: everything the grid renders from
///
/// The grid never holds a parallel copy of any of this; it reads the state
/// and emits actions that the owner applies.
#[derive(Debug, Clone, Default)]
pub struct TableViewState {
    /// Multi-column sort; earlier entries win, later ones break ties
    pub sorting: Vec<SortSpec>,
    /// Permutation of column names; hidden columns stay in the permutation
    pub column_order: Vec<String>,
    pub hidden_columns: HashSet<String>,
    pub sizing: ColumnSizing,
    /// At most one committed condition per column
    pub filters: BTreeMap<String, FilterCondition>,
    pub selection: SelectionState,
    pub focused_row: Option<String>,
}

impl TableViewState {
    /// Fresh state for a column set, in declaration order
    pub fn for_columns(columns: &[DataColumn]) -> Self {
        Self {
            column_order: columns.iter().map(|c| c.name.clone()).collect(),
            ..Self::default()
        }
    }

    /// Column names in display order, hidden ones excluded
    pub fn effective_columns(&self) -> Vec<&str> {
        self.column_order
            .iter()
            .filter(|name| !self.hidden_columns.contains(*name))
            .map(String::as_str)
            .collect()
    }

    /// The aggregate predicate: AND over all per-column conditions
    pub fn filter_condition(&self) -> Option<FilterCondition> {
        FilterCondition::conjoin(self.filters.values().cloned())
    }

    pub fn set_filter(&mut self, column: &str, condition: FilterCondition) {
        self.filters.insert(column.to_string(), condition);
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.filters.remove(column);
    }

    /// Header activation: ascending, then descending, then unsorted
    ///
    /// Without `additive` the clicked column becomes the only sort key;
    /// with it the column is appended to (or cycled within) the list.
    pub fn toggle_sort(&mut self, column: &str, additive: bool) {
        let existing = self.sorting.iter().position(|s| s.column == column);

        match existing {
            Some(idx) => {
                if self.sorting[idx].descending {
                    self.sorting.remove(idx);
                } else {
                    self.sorting[idx].descending = true;
                }
                if !additive {
                    self.sorting.retain(|s| s.column == column);
                }
            }
            None => {
                let spec = SortSpec::ascending(column);
                if additive {
                    self.sorting.push(spec);
                } else {
                    self.sorting = vec![spec];
                }
            }
        }
    }

    pub fn hide_column(&mut self, column: &str) {
        if self.column_order.iter().any(|c| c == column) {
            self.hidden_columns.insert(column.to_string());
        }
    }

    pub fn unhide_all_columns(&mut self) {
        self.hidden_columns.clear();
    }

    /// Side of `target` the dragged header would land on, from their
    /// relative positions in the current effective order
    ///
    /// Recomputed on every drag movement so the indicator tracks the
    /// pointer; None when the drop would be a no-op.
    pub fn drop_side(&self, dragged: &str, target: &str) -> Option<DropSide> {
        if dragged == target {
            return None;
        }
        let effective = self.effective_columns();
        let from = effective.iter().position(|c| *c == dragged)?;
        let to = effective.iter().position(|c| *c == target)?;
        Some(if from < to {
            DropSide::Right
        } else {
            DropSide::Left
        })
    }

    /// Reorder by removing the dragged column and reinserting it at the
    /// target's position
    pub fn reorder_column(&mut self, dragged: &str, target: &str) -> bool {
        let Some(side) = self.drop_side(dragged, target) else {
            return false;
        };

        let Some(from) = self.column_order.iter().position(|c| c == dragged) else {
            return false;
        };
        let moved = self.column_order.remove(from);

        let Some(to) = self.column_order.iter().position(|c| c == target) else {
            // Put it back; the target vanished mid-drag
            self.column_order.insert(from, moved);
            return false;
        };

        let insert_at = match side {
            DropSide::Left => to,
            DropSide::Right => to + 1,
        };
        self.column_order.insert(insert_at, moved);
        true
    }
}
