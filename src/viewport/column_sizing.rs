use std::collections::{HashMap, HashSet};

use crate::data::data_view::DataView;
use crate::data::datatable::DataColumn;
use crate::data::formatter::CellFormatter;
use serde::{Deserialize, Serialize};

/// Allowance for the sort marker and filter badge next to a header
pub const HEADER_CHROME: u16 = 3;
/// Cell padding on both sides of the content
pub const CELL_PADDING: u16 = 2;
/// Rows sampled by the fit-content strategy
pub const FIT_SAMPLE_ROWS: usize = 50;

/// How column widths are derived from data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizingStrategy {
    /// Each column's declared size, untouched
    Declared,
    /// Header and sampled cell content, clamped to the column's bounds
    FitContent,
}

/// Per-column widths plus the set of columns a human has resized
///
/// Manually resized columns are never overwritten by an auto-fit pass;
/// only an explicit per-column reset re-enters them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSizing {
    widths: HashMap<String, u16>,
    manually_resized: HashSet<String>,
}

impl ColumnSizing {
    pub fn width_of(&self, column: &DataColumn) -> u16 {
        self.widths.get(&column.name).copied().unwrap_or(column.size)
    }

    pub fn is_manually_resized(&self, column_name: &str) -> bool {
        self.manually_resized.contains(column_name)
    }

    /// Apply a user drag; the width is clamped and the column becomes exempt
    /// from auto-fit
    pub fn resize(&mut self, column: &DataColumn, width: u16) {
        let clamped = column.clamp_width(width);
        self.widths.insert(column.name.clone(), clamped);
        self.manually_resized.insert(column.name.clone());
    }

    /// Recompute widths for every column not manually resized
    pub fn auto_fit(&mut self, strategy: SizingStrategy, view: &DataView) {
        for (display_col, column) in view.columns().iter().enumerate() {
            if self.manually_resized.contains(&column.name) {
                continue;
            }
            let width = compute_width(strategy, view, display_col, column);
            self.widths.insert(column.name.clone(), width);
        }
    }

    /// Drop a column's manual exemption and recompute just that column
    pub fn reset_column(&mut self, strategy: SizingStrategy, view: &DataView, column_name: &str) {
        self.manually_resized.remove(column_name);
        if let Some((display_col, column)) = view
            .columns()
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == column_name)
        {
            let width = compute_width(strategy, view, display_col, column);
            self.widths.insert(column.name.clone(), width);
        }
    }

    pub fn clear(&mut self) {
        self.widths.clear();
        self.manually_resized.clear();
    }
}

/// Width of one column under the given strategy, always inside the
/// column's clamp range
pub fn compute_width(
    strategy: SizingStrategy,
    view: &DataView,
    display_col: usize,
    column: &DataColumn,
) -> u16 {
    match strategy {
        SizingStrategy::Declared => column.clamp_width(column.size),
        SizingStrategy::FitContent => fit_content_width(view, display_col, column),
    }
}

fn fit_content_width(view: &DataView, display_col: usize, column: &DataColumn) -> u16 {
    let header_width = measure_text(&column.header).saturating_add(HEADER_CHROME);

    let formatter = CellFormatter::for_filter_type(column.filter_type());
    let sample = FIT_SAMPLE_ROWS.min(view.row_count());
    let mut max_cell = 0u16;
    for row in 0..sample {
        match formatter.format(view.get_value(row, display_col)) {
            Some(text) => max_cell = max_cell.max(measure_text(&text)),
            // One unmeasurable cell drops the whole column to header-only
            None => return column.clamp_width(header_width),
        }
    }

    let content_width = if sample == 0 {
        header_width
    } else {
        header_width.max(max_cell.saturating_add(CELL_PADDING))
    };

    column.clamp_width(content_width)
}

/// Rendered width of a cell's text, in terminal cells
pub fn measure_text(text: &str) -> u16 {
    text.chars().count().min(u16::MAX as usize) as u16
}
