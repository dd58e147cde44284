use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::StatefulWidget;

use crate::data::data_view::DataView;
use crate::data::formatter::{CellFormatter, MISSING_PLACEHOLDER};
use crate::state::table_state::TableViewState;
use crate::viewport::column_sizing::measure_text;
use crate::viewport::virtualizer::RowVirtualizer;

/// Width of the focus gutter at the left edge of the body
const GUTTER: u16 = 2;

/// Which of the three empty-state messages applies, if any
///
/// Precedence: still loading beats an unconfigured source beats an empty
/// result set. A populated grid has no placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPlaceholder {
    Loading,
    NoDirectory,
    NoMatches,
}

pub fn empty_state(
    loading: bool,
    source_configured: bool,
    row_count: usize,
) -> Option<GridPlaceholder> {
    if row_count > 0 {
        return None;
    }
    if loading {
        Some(GridPlaceholder::Loading)
    } else if !source_configured {
        Some(GridPlaceholder::NoDirectory)
    } else {
        Some(GridPlaceholder::NoMatches)
    }
}

impl GridPlaceholder {
    pub fn message<'a>(&self, loading_text: &'a str) -> &'a str {
        match self {
            GridPlaceholder::Loading => loading_text,
            GridPlaceholder::NoDirectory => "No scan directory configured",
            GridPlaceholder::NoMatches => "No matching rows",
        }
    }
}

/// Transient, per-grid-instance interaction state
///
/// Never shared across grids and never part of the durable view state.
pub struct GridViewport {
    pub virtualizer: RowVirtualizer,
    pub scroll_offset: usize,
    /// Display index of the column the keyboard cursor is on
    pub current_column: usize,
    /// First display column rendered, shifted to keep the cursor visible
    col_offset: usize,
    /// Body height observed at the last render, for paging
    pub last_body_height: u16,
}

impl GridViewport {
    pub fn new(row_height: u16, overscan: usize) -> Self {
        Self {
            virtualizer: RowVirtualizer::new(0, row_height.max(1)).with_overscan(overscan),
            scroll_offset: 0,
            current_column: 0,
            col_offset: 0,
            last_body_height: 0,
        }
    }
}

/// The virtualized grid: renders only rows intersecting the scrolled
/// viewport, a pure function of the view and its durable state
pub struct ScanGrid<'a> {
    view: &'a DataView,
    state: &'a TableViewState,
    loading: bool,
    source_configured: bool,
    loading_text: &'a str,
}

impl<'a> ScanGrid<'a> {
    pub fn new(view: &'a DataView, state: &'a TableViewState) -> Self {
        Self {
            view,
            state,
            loading: false,
            source_configured: true,
            loading_text: "Loading…",
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn source_configured(mut self, configured: bool) -> Self {
        self.source_configured = configured;
        self
    }

    pub fn loading_text(mut self, text: &'a str) -> Self {
        self.loading_text = text;
        self
    }
}

impl StatefulWidget for ScanGrid<'_> {
    type State = GridViewport;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.height < 2 || area.width <= GUTTER {
            return;
        }

        let header_area = Rect { height: 1, ..area };
        let body_area = Rect {
            y: area.y + 1,
            height: area.height - 1,
            ..area
        };
        state.last_body_height = body_area.height;

        let columns = self.view.columns();
        let widths: Vec<u16> = columns
            .iter()
            .map(|c| self.state.sizing.width_of(c))
            .collect();

        state.current_column = state.current_column.min(columns.len().saturating_sub(1));
        self.adjust_col_offset(state, &widths, area.width - GUTTER);

        self.render_header(header_area, buf, state, &widths);

        if let Some(placeholder) =
            empty_state(self.loading, self.source_configured, self.view.row_count())
        {
            let message = placeholder.message(self.loading_text);
            let x = body_area.x + (body_area.width.saturating_sub(measure_text(message))) / 2;
            let y = body_area.y + body_area.height / 2;
            buf.set_string(x, y, message, Style::default().fg(Color::DarkGray));
            return;
        }

        self.render_rows(body_area, buf, state, &widths);
    }
}

impl ScanGrid<'_> {
    /// Shift the first rendered column until the cursor column fits
    fn adjust_col_offset(&self, state: &mut GridViewport, widths: &[u16], avail: u16) {
        if widths.is_empty() {
            state.col_offset = 0;
            return;
        }
        if state.col_offset > state.current_column {
            state.col_offset = state.current_column;
        }
        loop {
            let used: u16 = widths[state.col_offset..=state.current_column]
                .iter()
                .map(|w| w + 1)
                .sum();
            if used <= avail || state.col_offset >= state.current_column {
                break;
            }
            state.col_offset += 1;
        }
    }

    fn render_header(
        &self,
        area: Rect,
        buf: &mut Buffer,
        state: &GridViewport,
        widths: &[u16],
    ) {
        let columns = self.view.columns();
        let mut x = area.x + GUTTER;

        for (display_idx, column) in columns.iter().enumerate().skip(state.col_offset) {
            let width = widths[display_idx];
            if x + width > area.x + area.width {
                break;
            }

            let mut label = column.header.clone();
            if let Some(rank) = self
                .state
                .sorting
                .iter()
                .position(|s| s.column == column.name)
            {
                let marker = if self.state.sorting[rank].descending {
                    '▼'
                } else {
                    '▲'
                };
                label.push(marker);
                if self.state.sorting.len() > 1 {
                    label.push_str(&(rank + 1).to_string());
                }
            }
            if self.state.filters.contains_key(&column.name) {
                label.push('∗');
            }

            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if display_idx == state.current_column {
                style = style.add_modifier(Modifier::UNDERLINED).fg(Color::Yellow);
            }

            let truncated: String = label.chars().take(width as usize).collect();
            buf.set_string(x, area.y, truncated, style);
            x += width + 1;
        }
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer, state: &mut GridViewport, widths: &[u16]) {
        state.virtualizer.set_count(self.view.row_count());
        let range = state
            .virtualizer
            .visible_range(state.scroll_offset, area.height);

        let columns = self.view.columns();

        for index in range {
            let Some(item) = state.virtualizer.item(index) else {
                continue;
            };
            // Overscanned rows above or below the window have no cell to land in
            if item.end <= state.scroll_offset {
                continue;
            }
            let rel = item.start.saturating_sub(state.scroll_offset);
            if rel >= area.height as usize {
                continue;
            }
            let y = area.y + rel as u16;

            let row_id = self.view.row_id(index);
            let selected = row_id
                .map(|id| self.state.selection.is_selected(id))
                .unwrap_or(false);
            let focused = row_id.is_some() && row_id.map(str::to_string) == self.state.focused_row;

            let mut style = Style::default();
            if selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if focused {
                style = style.add_modifier(Modifier::BOLD);
                buf.set_string(area.x, y, "▸", Style::default().fg(Color::Yellow));
            }

            let mut x = area.x + GUTTER;
            for (display_idx, column) in columns.iter().enumerate().skip(state.col_offset) {
                let width = widths[display_idx];
                if x + width > area.x + area.width {
                    break;
                }

                let value = self.view.get_value(index, display_idx);
                let formatter = CellFormatter::for_filter_type(column.filter_type());
                let text = formatter
                    .format(value)
                    .or_else(|| CellFormatter::Text.format(value))
                    .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string());

                let truncated: String = text.chars().take(width as usize).collect();
                buf.set_string(x, y, truncated, style);
                x += width + 1;
            }
        }
    }
}
