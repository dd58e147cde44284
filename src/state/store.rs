use std::sync::Arc;

use crate::data::datatable::{DataRow, DataTable};
use crate::state::table_state::TableViewState;
use tracing::info;

/// The three result panels the viewer renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Scans,
    Transcripts,
    Validation,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        match self {
            Panel::Scans => "Scans",
            Panel::Transcripts => "Transcripts",
            Panel::Validation => "Validation",
        }
    }

    /// Location key handed to the data source
    pub fn location(&self) -> &'static str {
        match self {
            Panel::Scans => "scans",
            Panel::Transcripts => "transcripts",
            Panel::Validation => "validation",
        }
    }

    pub const ALL: [Panel; 3] = [Panel::Scans, Panel::Transcripts, Panel::Validation];
}

/// One panel's slice of application state
///
/// Accumulates fetched pages into a table and owns the panel's durable view
/// state. `clear` is the reset-on-leave contract: navigating away drops
/// everything back to the initial slice.
#[derive(Default)]
pub struct PanelState {
    /// Pages accumulated so far; None before the first page lands
    pub table: Option<Arc<DataTable>>,
    pub view_state: TableViewState,
    pub next_cursor: Option<String>,
    pub total_count: Option<usize>,
    pub loading: bool,
    /// Upstream fetch failure, surfaced by the shell as an error panel
    pub error: Option<String>,
    pub scroll_offset: usize,
}

impl PanelState {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn row_count(&self) -> usize {
        self.table.as_ref().map(|t| t.row_count()).unwrap_or(0)
    }

    /// First page: replaces the table and rebuilds view state for the
    /// delivered column set
    pub fn install_first_page(
        &mut self,
        table: DataTable,
        next_cursor: Option<String>,
        total_count: usize,
    ) {
        self.view_state = TableViewState::for_columns(&table.columns);
        self.table = Some(Arc::new(table));
        self.next_cursor = next_cursor;
        self.total_count = Some(total_count);
        self.loading = false;
        self.error = None;
        self.scroll_offset = 0;
    }

    /// Filter or sort changed: the row set restarts from page one but the
    /// view state (filters, sorting, sizing, order) survives
    pub fn replace_rows(
        &mut self,
        table: DataTable,
        next_cursor: Option<String>,
        total_count: usize,
    ) {
        self.table = Some(Arc::new(table));
        self.next_cursor = next_cursor;
        self.total_count = Some(total_count);
        self.loading = false;
        self.error = None;
        self.scroll_offset = 0;
    }

    /// Later pages: rows append, view state survives
    pub fn append_page(&mut self, rows: Vec<DataRow>, next_cursor: Option<String>) {
        if let Some(table) = &self.table {
            let mut grown = DataTable::clone(table);
            for row in rows {
                // Rows from a stale schema are dropped rather than mis-aligned
                let _ = grown.add_row(row);
            }
            self.table = Some(Arc::new(grown));
        }
        self.next_cursor = next_cursor;
        self.loading = false;
    }

    pub fn clear(&mut self) {
        *self = PanelState::default();
    }
}

/// Process-wide store: one slice per panel plus the active panel marker
///
/// Panels reset when navigated away from; all mutation goes through the
/// store so a panel's grid can stay a pure function of its slice.
#[derive(Default)]
pub struct AppStore {
    pub scans: PanelState,
    pub transcripts: PanelState,
    pub validation: PanelState,
    active: Option<Panel>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_panel(&self) -> Option<Panel> {
        self.active
    }

    pub fn panel(&self, panel: Panel) -> &PanelState {
        match panel {
            Panel::Scans => &self.scans,
            Panel::Transcripts => &self.transcripts,
            Panel::Validation => &self.validation,
        }
    }

    pub fn panel_mut(&mut self, panel: Panel) -> &mut PanelState {
        match panel {
            Panel::Scans => &mut self.scans,
            Panel::Transcripts => &mut self.transcripts,
            Panel::Validation => &mut self.validation,
        }
    }

    pub fn active_state(&self) -> Option<&PanelState> {
        self.active.map(|p| self.panel(p))
    }

    pub fn active_state_mut(&mut self) -> Option<&mut PanelState> {
        self.active.map(move |p| self.panel_mut(p))
    }

    /// Switch panels, resetting the slice being left
    pub fn switch_panel(&mut self, panel: Panel) {
        if self.active == Some(panel) {
            return;
        }
        if let Some(previous) = self.active {
            info!(from = previous.title(), to = panel.title(), "panel switch");
            self.panel_mut(previous).clear();
        }
        self.active = Some(panel);
    }

    pub fn clear_scans_state(&mut self) {
        self.scans.clear();
    }

    pub fn clear_transcript_state(&mut self) {
        self.transcripts.clear();
    }

    pub fn clear_validation_state(&mut self) {
        self.validation.clear();
    }
}
