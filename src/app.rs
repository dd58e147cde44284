use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tracing::{info, warn};

use crate::config::Config;
use crate::data::data_view::DataView;
use crate::data::datatable::DataTable;
use crate::data::source::{DataSource, Page, PageRequest, PathRouteResolver, RouteResolver};
use crate::filter::FilterEdit;
use crate::state::store::{AppStore, Panel};
use crate::ui::actions::GridAction;
use crate::ui::filter_editor::{EditorEvent, FilterEditor};
use crate::ui::grid::{GridViewport, ScanGrid};
use crate::ui::keys::dispatch_key;
use crate::viewport::column_sizing::SizingStrategy;
use crate::viewport::fetch_watcher::FetchWatcher;
use crate::viewport::virtualizer::Align;

/// The running viewer: store, derived view, transient grid state, and the
/// wiring between them
///
/// All durable state lives in the store; the app applies grid actions to it
/// and rebuilds the derived view afterwards.
pub struct App {
    config: Config,
    store: AppStore,
    source: Option<Box<dyn DataSource>>,
    routes: Box<dyn RouteResolver>,
    /// Derived from the active panel's table + view state
    view: Option<DataView>,
    viewport: GridViewport,
    fetch_watcher: FetchWatcher,
    filter_editor: Option<FilterEditor>,
    sizing_strategy: SizingStrategy,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, source: Option<Box<dyn DataSource>>) -> Self {
        let sizing_strategy = if config.behavior.auto_fit_columns {
            SizingStrategy::FitContent
        } else {
            SizingStrategy::Declared
        };
        let viewport = GridViewport::new(config.display.row_height, config.display.overscan);
        let fetch_watcher = FetchWatcher::new(
            config.behavior.fetch_threshold * config.display.row_height.max(1) as usize,
        );

        let mut app = Self {
            config,
            store: AppStore::new(),
            source,
            routes: Box::new(PathRouteResolver),
            view: None,
            viewport,
            fetch_watcher,
            filter_editor: None,
            sizing_strategy,
            status: String::new(),
            should_quit: false,
        };
        app.switch_panel(Panel::Scans);
        app
    }

    pub fn with_routes(mut self, routes: Box<dyn RouteResolver>) -> Self {
        self.routes = routes;
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn source_configured(&self) -> bool {
        self.source.is_some()
    }

    fn switch_panel(&mut self, panel: Panel) {
        self.store.switch_panel(panel);
        self.view = None;
        self.viewport.scroll_offset = 0;
        self.viewport.current_column = 0;
        self.fetch_watcher.reset();
        self.filter_editor = None;
        self.initial_load();
    }

    /// First page for a freshly entered panel; view state is rebuilt from
    /// the delivered columns
    fn initial_load(&mut self) {
        let Some(panel) = self.store.active_panel() else {
            return;
        };
        let Some(source) = &self.source else {
            return;
        };

        let request = PageRequest::first(self.config.behavior.page_size);
        let state = self.store.panel_mut(panel);
        state.loading = true;

        match source.fetch(panel.location(), None, &[], &request) {
            Ok(page) => {
                let total = page.total_count;
                let cursor = page.next_cursor.clone();
                let mut table = table_from_page(panel.location(), &page);
                decorate_columns(&mut table);
                self.store
                    .panel_mut(panel)
                    .install_first_page(table, cursor, total);
                self.rebuild_view(true);
            }
            Err(e) => {
                warn!(panel = panel.title(), error = %e, "initial fetch failed");
                let state = self.store.panel_mut(panel);
                state.loading = false;
                state.error = Some(e.to_string());
            }
        }
    }

    /// Refetch from the top with the current filter and sort, keeping view
    /// state; used whenever either of them changes
    fn refetch_active(&mut self) {
        let Some(panel) = self.store.active_panel() else {
            return;
        };
        let Some(source) = &self.source else {
            return;
        };

        let request = PageRequest::first(self.config.behavior.page_size);
        let state = self.store.panel(panel);
        let filter = state.view_state.filter_condition();
        let sorting = state.view_state.sorting.clone();

        self.store.panel_mut(panel).loading = true;
        match source.fetch(panel.location(), filter.as_ref(), &sorting, &request) {
            Ok(page) => {
                let total = page.total_count;
                let cursor = page.next_cursor.clone();
                let mut table = table_from_page(panel.location(), &page);
                decorate_columns(&mut table);
                self.store
                    .panel_mut(panel)
                    .replace_rows(table, cursor, total);
                self.viewport.scroll_offset = 0;
                self.fetch_watcher.reset();
                self.rebuild_view(false);
            }
            Err(e) => {
                warn!(panel = panel.title(), error = %e, "refetch failed");
                let state = self.store.panel_mut(panel);
                state.loading = false;
                state.error = Some(e.to_string());
            }
        }
    }

    /// Pull the next page when the scroll watcher fired
    fn fetch_next_page(&mut self) {
        let Some(panel) = self.store.active_panel() else {
            return;
        };
        let Some(source) = &self.source else {
            return;
        };

        let state = self.store.panel(panel);
        let Some(cursor) = state.next_cursor.clone() else {
            return;
        };
        if state.loading {
            // In-flight guard; the watcher itself never dedups
            return;
        }
        let filter = state.view_state.filter_condition();
        let sorting = state.view_state.sorting.clone();
        let request = PageRequest::after(self.config.behavior.page_size, cursor);

        self.store.panel_mut(panel).loading = true;
        match source.fetch(panel.location(), filter.as_ref(), &sorting, &request) {
            Ok(page) => {
                info!(
                    panel = panel.title(),
                    rows = page.items.len(),
                    "next page appended"
                );
                self.store
                    .panel_mut(panel)
                    .append_page(page.items, page.next_cursor);
                self.rebuild_view(false);
            }
            Err(e) => {
                warn!(panel = panel.title(), error = %e, "page fetch failed");
                let state = self.store.panel_mut(panel);
                state.loading = false;
                state.error = Some(e.to_string());
            }
        }
    }

    /// Rebuild the derived view from the active slice; optionally re-run
    /// auto-fit sizing (first load and strategy changes)
    fn rebuild_view(&mut self, fit_columns: bool) {
        let Some(state) = self.store.active_state() else {
            self.view = None;
            return;
        };
        let Some(table) = &state.table else {
            self.view = None;
            return;
        };

        let mut view = DataView::new(Arc::clone(table));
        view.set_column_order(
            &state.view_state.column_order,
            &state.view_state.hidden_columns,
        );
        view.apply(
            state.view_state.filter_condition().as_ref(),
            &state.view_state.sorting,
        );

        if fit_columns {
            let strategy = self.sizing_strategy;
            if let Some(state) = self.store.active_state_mut() {
                state.view_state.sizing.auto_fit(strategy, &view);
            }
        }

        self.viewport.virtualizer.set_count(view.row_count());
        self.view = Some(view);
    }

    // ---- focus and selection ----------------------------------------

    fn focused_display_index(&self) -> Option<usize> {
        let view = self.view.as_ref()?;
        let state = self.store.active_state()?;
        let focused = state.view_state.focused_row.as_deref()?;
        view.display_index_of_id(focused)
    }

    fn focus_to(&mut self, index: usize, extend: bool) {
        let Some(view) = &self.view else {
            return;
        };
        if view.row_count() == 0 {
            return;
        }
        let index = index.min(view.row_count() - 1);
        let Some(id) = view.row_id(index).map(str::to_string) else {
            return;
        };
        let row_ids = view.visible_row_ids();

        if let Some(state) = self.store.active_state_mut() {
            if extend {
                state.view_state.selection.extend_to(&row_ids, &id);
            }
            state.view_state.focused_row = Some(id);
        }
        self.scroll_focus_into_view(index);
    }

    fn move_focus(&mut self, delta: isize, extend: bool) {
        let Some(view) = &self.view else {
            return;
        };
        if view.row_count() == 0 {
            return;
        }
        let current = self.focused_display_index();
        let target = match current {
            Some(idx) => idx.saturating_add_signed(delta),
            // No focus yet: land on an edge row
            None if delta >= 0 => 0,
            None => view.row_count() - 1,
        };
        self.focus_to(target, extend);
    }

    /// Converge the scroll offset on the focused row; dynamic measurements
    /// may shift rows, so iterate until the offset is a fixed point
    fn scroll_focus_into_view(&mut self, index: usize) {
        let viewport = self.viewport.last_body_height.max(1);
        for _ in 0..4 {
            let next = self.viewport.virtualizer.scroll_to_index(
                index,
                Align::Auto,
                viewport,
                self.viewport.scroll_offset,
            );
            if next == self.viewport.scroll_offset {
                break;
            }
            self.viewport.scroll_offset = next;
        }
    }

    fn activate_row(&mut self, new_view: bool) {
        let Some(panel) = self.store.active_panel() else {
            return;
        };
        let Some(focused) = self
            .store
            .active_state()
            .and_then(|s| s.view_state.focused_row.clone())
        else {
            return;
        };

        let route = self.routes.route_for(panel.location(), &focused);
        if new_view {
            // Selection is deliberately untouched
            info!(route = %route, "opened in new view");
            self.status = format!("opened {} in new view", route);
        } else {
            if let Some(state) = self.store.active_state_mut() {
                state.view_state.selection.select_single(&focused);
            }
            info!(route = %route, "navigated");
            self.status = format!("→ {}", route);
        }
    }

    // ---- column helpers ---------------------------------------------

    fn current_column_name(&self) -> Option<String> {
        let view = self.view.as_ref()?;
        view.columns()
            .get(self.viewport.current_column)
            .map(|c| c.name.clone())
    }

    fn move_current_column(&mut self, left: bool) {
        let Some(view) = &self.view else {
            return;
        };
        let columns = view.column_names();
        let cc = self.viewport.current_column;
        let target_idx = if left {
            if cc == 0 {
                return;
            }
            cc - 1
        } else {
            if cc + 1 >= columns.len() {
                return;
            }
            cc + 1
        };

        let dragged = columns[cc].clone();
        let target = columns[target_idx].clone();
        let reordered = self
            .store
            .active_state_mut()
            .map(|state| state.view_state.reorder_column(&dragged, &target))
            .unwrap_or(false);
        if reordered {
            self.viewport.current_column = target_idx;
            self.rebuild_view(false);
        }
    }

    fn resize_current_column(&mut self, delta: i32) {
        let Some(view) = &self.view else {
            return;
        };
        let Some(column) = view.columns().get(self.viewport.current_column).cloned().cloned() else {
            return;
        };
        if let Some(state) = self.store.active_state_mut() {
            let current = state.view_state.sizing.width_of(&column);
            let wanted = current.saturating_add_signed(delta as i16);
            state.view_state.sizing.resize(&column, wanted);
        }
    }

    // ---- input ------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(editor) = &mut self.filter_editor {
            match editor.handle_key(key) {
                EditorEvent::Pending => {}
                EditorEvent::Dismiss => {
                    self.filter_editor = None;
                }
                EditorEvent::Commit(edit) => {
                    let column = editor.column().to_string();
                    self.filter_editor = None;
                    self.apply_filter_edit(&column, edit);
                }
            }
            return;
        }

        if let Some(action) = dispatch_key(key) {
            self.apply_action(action);
        }
    }

    fn apply_filter_edit(&mut self, column: &str, edit: FilterEdit) {
        let Some(state) = self.store.active_state_mut() else {
            return;
        };
        match edit {
            FilterEdit::Apply(condition) => {
                state.view_state.set_filter(column, condition);
                self.status = format!("filter on {}", column);
            }
            FilterEdit::Clear => {
                state.view_state.clear_filter(column);
                self.status = format!("filter cleared on {}", column);
            }
            // Rejected commits never reach this point
            FilterEdit::Incomplete | FilterEdit::Invalid(_) => return,
        }
        self.refetch_active();
    }

    pub fn apply_action(&mut self, action: GridAction) {
        use GridAction::*;

        match action {
            FocusUp { extend } => self.move_focus(-1, extend),
            FocusDown { extend } => self.move_focus(1, extend),
            FocusFirst => self.focus_to(0, false),
            FocusLast => {
                if let Some(view) = &self.view {
                    let last = view.row_count().saturating_sub(1);
                    self.focus_to(last, false);
                }
            }
            PageUp => self.move_focus(-(self.viewport.last_body_height.max(1) as isize), false),
            PageDown => self.move_focus(self.viewport.last_body_height.max(1) as isize, false),

            ActivateRow => self.activate_row(false),
            OpenRowInNewView => self.activate_row(true),
            ToggleSelect => {
                let focused = self
                    .store
                    .active_state()
                    .and_then(|s| s.view_state.focused_row.clone());
                if let (Some(id), Some(state)) = (focused, self.store.active_state_mut()) {
                    state.view_state.selection.toggle(&id);
                }
            }
            SelectAll => {
                let ids = self.view.as_ref().map(|v| v.visible_row_ids());
                if let (Some(ids), Some(state)) = (ids, self.store.active_state_mut()) {
                    state.view_state.selection.select_all(&ids);
                }
            }
            ClearSelection => {
                // Focus survives; only the selection empties
                if let Some(state) = self.store.active_state_mut() {
                    state.view_state.selection.clear();
                }
            }

            NextColumn => {
                let count = self.view.as_ref().map(|v| v.column_count()).unwrap_or(0);
                if count > 0 {
                    self.viewport.current_column =
                        (self.viewport.current_column + 1).min(count - 1);
                }
            }
            PrevColumn => {
                self.viewport.current_column = self.viewport.current_column.saturating_sub(1);
            }
            SortColumn { additive } => {
                if let Some(name) = self.current_column_name() {
                    if let Some(state) = self.store.active_state_mut() {
                        state.view_state.toggle_sort(&name, additive);
                    }
                    self.refetch_active();
                }
            }
            OpenFilterEditor => self.open_filter_editor(),
            ClearColumnFilter => {
                if let Some(name) = self.current_column_name() {
                    self.apply_filter_edit(&name, FilterEdit::Clear);
                }
            }
            MoveColumnLeft => self.move_current_column(true),
            MoveColumnRight => self.move_current_column(false),
            WidenColumn => self.resize_current_column(2),
            NarrowColumn => self.resize_current_column(-2),
            ResetColumnWidth => {
                if let (Some(name), Some(view)) = (self.current_column_name(), self.view.as_ref())
                {
                    let strategy = self.sizing_strategy;
                    let view = view.clone();
                    if let Some(state) = self.store.active_state_mut() {
                        state.view_state.sizing.reset_column(strategy, &view, &name);
                    }
                }
            }
            HideColumn => {
                if let Some(name) = self.current_column_name() {
                    if let Some(state) = self.store.active_state_mut() {
                        state.view_state.hide_column(&name);
                    }
                    self.rebuild_view(false);
                }
            }
            UnhideAllColumns => {
                if let Some(state) = self.store.active_state_mut() {
                    state.view_state.unhide_all_columns();
                }
                self.rebuild_view(false);
            }
            ToggleSizingStrategy => {
                self.sizing_strategy = match self.sizing_strategy {
                    SizingStrategy::Declared => SizingStrategy::FitContent,
                    SizingStrategy::FitContent => SizingStrategy::Declared,
                };
                self.rebuild_view(true);
            }

            SwitchPanel(panel) => self.switch_panel(panel),
            Refresh => self.refetch_active(),
            Quit => self.should_quit = true,
        }
    }

    fn open_filter_editor(&mut self) {
        let Some(view) = &self.view else {
            return;
        };
        let Some(column) = view.columns().get(self.viewport.current_column).cloned().cloned()
        else {
            return;
        };
        if !column.filterable {
            self.status = format!("{} is not filterable", column.name);
            return;
        }
        let existing = self
            .store
            .active_state()
            .and_then(|s| s.view_state.filters.get(&column.name));
        self.filter_editor = Some(FilterEditor::open(&column, existing));
    }

    /// Scroll-position watcher tick: request the next page near the bottom
    pub fn poll_fetch(&mut self) {
        let Some(state) = self.store.active_state() else {
            return;
        };
        let has_more = state.has_more();
        let loading = state.loading;

        let content = self.viewport.virtualizer.total_size();
        let viewport = self.viewport.last_body_height as usize;
        let fired = self
            .fetch_watcher
            .observe(self.viewport.scroll_offset, viewport, content);

        if fired && has_more && !loading {
            self.fetch_next_page();
        }
    }

    // ---- rendering ---------------------------------------------------

    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(2),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.draw_tabs(frame, chunks[0]);

        let error = self.store.active_state().and_then(|s| s.error.clone());
        if let Some(error) = error {
            let message = Paragraph::new(format!("fetch failed: {}", error))
                .style(Style::default().fg(Color::Red));
            frame.render_widget(message, chunks[1]);
        } else if let Some(view) = &self.view {
            if let Some(state) = self.store.active_state() {
                let grid = ScanGrid::new(view, &state.view_state)
                    .loading(state.loading)
                    .source_configured(self.source_configured())
                    .loading_text(&self.config.display.loading_text);
                frame.render_stateful_widget(grid, chunks[1], &mut self.viewport);
            }
        } else {
            // No data yet: an empty view renders just the placeholder
            let loading = self
                .store
                .active_state()
                .map(|s| s.loading)
                .unwrap_or(false);
            let placeholder =
                crate::ui::grid::empty_state(loading, self.source_configured(), 0)
                    .map(|p| p.message(&self.config.display.loading_text).to_string())
                    .unwrap_or_default();
            let message =
                Paragraph::new(placeholder).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(message, chunks[1]);
        }

        self.draw_status(frame, chunks[2]);

        if let Some(editor) = &self.filter_editor {
            frame.render_widget(editor, chunks[1]);
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let active = self.store.active_panel();
        let mut spans = Vec::new();
        for panel in Panel::ALL {
            let style = if Some(panel) == active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", panel.title()), style));
        }
        if let Some(state) = self.store.active_state() {
            if let Some(total) = state.total_count {
                spans.push(Span::styled(
                    format!("  {} of {} rows", state.row_count(), total),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let selected = self
            .store
            .active_state()
            .map(|s| s.view_state.selection.len())
            .unwrap_or(0);
        let mut left = self.status.clone();
        if selected > 0 {
            if !left.is_empty() {
                left.push_str("  ·  ");
            }
            left.push_str(&format!("{} selected", selected));
        }
        if left.is_empty() {
            left = "s sort · f filter · space select · enter open · q quit".to_string();
        }
        frame.render_widget(
            Paragraph::new(left).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }

    /// Blocking event loop; returns on quit
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(250))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    _ => {}
                }
            }

            self.poll_fetch();
        }
        Ok(())
    }
}

/// Materialize one page into a table
fn table_from_page(location: &str, page: &Page) -> DataTable {
    let mut table = DataTable::new(location);
    for column in &page.columns {
        table.add_column(column.clone());
    }
    for row in &page.items {
        if let Err(e) = table.add_row(row.clone()) {
            warn!(error = %e, "dropping malformed row");
        }
    }
    table
}

/// Width and filter hints for the well-known scan result columns
fn decorate_columns(table: &mut DataTable) {
    for column in &mut table.columns {
        match column.name.as_str() {
            "id" => {
                *column = column.clone().with_size_bounds(6, 24).with_size(10);
            }
            "model" => {
                *column = column.clone().with_size_bounds(8, 40).with_size(20);
            }
            "total_time" => {
                *column = column
                    .clone()
                    .with_header("time")
                    .with_size_bounds(6, 16)
                    .with_size(10);
            }
            "score" | "passed" => {
                *column = column.clone().with_size_bounds(5, 12).with_size(8);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataColumn, DataRow, DataValue};
    use crate::data::source::MemoryDataSource;

    fn test_source(rows: usize) -> Box<dyn crate::data::source::DataSource> {
        let mut table = DataTable::new("scans");
        table.add_column(DataColumn::new("id"));
        table.add_column(DataColumn::new("model"));
        for i in 0..rows {
            table
                .add_row(DataRow::new(
                    format!("s{}", i),
                    vec![
                        DataValue::String(format!("s{}", i)),
                        DataValue::String(format!("model-{}", i % 3)),
                    ],
                ))
                .unwrap();
        }
        let mut source = MemoryDataSource::new();
        source.insert("scans", table.clone());
        source.insert("transcripts", table.clone());
        source.insert("validation", table);
        Box::new(source)
    }

    fn test_app(rows: usize) -> App {
        let mut config = Config::default();
        config.behavior.page_size = 10;
        App::new(config, Some(test_source(rows)))
    }

    #[test]
    fn test_initial_load_populates_scans() {
        let app = test_app(25);
        assert_eq!(app.store.active_panel(), Some(Panel::Scans));
        assert_eq!(app.store.scans.row_count(), 10);
        assert!(app.store.scans.has_more());
        assert!(app.view.is_some());
    }

    #[test]
    fn test_click_then_shift_click_range() {
        let mut app = test_app(25);

        app.focus_to(2, false);
        app.apply_action(GridAction::ActivateRow);
        app.focus_to(6, true);

        let state = app.store.active_state().unwrap();
        let mut ids: Vec<String> = state.view_state.selection.ids().map(String::from).collect();
        ids.sort();
        assert_eq!(ids, vec!["s2", "s3", "s4", "s5", "s6"]);
        assert_eq!(state.view_state.focused_row.as_deref(), Some("s6"));

        // Extending back past the anchor drops the stale tail
        app.focus_to(1, true);
        let state = app.store.active_state().unwrap();
        let mut ids: Vec<String> = state.view_state.selection.ids().map(String::from).collect();
        ids.sort();
        assert_eq!(ids, vec!["s1", "s2"]);
    }

    #[test]
    fn test_open_in_new_view_keeps_selection() {
        let mut app = test_app(25);
        app.focus_to(2, false);
        app.apply_action(GridAction::ActivateRow);
        app.focus_to(4, false);
        app.apply_action(GridAction::OpenRowInNewView);

        let state = app.store.active_state().unwrap();
        // Still the singleton from the earlier activation
        assert_eq!(state.view_state.selection.len(), 1);
        assert!(state.view_state.selection.is_selected("s2"));
    }

    #[test]
    fn test_escape_clears_selection_not_focus() {
        let mut app = test_app(25);
        app.focus_to(3, false);
        app.apply_action(GridAction::ActivateRow);
        app.apply_action(GridAction::ClearSelection);

        let state = app.store.active_state().unwrap();
        assert!(state.view_state.selection.is_empty());
        assert_eq!(state.view_state.focused_row.as_deref(), Some("s3"));
    }

    #[test]
    fn test_sort_action_refetches_sorted() {
        let mut app = test_app(25);
        app.viewport.current_column = 1; // model
        app.apply_action(GridAction::SortColumn { additive: false });

        let view = app.view.as_ref().unwrap();
        let first = view.get_value_by_name(0, "model").unwrap().to_string();
        assert_eq!(first, "model-0");

        let state = app.store.active_state().unwrap();
        assert_eq!(state.view_state.sorting.len(), 1);
    }

    #[test]
    fn test_infinite_scroll_appends_next_page() {
        let mut app = test_app(25);
        app.viewport.last_body_height = 5;
        // Scroll to the bottom of the first page: the crossing fires once
        app.viewport.scroll_offset = 5;
        app.poll_fetch();
        assert_eq!(app.store.scans.row_count(), 20);

        // New content re-armed the watcher; still near the (new) bottom
        app.viewport.scroll_offset = 12;
        app.poll_fetch();
        assert_eq!(app.store.scans.row_count(), 25);
        assert!(!app.store.scans.has_more());

        // Exhausted: later ticks below the threshold fetch nothing
        app.poll_fetch();
        app.poll_fetch();
        assert_eq!(app.store.scans.row_count(), 25);
    }

    #[test]
    fn test_unconfigured_source_shows_no_directory() {
        let app = App::new(Config::default(), None);
        assert!(app.view.is_none());
        assert_eq!(
            crate::ui::grid::empty_state(false, app.source_configured(), 0),
            Some(crate::ui::grid::GridPlaceholder::NoDirectory)
        );
    }

    #[test]
    fn test_hide_and_reorder_columns() {
        let mut app = test_app(5);
        app.viewport.current_column = 0;
        app.apply_action(GridAction::MoveColumnRight);
        let view = app.view.as_ref().unwrap();
        assert_eq!(view.column_names(), vec!["model", "id"]);
        assert_eq!(app.viewport.current_column, 1);

        app.apply_action(GridAction::HideColumn);
        let view = app.view.as_ref().unwrap();
        assert_eq!(view.column_names(), vec!["model"]);

        app.apply_action(GridAction::UnhideAllColumns);
        let view = app.view.as_ref().unwrap();
        assert_eq!(view.column_count(), 2);
    }
}
