use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::data::datatable::DataColumn;
use crate::filter::{FilterCondition, FilterDraft, FilterEdit, OperandArity};

/// Which text field of the editor owns keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorField {
    Value,
    Second,
}

/// What a key press did to the editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Commit the edit: apply or clear the column's filter and close
    Commit(FilterEdit),
    /// Discard staged edits and close
    Dismiss,
    /// Still editing (includes rejected commits, which keep it open)
    Pending,
}

/// Modal per-column filter editor
///
/// Staged state lives here and only here; the committed filter map is
/// untouched until a commit succeeds. Controls are seeded from the
/// committed condition when the editor opens or switches column, never
/// on value keystrokes.
pub struct FilterEditor {
    draft: FilterDraft,
    value_input: Input,
    second_input: Input,
    field: EditorField,
    error: Option<String>,
}

impl FilterEditor {
    pub fn open(column: &DataColumn, existing: Option<&FilterCondition>) -> Self {
        let draft = FilterDraft::from_condition(&column.name, column.filter_type(), existing);
        let value_input = Input::new(draft.value.clone());
        let second_input = Input::new(draft.second_value.clone());
        Self {
            draft,
            value_input,
            second_input,
            field: EditorField::Value,
            error: None,
        }
    }

    pub fn column(&self) -> &str {
        &self.draft.column
    }

    /// Re-seed for a different column without closing the modal
    pub fn switch_column(&mut self, column: &DataColumn, existing: Option<&FilterCondition>) {
        if self.draft.column == column.name {
            return;
        }
        *self = Self::open(column, existing);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorEvent {
        match key.code {
            KeyCode::Esc => EditorEvent::Dismiss,
            KeyCode::Enter => self.commit(),
            KeyCode::Up => {
                self.draft.cycle_operator(false);
                self.error = None;
                EditorEvent::Pending
            }
            KeyCode::Down => {
                self.draft.cycle_operator(true);
                self.error = None;
                EditorEvent::Pending
            }
            KeyCode::Tab | KeyCode::BackTab => {
                if self.draft.operator.arity() == OperandArity::Pair {
                    self.field = match self.field {
                        EditorField::Value => EditorField::Second,
                        EditorField::Second => EditorField::Value,
                    };
                }
                EditorEvent::Pending
            }
            _ => {
                let input = match self.field {
                    EditorField::Value => &mut self.value_input,
                    EditorField::Second => &mut self.second_input,
                };
                input.handle_event(&Event::Key(key));
                self.error = None;
                EditorEvent::Pending
            }
        }
    }

    /// Commit staged values atomically; a rejected commit changes nothing
    fn commit(&mut self) -> EditorEvent {
        self.draft.value = self.value_input.value().to_string();
        self.draft.second_value = self.second_input.value().to_string();

        match self.draft.commit() {
            FilterEdit::Incomplete => {
                self.error = Some("both bounds are required".to_string());
                EditorEvent::Pending
            }
            FilterEdit::Invalid(message) => {
                self.error = Some(message);
                EditorEvent::Pending
            }
            edit => EditorEvent::Commit(edit),
        }
    }

    /// Centered popup rect inside the containing area
    pub fn popup_area(area: Rect) -> Rect {
        let width = 48.min(area.width);
        let height = 9.min(area.height);
        Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        }
    }
}

impl Widget for &FilterEditor {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = FilterEditor::popup_area(area);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Filter: {} ", self.draft.column));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let takes_value = self.draft.operator.requires_operand();
        let pair = self.draft.operator.arity() == OperandArity::Pair;

        let field_style = |active: bool| {
            if active && takes_value {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            }
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Operator: "),
                Span::styled(
                    self.draft.operator.label(),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw("  (Up/Down to change)"),
            ]),
            Line::from(""),
        ];

        if takes_value {
            let label = if pair { "From: " } else { "Value: " };
            lines.push(Line::from(vec![
                Span::raw(label),
                Span::styled(
                    self.value_input.value().to_string(),
                    field_style(self.field == EditorField::Value),
                ),
            ]));
            if pair {
                lines.push(Line::from(vec![
                    Span::raw("To:   "),
                    Span::styled(
                        self.second_input.value().to_string(),
                        field_style(self.field == EditorField::Second),
                    ),
                ]));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "(no value needed)",
                Style::default().fg(Color::DarkGray),
            )));
        }

        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        lines.push(Line::from(Span::styled(
            "Enter apply · Esc cancel · Tab switch field",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
