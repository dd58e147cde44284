use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::Panel;
use crate::ui::actions::GridAction;

/// Map a raw key event to a grid action
///
/// Returns None for keys the grid does not own; the filter editor consumes
/// events before this dispatcher runs when it is open.
pub fn dispatch_key(key: KeyEvent) -> Option<GridAction> {
    use GridAction::*;

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let action = match key.code {
        KeyCode::Up => FocusUp { extend: shift },
        KeyCode::Down => FocusDown { extend: shift },
        KeyCode::Char('k') => FocusUp { extend: false },
        KeyCode::Char('j') => FocusDown { extend: false },
        KeyCode::Home if ctrl => FocusFirst,
        KeyCode::End if ctrl => FocusLast,
        KeyCode::Char('g') => FocusFirst,
        KeyCode::Char('G') => FocusLast,
        KeyCode::PageUp => PageUp,
        KeyCode::PageDown => PageDown,

        KeyCode::Enter if ctrl => OpenRowInNewView,
        KeyCode::Enter => ActivateRow,
        KeyCode::Char(' ') => ToggleSelect,
        KeyCode::Char('a') if ctrl => SelectAll,
        KeyCode::Esc => ClearSelection,

        KeyCode::Left => PrevColumn,
        KeyCode::Right => NextColumn,
        KeyCode::Char('s') => SortColumn { additive: false },
        KeyCode::Char('S') => SortColumn { additive: true },
        KeyCode::Char('f') => OpenFilterEditor,
        KeyCode::Char('F') => ClearColumnFilter,
        KeyCode::Char('H') => MoveColumnLeft,
        KeyCode::Char('L') => MoveColumnRight,
        KeyCode::Char('>') => WidenColumn,
        KeyCode::Char('<') => NarrowColumn,
        KeyCode::Char('0') => ResetColumnWidth,
        KeyCode::Char('d') => HideColumn,
        KeyCode::Char('D') => UnhideAllColumns,
        KeyCode::Char('z') => ToggleSizingStrategy,

        KeyCode::Char('1') => SwitchPanel(Panel::Scans),
        KeyCode::Char('2') => SwitchPanel(Panel::Transcripts),
        KeyCode::Char('3') => SwitchPanel(Panel::Validation),
        KeyCode::Char('r') => Refresh,
        KeyCode::Char('q') => Quit,
        KeyCode::Char('c') if ctrl => Quit,

        _ => return None,
    };

    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_arrow_extend_modifier() {
        assert_eq!(
            dispatch_key(key(KeyCode::Down, KeyModifiers::NONE)),
            Some(GridAction::FocusDown { extend: false })
        );
        assert_eq!(
            dispatch_key(key(KeyCode::Down, KeyModifiers::SHIFT)),
            Some(GridAction::FocusDown { extend: true })
        );
    }

    #[test]
    fn test_ctrl_jumps() {
        assert_eq!(
            dispatch_key(key(KeyCode::Home, KeyModifiers::CONTROL)),
            Some(GridAction::FocusFirst)
        );
        assert_eq!(
            dispatch_key(key(KeyCode::End, KeyModifiers::CONTROL)),
            Some(GridAction::FocusLast)
        );
    }

    #[test]
    fn test_escape_clears_selection() {
        assert_eq!(
            dispatch_key(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(GridAction::ClearSelection)
        );
    }

    #[test]
    fn test_unowned_keys_fall_through() {
        assert_eq!(dispatch_key(key(KeyCode::Char('~'), KeyModifiers::NONE)), None);
    }
}
