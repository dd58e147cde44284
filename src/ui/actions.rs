use crate::state::Panel;

/// All operations the grid shell can apply to a panel's state
///
/// The key dispatcher produces these; the app loop applies them. Nothing
/// here mutates state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAction {
    // Focus movement; extend grows the selection range from the anchor
    FocusUp { extend: bool },
    FocusDown { extend: bool },
    FocusFirst,
    FocusLast,
    PageUp,
    PageDown,

    // Row activation and selection
    ActivateRow,
    OpenRowInNewView,
    ToggleSelect,
    SelectAll,
    ClearSelection,

    // Column cursor and operations
    NextColumn,
    PrevColumn,
    SortColumn { additive: bool },
    OpenFilterEditor,
    ClearColumnFilter,
    MoveColumnLeft,
    MoveColumnRight,
    WidenColumn,
    NarrowColumn,
    ResetColumnWidth,
    HideColumn,
    UnhideAllColumns,
    ToggleSizingStrategy,

    // Shell
    SwitchPanel(Panel),
    Refresh,
    Quit,
}
