use super::state::{Screen, SearchFocus};

/// Commands the input mapper produces. Pure state updates run in the
/// reducer; anything touching the network, disk, or mpv runs in the
/// side-effect handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowScreen(Screen),
    ScreenForward,
    ScreenBackward,
    FocusSearch(SearchFocus),

    CursorUp,
    CursorDown,
    CursorTop,
    CursorBottom,
    PageUp,
    PageDown,

    TypeChar(char),
    EraseChar,
    ClearQuery,
    SubmitSearch,

    PlaySelected,
    Enqueue,
    Unqueue,
    ClearQueue,
    ToggleShuffle,
    MoveUp,
    MoveDown,
    PlayNext,
    PlayPrev,

    PlayPause,
    CycleRepeat,
    VolumeUp,
    VolumeDown,
    SeekAhead,
    SeekBack,

    SectionNext,
    SectionPrev,
    ApplySelection,
    WipeCache,

    Reload,
    Redraw,
}
