use super::model::EditorMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeEvent {
    ToggleOriginalView,
    EnterOriginalView,
    ExitOriginalView,
    ToggleLock,
    EnterZoom,
    ToggleZoomDraw,
    ExitZoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: EditorMode,
    pub event: ModeEvent,
    pub to: EditorMode,
}

impl ModeTransition {
    pub const fn new(from: EditorMode, event: ModeEvent, to: EditorMode) -> Self {
        Self { from, event, to }
    }
}
