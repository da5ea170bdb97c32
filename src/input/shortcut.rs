use crate::session::{EditorCommand, EditorSession};
use crate::state::ZoomMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub dialog_open: bool,
    pub text_input_active: bool,
    pub zoom: ZoomMode,
    pub auto_mode: bool,
    pub pending_edits: bool,
}

impl InputContext {
    /// Context for a session with no dialog or text field focused.
    pub fn for_session(session: &EditorSession) -> Self {
        Self {
            dialog_open: false,
            text_input_active: false,
            zoom: session.mode().zoom,
            auto_mode: session.auto_mode(),
            pending_edits: session.pending_edits(),
        }
    }
}

fn normalize(key: ShortcutKey) -> ShortcutKey {
    match key {
        ShortcutKey::Character(c) => ShortcutKey::Character(c.to_ascii_lowercase()),
        other => other,
    }
}

fn resolve_brush_shortcut(key: ShortcutKey) -> Option<EditorCommand> {
    match key {
        ShortcutKey::Character('+' | '=') => Some(EditorCommand::GrowBrush),
        ShortcutKey::Character('-' | '_') => Some(EditorCommand::ShrinkBrush),
        _ => None,
    }
}

fn resolve_zoom_shortcut(zoom: ZoomMode) -> EditorCommand {
    match zoom {
        ZoomMode::Off => EditorCommand::ZoomIn,
        ZoomMode::Pan | ZoomMode::Draw => EditorCommand::ToggleZoomDraw,
    }
}

fn exit_zoom_if_zoomed(zoom: ZoomMode) -> Option<EditorCommand> {
    (zoom != ZoomMode::Off).then_some(EditorCommand::ExitZoom)
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<EditorCommand> {
    if context.dialog_open || context.text_input_active {
        return None;
    }

    match (normalize(key), modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Character('z'), true, false) => Some(EditorCommand::Undo),
        (ShortcutKey::Character('z'), true, true) | (ShortcutKey::Character('y'), true, _) => {
            Some(EditorCommand::Redo)
        }
        (ShortcutKey::Character('z'), false, true) | (ShortcutKey::Escape, false, _) => {
            exit_zoom_if_zoomed(context.zoom)
        }
        (ShortcutKey::Character('z'), false, false) => Some(resolve_zoom_shortcut(context.zoom)),
        (ShortcutKey::Character('l'), false, false) => Some(EditorCommand::ToggleLock),
        (ShortcutKey::Character('o'), false, false) => Some(EditorCommand::ToggleOriginalView),
        (ShortcutKey::Character('m'), false, false) => Some(EditorCommand::ToggleAutoMode),
        (ShortcutKey::Character('p'), false, false) => {
            (!context.auto_mode && context.pending_edits).then_some(EditorCommand::Submit)
        }
        (ShortcutKey::Character('x'), false, false) => Some(EditorCommand::DeleteCurrent),
        (key, false, true) => resolve_brush_shortcut(key),
        _ => None,
    }
}
