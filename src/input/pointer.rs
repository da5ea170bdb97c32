use crate::geometry::Point;
use crate::session::{EditorCommand, EditorSession, Interaction};
use crate::state::EditorMode;

use super::ShortcutModifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Raw pointer input in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, position: Point },
    Move { position: Point },
    Up { button: PointerButton },
    Wheel { delta_y: f64, modifiers: ShortcutModifiers },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerContext {
    pub mode: EditorMode,
    pub interaction: Interaction,
}

impl PointerContext {
    pub fn for_session(session: &EditorSession) -> Self {
        Self {
            mode: session.mode(),
            interaction: session.interaction(),
        }
    }
}

pub fn resolve_pointer(event: PointerEvent, context: PointerContext) -> Option<EditorCommand> {
    match (event, context.interaction) {
        (
            PointerEvent::Down {
                button: PointerButton::Primary,
                position,
            },
            Interaction::Idle,
        ) => {
            if context.mode.can_pan() {
                Some(EditorCommand::StartPan(position))
            } else if context.mode.can_stroke() {
                Some(EditorCommand::StartStroke(position))
            } else {
                None
            }
        }
        (PointerEvent::Move { position }, Interaction::Stroking { .. }) => {
            Some(EditorCommand::MoveStroke(position))
        }
        (PointerEvent::Move { position }, Interaction::Panning { .. }) => {
            Some(EditorCommand::MovePan(position))
        }
        (
            PointerEvent::Up {
                button: PointerButton::Primary,
            },
            Interaction::Stroking { .. },
        ) => Some(EditorCommand::EndStroke),
        (
            PointerEvent::Up {
                button: PointerButton::Primary,
            },
            Interaction::Panning { .. },
        ) => Some(EditorCommand::EndPan),
        (PointerEvent::Wheel { delta_y, modifiers }, _) if modifiers.shift && !modifiers.ctrl => {
            if context.mode.can_pan() {
                Some(EditorCommand::ScrollZoom(delta_y))
            } else {
                Some(EditorCommand::ScrollBrush(delta_y))
            }
        }
        _ => None,
    }
}
