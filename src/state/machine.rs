use super::error::{ModeError, ModeResult};
use super::{DrawMode, EditorMode, LockState, ModeEvent, ModeTransition, ZoomMode};

const MAX_TRANSITION_HISTORY: usize = 64;

#[derive(Debug)]
pub struct ModeMachine {
    mode: EditorMode,
    transition_history: Vec<ModeTransition>,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::with_mode(EditorMode::default())
    }

    pub fn with_mode(mode: EditorMode) -> Self {
        Self {
            mode,
            transition_history: Vec::new(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn can_transition(&self, event: ModeEvent) -> bool {
        self.next_mode(event).is_some()
    }

    pub fn next_mode(&self, event: ModeEvent) -> Option<EditorMode> {
        use ModeEvent::*;
        let mode = self.mode;
        match (event, mode.draw, mode.lock, mode.zoom) {
            (ToggleOriginalView, DrawMode::Brush, _, _)
            | (EnterOriginalView, DrawMode::Brush, _, _) => Some(EditorMode {
                draw: DrawMode::Original,
                ..mode
            }),
            (ToggleOriginalView, DrawMode::Original, _, _)
            | (ExitOriginalView, DrawMode::Original, _, _) => Some(EditorMode {
                draw: DrawMode::Brush,
                ..mode
            }),
            (ToggleLock, _, LockState::Unlocked, _) => Some(EditorMode {
                lock: LockState::Locked,
                ..mode
            }),
            (ToggleLock, _, LockState::Locked, _) => Some(EditorMode {
                lock: LockState::Unlocked,
                ..mode
            }),
            (EnterZoom, _, _, ZoomMode::Off) => Some(EditorMode {
                zoom: ZoomMode::Pan,
                ..mode
            }),
            (ToggleZoomDraw, _, _, ZoomMode::Pan) => Some(EditorMode {
                zoom: ZoomMode::Draw,
                ..mode
            }),
            (ToggleZoomDraw, _, _, ZoomMode::Draw) => Some(EditorMode {
                zoom: ZoomMode::Pan,
                ..mode
            }),
            (ExitZoom, _, _, ZoomMode::Pan | ZoomMode::Draw) => Some(EditorMode {
                zoom: ZoomMode::Off,
                ..mode
            }),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: ModeEvent) -> ModeResult<EditorMode> {
        tracing::debug!(from = ?self.mode, event = ?event, "request mode transition");
        let next = self.next_mode(event).ok_or_else(|| {
            let from = self.mode;
            tracing::warn!(from = ?from, event = ?event, "invalid mode transition requested");
            ModeError::InvalidTransition { from, event }
        })?;

        let record = ModeTransition::new(self.mode, event, next);
        self.mode = next;
        if self.transition_history.len() == MAX_TRANSITION_HISTORY {
            self.transition_history.remove(0);
        }
        self.transition_history.push(record);

        Ok(self.mode)
    }

    /// Applies `event` only when it is legal; reports whether the mode changed.
    pub fn transition_if_allowed(&mut self, event: ModeEvent) -> bool {
        self.can_transition(event) && self.transition(event).is_ok()
    }
}

#[cfg(test)]
impl ModeMachine {
    fn history(&self) -> &[ModeTransition] {
        &self.transition_history
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModeMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EditorMode::{{draw: {:?}, lock: {:?}, zoom: {:?}}}",
            self.mode.draw, self.mode.lock, self.mode.zoom
        )
    }
}
