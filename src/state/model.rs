/// Whether the brush layer or the untouched source is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    #[default]
    Brush,
    Original,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked,
}

/// `Pan` drags the view, `Draw` paints while magnified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZoomMode {
    #[default]
    Off,
    Pan,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EditorMode {
    pub draw: DrawMode,
    pub lock: LockState,
    pub zoom: ZoomMode,
}

impl EditorMode {
    pub const fn can_stroke(self) -> bool {
        matches!(self.lock, LockState::Unlocked)
            && matches!(self.draw, DrawMode::Brush)
            && matches!(self.zoom, ZoomMode::Off | ZoomMode::Draw)
    }

    pub const fn can_pan(self) -> bool {
        matches!(self.zoom, ZoomMode::Pan)
    }

    pub const fn is_original_view(self) -> bool {
        matches!(self.draw, DrawMode::Original)
    }

    pub const fn mask_visible(self) -> bool {
        !self.is_original_view()
    }

    pub const fn is_locked(self) -> bool {
        matches!(self.lock, LockState::Locked)
    }

    pub const fn is_zoomed(self) -> bool {
        !matches!(self.zoom, ZoomMode::Off)
    }
}
