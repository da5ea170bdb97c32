use super::{EditorSession, SessionResult, StrokeEnd};
use crate::geometry::Point;
use crate::history::EntryId;
use crate::submission::SubmissionTicket;
use crate::viewport::TransformResult;

/// Platform-neutral editor commands produced by the input adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    StartStroke(Point),
    MoveStroke(Point),
    EndStroke,
    StartPan(Point),
    MovePan(Point),
    EndPan,
    ZoomIn,
    ZoomOut,
    ScrollZoom(f64),
    SetZoom(u8),
    SetPan(Point),
    EnterZoom,
    ToggleZoomDraw,
    ExitZoom,
    ToggleLock,
    ToggleOriginalView,
    ToggleAutoMode,
    Submit,
    Undo,
    Redo,
    Delete(EntryId),
    DeleteCurrent,
    Select(EntryId),
    SetPage(usize),
    NextPage,
    PrevPage,
    GrowBrush,
    ShrinkBrush,
    ScrollBrush(f64),
    SetBrushRadius(u8),
}

#[derive(Debug)]
pub enum CommandOutcome {
    Applied,
    Ignored,
    /// A restoration request the driver must run and hand back.
    Submission(SubmissionTicket),
}

impl CommandOutcome {
    const fn from_changed(changed: bool) -> Self {
        if changed {
            Self::Applied
        } else {
            Self::Ignored
        }
    }

    fn from_ticket(ticket: Option<SubmissionTicket>) -> Self {
        ticket.map_or(Self::Ignored, Self::Submission)
    }

    pub const fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl From<StrokeEnd> for CommandOutcome {
    fn from(end: StrokeEnd) -> Self {
        match end {
            StrokeEnd::Idle => Self::Ignored,
            StrokeEnd::Empty | StrokeEnd::Pending => Self::Applied,
            StrokeEnd::Submit(ticket) => Self::Submission(ticket),
        }
    }
}

// Pointers that miss the surface are dropped without touching state.
fn ignore_outside(result: TransformResult<bool>) -> CommandOutcome {
    match result {
        Ok(changed) => CommandOutcome::from_changed(changed),
        Err(err) => {
            tracing::debug!(%err, "pointer event ignored");
            CommandOutcome::Ignored
        }
    }
}

impl EditorSession {
    pub fn apply(&mut self, command: EditorCommand) -> SessionResult<CommandOutcome> {
        use CommandOutcome as Outcome;
        use EditorCommand::*;

        tracing::trace!(?command, "apply editor command");
        let outcome = match command {
            StartStroke(point) => ignore_outside(self.start_stroke(point)),
            MoveStroke(point) => ignore_outside(self.move_stroke(point)),
            EndStroke => self.end_stroke()?.into(),
            StartPan(point) => Outcome::from_changed(self.start_pan(point)),
            MovePan(point) => ignore_outside(self.move_pan(point)),
            EndPan => Outcome::from_changed(self.end_pan()),
            ZoomIn => Outcome::from_changed(self.zoom_in()),
            ZoomOut => Outcome::from_changed(self.zoom_out()),
            ScrollZoom(delta_y) => Outcome::from_changed(self.scroll_zoom(delta_y)),
            SetZoom(step) => Outcome::from_changed(self.set_zoom(step)),
            SetPan(pan) => Outcome::from_changed(self.set_pan(pan)),
            EnterZoom => {
                self.enter_zoom()?;
                Outcome::Applied
            }
            ToggleZoomDraw => {
                self.toggle_zoom_draw()?;
                Outcome::Applied
            }
            ExitZoom => {
                self.exit_zoom()?;
                Outcome::Applied
            }
            ToggleLock => {
                self.toggle_lock()?;
                Outcome::Applied
            }
            ToggleOriginalView => {
                self.toggle_original_view()?;
                Outcome::Applied
            }
            ToggleAutoMode => match self.toggle_auto_mode()? {
                Some(ticket) => Outcome::Submission(ticket),
                None => Outcome::Applied,
            },
            Submit => Outcome::from_ticket(self.begin_submit()?),
            Undo => Outcome::from_changed(self.undo()),
            Redo => Outcome::from_changed(self.redo()),
            Delete(id) => Outcome::from_changed(self.delete(id)),
            DeleteCurrent => Outcome::from_changed(self.delete_current()),
            Select(id) => Outcome::from_changed(self.select(id)),
            SetPage(page) => Outcome::from_changed(self.set_page(page)),
            NextPage => Outcome::from_changed(self.next_page()),
            PrevPage => Outcome::from_changed(self.prev_page()),
            GrowBrush => Outcome::from_changed(self.grow_brush()),
            ShrinkBrush => Outcome::from_changed(self.shrink_brush()),
            ScrollBrush(delta_y) => Outcome::from_changed(self.scroll_brush(delta_y)),
            SetBrushRadius(radius) => Outcome::from_changed(self.set_brush_radius(radius)),
        };
        Ok(outcome)
    }
}
