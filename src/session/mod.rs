//! One editing session over a single source image.
//!
//! All state mutation happens here, driven either by the per-command methods
//! or by [`EditorSession::apply`]. The restoration call is split into
//! [`EditorSession::begin_submit`] and [`EditorSession::finish_submit`] so
//! drivers can run it off-thread.

pub mod command;

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

use crate::geometry::{ImageBounds, Point, SurfaceGeometry};
use crate::history::{EditHistory, EntryId, DEFAULT_PAGE_SIZE};
use crate::imaging::bounds_of;
use crate::mask::{BrushOptions, MaskState, BRUSH_RADIUS_DEFAULT};
use crate::restore::{ensure_same_bounds, RestoreResult, Restorer};
use crate::state::{EditorMode, ModeError, ModeEvent, ModeMachine, ModeResult};
use crate::submission::{SubmissionState, SubmissionTicket, SubmitError, SubmitResult, TicketId};
use crate::viewport::{TransformResult, Viewport};

pub use command::{CommandOutcome, EditorCommand};

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub brush_radius: u8,
    pub auto_mode: bool,
    pub history_page_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            brush_radius: BRUSH_RADIUS_DEFAULT,
            auto_mode: true,
            history_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The pointer gesture in progress. Stroke points are in model space, pan
/// points in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Stroking {
        last: Point,
    },
    Panning {
        last: Point,
    },
}

/// What ending a stroke led to.
#[derive(Debug)]
pub enum StrokeEnd {
    /// No stroke was in progress.
    Idle,
    /// The mask had no marked pixels.
    Empty,
    /// Manual mode: waiting for an explicit submit.
    Pending,
    /// Auto mode: the caller must run this ticket.
    Submit(SubmissionTicket),
}

#[derive(Debug)]
pub struct EditorSession {
    history: EditHistory,
    mask: MaskState,
    brush: BrushOptions,
    viewport: Viewport,
    modes: ModeMachine,
    submission: SubmissionState,
    interaction: Interaction,
    surface: SurfaceGeometry,
}

impl EditorSession {
    pub fn new(source: RgbaImage, options: SessionOptions) -> Self {
        let bounds = bounds_of(&source);
        Self {
            history: EditHistory::with_page_size(source, options.history_page_size),
            mask: MaskState::new(bounds),
            brush: BrushOptions::new(options.brush_radius),
            viewport: Viewport::new(),
            modes: ModeMachine::new(),
            submission: SubmissionState::new(options.auto_mode),
            interaction: Interaction::Idle,
            surface: SurfaceGeometry::unscaled(bounds),
        }
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn mask(&self) -> &MaskState {
        &self.mask
    }

    pub const fn brush(&self) -> BrushOptions {
        self.brush
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> EditorMode {
        self.modes.mode()
    }

    pub const fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub const fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub const fn surface(&self) -> &SurfaceGeometry {
        &self.surface
    }

    pub fn bounds(&self) -> ImageBounds {
        bounds_of(self.history.original().image())
    }

    pub const fn busy(&self) -> bool {
        self.submission.busy()
    }

    pub const fn pending_edits(&self) -> bool {
        self.submission.pending_edits()
    }

    pub const fn auto_mode(&self) -> bool {
        self.submission.auto_mode()
    }

    /// Starts over on a new source image. Any in-flight ticket becomes stale.
    pub fn load_source(&mut self, image: RgbaImage) {
        let bounds = bounds_of(&image);
        if let Some(ticket) = self.submission.in_flight() {
            tracing::warn!(%ticket, "new source loaded while a submission was in flight");
        }
        self.history.reset(image);
        self.mask.reset(bounds);
        self.submission.reset();
        self.interaction = Interaction::Idle;
        self.modes.transition_if_allowed(ModeEvent::ExitOriginalView);
        self.modes.transition_if_allowed(ModeEvent::ExitZoom);
        self.viewport.reset();
        self.surface = SurfaceGeometry::unscaled(bounds);
        tracing::info!(
            width = bounds.width,
            height = bounds.height,
            "loaded source image"
        );
    }

    /// Records where the mask surface is displayed on screen.
    pub fn set_surface(&mut self, surface: SurfaceGeometry) {
        self.surface = surface;
    }

    /// Original in original view, otherwise the entry under the cursor.
    pub fn display_image(&self) -> &RgbaImage {
        if self.mode().is_original_view() {
            self.history.original().image()
        } else {
            self.history.current().image()
        }
    }

    pub fn mask_overlay(&self) -> Option<RgbaImage> {
        self.mode()
            .mask_visible()
            .then(|| self.mask.layer().overlay())
    }

    /// The image handed to the processed-results collection on approval.
    pub fn approved_result(&self) -> Arc<RgbaImage> {
        self.history.current().shared_image()
    }

    pub fn can_stroke(&self) -> bool {
        self.mode().can_stroke() && !self.busy()
    }

    pub fn start_stroke(&mut self, screen: Point) -> TransformResult<bool> {
        if !self.can_stroke() {
            tracing::debug!(mode = ?self.mode(), busy = self.busy(), "stroke refused");
            return Ok(false);
        }
        if self.interaction != Interaction::Idle {
            return Ok(false);
        }
        let model = self.viewport.to_model(screen, &self.surface, self.bounds())?;
        self.mask.stamp_point(model, self.brush);
        self.interaction = Interaction::Stroking { last: model };
        Ok(true)
    }

    pub fn move_stroke(&mut self, screen: Point) -> TransformResult<bool> {
        let Interaction::Stroking { last } = self.interaction else {
            return Ok(false);
        };
        if self.busy() {
            self.interaction = Interaction::Idle;
            return Ok(false);
        }
        let model = self.viewport.to_model(screen, &self.surface, self.bounds())?;
        self.mask.stamp_line(last, model, self.brush);
        self.interaction = Interaction::Stroking { last: model };
        Ok(true)
    }

    pub fn end_stroke(&mut self) -> SubmitResult<StrokeEnd> {
        if !matches!(self.interaction, Interaction::Stroking { .. }) {
            return Ok(StrokeEnd::Idle);
        }
        self.interaction = Interaction::Idle;
        if self.busy() {
            return Ok(StrokeEnd::Idle);
        }

        if !self.mask.has_content() {
            self.mask.clear_dirty();
            self.submission.set_pending_edits(false);
            return Ok(StrokeEnd::Empty);
        }
        if self.submission.auto_mode() {
            return Ok(match self.begin_submit()? {
                Some(ticket) => StrokeEnd::Submit(ticket),
                None => StrokeEnd::Empty,
            });
        }
        self.submission.set_pending_edits(true);
        tracing::debug!("stroke recorded; waiting for manual submit");
        Ok(StrokeEnd::Pending)
    }

    pub fn start_pan(&mut self, screen: Point) -> bool {
        if !self.mode().can_pan() || self.interaction != Interaction::Idle {
            return false;
        }
        self.interaction = Interaction::Panning { last: screen };
        true
    }

    pub fn move_pan(&mut self, screen: Point) -> TransformResult<bool> {
        let Interaction::Panning { last } = self.interaction else {
            return Ok(false);
        };
        let bounds = self.bounds();
        self.viewport.pan_by_screen_delta(
            screen.x - last.x,
            screen.y - last.y,
            &self.surface,
            bounds,
        )?;
        self.interaction = Interaction::Panning { last: screen };
        Ok(true)
    }

    pub fn end_pan(&mut self) -> bool {
        if !matches!(self.interaction, Interaction::Panning { .. }) {
            return false;
        }
        self.interaction = Interaction::Idle;
        true
    }

    /// Zooming in from the unzoomed state enters pan mode first.
    pub fn zoom_in(&mut self) -> bool {
        if !self.mode().is_zoomed() && self.transition(ModeEvent::EnterZoom).is_err() {
            return false;
        }
        let before = self.viewport.zoom_step();
        self.viewport.zoom_in();
        self.viewport.zoom_step() != before
    }

    pub fn zoom_out(&mut self) -> bool {
        let before = self.viewport.zoom_step();
        self.viewport.zoom_out(self.bounds());
        self.viewport.zoom_step() != before
    }

    /// Wheel zoom: scrolling up zooms in.
    pub fn scroll_zoom(&mut self, delta_y: f64) -> bool {
        if delta_y < 0.0 {
            self.zoom_in()
        } else if delta_y > 0.0 {
            self.zoom_out()
        } else {
            false
        }
    }

    /// Step 0 leaves zoom entirely; any other step enters it like [`Self::zoom_in`].
    pub fn set_zoom(&mut self, zoom_step: u8) -> bool {
        if zoom_step == 0 {
            return self.mode().is_zoomed() && self.exit_zoom().is_ok();
        }
        if !self.mode().is_zoomed() && self.transition(ModeEvent::EnterZoom).is_err() {
            return false;
        }
        let before = *self.viewport();
        self.viewport.set_zoom_step(zoom_step, self.bounds());
        self.viewport != before
    }

    /// Pan only moves a zoomed view.
    pub fn set_pan(&mut self, pan: Point) -> bool {
        if !self.mode().is_zoomed() {
            return false;
        }
        let before = self.viewport.pan();
        self.viewport.set_pan(pan, self.bounds());
        self.viewport.pan() != before
    }

    pub fn enter_zoom(&mut self) -> ModeResult<EditorMode> {
        self.transition(ModeEvent::EnterZoom)
    }

    pub fn toggle_zoom_draw(&mut self) -> ModeResult<EditorMode> {
        self.transition(ModeEvent::ToggleZoomDraw)
    }

    /// Leaving zoom puts the view back at 100% with no pan.
    pub fn exit_zoom(&mut self) -> ModeResult<EditorMode> {
        let mode = self.transition(ModeEvent::ExitZoom)?;
        self.viewport.reset();
        Ok(mode)
    }

    pub fn toggle_lock(&mut self) -> ModeResult<EditorMode> {
        self.transition(ModeEvent::ToggleLock)
    }

    pub fn toggle_original_view(&mut self) -> ModeResult<EditorMode> {
        self.transition(ModeEvent::ToggleOriginalView)
    }

    // An interrupted stroke keeps its pixels; the next stroke end or submit
    // picks them up.
    fn transition(&mut self, event: ModeEvent) -> ModeResult<EditorMode> {
        let mode = self.modes.transition(event)?;
        if self.interaction != Interaction::Idle {
            tracing::debug!(interaction = ?self.interaction, "mode change interrupted gesture");
            self.interaction = Interaction::Idle;
        }
        Ok(mode)
    }

    fn exit_original_view_if_active(&mut self) {
        if self.mode().is_original_view() {
            self.modes.transition_if_allowed(ModeEvent::ExitOriginalView);
        }
    }

    /// Turning auto mode on while edits are pending submits them right away,
    /// unless a submission is already in flight.
    pub fn toggle_auto_mode(&mut self) -> SubmitResult<Option<SubmissionTicket>> {
        let enabled = !self.submission.auto_mode();
        self.submission.set_auto_mode(enabled);
        tracing::debug!(enabled, "auto mode toggled");
        if enabled && self.submission.pending_edits() && !self.busy() {
            return self.begin_submit();
        }
        Ok(None)
    }

    /// Snapshots the mask and claims the in-flight slot. `Ok(None)` means
    /// there was nothing to submit.
    pub fn begin_submit(&mut self) -> SubmitResult<Option<SubmissionTicket>> {
        if self.submission.busy() {
            tracing::warn!("submit rejected while busy");
            return Err(SubmitError::Busy);
        }
        if self.mode().is_original_view() {
            tracing::warn!("submit rejected in original view");
            return Err(SubmitError::OriginalViewActive);
        }
        if let Interaction::Stroking { .. } = self.interaction {
            tracing::debug!("submit ended the stroke in progress");
            self.interaction = Interaction::Idle;
        }
        if !self.mask.has_content() {
            self.mask.clear_dirty();
            self.submission.set_pending_edits(false);
            return Ok(None);
        }

        let id = self.submission.start()?;
        self.mask.backup();
        let ticket = SubmissionTicket::new(
            id,
            self.history.current().shared_image(),
            self.mask.layer().binarized(),
        );
        tracing::info!(
            ticket = %id,
            marked = self.mask.layer().marked_pixel_count(),
            "submitting mask for restoration"
        );
        Ok(Some(ticket))
    }

    /// Integrates a restoration outcome. On failure the mask is rolled back
    /// and history is untouched.
    pub fn finish_submit(
        &mut self,
        ticket: TicketId,
        result: RestoreResult<RgbaImage>,
    ) -> SubmitResult<EntryId> {
        self.submission.complete(ticket)?;

        let bounds = self.bounds();
        let outcome = result.and_then(|restored| {
            ensure_same_bounds(bounds, &restored)?;
            Ok(restored)
        });

        match outcome {
            Ok(restored) => {
                let id = self.history.append(restored);
                self.mask.clear();
                self.submission.set_pending_edits(false);
                tracing::info!(%ticket, entry = %id, "restoration applied");
                Ok(id)
            }
            Err(err) => {
                self.mask.restore_backup();
                self.mask.mark_dirty();
                if !self.submission.auto_mode() {
                    self.submission.set_pending_edits(self.mask.has_content());
                }
                tracing::warn!(%ticket, error = %err, "restoration failed; mask restored");
                Err(SubmitError::Restore(err))
            }
        }
    }

    pub fn run_ticket<R: Restorer + ?Sized>(
        &mut self,
        ticket: SubmissionTicket,
        restorer: &R,
    ) -> SubmitResult<EntryId> {
        let result = restorer.restore(ticket.image(), ticket.mask());
        self.finish_submit(ticket.id(), result)
    }

    /// Blocking submit for callers that can wait on the restorer.
    pub fn submit_with<R: Restorer + ?Sized>(
        &mut self,
        restorer: &R,
    ) -> SubmitResult<Option<EntryId>> {
        match self.begin_submit()? {
            Some(ticket) => self.run_ticket(ticket, restorer).map(Some),
            None => Ok(None),
        }
    }

    pub fn undo(&mut self) -> bool {
        self.after_history_move(|history| history.undo())
    }

    pub fn redo(&mut self) -> bool {
        self.after_history_move(|history| history.redo())
    }

    pub fn select(&mut self, id: EntryId) -> bool {
        self.after_history_move(|history| history.select(id))
    }

    /// Deleting while the original is shown also leaves original view.
    pub fn delete(&mut self, id: EntryId) -> bool {
        self.after_history_move(|history| history.delete(id))
    }

    pub fn delete_current(&mut self) -> bool {
        let id = self.history.current().id();
        self.delete(id)
    }

    fn after_history_move(&mut self, step: impl FnOnce(&mut EditHistory) -> bool) -> bool {
        if !step(&mut self.history) {
            return false;
        }
        self.exit_original_view_if_active();
        tracing::debug!(
            cursor = self.history.cursor(),
            len = self.history.len(),
            "history cursor moved"
        );
        true
    }

    pub fn set_page(&mut self, page: usize) -> bool {
        self.history.set_page(page)
    }

    pub fn next_page(&mut self) -> bool {
        self.history.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.history.prev_page()
    }

    pub fn grow_brush(&mut self) -> bool {
        self.update_brush(BrushOptions::grow)
    }

    pub fn shrink_brush(&mut self) -> bool {
        self.update_brush(BrushOptions::shrink)
    }

    pub fn set_brush_radius(&mut self, radius: u8) -> bool {
        self.update_brush(|brush| brush.set_radius(radius))
    }

    pub fn scroll_brush(&mut self, delta_y: f64) -> bool {
        self.update_brush(|brush| brush.adjust_by_scroll(delta_y))
    }

    fn update_brush(&mut self, update: impl FnOnce(&mut BrushOptions)) -> bool {
        let before = self.brush;
        update(&mut self.brush);
        self.brush != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::restore::RestoreError;
    use crate::state::{LockState, ZoomMode};
    use image::Rgba;

    fn source(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(64, 48, Rgba([value, value, value, 255]))
    }

    fn session(auto_mode: bool) -> EditorSession {
        EditorSession::new(
            source(10),
            SessionOptions {
                brush_radius: 4,
                auto_mode,
                history_page_size: DEFAULT_PAGE_SIZE,
            },
        )
    }

    fn draw_stroke(session: &mut EditorSession) -> StrokeEnd {
        assert!(session
            .start_stroke(Point::new(10.0, 10.0))
            .expect("start inside surface"));
        assert!(session
            .move_stroke(Point::new(30.0, 20.0))
            .expect("move inside surface"));
        session.end_stroke().expect("stroke should end")
    }

    fn restored(value: u8) -> RestoreResult<RgbaImage> {
        Ok(source(value))
    }

    #[test]
    fn manual_mode_stroke_sets_pending_and_waits() {
        let mut session = session(false);
        assert!(matches!(draw_stroke(&mut session), StrokeEnd::Pending));
        assert!(session.pending_edits());
        assert!(!session.busy());
        assert!(session.mask().has_drawn_content());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn auto_mode_stroke_issues_ticket_with_binarized_mask() {
        let mut session = session(true);
        let StrokeEnd::Submit(ticket) = draw_stroke(&mut session) else {
            panic!("auto mode should submit");
        };
        assert!(session.busy());
        assert_eq!(ticket.mask().dimensions(), (64, 48));
        assert_eq!(ticket.image(), &source(10));
        assert_eq!(*ticket.mask().get_pixel(10, 10), Rgba([255, 255, 255, 255]));
        assert_eq!(ticket.mask().get_pixel(60, 40).0[3], 0);

        let id = session
            .finish_submit(ticket.id(), restored(99))
            .expect("restoration should apply");
        assert_eq!(session.history().current().id(), id);
        assert!(!session.busy());
        assert!(!session.mask().has_content());
        assert_eq!(session.display_image(), &source(99));
    }

    #[test]
    fn strokes_are_refused_while_busy() {
        let mut session = session(false);
        draw_stroke(&mut session);
        let ticket = session
            .begin_submit()
            .expect("submit should start")
            .expect("mask has content");

        assert!(!session
            .start_stroke(Point::new(5.0, 5.0))
            .expect("transform should succeed"));
        assert!(matches!(session.begin_submit(), Err(SubmitError::Busy)));
        session
            .finish_submit(ticket.id(), restored(1))
            .expect("restoration should apply");
        assert!(session.can_stroke());
    }

    #[test]
    fn submit_during_a_drag_ends_the_stroke_and_keeps_later_moves_off_the_mask() {
        let mut session = session(false);
        draw_stroke(&mut session);
        assert!(session.start_stroke(Point::new(40.0, 30.0)).expect("in surface"));
        let ticket = session
            .begin_submit()
            .expect("submit should start")
            .expect("mask has content");
        assert_eq!(session.interaction(), Interaction::Idle);

        assert!(!session.move_stroke(Point::new(60.0, 30.0)).expect("in surface"));
        assert!(!session.mask().layer().is_marked(55, 30));
        assert!(matches!(
            session.end_stroke().expect("no submission"),
            StrokeEnd::Idle
        ));
        assert!(session.pending_edits());

        session
            .finish_submit(ticket.id(), restored(3))
            .expect("restoration should apply");
        assert!(!session.pending_edits());
        assert!(!session.mask().has_content());
        assert!(session.start_stroke(Point::new(60.0, 30.0)).expect("in surface"));
    }

    #[test]
    fn moves_after_busy_starts_are_refused() {
        let mut session = session(false);
        draw_stroke(&mut session);
        let ticket = session
            .begin_submit()
            .expect("submit should start")
            .expect("mask has content");
        session.interaction = Interaction::Stroking {
            last: Point::new(40.0, 30.0),
        };

        assert!(!session.move_stroke(Point::new(60.0, 30.0)).expect("in surface"));
        assert_eq!(session.interaction(), Interaction::Idle);
        assert!(!session.mask().layer().is_marked(55, 30));
        session
            .finish_submit(ticket.id(), restored(3))
            .expect("restoration should apply");
    }

    #[test]
    fn set_zoom_keeps_the_mode_in_step_with_the_viewport() {
        let mut session = session(false);
        assert!(session.set_zoom(10));
        assert_eq!(session.mode().zoom, ZoomMode::Pan);
        assert_eq!(session.viewport().zoom_step(), 10);
        assert!(!session.can_stroke());

        assert!(session.set_pan(Point::new(5.0, 5.0)));
        assert!(session.set_zoom(0));
        assert_eq!(session.mode().zoom, ZoomMode::Off);
        assert_eq!(session.viewport().zoom_step(), 0);
        assert_eq!(session.viewport().pan(), Point::ORIGIN);
        assert!(!session.set_zoom(0));
    }

    #[test]
    fn set_pan_is_ignored_when_not_zoomed() {
        let mut session = session(false);
        assert!(!session.set_pan(Point::new(5.0, 5.0)));
        assert_eq!(session.viewport().pan(), Point::ORIGIN);
    }

    #[test]
    fn toggling_auto_mode_while_busy_defers_to_the_in_flight_submit() {
        let mut session = session(false);
        draw_stroke(&mut session);
        let ticket = session
            .begin_submit()
            .expect("submit should start")
            .expect("mask has content");
        assert!(session.pending_edits());

        assert!(session.toggle_auto_mode().expect("toggle succeeds").is_none());
        assert!(session.auto_mode());
        session
            .finish_submit(ticket.id(), restored(4))
            .expect("restoration should apply");
        assert!(!session.pending_edits());
    }

    #[test]
    fn empty_mask_submit_is_a_silent_no_op() {
        let mut session = session(false);
        assert!(session.begin_submit().expect("no error").is_none());
        assert!(!session.busy());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn stroke_outside_surface_changes_nothing() {
        let mut session = session(false);
        session.set_surface(SurfaceGeometry::new(Point::new(100.0, 100.0), Size::new(64.0, 48.0)));
        assert!(session.start_stroke(Point::new(10.0, 10.0)).is_err());
        assert_eq!(session.interaction(), Interaction::Idle);
        assert!(!session.mask().has_content());
        assert!(session
            .start_stroke(Point::new(110.0, 110.0))
            .expect("inside surface"));
        assert!(session.mask().layer().is_marked(10, 10));
    }

    #[test]
    fn locked_and_pan_modes_close_the_stroke_gate() {
        let mut session = session(false);
        session.toggle_lock().expect("lock toggles");
        assert_eq!(session.mode().lock, LockState::Locked);
        assert!(!session.start_stroke(Point::new(5.0, 5.0)).expect("in surface"));
        session.toggle_lock().expect("lock toggles");

        session.enter_zoom().expect("zoom enters pan");
        assert!(!session.start_stroke(Point::new(5.0, 5.0)).expect("in surface"));
        session.toggle_zoom_draw().expect("pan -> draw");
        assert!(session.start_stroke(Point::new(5.0, 5.0)).expect("in surface"));
    }

    #[test]
    fn panning_only_happens_in_pan_mode_and_exit_resets_view() {
        let mut session = session(false);
        assert!(!session.start_pan(Point::new(10.0, 10.0)));

        assert!(session.zoom_in());
        assert_eq!(session.mode().zoom, ZoomMode::Pan);
        for _ in 0..9 {
            session.zoom_in();
        }
        assert_eq!(session.viewport().zoom_percent(), 200);
        assert!(session.start_pan(Point::new(30.0, 30.0)));
        assert!(session.move_pan(Point::new(20.0, 25.0)).expect("surface ok"));
        assert!(session.end_pan());
        assert_ne!(session.viewport().pan(), Point::ORIGIN);

        session.exit_zoom().expect("zoom exits");
        assert_eq!(session.mode().zoom, ZoomMode::Off);
        assert_eq!(session.viewport().zoom_step(), 0);
        assert_eq!(session.viewport().pan(), Point::ORIGIN);
        assert!(matches!(
            session.toggle_zoom_draw(),
            Err(ModeError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn original_view_hides_mask_and_blocks_submit() {
        let mut session = session(false);
        draw_stroke(&mut session);
        session.toggle_original_view().expect("enter original");

        assert!(session.mask_overlay().is_none());
        assert!(matches!(
            session.begin_submit(),
            Err(SubmitError::OriginalViewActive)
        ));
        assert!(!session.start_stroke(Point::new(1.0, 1.0)).expect("in surface"));

        session.toggle_original_view().expect("exit original");
        assert!(session.mask_overlay().is_some());
    }

    #[test]
    fn undo_and_delete_leave_original_view() {
        let mut session = session(true);
        let first = session.submit_with(&FixedRestorer(5));
        assert!(matches!(first, Ok(None)));
        let StrokeEnd::Submit(ticket) = draw_stroke(&mut session) else {
            panic!("auto mode should submit");
        };
        let id = session
            .finish_submit(ticket.id(), restored(50))
            .expect("restoration should apply");

        session.toggle_original_view().expect("enter original");
        assert_eq!(session.display_image(), &source(10));
        assert!(session.undo());
        assert!(!session.mode().is_original_view());

        assert!(session.redo());
        session.toggle_original_view().expect("enter original");
        assert!(session.delete(id));
        assert!(!session.mode().is_original_view());
        assert!(session.history().current().is_original());
        assert!(!session.delete(EntryId::ORIGINAL));
    }

    #[test]
    fn toggling_auto_mode_on_submits_pending_edits() {
        let mut session = session(false);
        draw_stroke(&mut session);
        let ticket = session
            .toggle_auto_mode()
            .expect("toggle should succeed")
            .expect("pending edits should submit");
        assert!(session.auto_mode());
        assert!(session.busy());
        session
            .finish_submit(ticket.id(), restored(7))
            .expect("restoration should apply");
        assert!(!session.pending_edits());

        assert!(session.toggle_auto_mode().expect("toggle off").is_none());
        assert!(!session.auto_mode());
    }

    #[test]
    fn failed_manual_submit_restores_mask_and_allows_retry() {
        let mut session = session(false);
        draw_stroke(&mut session);
        let mask_before = session.mask().layer().clone();
        let ticket = session
            .begin_submit()
            .expect("submit starts")
            .expect("mask has content");

        let err = session
            .finish_submit(
                ticket.id(),
                Err(RestoreError::Rejected {
                    message: "model offline".to_string(),
                }),
            )
            .expect_err("failure should surface");
        assert!(matches!(err, SubmitError::Restore(_)));
        assert_eq!(session.mask().layer(), &mask_before);
        assert!(session.pending_edits());
        assert!(!session.busy());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn mismatched_restoration_size_is_a_failure() {
        let mut session = session(false);
        draw_stroke(&mut session);
        let ticket = session
            .begin_submit()
            .expect("submit starts")
            .expect("mask has content");
        let err = session
            .finish_submit(ticket.id(), Ok(RgbaImage::new(8, 8)))
            .expect_err("wrong size should fail");
        assert!(matches!(
            err,
            SubmitError::Restore(RestoreError::DimensionMismatch { .. })
        ));
        assert_eq!(session.history().len(), 1);
        assert!(session.mask().has_content());
    }

    #[test]
    fn results_for_tickets_issued_before_reload_are_ignored() {
        let mut session = session(true);
        let StrokeEnd::Submit(ticket) = draw_stroke(&mut session) else {
            panic!("auto mode should submit");
        };
        session.load_source(source(200));
        assert!(!session.busy());

        let err = session
            .finish_submit(ticket.id(), restored(1))
            .expect_err("stale ticket should be rejected");
        assert!(matches!(err, SubmitError::StaleTicket { .. }));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.display_image(), &source(200));
    }

    #[test]
    fn mode_change_interrupts_an_active_stroke() {
        let mut session = session(false);
        assert!(session.start_stroke(Point::new(4.0, 4.0)).expect("in surface"));
        session.toggle_lock().expect("lock toggles");
        assert_eq!(session.interaction(), Interaction::Idle);
        assert!(matches!(
            session.end_stroke().expect("no submission"),
            StrokeEnd::Idle
        ));
        assert!(session.mask().has_content());
    }

    #[test]
    fn brush_commands_report_changes() {
        let mut session = session(false);
        assert_eq!(session.brush().radius(), 4);
        assert!(session.grow_brush());
        assert_eq!(session.brush().radius(), 9);
        assert!(session.scroll_brush(1.0));
        assert_eq!(session.brush().radius(), 4);
        assert!(session.set_brush_radius(50));
        assert!(!session.grow_brush());
    }

    struct FixedRestorer(u8);

    impl Restorer for FixedRestorer {
        fn restore(&self, _image: &RgbaImage, _mask: &RgbaImage) -> RestoreResult<RgbaImage> {
            Ok(source(self.0))
        }
    }
}
