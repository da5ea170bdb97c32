//! Bookkeeping for the single in-flight restoration request.
//!
//! `busy` is derived from the in-flight ticket, so a session can never be
//! busy without knowing which request it is waiting on.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

use crate::restore::RestoreError;

pub type SubmitResult<T> = std::result::Result<T, SubmitError>;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    Busy,
    #[error("cannot submit while the original image is shown")]
    OriginalViewActive,
    #[error("submission {ticket} is no longer current")]
    StaleTicket { ticket: TicketId },
    #[error("restoration failed: {0}")]
    Restore(#[from] RestoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the restoration collaborator needs for one request.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    id: TicketId,
    image: Arc<RgbaImage>,
    mask: RgbaImage,
}

impl SubmissionTicket {
    pub(crate) fn new(id: TicketId, image: Arc<RgbaImage>, mask: RgbaImage) -> Self {
        Self { id, image, mask }
    }

    pub const fn id(&self) -> TicketId {
        self.id
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Binarized mask: opaque white where marked, transparent elsewhere.
    pub fn mask(&self) -> &RgbaImage {
        &self.mask
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionState {
    pending_edits: bool,
    auto_mode: bool,
    in_flight: Option<TicketId>,
    next_ticket: u64,
}

impl SubmissionState {
    pub const fn new(auto_mode: bool) -> Self {
        Self {
            pending_edits: false,
            auto_mode,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub const fn pending_edits(&self) -> bool {
        self.pending_edits
    }

    pub const fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    pub const fn busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub const fn in_flight(&self) -> Option<TicketId> {
        self.in_flight
    }

    pub fn set_pending_edits(&mut self, pending: bool) {
        self.pending_edits = pending;
    }

    pub fn set_auto_mode(&mut self, auto_mode: bool) {
        self.auto_mode = auto_mode;
    }

    /// Claims the in-flight slot and allocates a fresh ticket id.
    pub fn start(&mut self) -> SubmitResult<TicketId> {
        if let Some(ticket) = self.in_flight {
            tracing::warn!(%ticket, "submission rejected; another is in flight");
            return Err(SubmitError::Busy);
        }
        let ticket = TicketId(self.next_ticket);
        self.next_ticket = self.next_ticket.saturating_add(1);
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Releases the in-flight slot if `ticket` still owns it.
    pub fn complete(&mut self, ticket: TicketId) -> SubmitResult<()> {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            Ok(())
        } else {
            tracing::warn!(%ticket, "ignoring result for a stale submission");
            Err(SubmitError::StaleTicket { ticket })
        }
    }

    /// Drops pending work; an outstanding ticket becomes stale. Auto mode is kept.
    pub fn reset(&mut self) {
        self.pending_edits = false;
        self.in_flight = None;
    }
}
