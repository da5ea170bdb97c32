use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

use crate::restore::{RestoreError, RestoreResult, Restorer};
use crate::submission::{SubmissionTicket, TicketId};

pub const RESTORATION_POLL_INTERVAL: Duration = Duration::from_millis(24);

fn spawn_worker<T, W>(work: W) -> mpsc::Receiver<T>
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    std::thread::spawn(move || {
        let result = work();
        let _ = tx.send(result);
    });
    rx
}

/// A restoration running on a background thread, polled by the driver.
#[derive(Debug)]
pub struct PendingRestoration {
    ticket: TicketId,
    receiver: mpsc::Receiver<RestoreResult<RgbaImage>>,
}

pub fn spawn_restoration(
    restorer: Arc<dyn Restorer>,
    ticket: SubmissionTicket,
) -> PendingRestoration {
    let id = ticket.id();
    tracing::debug!(ticket = %id, "spawning restoration worker");
    let receiver = spawn_worker(move || restorer.restore(ticket.image(), ticket.mask()));
    PendingRestoration {
        ticket: id,
        receiver,
    }
}

impl PendingRestoration {
    pub const fn ticket(&self) -> TicketId {
        self.ticket
    }

    /// Non-blocking poll. `None` means the worker is still running.
    pub fn try_take(&self) -> Option<RestoreResult<RgbaImage>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(RestoreError::WorkerDisconnected)),
        }
    }

    /// Polls at [`RESTORATION_POLL_INTERVAL`] until the worker reports back.
    pub fn wait(self) -> RestoreResult<RgbaImage> {
        loop {
            if let Some(result) = self.try_take() {
                return result;
            }
            std::thread::sleep(RESTORATION_POLL_INTERVAL);
        }
    }
}
