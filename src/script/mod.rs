//! JSON replay scripts that drive an [`EditorSession`] without a UI.
//!
//! ```json
//! [
//!   {"step": "stroke", "points": [[10, 10], [40, 25]]},
//!   {"step": "undo"},
//!   {"step": "brush", "radius": 8}
//! ]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Point;
use crate::restore::Restorer;
use crate::session::{CommandOutcome, EditorCommand, EditorSession, SessionError};
use crate::submission::{SubmissionTicket, SubmitError};
use crate::worker::spawn_restoration;

pub type ScriptResult<T> = std::result::Result<T, ScriptError>;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("step {step}: stroke needs at least one point")]
    EmptyStroke { step: usize },
    #[error("step {step}: no history entry at index {index}")]
    UnknownEntry { step: usize, index: usize },
    #[error("step {step} failed")]
    Session {
        step: usize,
        #[source]
        source: SessionError,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Screen-space points; the first one starts the stroke.
    Stroke { points: Vec<[f64; 2]> },
    Submit,
    Undo,
    Redo,
    /// Deletes the entry at `index`, or the cursor entry when omitted.
    Delete {
        #[serde(default)]
        index: Option<usize>,
    },
    Select { index: usize },
    ToggleAuto,
    ToggleLock,
    ToggleOriginal,
    ZoomIn,
    ZoomOut,
    Brush { radius: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    pub steps: usize,
    pub applied: usize,
    pub submissions: usize,
    pub failed_submissions: usize,
}

pub fn parse_script(contents: &str) -> ScriptResult<Vec<ScriptStep>> {
    Ok(serde_json::from_str(contents)?)
}

pub fn load_script(path: &Path) -> ScriptResult<Vec<ScriptStep>> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&contents)
}

/// Replays steps, running each restoration on the background worker.
pub struct ScriptRunner {
    restorer: Arc<dyn Restorer>,
}

impl ScriptRunner {
    pub fn new(restorer: Arc<dyn Restorer>) -> Self {
        Self { restorer }
    }

    pub fn run(
        &self,
        session: &mut EditorSession,
        steps: &[ScriptStep],
    ) -> ScriptResult<ReplayReport> {
        let mut report = ReplayReport::default();
        for (step, script_step) in steps.iter().enumerate() {
            tracing::debug!(step, ?script_step, "replaying script step");
            let outcome = self.apply_step(session, step, script_step)?;
            report.steps += 1;
            match outcome {
                CommandOutcome::Applied => report.applied += 1,
                CommandOutcome::Ignored => {}
                CommandOutcome::Submission(ticket) => {
                    report.applied += 1;
                    report.submissions += 1;
                    if !self.drive(session, step, ticket)? {
                        report.failed_submissions += 1;
                    }
                }
            }
        }
        tracing::info!(
            steps = report.steps,
            submissions = report.submissions,
            failed = report.failed_submissions,
            "script replay finished"
        );
        Ok(report)
    }

    fn apply_step(
        &self,
        session: &mut EditorSession,
        step: usize,
        script_step: &ScriptStep,
    ) -> ScriptResult<CommandOutcome> {
        let apply = |session: &mut EditorSession, command| {
            session
                .apply(command)
                .map_err(|source| ScriptError::Session { step, source })
        };

        let command = match script_step {
            ScriptStep::Stroke { points } => return stroke(session, step, points),
            ScriptStep::Submit => EditorCommand::Submit,
            ScriptStep::Undo => EditorCommand::Undo,
            ScriptStep::Redo => EditorCommand::Redo,
            ScriptStep::Delete { index: None } => EditorCommand::DeleteCurrent,
            ScriptStep::Delete { index: Some(index) } => {
                EditorCommand::Delete(entry_at(session, step, *index)?)
            }
            ScriptStep::Select { index } => {
                EditorCommand::Select(entry_at(session, step, *index)?)
            }
            ScriptStep::ToggleAuto => EditorCommand::ToggleAutoMode,
            ScriptStep::ToggleLock => EditorCommand::ToggleLock,
            ScriptStep::ToggleOriginal => EditorCommand::ToggleOriginalView,
            ScriptStep::ZoomIn => EditorCommand::ZoomIn,
            ScriptStep::ZoomOut => EditorCommand::ZoomOut,
            ScriptStep::Brush { radius } => EditorCommand::SetBrushRadius(*radius),
        };
        apply(session, command)
    }

    /// Returns `false` when the restorer failed and the mask was rolled back.
    fn drive(
        &self,
        session: &mut EditorSession,
        step: usize,
        ticket: SubmissionTicket,
    ) -> ScriptResult<bool> {
        let pending = spawn_restoration(Arc::clone(&self.restorer), ticket);
        let ticket = pending.ticket();
        let result = pending.wait();
        match session.finish_submit(ticket, result) {
            Ok(_) => Ok(true),
            Err(SubmitError::Restore(err)) => {
                tracing::warn!(step, error = %err, "restoration failed during replay");
                Ok(false)
            }
            Err(err) => Err(ScriptError::Session {
                step,
                source: err.into(),
            }),
        }
    }
}

fn entry_at(
    session: &EditorSession,
    step: usize,
    index: usize,
) -> ScriptResult<crate::history::EntryId> {
    session
        .history()
        .entries()
        .get(index)
        .map(|entry| entry.id())
        .ok_or(ScriptError::UnknownEntry { step, index })
}

fn stroke(
    session: &mut EditorSession,
    step: usize,
    points: &[[f64; 2]],
) -> ScriptResult<CommandOutcome> {
    let mut points = points.iter().map(|&[x, y]| Point::new(x, y));
    let first = points.next().ok_or(ScriptError::EmptyStroke { step })?;
    let session_error = |source| ScriptError::Session { step, source };

    if !session
        .apply(EditorCommand::StartStroke(first))
        .map_err(session_error)?
        .is_applied()
    {
        return Ok(CommandOutcome::Ignored);
    }
    for point in points {
        session
            .apply(EditorCommand::MoveStroke(point))
            .map_err(session_error)?;
    }
    session
        .apply(EditorCommand::EndStroke)
        .map_err(session_error)
}
