use std::path::Path;
use std::sync::Arc;

use config::AppConfig;
use restore::{CommandRestorer, Restorer};
use script::{load_script, ReplayReport, ScriptRunner};

pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod imaging;
pub mod input;
pub mod logging;
pub mod mask;
pub mod restore;
pub mod script;
pub mod session;
pub mod state;
pub mod submission;
pub mod viewport;
pub mod worker;

pub use error::{AppError, AppResult};
pub use session::{EditorSession, SessionOptions};

/// Entrypoint used by the CLI: replays `script` against `source` and writes
/// the displayed image to `output`.
pub fn run_replay(
    source: &Path,
    script: &Path,
    output: &Path,
    config: &AppConfig,
) -> AppResult<ReplayReport> {
    let command = config
        .restore_command
        .clone()
        .ok_or(AppError::MissingRestoreCommand)?;
    let restorer: Arc<dyn Restorer> =
        Arc::new(CommandRestorer::new(command, config.work_dir.as_deref()));

    let image = imaging::load_rgba(source)?;
    let steps = load_script(script)?;
    let mut session = EditorSession::new(image, config.session_options());
    tracing::info!(steps = steps.len(), "starting replay");

    let report = ScriptRunner::new(restorer).run(&mut session, &steps)?;
    imaging::save_png(session.display_image(), output)?;
    tracing::info!(
        entries = session.history().len(),
        failed = report.failed_submissions,
        "replay complete"
    );
    Ok(report)
}
