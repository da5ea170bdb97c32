use crate::restore::RestoreError;
use crate::script::ScriptError;
use crate::session::SessionError;
use crate::state::ModeError;
use crate::submission::SubmitError;
use crate::viewport::TransformError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config.json has no restore_command")]
    MissingRestoreCommand,
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Restore(#[from] RestoreError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Mode(err) => Self::Mode(err),
            SessionError::Submit(err) => Self::Submit(err),
        }
    }
}
