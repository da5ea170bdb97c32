//! The restoration collaborator: given an image and a binarized mask, produce
//! a same-sized image with the masked region regenerated.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use image::{ImageError, RgbaImage};
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::ImageBounds;
use crate::imaging::{bounds_of, load_rgba, save_png};

pub type RestoreResult<T> = std::result::Result<T, RestoreError>;

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },
    #[error("command io error: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("work directory unavailable: {path}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image codec error")]
    Image(#[from] ImageError),
    #[error("invalid restoration output: {message}")]
    InvalidOutput { message: String },
    #[error("restored image is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        expected: ImageBounds,
        actual: ImageBounds,
    },
    #[error("restoration rejected: {message}")]
    Rejected { message: String },
    #[error("restoration worker exited without a result")]
    WorkerDisconnected,
}

pub trait Restorer: Send + Sync {
    fn restore(&self, image: &RgbaImage, mask: &RgbaImage) -> RestoreResult<RgbaImage>;
}

/// Rejects a restoration result that does not match the submitted raster.
pub fn ensure_same_bounds(expected: ImageBounds, restored: &RgbaImage) -> RestoreResult<()> {
    let actual = bounds_of(restored);
    if actual == expected {
        Ok(())
    } else {
        Err(RestoreError::DimensionMismatch { expected, actual })
    }
}

/// External program invoked as `<program> <args..> <image> <mask> <output>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestoreCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

const IMAGE_FILE: &str = "image.png";
const MASK_FILE: &str = "mask.png";
const OUTPUT_FILE: &str = "output.png";

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct CommandRestorer {
    command: RestoreCommand,
    work_dir: PathBuf,
}

impl CommandRestorer {
    pub fn new(command: RestoreCommand, work_dir: Option<&Path>) -> Self {
        Self {
            command,
            work_dir: work_dir.map_or_else(std::env::temp_dir, Path::to_path_buf),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn allocate_job_dir(&self) -> RestoreResult<PathBuf> {
        let sequence = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let path = self
            .work_dir
            .join(format!("maskedit-{}-{sequence}", std::process::id()));
        std::fs::create_dir_all(&path).map_err(|source| RestoreError::WorkDir {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn run(&self, image: &Path, mask: &Path, output: &Path) -> RestoreResult<()> {
        let program = self.command.program.as_str();
        let status = Command::new(program)
            .args(&self.command.args)
            .arg(image)
            .arg(mask)
            .arg(output)
            .status()
            .map_err(|err| RestoreError::CommandIo {
                command: program.to_string(),
                source: err,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RestoreError::CommandFailed {
                command: program.to_string(),
                message: format!("command exited with status: {status}"),
            })
        }
    }

    fn restore_in(
        &self,
        job_dir: &Path,
        image: &RgbaImage,
        mask: &RgbaImage,
    ) -> RestoreResult<RgbaImage> {
        let image_path = job_dir.join(IMAGE_FILE);
        let mask_path = job_dir.join(MASK_FILE);
        let output_path = job_dir.join(OUTPUT_FILE);
        save_png(image, &image_path)?;
        save_png(mask, &mask_path)?;

        self.run(&image_path, &mask_path, &output_path)?;

        let restored = load_rgba(&output_path).map_err(|err| RestoreError::InvalidOutput {
            message: format!("{}: {err}", output_path.display()),
        })?;
        ensure_same_bounds(bounds_of(image), &restored)?;
        Ok(restored)
    }
}

impl Restorer for CommandRestorer {
    fn restore(&self, image: &RgbaImage, mask: &RgbaImage) -> RestoreResult<RgbaImage> {
        let job_dir = self.allocate_job_dir()?;
        tracing::debug!(
            program = %self.command.program,
            job_dir = %job_dir.display(),
            "running restoration command"
        );
        let result = self.restore_in(&job_dir, image, mask);
        cleanup_job_dir(&job_dir);
        result
    }
}

fn cleanup_job_dir(job_dir: &Path) {
    if let Err(err) = std::fs::remove_dir_all(job_dir) {
        tracing::warn!(
            path = %job_dir.display(),
            ?err,
            "failed to cleanup restoration work directory"
        );
    }
}
