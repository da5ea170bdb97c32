use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::history::DEFAULT_PAGE_SIZE;
use crate::mask::BRUSH_RADIUS_DEFAULT;
use crate::restore::RestoreCommand;
use crate::session::SessionOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "maskedit";
const APP_CONFIG_FILE: &str = "config.json";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_brush_radius")]
    pub brush_radius: u8,
    #[serde(default = "default_auto_mode")]
    pub auto_mode: bool,
    #[serde(default = "default_history_page_size")]
    pub history_page_size: usize,
    #[serde(default)]
    pub restore_command: Option<RestoreCommand>,
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
}

const fn default_brush_radius() -> u8 {
    BRUSH_RADIUS_DEFAULT
}

const fn default_auto_mode() -> bool {
    true
}

const fn default_history_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            brush_radius: default_brush_radius(),
            auto_mode: default_auto_mode(),
            history_page_size: default_history_page_size(),
            restore_command: None,
            work_dir: None,
        }
    }
}

impl AppConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            brush_radius: self.brush_radius,
            auto_mode: self.auto_mode,
            history_page_size: self.history_page_size,
        }
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

pub fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(?err, "config root unresolved; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
