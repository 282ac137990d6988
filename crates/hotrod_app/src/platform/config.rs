use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hotrod_core::{BusyPolicy, DialogCallStyle, FetcherConfig, ManifestTrigger};
use hotrod_engine::{UiEngineSettings, MANIFEST_FILENAME};
use hotrod_logging::{hotrod_info, hotrod_warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "hotrod.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub icon: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hotrod".to_string(),
            width: 1024,
            height: 768,
            icon: Some(PathBuf::from("wombat.png")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub window: WindowConfig,
    /// Keep running with no open window. `None` follows the platform habit.
    pub keep_alive_without_windows: Option<bool>,
    pub dialog_call_style: DialogCallStyle,
    pub manifest_trigger: ManifestTrigger,
    pub busy_policy: BusyPolicy,
    /// Relative to the install directory.
    pub manifest_file: PathBuf,
    /// Root for `watched_assets`; relative values hang off the install directory.
    pub project_root: Option<PathBuf>,
    pub watched_assets: Vec<PathBuf>,
    pub live_reload: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            keep_alive_without_windows: None,
            dialog_call_style: DialogCallStyle::default(),
            manifest_trigger: ManifestTrigger::default(),
            busy_policy: BusyPolicy::default(),
            manifest_file: PathBuf::from(MANIFEST_FILENAME),
            project_root: None,
            watched_assets: ["index.html", "elm.js", "styles.css", CONFIG_FILENAME]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            live_reload: true,
        }
    }
}

impl ShellConfig {
    pub fn keep_alive(&self) -> bool {
        self.keep_alive_without_windows
            .unwrap_or(cfg!(target_os = "macos"))
    }

    pub fn project_root(&self, install_dir: &Path) -> PathBuf {
        match &self.project_root {
            Some(root) => install_dir.join(root),
            None => install_dir.to_path_buf(),
        }
    }

    pub fn engine_settings(&self, install_dir: &Path) -> UiEngineSettings {
        UiEngineSettings {
            install_dir: install_dir.to_path_buf(),
            manifest_path: install_dir.join(&self.manifest_file),
            fetcher: FetcherConfig {
                manifest_trigger: self.manifest_trigger,
                busy_policy: self.busy_policy,
            },
            call_style: self.dialog_call_style,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// `Ok(None)` when the file does not exist.
pub fn load_from(path: &Path) -> Result<Option<ShellConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

/// Loads `hotrod.ron` from the install directory, falling back to defaults.
pub fn load(install_dir: &Path) -> ShellConfig {
    let path = install_dir.join(CONFIG_FILENAME);
    match load_from(&path) {
        Ok(Some(config)) => {
            hotrod_info!("Loaded shell config from {:?}", path);
            config
        }
        Ok(None) => {
            hotrod_info!("No shell config at {:?}; using defaults", path);
            ShellConfig::default()
        }
        Err(err) => {
            hotrod_warn!("{}; using defaults", err);
            ShellConfig::default()
        }
    }
}
