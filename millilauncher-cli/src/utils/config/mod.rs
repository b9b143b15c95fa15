//! # Configuration Store
//!
//! Persisted launcher settings, kept as a single JSON document at
//! `<config dir>/.millilauncher/config.json`.
//!
//! The store is loaded once at startup and written back whenever a command
//! changes it. The launcher core never sees this type; it receives the
//! resolved values through [`AppConfig::launcher_config`] and
//! [`AppConfig::launch_options`].

use anyhow::{Context, Result};
use directories::BaseDirs;
use milli_core::{LaunchOptions, LauncherConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".millilauncher";
const CONFIG_FILE_NAME: &str = "config.json";

/// Main application configuration struct
///
/// Unknown keys are ignored and missing keys take their default, so files
/// written by older versions keep loading.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub first_run: bool,
    pub minecraft_dir: PathBuf,
    pub java_path: PathBuf,
    pub max_memory_mb: u32,
    pub username: String,
    pub exit_on_launch: bool,
    pub fullscreen: bool,
    pub debug_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            first_run: true,
            minecraft_dir: default_minecraft_dir(),
            java_path: default_java_path(),
            max_memory_mb: 1024,
            username: "Steve".to_string(),
            exit_on_launch: false,
            fullscreen: false,
            debug_logging: false,
        }
    }
}

impl AppConfig {
    /// Environment handed to the launcher core
    pub fn launcher_config(&self) -> LauncherConfig {
        LauncherConfig {
            minecraft_dir: self.minecraft_dir.clone(),
            java_path: self.java_path.clone(),
        }
    }

    /// Launch request for `username`
    pub fn launch_options(&self, username: &str) -> LaunchOptions {
        LaunchOptions {
            username: username.to_string(),
            max_memory_mb: self.max_memory_mb,
            fullscreen: self.fullscreen,
            detach: self.exit_on_launch,
        }
    }
}

/// Where the configuration lives on disk
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the default location, or at `path` when given
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => get_app_config_dir()?.join(CONFIG_FILE_NAME),
        };
        Ok(Self { path })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, falling back to defaults when the file does not exist
    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            log::debug!("No config at {:?}, using defaults", self.path);
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file {:?}", self.path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config file {:?}", self.path))?;

        log::debug!("Saved config to {:?}", self.path);
        Ok(())
    }

    /// Overwrite the stored config with defaults and return them
    pub fn reset(&self) -> Result<AppConfig> {
        let config = AppConfig::default();
        self.save(&config)?;
        log::info!("Configuration reset to defaults");
        Ok(config)
    }
}

/// Get the application's config directory (~/.config/.millilauncher or %APPDATA%/.millilauncher)
pub fn get_app_config_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Failed to determine user's config directory"))?;

    Ok(base_dirs.config_dir().join(CONFIG_DIR_NAME))
}

/// The game's own default install location for this platform
pub fn default_minecraft_dir() -> PathBuf {
    let Some(base_dirs) = BaseDirs::new() else {
        return PathBuf::from(".minecraft");
    };

    if cfg!(target_os = "windows") {
        base_dirs.data_dir().join(".minecraft")
    } else if cfg!(target_os = "macos") {
        base_dirs.data_dir().join("minecraft")
    } else {
        base_dirs.home_dir().join(".minecraft")
    }
}

/// `javaw`/`java` from PATH, or the bare name when it cannot be found
pub fn default_java_path() -> PathBuf {
    let name = if cfg!(target_os = "windows") {
        "javaw"
    } else {
        "java"
    };
    which::which(name).unwrap_or_else(|_| PathBuf::from(name))
}

/// Strip one leading `=` so values may start with `-` (`-U =-name-`)
pub fn strip_assignment(value: &str) -> &str {
    value.strip_prefix('=').unwrap_or(value)
}
