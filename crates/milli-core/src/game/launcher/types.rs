/// Core types for game launching
use std::fmt;
use std::path::{Path, PathBuf};

/// Operating system families that appear in descriptor rules and native maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsType {
    Windows,
    MacOS,
    Linux,
}

impl OsType {
    /// Detect the current OS
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsType::Windows
        } else if cfg!(target_os = "macos") {
            OsType::MacOS
        } else {
            OsType::Linux
        }
    }

    /// Get the OS name as a string (for rule matching)
    pub fn as_str(&self) -> &'static str {
        match self {
            OsType::Windows => "windows",
            OsType::Linux => "linux",
            OsType::MacOS => "osx",
        }
    }

    /// Get the classpath separator for this OS
    pub fn classpath_separator(&self) -> &'static str {
        match self {
            OsType::Windows => ";",
            _ => ":",
        }
    }

    /// Pointer width used for `${arch}` in native classifiers
    pub fn arch_bits() -> &'static str {
        if cfg!(target_pointer_width = "32") {
            "32"
        } else {
            "64"
        }
    }
}

/// Resolved environment handed to [`LauncherCore::new`](super::LauncherCore::new)
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// The `.minecraft` folder
    pub minecraft_dir: PathBuf,

    /// Java launcher binary, either a path or a bare name looked up on PATH
    pub java_path: PathBuf,
}

/// Per-launch request values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Player name substituted for `${auth_player_name}`
    pub username: String,

    /// Maximum heap in megabytes (`-Xmx<N>M`)
    pub max_memory_mb: u32,

    /// Append `--fullscreen` to the game arguments
    pub fullscreen: bool,

    /// Return as soon as the game process is spawned instead of waiting for it
    pub detach: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            username: "Steve".to_string(),
            max_memory_mb: 1024,
            fullscreen: false,
            detach: false,
        }
    }
}

/// Directory context for one launch. Derived from the minecraft root and the
/// version id, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDirectories {
    pub minecraft_dir: PathBuf,
    pub libraries_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub versions_dir: PathBuf,
    pub version_dir: PathBuf,
    pub natives_dir: PathBuf,
}

impl GameDirectories {
    pub fn for_version(minecraft_dir: &Path, version_id: &str) -> Self {
        let versions_dir = minecraft_dir.join("versions");
        let version_dir = versions_dir.join(version_id);
        let natives_dir = version_dir.join(format!("{}-natives", version_id));

        Self {
            minecraft_dir: minecraft_dir.to_path_buf(),
            libraries_dir: minecraft_dir.join("libraries"),
            assets_dir: minecraft_dir.join("assets"),
            versions_dir,
            version_dir,
            natives_dir,
        }
    }

    /// Path of the primary jar `versions/<jar>/<jar>.jar`
    pub fn game_jar(&self, jar: &str) -> PathBuf {
        self.versions_dir.join(jar).join(format!("{}.jar", jar))
    }
}

/// Stages of a single launch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Idle,
    Resolving,
    ExtractingNatives,
    BuildingCommand,
    Launched,
    Failed,
}

impl fmt::Display for LaunchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchStage::Idle => "idle",
            LaunchStage::Resolving => "resolving",
            LaunchStage::ExtractingNatives => "extracting-natives",
            LaunchStage::BuildingCommand => "building-command",
            LaunchStage::Launched => "launched",
            LaunchStage::Failed => "failed",
        };
        f.write_str(name)
    }
}
