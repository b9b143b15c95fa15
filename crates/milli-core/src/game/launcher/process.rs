/// Launch orchestration: resolve, extract natives, build, spawn
use crate::game::launcher::{
    arguments::{build_launch_command, LaunchCommand},
    catalog::VersionCatalog,
    error::LaunchError,
    natives::extract_natives,
    types::{GameDirectories, LaunchOptions, LaunchStage, LauncherConfig},
};
use dunce::canonicalize;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// What happened to the spawned game process
#[derive(Debug)]
pub enum LaunchOutcome {
    /// The launcher waited for the game; its status is passed through untouched
    Exited(ExitStatus),

    /// The game was left running; only its pid is known
    Detached { pid: u32 },
}

/// Launcher bound to one minecraft root and one java binary.
///
/// Launch attempts on one instance are sequential; the stage cell makes the
/// type `!Sync` so it cannot be shared across threads.
#[derive(Debug)]
pub struct LauncherCore {
    minecraft_dir: PathBuf,
    java_path: PathBuf,
    catalog: VersionCatalog,
    stage: Cell<LaunchStage>,
}

impl LauncherCore {
    /// Validate the environment and scan installed versions
    pub fn new(config: LauncherConfig) -> Result<Self, LaunchError> {
        let minecraft_dir = resolve_minecraft_dir(&config.minecraft_dir)?;
        let java_path = resolve_java(&config.java_path)?;

        log::debug!(
            "Launcher environment: minecraft={:?}, java={:?}",
            minecraft_dir,
            java_path
        );

        let catalog = VersionCatalog::scan(&minecraft_dir.join("versions"))?;

        Ok(Self {
            minecraft_dir,
            java_path,
            catalog,
            stage: Cell::new(LaunchStage::Idle),
        })
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }

    /// Re-scan the versions directory
    pub fn refresh(&mut self) -> Result<(), LaunchError> {
        self.catalog.refresh()
    }

    pub fn minecraft_dir(&self) -> &Path {
        &self.minecraft_dir
    }

    pub fn java_path(&self) -> &Path {
        &self.java_path
    }

    /// Stage reached by the most recent launch attempt
    pub fn stage(&self) -> LaunchStage {
        self.stage.get()
    }

    /// Directory context for `version_id`
    pub fn directories(&self, version_id: &str) -> GameDirectories {
        GameDirectories::for_version(&self.minecraft_dir, version_id)
    }

    /// Resolve `version_id`, extract its natives and build the command
    /// without running it. Handing the command back counts as a completed
    /// launch, so the stage ends in `Launched`.
    pub fn prepare(
        &self,
        version_id: &str,
        options: &LaunchOptions,
    ) -> Result<LaunchCommand, LaunchError> {
        let command = self.build(version_id, options)?;
        self.advance(LaunchStage::Launched);
        Ok(command)
    }

    /// Prepare and start the game. Blocks until it exits unless
    /// `options.detach` is set.
    pub fn launch(
        &self,
        version_id: &str,
        options: &LaunchOptions,
    ) -> Result<LaunchOutcome, LaunchError> {
        let command = self.build(version_id, options)?;

        log::info!("Launching {} as {}", version_id, options.username);
        log::debug!("Command: {}", command.render());

        let mut process = command.to_command();
        process
            .current_dir(&self.minecraft_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = process.spawn().map_err(|source| {
            self.advance(LaunchStage::Failed);
            LaunchError::ProcessSpawn {
                program: command.program.clone(),
                source,
            }
        })?;
        self.advance(LaunchStage::Launched);

        if options.detach {
            return Ok(LaunchOutcome::Detached { pid: child.id() });
        }

        let status = child.wait().map_err(|source| {
            self.advance(LaunchStage::Failed);
            LaunchError::ProcessSpawn {
                program: command.program.clone(),
                source,
            }
        })?;
        log::info!("Game exited with {}", status);
        Ok(LaunchOutcome::Exited(status))
    }

    /// Resolving through BuildingCommand; any failure leaves the stage at `Failed`
    fn build(
        &self,
        version_id: &str,
        options: &LaunchOptions,
    ) -> Result<LaunchCommand, LaunchError> {
        self.advance(LaunchStage::Resolving);
        let result = self.build_inner(version_id, options);
        if result.is_err() {
            self.advance(LaunchStage::Failed);
        }
        result
    }

    fn build_inner(
        &self,
        version_id: &str,
        options: &LaunchOptions,
    ) -> Result<LaunchCommand, LaunchError> {
        let descriptor =
            self.catalog
                .get(version_id)
                .ok_or_else(|| LaunchError::UnknownVersion {
                    version_id: version_id.to_string(),
                })?;
        let directories = self.directories(version_id);

        self.advance(LaunchStage::ExtractingNatives);
        extract_natives(descriptor, &directories.libraries_dir, &directories.natives_dir)?;

        self.advance(LaunchStage::BuildingCommand);
        build_launch_command(&self.java_path, descriptor, &directories, options)
    }

    fn advance(&self, stage: LaunchStage) {
        log::debug!("Launch stage: {} -> {}", self.stage.get(), stage);
        self.stage.set(stage);
    }
}

fn resolve_minecraft_dir(path: &Path) -> Result<PathBuf, LaunchError> {
    if path.as_os_str().is_empty() {
        return Err(LaunchError::InvalidEnvironment {
            reason: "minecraft directory is not set".to_string(),
        });
    }
    if !path.is_dir() {
        return Err(LaunchError::InvalidEnvironment {
            reason: format!("minecraft directory {:?} does not exist", path),
        });
    }

    canonicalize(path).map_err(|e| LaunchError::InvalidEnvironment {
        reason: format!("minecraft directory {:?} cannot be resolved: {}", path, e),
    })
}

/// Accept an existing file as-is, otherwise look the name up on PATH
fn resolve_java(path: &Path) -> Result<PathBuf, LaunchError> {
    if path.as_os_str().is_empty() {
        return Err(LaunchError::InvalidEnvironment {
            reason: "java path is not set".to_string(),
        });
    }
    if path.is_file() {
        return Ok(canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
    }

    which::which(path).map_err(|e| LaunchError::InvalidEnvironment {
        reason: format!("java executable {:?} not found: {}", path, e),
    })
}
