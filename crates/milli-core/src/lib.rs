pub mod api;
pub mod game;

// Re-export commonly used types
pub use game::launcher::{
    GameDirectories, LaunchCommand, LaunchError, LaunchOptions, LaunchOutcome, LaunchStage,
    LauncherConfig, LauncherCore, VersionCatalog, VersionDescriptor,
};
