/// Game launcher module: version resolution, natives and command synthesis
pub mod arguments;
pub mod catalog;
pub mod classpath;
pub mod error;
pub mod natives;
pub mod process;
pub mod types;
pub mod version_parser;

// Re-export commonly used types
pub use arguments::{build_launch_command, substitute_template, LaunchCommand};
pub use catalog::{select_range, VersionCatalog};
pub use classpath::{build_classpath, maven_to_path};
pub use error::LaunchError;
pub use natives::extract_natives;
pub use process::{LaunchOutcome, LauncherCore};
pub use types::{GameDirectories, LaunchOptions, LaunchStage, LauncherConfig, OsType};
pub use version_parser::{parse_version_json, NativeArchive, VersionDescriptor, VersionManifest};
