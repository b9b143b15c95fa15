/// Classpath construction for Minecraft launcher
use crate::game::launcher::types::{GameDirectories, OsType};
use crate::game::launcher::version_parser::VersionDescriptor;

/// Build the classpath string: every library in declaration order, then the
/// primary game jar last.
pub fn build_classpath(
    descriptor: &VersionDescriptor,
    directories: &GameDirectories,
    os: OsType,
) -> String {
    let mut classpath_entries: Vec<String> = descriptor
        .libraries()
        .iter()
        .map(|library| {
            directories
                .libraries_dir
                .join(&library.path)
                .to_string_lossy()
                .into_owned()
        })
        .collect();

    classpath_entries.push(
        directories
            .game_jar(descriptor.jar())
            .to_string_lossy()
            .into_owned(),
    );

    classpath_entries.join(os.classpath_separator())
}

/// Convert Maven coordinates to file path
/// Format: group:artifact:version[:classifier][@extension]
/// Example: "com.google.guava:guava:21.0" -> "com/google/guava/guava/21.0/guava-21.0.jar"
pub fn maven_to_path(coords: &str) -> Option<String> {
    let parts: Vec<&str> = coords.split(':').collect();

    if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let group = parts[0].replace('.', "/");
    let artifact = parts[1];
    let mut version = parts[2];
    let mut classifier = None;
    let mut extension = "jar";

    if parts.len() == 3 {
        // group:artifact:version@extension
        if let Some((v, ext)) = version.split_once('@') {
            version = v;
            extension = ext;
        }
    } else {
        // group:artifact:version:classifier[@extension]
        if let Some((clf, ext)) = parts[3].split_once('@') {
            classifier = Some(clf);
            extension = ext;
        } else {
            classifier = Some(parts[3]);
        }
    }

    let filename = match classifier {
        Some(clf) => format!("{}-{}-{}.{}", artifact, version, clf, extension),
        None => format!("{}-{}.{}", artifact, version, extension),
    };

    Some(format!("{}/{}/{}/{}", group, artifact, version, filename))
}
