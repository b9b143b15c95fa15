/// Native library extraction for Minecraft launcher
use crate::game::launcher::error::LaunchError;
use crate::game::launcher::version_parser::VersionDescriptor;
use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

/// Extract every native archive of `descriptor` into `natives_dir`, then
/// delete the union of all exclude paths.
///
/// Exclusions are applied once after all archives are unpacked so a path
/// excluded by one library never survives because a later archive re-created
/// it. Running this again over a stale or partial directory converges to the
/// same result.
pub fn extract_natives(
    descriptor: &VersionDescriptor,
    libraries_dir: &Path,
    natives_dir: &Path,
) -> Result<(), LaunchError> {
    std::fs::create_dir_all(natives_dir)
        .map_err(|e| LaunchError::extraction_io(natives_dir, e))?;

    let mut exclusions = BTreeSet::new();

    for native in descriptor.extract() {
        let jar_path = libraries_dir.join(&native.path);
        extract_jar(&jar_path, natives_dir)?;
        exclusions.extend(native.exclude.iter().cloned());
    }

    for exclusion in &exclusions {
        remove_excluded(natives_dir, exclusion)?;
    }

    log::debug!(
        "Extracted {} native archive(s) into {:?}, {} exclusion(s) applied",
        descriptor.extract().len(),
        natives_dir,
        exclusions.len()
    );
    Ok(())
}

/// Extract a JAR file to a directory, preserving its internal layout
fn extract_jar(jar_path: &Path, output_dir: &Path) -> Result<(), LaunchError> {
    log::debug!("Extracting natives from: {:?}", jar_path);

    if !jar_path.is_file() {
        return Err(LaunchError::ArchiveNotFound {
            path: jar_path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(jar_path).map_err(|e| LaunchError::corrupt(jar_path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| LaunchError::corrupt(jar_path, e))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| LaunchError::corrupt(jar_path, e))?;

        let Some(relative) = entry.enclosed_name() else {
            log::warn!("Skipping unsafe entry {:?} in {:?}", entry.name(), jar_path);
            continue;
        };
        let output_path = output_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&output_path)
                .map_err(|e| LaunchError::extraction_io(&output_path, e))?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LaunchError::extraction_io(parent, e))?;
        }
        // A stale directory in place of a file from an earlier layout
        if output_path.is_dir() {
            std::fs::remove_dir_all(&output_path)
                .map_err(|e| LaunchError::extraction_io(&output_path, e))?;
        }

        let mut output_file = std::fs::File::create(&output_path)
            .map_err(|e| LaunchError::extraction_io(&output_path, e))?;
        copy_entry(&mut entry, &mut output_file, jar_path, &output_path)?;
    }

    Ok(())
}

/// Stream an archive entry to disk. The size declared in the archive is never
/// trusted for allocation.
fn copy_entry(
    entry: &mut impl Read,
    output: &mut impl Write,
    jar_path: &Path,
    output_path: &Path,
) -> Result<(), LaunchError> {
    let mut buffer = [0u8; 8192];
    loop {
        let read = match entry.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LaunchError::corrupt(jar_path, e)),
        };
        output
            .write_all(&buffer[..read])
            .map_err(|e| LaunchError::extraction_io(output_path, e))?;
    }
}

/// Delete an excluded path (file or directory tree) under `natives_dir`
fn remove_excluded(natives_dir: &Path, exclusion: &str) -> Result<(), LaunchError> {
    let Some(relative) = relative_inside(exclusion) else {
        log::warn!("Ignoring exclusion outside the natives directory: {}", exclusion);
        return Ok(());
    };
    let target = natives_dir.join(relative);

    let result = match std::fs::symlink_metadata(&target) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&target),
        Ok(_) => std::fs::remove_file(&target),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };

    result.map_err(|e| LaunchError::extraction_io(&target, e))
}

/// Normalise an exclude entry to a relative path with no parent or root
/// components. `None` when nothing is left or it escapes the directory.
fn relative_inside(exclusion: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(exclusion).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}
