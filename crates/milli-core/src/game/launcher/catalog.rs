/// Index of the versions installed under `<minecraft>/versions`
use crate::game::launcher::error::LaunchError;
use crate::game::launcher::types::OsType;
use crate::game::launcher::version_parser::{
    parse_version_json, resolve_version_chain, DescriptorError, VersionDescriptor,
    VersionManifest,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Installed versions keyed by id, in lexical id order
#[derive(Debug, Clone)]
pub struct VersionCatalog {
    versions_dir: PathBuf,
    os: OsType,
    versions: BTreeMap<String, VersionDescriptor>,
    rejected: BTreeMap<String, String>,
}

impl VersionCatalog {
    /// Scan `versions_dir` and resolve every descriptor for the host OS
    pub fn scan(versions_dir: &Path) -> Result<Self, LaunchError> {
        Self::scan_for(versions_dir, OsType::current())
    }

    pub fn scan_for(versions_dir: &Path, os: OsType) -> Result<Self, LaunchError> {
        if !versions_dir.is_dir() {
            return Err(LaunchError::DirectoryNotFound {
                path: versions_dir.to_path_buf(),
            });
        }

        let entries = std::fs::read_dir(versions_dir).map_err(|_| {
            LaunchError::DirectoryNotFound {
                path: versions_dir.to_path_buf(),
            }
        })?;

        let mut manifests = BTreeMap::new();
        let mut sources = BTreeMap::new();
        let mut rejected = BTreeMap::new();

        for entry in entries.flatten() {
            let folder = entry.path();
            if !folder.is_dir() {
                continue;
            }
            let Ok(folder_name) = entry.file_name().into_string() else {
                continue;
            };

            let json_path = folder.join(format!("{}.json", folder_name));
            if !json_path.is_file() {
                continue;
            }

            match parse_version_json(&json_path) {
                Ok(manifest) if manifest.id != folder_name => {
                    let err = DescriptorError::IdMismatch {
                        expected: folder_name.clone(),
                        found: manifest.id,
                    };
                    log::warn!("Skipping {:?}: {}", json_path, err);
                    rejected.insert(folder_name, err.to_string());
                }
                Ok(manifest) => {
                    sources.insert(folder_name.clone(), json_path);
                    manifests.insert(folder_name, manifest);
                }
                Err(e) => {
                    log::warn!("Skipping {:?}: {}", json_path, e);
                    rejected.insert(folder_name, e.to_string());
                }
            }
        }

        let mut versions = BTreeMap::new();
        for (id, json_path) in &sources {
            match resolve_descriptor(id, &manifests, os) {
                Ok(descriptor) => {
                    versions.insert(id.clone(), descriptor);
                }
                Err(e) => {
                    let err = LaunchError::InvalidDescriptor {
                        path: json_path.clone(),
                        reason: e.to_string(),
                    };
                    log::warn!("Skipping version {}: {}", id, err);
                    rejected.insert(id.clone(), err.to_string());
                }
            }
        }

        log::debug!(
            "Scanned {:?}: {} version(s), {} rejected",
            versions_dir,
            versions.len(),
            rejected.len()
        );

        Ok(Self {
            versions_dir: versions_dir.to_path_buf(),
            os,
            versions,
            rejected,
        })
    }

    /// Rebuild the whole index from disk
    pub fn refresh(&mut self) -> Result<(), LaunchError> {
        *self = Self::scan_for(&self.versions_dir, self.os)?;
        Ok(())
    }

    pub fn get(&self, version_id: &str) -> Option<&VersionDescriptor> {
        self.versions.get(version_id)
    }

    /// Installed ids in catalog order
    pub fn list(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Installed ids between `min` and `max` inclusive
    pub fn list_range(&self, min: Option<&str>, max: Option<&str>) -> Vec<String> {
        select_range(&self.list(), min, max)
    }

    /// Version folders that were found but could not be loaded, with the reason
    pub fn rejected(&self) -> &BTreeMap<String, String> {
        &self.rejected
    }

    pub fn versions_dir(&self) -> &Path {
        &self.versions_dir
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

fn resolve_descriptor(
    id: &str,
    manifests: &BTreeMap<String, VersionManifest>,
    os: OsType,
) -> Result<VersionDescriptor, DescriptorError> {
    let merged = resolve_version_chain(id, manifests)?;
    VersionDescriptor::from_manifest(merged, os)
}

/// Contiguous slice of `ids` from `min` to `max` inclusive. A bound that is
/// absent or not in `ids` falls back to the start (or end).
pub fn select_range(ids: &[String], min: Option<&str>, max: Option<&str>) -> Vec<String> {
    let begin = min
        .and_then(|min| ids.iter().position(|id| id == min))
        .unwrap_or(0);
    let end = max
        .and_then(|max| ids.iter().position(|id| id == max))
        .map(|index| index + 1)
        .unwrap_or(ids.len());

    if begin >= end {
        return Vec::new();
    }
    ids[begin..end].to_vec()
}
