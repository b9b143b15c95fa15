use crate::utils::config::AppConfig;
use anyhow::{Context, Result};
use clap::ValueEnum;
use milli_core::api::mojang::fetch_version_manifest;
use milli_core::game::launcher::select_range;
use milli_core::VersionCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum VersionSource {
    /// Versions installed in the minecraft folder
    #[default]
    Local,
    /// Versions published by Mojang
    Remote,
}

pub fn handle_list(
    config: &AppConfig,
    source: VersionSource,
    min: Option<String>,
    max: Option<String>,
) -> Result<()> {
    let ids = match source {
        VersionSource::Local => local_versions(config, min.as_deref(), max.as_deref())?,
        VersionSource::Remote => {
            let manifest = fetch_version_manifest()?;
            select_range(&manifest.ids_oldest_first(), min.as_deref(), max.as_deref())
        }
    };

    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

fn local_versions(config: &AppConfig, min: Option<&str>, max: Option<&str>) -> Result<Vec<String>> {
    let versions_dir = config.minecraft_dir.join("versions");
    let catalog = VersionCatalog::scan(&versions_dir)
        .with_context(|| format!("Cannot list versions in {:?}", config.minecraft_dir))?;

    for (id, reason) in catalog.rejected() {
        log::debug!("Not listing {}: {}", id, reason);
    }
    Ok(catalog.list_range(min, max))
}
