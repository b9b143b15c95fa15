//! Mojang version manifest client
//!
//! Fetches the list of published game versions. Only ids and types are read;
//! nothing is downloaded beyond the manifest itself.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

const MOJANG_MANIFEST_URL: &str = "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

#[derive(Debug, Deserialize)]
pub struct MojangVersionManifest {
    pub latest: MojangLatest,
    pub versions: Vec<MojangVersion>,
}

#[derive(Debug, Deserialize)]
pub struct MojangLatest {
    pub release: String,
    pub snapshot: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MojangVersion {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub release_time: String,
}

impl MojangVersionManifest {
    /// Version ids oldest first. The manifest itself lists newest first.
    pub fn ids_oldest_first(&self) -> Vec<String> {
        self.versions.iter().rev().map(|v| v.id.clone()).collect()
    }
}

/// Fetch the official version manifest
pub fn fetch_version_manifest() -> Result<MojangVersionManifest> {
    fetch_version_manifest_from(MOJANG_MANIFEST_URL)
}

pub fn fetch_version_manifest_from(url: &str) -> Result<MojangVersionManifest> {
    log::debug!("Fetching version manifest from {}", url);

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .context("Failed to fetch Mojang version manifest")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP {} from Mojang manifest URL", status);
    }

    response
        .json::<MojangVersionManifest>()
        .context("Failed to parse Mojang version manifest")
}
