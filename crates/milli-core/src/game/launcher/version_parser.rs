/// Version.json parser with inheritance support
use crate::game::launcher::classpath::maven_to_path;
use crate::game::launcher::error::LaunchError;
use crate::game::launcher::types::OsType;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Version manifest as stored in `versions/<id>/<id>.json`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionManifest {
    /// Version ID (e.g., "1.11.2" or "1.7.10-Forge10.13.4.1614")
    pub id: String,

    /// Name of the primary jar when it differs from the id
    #[serde(default)]
    pub jar: Option<String>,

    /// Main class to execute
    #[serde(default)]
    pub main_class: Option<String>,

    /// Parent version to inherit from
    #[serde(default)]
    pub inherits_from: Option<String>,

    /// Game argument template (pre-1.13 format)
    #[serde(default)]
    pub minecraft_arguments: Option<String>,

    /// Libraries required for this version
    #[serde(default)]
    pub libraries: Vec<Library>,

    /// Asset index information
    #[serde(default)]
    pub asset_index: Option<AssetIndex>,

    /// Assets version (legacy)
    #[serde(default)]
    pub assets: Option<String>,

    /// Version type (release, snapshot, etc.)
    #[serde(default, rename = "type")]
    pub version_type: Option<String>,
}

/// Library definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Library {
    /// Maven coordinates
    pub name: String,

    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,

    /// Rules for conditional inclusion
    #[serde(default)]
    pub rules: Option<Vec<Rule>>,

    /// Native classifiers keyed by OS name
    #[serde(default)]
    pub natives: Option<HashMap<String, String>>,

    /// Extract rules for natives
    #[serde(default)]
    pub extract: Option<ExtractRules>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<Artifact>,

    #[serde(default)]
    pub classifiers: Option<HashMap<String, Artifact>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractRules {
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub action: RuleAction,

    #[serde(default)]
    pub os: Option<OsRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,

    /// Regex over the host OS version, e.g. `^10\.5\.\d$`
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub arch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetIndex {
    pub id: String,
}

/// Reasons a manifest cannot become a [`VersionDescriptor`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("parent version {0} is not installed")]
    MissingParent(String),

    #[error("inheritance cycle through {0}")]
    InheritanceCycle(String),

    #[error("invalid Maven coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("descriptor id {found} does not match its folder {expected}")]
    IdMismatch { expected: String, found: String },
}

/// A library reference on the classpath, relative to the libraries root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRef {
    pub name: String,
    pub path: String,
}

/// An archive with native content and the sub-paths to drop after unpacking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeArchive {
    pub path: String,
    pub exclude: Vec<String>,
}

/// Fully resolved, read-only description of one installed version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    id: String,
    jar: String,
    main_class: String,
    minecraft_arguments: String,
    assets: String,
    version_type: Option<String>,
    libraries: Vec<LibraryRef>,
    extract: Vec<NativeArchive>,
}

impl VersionDescriptor {
    /// Build a descriptor from an already merged manifest, keeping only the
    /// libraries that apply to `os`.
    pub fn from_manifest(manifest: VersionManifest, os: OsType) -> Result<Self, DescriptorError> {
        let main_class = manifest
            .main_class
            .ok_or(DescriptorError::MissingField("mainClass"))?;
        let minecraft_arguments = manifest
            .minecraft_arguments
            .ok_or(DescriptorError::MissingField("minecraftArguments"))?;

        let assets = manifest
            .assets
            .or_else(|| manifest.asset_index.map(|index| index.id))
            .unwrap_or_else(|| "legacy".to_string());

        let context = RuleContext::for_os(os);
        let mut libraries = Vec::with_capacity(manifest.libraries.len());
        let mut extract = Vec::new();

        for library in &manifest.libraries {
            if !rules_allow(library.rules.as_deref(), &context) {
                log::debug!("Library {} disallowed on {}", library.name, os.as_str());
                continue;
            }

            match &library.natives {
                Some(natives) => {
                    let Some(classifier) = natives.get(os.as_str()) else {
                        log::debug!("Library {} has no natives for {}", library.name, os.as_str());
                        continue;
                    };
                    let classifier = classifier.replace("${arch}", OsType::arch_bits());
                    let path = native_path(library, &classifier)?;

                    extract.push(NativeArchive {
                        path: path.clone(),
                        exclude: library
                            .extract
                            .as_ref()
                            .map(|rules| rules.exclude.clone())
                            .unwrap_or_default(),
                    });
                    libraries.push(LibraryRef {
                        name: format!("{}:{}", library.name, classifier),
                        path,
                    });
                }
                None => {
                    libraries.push(LibraryRef {
                        name: library.name.clone(),
                        path: artifact_path(library)?,
                    });
                }
            }
        }

        Ok(Self {
            jar: manifest.jar.unwrap_or_else(|| manifest.id.clone()),
            id: manifest.id,
            main_class,
            minecraft_arguments,
            assets,
            version_type: manifest.version_type,
            libraries,
            extract,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn jar(&self) -> &str {
        &self.jar
    }

    pub fn main_class(&self) -> &str {
        &self.main_class
    }

    pub fn minecraft_arguments(&self) -> &str {
        &self.minecraft_arguments
    }

    pub fn assets(&self) -> &str {
        &self.assets
    }

    pub fn version_type(&self) -> Option<&str> {
        self.version_type.as_deref()
    }

    /// Libraries in declaration order
    pub fn libraries(&self) -> &[LibraryRef] {
        &self.libraries
    }

    pub fn extract(&self) -> &[NativeArchive] {
        &self.extract
    }
}

/// Host facts that `os` rules are matched against
struct RuleContext {
    os: OsType,
    arch: &'static str,
    os_version: String,
}

impl RuleContext {
    /// The OS version is only known for the host; for any other OS it stays
    /// empty, so version-restricted rules do not match.
    fn for_os(os: OsType) -> Self {
        let os_version = if os == OsType::current() {
            sysinfo::System::os_version().unwrap_or_default()
        } else {
            String::new()
        };

        Self {
            os,
            arch: std::env::consts::ARCH,
            os_version,
        }
    }
}

/// Evaluate library rules. No rules means the library always applies.
fn rules_allow(rules: Option<&[Rule]>, context: &RuleContext) -> bool {
    let Some(rules) = rules else {
        return true;
    };
    if rules.is_empty() {
        return true;
    }

    let mut allow = false;
    for rule in rules {
        let matches = match &rule.os {
            Some(os_rule) => os_rule_matches(os_rule, context),
            None => true,
        };

        if matches {
            allow = rule.action == RuleAction::Allow;
        }
    }
    allow
}

fn os_rule_matches(os_rule: &OsRule, context: &RuleContext) -> bool {
    if let Some(ref name) = os_rule.name {
        if name != context.os.as_str() {
            return false;
        }
    }

    if let Some(ref arch) = os_rule.arch {
        let normalized_arch = match arch.as_str() {
            "x64" | "amd64" => "x86_64",
            "arm64" => "aarch64",
            other => other,
        };
        if normalized_arch != context.arch {
            return false;
        }
    }

    if let Some(ref version_expr) = os_rule.version {
        // A pattern that does not compile never matches
        match Regex::new(version_expr) {
            Ok(re) if re.is_match(&context.os_version) => {}
            _ => return false,
        }
    }

    true
}

fn artifact_path(library: &Library) -> Result<String, DescriptorError> {
    if let Some(path) = library
        .downloads
        .as_ref()
        .and_then(|d| d.artifact.as_ref())
        .and_then(|a| a.path.clone())
    {
        return Ok(path);
    }

    maven_to_path(&library.name)
        .ok_or_else(|| DescriptorError::InvalidCoordinates(library.name.clone()))
}

fn native_path(library: &Library, classifier: &str) -> Result<String, DescriptorError> {
    if let Some(path) = library
        .downloads
        .as_ref()
        .and_then(|d| d.classifiers.as_ref())
        .and_then(|c| c.get(classifier))
        .and_then(|a| a.path.clone())
    {
        return Ok(path);
    }

    let coords = format!("{}:{}", library.name, classifier);
    maven_to_path(&coords).ok_or(DescriptorError::InvalidCoordinates(coords))
}

/// Parse a version.json file
pub fn parse_version_json(path: &Path) -> Result<VersionManifest, LaunchError> {
    let content = std::fs::read_to_string(path).map_err(|e| LaunchError::InvalidDescriptor {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| LaunchError::InvalidDescriptor {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Resolve the complete version chain by following inheritsFrom
pub fn resolve_version_chain(
    version_id: &str,
    manifests: &BTreeMap<String, VersionManifest>,
) -> Result<VersionManifest, DescriptorError> {
    let mut chain = Vec::new();
    let mut seen = BTreeSet::new();
    let mut current = version_id.to_string();

    loop {
        if !seen.insert(current.clone()) {
            return Err(DescriptorError::InheritanceCycle(current));
        }
        let manifest = manifests
            .get(&current)
            .ok_or_else(|| DescriptorError::MissingParent(current.clone()))?;
        chain.push(manifest.clone());

        match &manifest.inherits_from {
            Some(parent) => current = parent.clone(),
            None => break,
        }
    }

    // chain runs child -> root; fold from the root down
    let mut resolved = chain.pop().ok_or(DescriptorError::MissingField("id"))?;
    while let Some(child) = chain.pop() {
        resolved = merge_manifests(resolved, child);
    }
    Ok(resolved)
}

/// Merge a child manifest with its parent
pub(crate) fn merge_manifests(parent: VersionManifest, child: VersionManifest) -> VersionManifest {
    // Child libraries win first-match classloading, so they go first
    let mut libraries = child.libraries;
    libraries.extend(parent.libraries);

    VersionManifest {
        jar: child.jar.or(parent.jar).or(Some(parent.id)),
        id: child.id,
        main_class: child.main_class.or(parent.main_class),
        inherits_from: None,
        minecraft_arguments: child.minecraft_arguments.or(parent.minecraft_arguments),
        libraries,
        asset_index: child.asset_index.or(parent.asset_index),
        assets: child.assets.or(parent.assets),
        version_type: child.version_type.or(parent.version_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VANILLA: &str = r#"{
        "id": "1.11.2",
        "mainClass": "net.minecraft.client.main.Main",
        "minecraftArguments": "--username ${auth_player_name} --version ${version_name}",
        "assetIndex": { "id": "1.11", "sha1": "abc", "size": 1, "totalSize": 2, "url": "https://example.com" },
        "assets": "1.11",
        "type": "release",
        "libraries": [
            { "name": "com.mojang:netty:1.6" },
            {
                "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
                "natives": { "linux": "natives-linux", "osx": "natives-osx", "windows": "natives-windows" },
                "extract": { "exclude": ["META-INF/"] }
            },
            {
                "name": "ca.weblite:java-objc-bridge:1.0.0",
                "rules": [{ "action": "allow", "os": { "name": "osx" } }]
            },
            {
                "name": "tv.twitch:twitch-platform:6.5",
                "rules": [{ "action": "allow" }, { "action": "disallow", "os": { "name": "linux" } }],
                "natives": { "windows": "natives-windows-${arch}" }
            }
        ]
    }"#;

    fn vanilla() -> VersionManifest {
        serde_json::from_str(VANILLA).unwrap()
    }

    #[test]
    fn parses_manifest_fields() {
        let manifest = vanilla();
        assert_eq!(manifest.id, "1.11.2");
        assert_eq!(manifest.libraries.len(), 4);
        assert_eq!(manifest.version_type.as_deref(), Some("release"));
        assert!(manifest.jar.is_none());
    }

    #[test]
    fn manifest_without_id_is_rejected() {
        let result: Result<VersionManifest, _> = serde_json::from_str(r#"{ "mainClass": "a.B" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn descriptor_for_linux_keeps_declared_order() {
        let descriptor = VersionDescriptor::from_manifest(vanilla(), OsType::Linux).unwrap();

        let paths: Vec<&str> = descriptor.libraries().iter().map(|l| l.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "com/mojang/netty/1.6/netty-1.6.jar",
                "org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-linux.jar",
            ]
        );
        assert_eq!(descriptor.jar(), "1.11.2");
        assert_eq!(descriptor.assets(), "1.11");
    }

    #[test]
    fn native_archives_are_members_of_libraries() {
        let descriptor = VersionDescriptor::from_manifest(vanilla(), OsType::Windows).unwrap();

        assert_eq!(descriptor.extract().len(), 2);
        for native in descriptor.extract() {
            assert!(descriptor.libraries().iter().any(|l| l.path == native.path));
        }
        assert_eq!(descriptor.extract()[0].exclude, vec!["META-INF/".to_string()]);

        let twitch = &descriptor.extract()[1];
        let bits = OsType::arch_bits();
        assert!(twitch.path.ends_with(&format!("twitch-platform-6.5-natives-windows-{}.jar", bits)));
    }

    #[test]
    fn rules_select_osx_only_library() {
        let descriptor = VersionDescriptor::from_manifest(vanilla(), OsType::MacOS).unwrap();
        assert!(descriptor
            .libraries()
            .iter()
            .any(|l| l.name == "ca.weblite:java-objc-bridge:1.0.0"));
    }

    #[test]
    fn classifier_download_path_is_preferred() {
        let manifest: VersionManifest = serde_json::from_str(
            r#"{
                "id": "x",
                "mainClass": "Main",
                "minecraftArguments": "",
                "libraries": [{
                    "name": "org.lwjgl:lwjgl:3.1.6",
                    "natives": { "linux": "natives-linux" },
                    "downloads": { "classifiers": { "natives-linux": { "path": "custom/lwjgl-natives.jar" } } }
                }]
            }"#,
        )
        .unwrap();

        let descriptor = VersionDescriptor::from_manifest(manifest, OsType::Linux).unwrap();
        assert_eq!(descriptor.extract()[0].path, "custom/lwjgl-natives.jar");
        assert_eq!(descriptor.assets(), "legacy");
    }

    #[test]
    fn missing_main_class_fails_parse() {
        let manifest = VersionManifest {
            id: "broken".to_string(),
            minecraft_arguments: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            VersionDescriptor::from_manifest(manifest, OsType::Linux),
            Err(DescriptorError::MissingField("mainClass"))
        );
    }

    #[test]
    fn test_merge_manifests_basic() {
        let parent = vanilla();
        let child = VersionManifest {
            id: "1.11.2-forge".to_string(),
            main_class: Some("net.minecraft.launchwrapper.Launch".to_string()),
            inherits_from: Some("1.11.2".to_string()),
            libraries: vec![Library {
                name: "net.minecraft:launchwrapper:1.12".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let merged = merge_manifests(parent, child);

        assert_eq!(merged.id, "1.11.2-forge");
        assert_eq!(merged.jar.as_deref(), Some("1.11.2"));
        assert_eq!(merged.main_class.as_deref(), Some("net.minecraft.launchwrapper.Launch"));
        assert!(merged.minecraft_arguments.unwrap().contains("${auth_player_name}"));
        assert_eq!(merged.libraries[0].name, "net.minecraft:launchwrapper:1.12");
        assert_eq!(merged.libraries.len(), 5);
        assert!(merged.inherits_from.is_none());
    }

    #[test]
    fn resolve_chain_detects_cycles_and_missing_parents() {
        let mut manifests = BTreeMap::new();
        manifests.insert(
            "a".to_string(),
            VersionManifest {
                id: "a".to_string(),
                inherits_from: Some("b".to_string()),
                ..Default::default()
            },
        );
        manifests.insert(
            "b".to_string(),
            VersionManifest {
                id: "b".to_string(),
                inherits_from: Some("a".to_string()),
                ..Default::default()
            },
        );
        manifests.insert(
            "orphan".to_string(),
            VersionManifest {
                id: "orphan".to_string(),
                inherits_from: Some("gone".to_string()),
                ..Default::default()
            },
        );

        assert!(matches!(
            resolve_version_chain("a", &manifests),
            Err(DescriptorError::InheritanceCycle(_))
        ));
        assert_eq!(
            resolve_version_chain("orphan", &manifests).unwrap_err(),
            DescriptorError::MissingParent("gone".to_string())
        );
    }

    const LEGACY_LWJGL: &str = r#"{
        "id": "1.7.10",
        "mainClass": "net.minecraft.client.main.Main",
        "minecraftArguments": "--username ${auth_player_name}",
        "libraries": [
            {
                "name": "org.lwjgl.lwjgl:lwjgl:2.9.0",
                "rules": [
                    { "action": "allow" },
                    { "action": "disallow", "os": { "name": "osx", "version": "^10\\.5\\.\\d$" } }
                ]
            },
            {
                "name": "org.lwjgl.lwjgl:lwjgl:2.9.1-nightly-20130708-debug3",
                "rules": [
                    { "action": "allow", "os": { "name": "osx", "version": "^10\\.5\\.\\d$" } }
                ]
            }
        ]
    }"#;

    fn library_names(descriptor: &VersionDescriptor) -> Vec<&str> {
        descriptor.libraries().iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn os_version_rule_does_not_apply_to_whole_os() {
        let manifest: VersionManifest = serde_json::from_str(LEGACY_LWJGL).unwrap();
        let descriptor = VersionDescriptor::from_manifest(manifest, OsType::MacOS).unwrap();

        assert_eq!(library_names(&descriptor), vec!["org.lwjgl.lwjgl:lwjgl:2.9.0"]);
    }

    #[test]
    fn os_version_rule_matches_host_version() {
        let manifest: VersionManifest = serde_json::from_str(LEGACY_LWJGL).unwrap();
        let leopard = RuleContext {
            os: OsType::MacOS,
            arch: "x86_64",
            os_version: "10.5.8".to_string(),
        };

        let allowed: Vec<&str> = manifest
            .libraries
            .iter()
            .filter(|l| rules_allow(l.rules.as_deref(), &leopard))
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(allowed, vec!["org.lwjgl.lwjgl:lwjgl:2.9.1-nightly-20130708-debug3"]);
    }

    #[test]
    fn arch_rule_is_normalised_and_compared() {
        let rules: Vec<Rule> = serde_json::from_str(
            r#"[{ "action": "allow", "os": { "name": "windows", "arch": "x86" } }]"#,
        )
        .unwrap();
        let context = |arch| RuleContext {
            os: OsType::Windows,
            arch,
            os_version: String::new(),
        };

        assert!(rules_allow(Some(rules.as_slice()), &context("x86")));
        assert!(!rules_allow(Some(rules.as_slice()), &context("x86_64")));

        let amd64: Vec<Rule> = serde_json::from_str(
            r#"[{ "action": "allow", "os": { "arch": "amd64" } }]"#,
        )
        .unwrap();
        assert!(rules_allow(Some(amd64.as_slice()), &context("x86_64")));
    }

    #[test]
    fn invalid_version_pattern_never_matches() {
        let rules: Vec<Rule> = serde_json::from_str(
            r#"[{ "action": "allow", "os": { "name": "linux", "version": "([" } }]"#,
        )
        .unwrap();
        let context = RuleContext {
            os: OsType::Linux,
            arch: "x86_64",
            os_version: "6.1".to_string(),
        };
        assert!(!rules_allow(Some(rules.as_slice()), &context));
    }
}
