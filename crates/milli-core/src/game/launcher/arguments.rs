/// Argument builder for Minecraft launcher
use crate::game::launcher::classpath::build_classpath;
use crate::game::launcher::error::LaunchError;
use crate::game::launcher::types::{GameDirectories, LaunchOptions, OsType};
use crate::game::launcher::version_parser::VersionDescriptor;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Compatibility flags passed to every JVM ahead of the heap setting
const COMPAT_JVM_ARGS: [&str; 2] = [
    "-Dfml.ignoreInvalidMinecraftCertificates=true",
    "-Dfml.ignorePatchDiscrepancies=true",
];

/// Offline sessions have no account; the game accepts `0` for both fields
const OFFLINE_UUID: &str = "0";
const OFFLINE_ACCESS_TOKEN: &str = "0";
const LEGACY_TYPE: &str = "Legacy";

/// A fully rendered external-process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub jvm_args: Vec<String>,
    pub classpath: String,
    pub main_class: String,
    pub game_args: Vec<String>,
}

impl LaunchCommand {
    /// Arguments after the program, in the order the JVM expects them
    pub fn args(&self) -> Vec<String> {
        let mut args = self.jvm_args.clone();
        args.push("-cp".to_string());
        args.push(self.classpath.clone());
        args.push(self.main_class.clone());
        args.extend(self.game_args.iter().cloned());
        args
    }

    /// Single-line form for `--raw` output and logs
    pub fn render(&self) -> String {
        let mut parts = vec![quote_arg(&self.program.to_string_lossy())];
        parts.extend(self.args().iter().map(|arg| quote_arg(arg)));
        parts.join(" ")
    }

    /// A `Command` ready to spawn, working directory not set
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args());
        command
    }
}

/// Build the complete launch command for `descriptor`
pub fn build_launch_command(
    java_path: &Path,
    descriptor: &VersionDescriptor,
    directories: &GameDirectories,
    options: &LaunchOptions,
) -> Result<LaunchCommand, LaunchError> {
    let classpath = build_classpath(descriptor, directories, OsType::current());

    let variables = build_game_variables(descriptor, directories, options);
    let mut game_args = substitute_template(descriptor.minecraft_arguments(), &variables)?;
    if options.fullscreen {
        game_args.push("--fullscreen".to_string());
    }

    Ok(LaunchCommand {
        program: java_path.to_path_buf(),
        jvm_args: build_jvm_arguments(directories, options),
        classpath,
        main_class: descriptor.main_class().to_string(),
        game_args,
    })
}

/// Build JVM arguments: compatibility flags, heap limit, native library path
fn build_jvm_arguments(directories: &GameDirectories, options: &LaunchOptions) -> Vec<String> {
    let mut args: Vec<String> = COMPAT_JVM_ARGS.iter().map(|s| s.to_string()).collect();
    args.push(format!("-Xmx{}M", options.max_memory_mb));
    args.push(format!(
        "-Djava.library.path={}",
        directories.natives_dir.to_string_lossy()
    ));
    args
}

/// Build game variable map
fn build_game_variables(
    descriptor: &VersionDescriptor,
    directories: &GameDirectories,
    options: &LaunchOptions,
) -> BTreeMap<&'static str, String> {
    let mut vars = BTreeMap::new();

    let assets_root = directories.assets_dir.to_string_lossy().into_owned();

    vars.insert("auth_player_name", options.username.clone());
    vars.insert("version_name", descriptor.id().to_string());
    vars.insert(
        "game_directory",
        directories.minecraft_dir.to_string_lossy().into_owned(),
    );
    vars.insert("assets_root", assets_root.clone());
    // Legacy versions (pre-1.6) use ${game_assets}
    vars.insert("game_assets", assets_root);
    vars.insert("assets_index_name", descriptor.assets().to_string());
    vars.insert("auth_uuid", OFFLINE_UUID.to_string());
    vars.insert("auth_access_token", OFFLINE_ACCESS_TOKEN.to_string());
    vars.insert("auth_session", OFFLINE_ACCESS_TOKEN.to_string());
    vars.insert("user_type", LEGACY_TYPE.to_string());
    vars.insert("version_type", LEGACY_TYPE.to_string());
    vars.insert("user_properties", "{}".to_string());

    vars
}

/// Split `template` on whitespace and replace every `${name}` in each token.
///
/// Fails on the first placeholder with no entry in `variables`, including an
/// unterminated `${`.
pub fn substitute_template(
    template: &str,
    variables: &BTreeMap<&'static str, String>,
) -> Result<Vec<String>, LaunchError> {
    template
        .split_whitespace()
        .map(|token| substitute_token(token, variables))
        .collect()
}

fn substitute_token(
    token: &str,
    variables: &BTreeMap<&'static str, String>,
) -> Result<String, LaunchError> {
    let mut out = String::with_capacity(token.len());
    let mut rest = token;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            return Err(LaunchError::TemplateFieldMissing {
                field: after.to_string(),
            });
        };
        let key = &after[..end];
        let value = variables
            .get(key)
            .ok_or_else(|| LaunchError::TemplateFieldMissing {
                field: key.to_string(),
            })?;

        out.push_str(value);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Quote an argument for display if it contains whitespace or quotes
fn quote_arg(s: &str) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }
    if s.chars().any(|c| c.is_whitespace() || c == '"') {
        let esc = s.replace('\\', "\\\\").replace('"', "\\\"");
        return format!("\"{}\"", esc);
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::launcher::version_parser::VersionManifest;

    const TEMPLATE: &str = "--username ${auth_player_name} --version ${version_name} \
        --gameDir ${game_directory} --assetsDir ${assets_root} --assetIndex ${assets_index_name} \
        --uuid ${auth_uuid} --accessToken ${auth_access_token} --userType ${user_type} \
        --versionType ${version_type}";

    fn descriptor(template: &str) -> VersionDescriptor {
        let manifest: VersionManifest = serde_json::from_value(serde_json::json!({
            "id": "1.11.2",
            "mainClass": "net.minecraft.client.main.Main",
            "minecraftArguments": template,
            "assets": "1.11",
            "libraries": [
                { "name": "a:a:1", "downloads": { "artifact": { "path": "a/a.jar" } } },
                { "name": "b:b:1", "downloads": { "artifact": { "path": "b/b.jar" } } }
            ]
        }))
        .unwrap();
        VersionDescriptor::from_manifest(manifest, OsType::current()).unwrap()
    }

    fn options() -> LaunchOptions {
        LaunchOptions {
            username: "Steve".to_string(),
            max_memory_mb: 1024,
            ..Default::default()
        }
    }

    #[test]
    fn test_substitute_template() {
        let mut vars = BTreeMap::new();
        vars.insert("auth_player_name", "Player".to_string());
        vars.insert("version_name", "1.20.1".to_string());

        let result =
            substitute_template("--username ${auth_player_name} --version ${version_name}", &vars)
                .unwrap();
        assert_eq!(result, vec!["--username", "Player", "--version", "1.20.1"]);
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let vars = BTreeMap::new();
        let err = substitute_template("--username ${username}", &vars).unwrap_err();
        match err {
            LaunchError::TemplateFieldMissing { field } => assert_eq!(field, "username"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let mut vars = BTreeMap::new();
        vars.insert("auth_player_name", "Player".to_string());
        assert!(matches!(
            substitute_template("--username ${auth_player_name", &vars),
            Err(LaunchError::TemplateFieldMissing { .. })
        ));
    }

    #[test]
    fn values_with_spaces_stay_one_argument() {
        let mut vars = BTreeMap::new();
        vars.insert("game_directory", "/home/me/My Games/.minecraft".to_string());
        let args = substitute_template("--gameDir ${game_directory}", &vars).unwrap();
        assert_eq!(args, vec!["--gameDir", "/home/me/My Games/.minecraft"]);
    }

    #[test]
    fn placeholder_inside_token_is_substituted() {
        let mut vars = BTreeMap::new();
        vars.insert("version_name", "1.8.9".to_string());
        let args = substitute_template("--tweak=${version_name}-x", &vars).unwrap();
        assert_eq!(args, vec!["--tweak=1.8.9-x"]);
    }

    #[test]
    fn command_has_fixed_field_order() {
        let descriptor = descriptor(TEMPLATE);
        let dirs = GameDirectories::for_version(Path::new("/mc"), "1.11.2");

        let command =
            build_launch_command(Path::new("/usr/bin/java"), &descriptor, &dirs, &options())
                .unwrap();
        let args = command.args();

        assert_eq!(args[0], COMPAT_JVM_ARGS[0]);
        assert_eq!(args[1], COMPAT_JVM_ARGS[1]);
        assert_eq!(args[2], "-Xmx1024M");
        assert!(args[3].starts_with("-Djava.library.path="));
        assert!(args[3].ends_with("1.11.2-natives"));
        assert_eq!(args[4], "-cp");
        assert_eq!(args[5], command.classpath);
        assert_eq!(args[6], "net.minecraft.client.main.Main");
        assert_eq!(&args[7..9], &["--username".to_string(), "Steve".to_string()]);
    }

    #[test]
    fn offline_values_are_substituted() {
        let descriptor = descriptor(TEMPLATE);
        let dirs = GameDirectories::for_version(Path::new("/mc"), "1.11.2");

        let command =
            build_launch_command(Path::new("java"), &descriptor, &dirs, &options()).unwrap();
        let game = command.game_args.join(" ");

        assert!(game.contains("--uuid 0 --accessToken 0"));
        assert!(game.contains("--userType Legacy --versionType Legacy"));
        assert!(game.contains("--assetIndex 1.11"));
        assert!(game.contains("--version 1.11.2"));
        assert!(!game.contains("${"));
    }

    #[test]
    fn fullscreen_appends_flag() {
        let descriptor = descriptor("--username ${auth_player_name}");
        let dirs = GameDirectories::for_version(Path::new("/mc"), "1.11.2");
        let options = LaunchOptions {
            fullscreen: true,
            ..options()
        };

        let command = build_launch_command(Path::new("java"), &descriptor, &dirs, &options).unwrap();
        assert_eq!(command.game_args.last().map(String::as_str), Some("--fullscreen"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let descriptor = descriptor(TEMPLATE);
        let dirs = GameDirectories::for_version(Path::new("/mc"), "1.11.2");

        let first = build_launch_command(Path::new("java"), &descriptor, &dirs, &options())
            .unwrap()
            .render();
        let second = build_launch_command(Path::new("java"), &descriptor, &dirs, &options())
            .unwrap()
            .render();
        assert_eq!(first, second);
        assert!(first.starts_with("java -Dfml.ignoreInvalidMinecraftCertificates=true"));
    }

    #[test]
    fn quote_arg_quotes_paths_with_spaces() {
        let p = r"C:\Program Files\Java\bin\javaw.exe";
        let out = quote_arg(p);
        assert!(out.starts_with('"') && out.ends_with('"'));
        assert!(out.contains("Program Files"));

        let simple = "no_spaces_here";
        assert_eq!(quote_arg(simple), simple.to_string());
        assert_eq!(quote_arg(""), "\"\"");
    }
}
