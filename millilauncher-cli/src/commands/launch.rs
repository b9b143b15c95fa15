use crate::utils::config::AppConfig;
use anyhow::{bail, Context, Result};
use milli_core::{LaunchOutcome, LauncherCore};

/// Launch `version`, or print its command line when `raw` is set.
///
/// Returns the exit code the launcher should finish with: the game's own
/// code when it was waited on, zero otherwise.
pub fn handle_launch(
    config: &AppConfig,
    version: &str,
    raw: bool,
    auth: Option<String>,
    offline: Option<String>,
) -> Result<i32> {
    let username = resolve_username(config, auth, offline)?;

    let core = LauncherCore::new(config.launcher_config())
        .context("Launcher environment is not usable; run 'millilauncher config wizard'")?;
    let options = config.launch_options(&username);

    if raw {
        let command = core.prepare(version, &options)?;
        println!("{}", command.render());
        return Ok(0);
    }

    match core.launch(version, &options)? {
        LaunchOutcome::Detached { pid } => {
            log::info!("Minecraft is running as pid {}, exiting launcher", pid);
            Ok(0)
        }
        LaunchOutcome::Exited(status) => Ok(status.code().unwrap_or(1)),
    }
}

/// Pick the player name for an offline session
fn resolve_username(
    config: &AppConfig,
    auth: Option<String>,
    offline: Option<String>,
) -> Result<String> {
    let username = match (auth, offline) {
        (Some(_), Some(_)) => bail!("'--auth' and '--offline' cannot be used together"),
        (Some(_), None) => bail!("Online authentication is not supported; use '--offline <name>'"),
        (None, Some(name)) => name,
        (None, None) => config.username.clone(),
    };

    let username = username.trim().to_string();
    if username.is_empty() {
        bail!("No username given; pass '--offline <name>' or set one with 'config -U'");
    }
    Ok(username)
}
