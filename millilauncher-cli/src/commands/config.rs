use crate::setup::{confirm, run_wizard};
use crate::utils::config::{strip_assignment, AppConfig, ConfigStore};
use anyhow::Result;
use clap::ValueEnum;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigAction {
    /// Restore every setting to its default
    Reset,
    /// Run the interactive setup wizard
    Wizard,
}

/// Individual settings given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    pub exit_on_launch: Option<bool>,
    pub minecraft_dir: Option<String>,
    pub java_path: Option<String>,
    pub max_memory_mb: Option<u32>,
    pub fullscreen: Option<bool>,
    pub username: Option<String>,
}

impl ConfigChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the given settings into `config`
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(value) = self.exit_on_launch {
            config.exit_on_launch = value;
        }
        if let Some(value) = self.minecraft_dir {
            config.minecraft_dir = PathBuf::from(strip_assignment(&value));
        }
        if let Some(value) = self.java_path {
            config.java_path = PathBuf::from(strip_assignment(&value));
        }
        if let Some(value) = self.max_memory_mb {
            config.max_memory_mb = value;
        }
        if let Some(value) = self.fullscreen {
            config.fullscreen = value;
        }
        if let Some(value) = self.username {
            config.username = strip_assignment(&value).to_string();
        }
    }
}

/// Run `action` first, then apply `changes` on top and save.
///
/// With neither an action nor changes the current settings are printed.
pub fn handle_config<R: BufRead, W: Write>(
    store: &ConfigStore,
    config: &mut AppConfig,
    action: Option<ConfigAction>,
    changes: ConfigChanges,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    if action.is_none() && changes.is_empty() {
        writeln!(output, "# {}", store.path().display())?;
        writeln!(output, "{}", serde_json::to_string_pretty(config)?)?;
        return Ok(());
    }

    match action {
        Some(ConfigAction::Reset) => {
            if confirm(input, output, "Are you sure you want to reset your settings?")? {
                *config = store.reset()?;
            } else {
                writeln!(output, "Reset cancelled.")?;
            }
        }
        Some(ConfigAction::Wizard) => run_wizard(config, input, output)?,
        None => {}
    }

    changes.apply(config);
    store.save(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run(
        store: &ConfigStore,
        config: &mut AppConfig,
        action: Option<ConfigAction>,
        changes: ConfigChanges,
        answers: &str,
    ) -> String {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        handle_config(store, config, action, changes, &mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn options_are_applied_and_saved() {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::at(tmp.path().join("config.json"));
        let mut config = AppConfig::default();

        let changes = ConfigChanges {
            username: Some("=-Dash-".to_string()),
            max_memory_mb: Some(3072),
            fullscreen: Some(true),
            minecraft_dir: Some("=/games/.minecraft".to_string()),
            ..Default::default()
        };
        run(&store, &mut config, None, changes, "");

        let saved = store.load().unwrap();
        assert_eq!(saved.username, "-Dash-");
        assert_eq!(saved.max_memory_mb, 3072);
        assert!(saved.fullscreen);
        assert_eq!(saved.minecraft_dir, PathBuf::from("/games/.minecraft"));
        assert_eq!(saved, config);
    }

    #[test]
    fn reset_needs_confirmation_and_options_apply_after() {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::at(tmp.path().join("config.json"));
        let mut config = AppConfig {
            username: "Alex".to_string(),
            max_memory_mb: 4096,
            ..Default::default()
        };
        store.save(&config).unwrap();

        let changes = ConfigChanges {
            max_memory_mb: Some(2048),
            ..Default::default()
        };
        run(&store, &mut config, Some(ConfigAction::Reset), changes, "y\n");

        let saved = store.load().unwrap();
        assert_eq!(saved.username, "Steve");
        assert_eq!(saved.max_memory_mb, 2048);
    }

    #[test]
    fn declined_reset_keeps_settings() {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::at(tmp.path().join("config.json"));
        let mut config = AppConfig {
            username: "Alex".to_string(),
            ..Default::default()
        };

        let transcript = run(
            &store,
            &mut config,
            Some(ConfigAction::Reset),
            ConfigChanges::default(),
            "n\n",
        );

        assert!(transcript.contains("Reset cancelled."));
        assert_eq!(store.load().unwrap().username, "Alex");
    }

    #[test]
    fn no_arguments_prints_current_settings() {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::at(tmp.path().join("config.json"));
        let mut config = AppConfig::default();

        let transcript = run(&store, &mut config, None, ConfigChanges::default(), "");

        assert!(transcript.contains("\"username\": \"Steve\""));
        assert!(!store.path().exists());
    }
}
