use std::io;
use std::path::PathBuf;
use std::process::exit;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod setup;
mod utils;

use commands::config::{handle_config, ConfigAction, ConfigChanges};
use commands::launch::handle_launch;
use commands::list::{handle_list, VersionSource};
use utils::config::ConfigStore;

/// A minecraft launcher so minimal it has no graphical interface.
#[derive(Parser)]
#[command(name = "millilauncher", version, about)]
struct Cli {
    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch Minecraft of the given version
    Launch {
        version: String,

        /// Print the command line instead of running it
        #[arg(short, long)]
        raw: bool,

        /// Log in with an online account (not supported)
        #[arg(short, long, value_name = "USER")]
        auth: Option<String>,

        /// Play offline under this name instead of the configured one
        #[arg(short, long, value_name = "USER")]
        offline: Option<String>,
    },

    /// Configure launcher and game preferences. Options are applied after the action.
    Config {
        #[arg(value_enum)]
        action: Option<ConfigAction>,

        /// Exit the launcher as soon as the game is started
        #[arg(short = 'e', long, value_name = "BOOL")]
        exit_on_launch: Option<bool>,

        /// Path to the '.minecraft' folder
        #[arg(short = 'M', long, value_name = "DIR")]
        mc_dir: Option<String>,

        /// Path to the java executable
        #[arg(short = 'J', long, value_name = "PATH")]
        java_dir: Option<String>,

        /// Maximum memory allocated to Minecraft in MB
        #[arg(short = 'm', long, value_name = "MB")]
        max_mem: Option<u32>,

        /// Launch Minecraft in fullscreen
        #[arg(short = 'f', long, value_name = "BOOL")]
        fullscreen: Option<bool>,

        /// Username for offline play
        #[arg(short = 'U', long, value_name = "NAME")]
        username: Option<String>,
    },

    /// List Minecraft versions, optionally within a range
    List {
        #[arg(value_enum, default_value_t = VersionSource::Local)]
        source: VersionSource,

        /// The oldest version of the range
        #[arg(short = 'm', long)]
        min: Option<String>,

        /// The latest version of the range
        #[arg(short = 'M', long)]
        max: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let store = ConfigStore::open(cli.config)?;
    let mut config = store.load()?;
    utils::logging::init(cli.verbose || config.debug_logging);
    log::debug!("Using config {:?}", store.path());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let wizard_requested = matches!(
        cli.command,
        Commands::Config {
            action: Some(ConfigAction::Wizard),
            ..
        }
    );
    if config.first_run && !wizard_requested {
        println!("This seems to be the first run.");
        setup::run_wizard(&mut config, &mut input, &mut output)?;
        store.save(&config)?;
    }

    match cli.command {
        Commands::Launch {
            version,
            raw,
            auth,
            offline,
        } => handle_launch(&config, &version, raw, auth, offline),
        Commands::Config {
            action,
            exit_on_launch,
            mc_dir,
            java_dir,
            max_mem,
            fullscreen,
            username,
        } => {
            let changes = ConfigChanges {
                exit_on_launch,
                minecraft_dir: mc_dir,
                java_path: java_dir,
                max_memory_mb: max_mem,
                fullscreen,
                username,
            };
            handle_config(&store, &mut config, action, changes, &mut input, &mut output)?;
            Ok(0)
        }
        Commands::List { source, min, max } => {
            handle_list(&config, source, min, max)?;
            Ok(0)
        }
    }
}
