//! Logging setup
//!
//! Installs `env_logger` behind the `log` facade used by the launcher core.

use env_logger::{Builder, Env};

/// Default filter for the given verbosity
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Initialise the global logger. `RUST_LOG` takes precedence over `debug`.
pub fn init(debug: bool) {
    let env = Env::default().default_filter_or(default_filter(debug));
    let result = Builder::from_env(env)
        .format_timestamp(None)
        .format_target(debug)
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialised");
    }
}
