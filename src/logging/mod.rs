//! Logger bootstrap
//!
//! Installs the process-wide `env_logger` backend from the logger config
//! section. Environment variables still take precedence, so operators can
//! raise verbosity without touching the config file.

use env_logger::Builder;
use log::LevelFilter;

use crate::config::LoggerConfig;
use crate::core::AppResult;

/// Initialize logging from configuration.
///
/// When the section is inactive nothing is installed and log macros are
/// no-ops. Fails with a configuration error if the level string is invalid
/// or a logger was already installed.
pub fn init_logging(config: &LoggerConfig) -> AppResult<()> {
    if !config.active {
        return Ok(());
    }

    let level: LevelFilter = config
        .level
        .parse()
        .map_err(|_| crate::config_error!("Invalid log level '{}'", config.level))?;

    Builder::from_env(env_logger::Env::default())
        .filter(None, level)
        .try_init()
        .map_err(|e| crate::config_error!("Logger already initialized: {e}"))?;

    Ok(())
}
