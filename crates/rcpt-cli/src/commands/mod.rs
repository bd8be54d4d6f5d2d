//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod merchants;
pub mod process;

use std::path::Path;

use rcpt_core::models::config::RcptConfig;
use tracing::debug;

/// Load the configuration named on the command line, else the default file,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RcptConfig> {
    if let Some(path) = config_path {
        return Ok(RcptConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(RcptConfig::from_file(&default_path)?)
    } else {
        Ok(RcptConfig::default())
    }
}
