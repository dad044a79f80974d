//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod process;
pub mod taxonomy;

use std::path::{Path, PathBuf};

use devis_core::DevisConfig;
use tracing::debug;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devis")
        .join("config.json")
}

/// Config file to use: the explicit path, else the default location.
pub fn config_file(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the explicit config file, the user config if one exists, or defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<DevisConfig> {
    if let Some(path) = explicit {
        return Ok(DevisConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(DevisConfig::from_file(&path)?)
    } else {
        Ok(DevisConfig::default())
    }
}
