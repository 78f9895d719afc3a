use std::io;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{Error, Result};

/// Returns the config directory: `~/.config/halo/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("halo"))
}

/// Returns the config file path: `~/.config/halo/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Reads, parses and validates the config file at `path`.
pub fn try_load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    let mut config: Config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate();
    Ok(config)
}

/// Loads the configuration.
///
/// An explicit path must exist and parse. The default path is optional:
/// a missing file silently yields defaults, and an unreadable or invalid
/// one prints a warning and yields defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return try_load(path);
    }
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };
    match try_load(&path) {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
        Err(e) => {
            eprintln!("Warning: {e}");
            Ok(Config::default())
        }
    }
}
