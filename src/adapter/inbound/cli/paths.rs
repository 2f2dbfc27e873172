//! Path utilities for cosi-broker.
//!
//! Configuration lives under `~/.cosi/` unless `--config` says otherwise.

use std::path::PathBuf;

/// Returns the cosi home directory (`~/.cosi/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cosi")
}

/// Returns the default config file path (`~/.cosi/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
