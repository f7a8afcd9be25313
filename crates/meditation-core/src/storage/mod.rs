mod config;

pub use config::{AudioConfig, ClockConfig, Config, DisplayConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the config directory, creating it if needed.
///
/// `MEDITATION_CONFIG_DIR` wins when set. Otherwise `~/.config/meditation/`,
/// or `~/.config/meditation-dev/` with `MEDITATION_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("MEDITATION_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MEDITATION_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("meditation-dev")
            } else {
                base_dir.join("meditation")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
