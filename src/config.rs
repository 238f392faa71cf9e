//! Configuration loading and management

use std::path::PathBuf;

use anyhow::Result;

use crate::events::ParticipantIdentity;

/// Identity gated on when `GATE_TARGET_IDENTITY` is unset
const DEFAULT_TARGET_IDENTITY: &str = "ysf";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// The one participant identity eligible for gating this session
    pub target_identity: ParticipantIdentity,

    /// Path to the Unix domain socket the room bridge connects to
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment and defaults.
    ///
    /// A `.env` file in the working directory is read first if present;
    /// real environment variables win over it.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let target_identity = std::env::var("GATE_TARGET_IDENTITY")
            .unwrap_or_else(|_| DEFAULT_TARGET_IDENTITY.to_string());

        let home = std::env::var("HOME")?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("audio-gate");

        let socket_path = match std::env::var("GATE_SOCKET_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => data_dir.join("feed.sock"),
        };

        Ok(Self {
            target_identity: ParticipantIdentity::new(target_identity),
            socket_path,
            data_dir,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load() {
        let config = Config::load().unwrap();
        assert!(!config.target_identity.as_str().is_empty());
        assert!(config.socket_path.to_string_lossy().contains("sock"));
    }
}
