//! Replay file loading.
//!
//! A replay file is TOML with an optional starting FEN, a list of moves in
//! UCI notation and whether to stop once the game is decided.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing a replay file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the replay file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the replay file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// What to replay and how.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Starting position in FEN. Defaults to the standard start.
    #[serde(default)]
    pub start: Option<String>,
    /// Moves to play, in UCI notation ("e2e4", "e7e8q").
    #[serde(default)]
    pub moves: Vec<String>,
    /// End the game on checkmate or stalemate and skip any remaining moves.
    /// Defaults to true.
    #[serde(default = "default_stop_on_end")]
    pub stop_on_end: bool,
}

fn default_stop_on_end() -> bool {
    true
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            start: None,
            moves: Vec::new(),
            stop_on_end: default_stop_on_end(),
        }
    }
}

impl ReplayConfig {
    /// Loads a replay file from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Default replay file: `replay.toml` in the current working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("replay.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
start = "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1"
moves = ["e1c1", "e8d7"]
stop_on_end = false
"#;

        let config: ReplayConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(
            config.start.as_deref(),
            Some("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1")
        );
        assert_eq!(config.moves, vec!["e1c1", "e8d7"]);
        assert!(!config.stop_on_end);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: ReplayConfig = toml::from_str("").unwrap();
        assert_eq!(config, ReplayConfig::default());
        assert!(config.stop_on_end);
        assert!(config.start.is_none());
        assert!(config.moves.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result: Result<ReplayConfig, _> = toml::from_str("moves = e2e4");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let path = std::env::temp_dir().join("chess-replay-does-not-exist.toml");
        let config = ReplayConfig::load(&path).unwrap();
        assert_eq!(config, ReplayConfig::default());
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("chess-replay-{}.toml", std::process::id()));
        std::fs::write(&path, "moves = [\"e2e4\"]\n").unwrap();

        let config = ReplayConfig::load(&path).unwrap();
        assert_eq!(config.moves, vec!["e2e4"]);
        assert!(config.stop_on_end);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("chess-replay-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "stop_on_end = \"maybe\"\n").unwrap();

        let result = ReplayConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));

        std::fs::remove_file(&path).unwrap();
    }
}
