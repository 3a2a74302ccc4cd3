//! Rules configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a rules configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// The file is not valid TOML for [`RulesConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Switches for rule decisions the engine leaves to the host.
///
/// ```toml
/// stalemate_is_draw = true
/// verify_invariants = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Report a stalemate as a drawn game. When false the position is still
    /// detected as stalemate but [`Board::outcome`](crate::Board::outcome)
    /// leaves the game undecided.
    pub stalemate_is_draw: bool,
    /// Re-check the board's structural invariants after every live move and
    /// undo.
    pub verify_invariants: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            stalemate_is_draw: true,
            verify_invariants: false,
        }
    }
}

impl RulesConfig {
    /// Parses a configuration from TOML text. Missing keys take their
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the configuration from `path`, falling back to the defaults
    /// when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no rules config, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
