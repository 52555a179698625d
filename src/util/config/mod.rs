//! Loop configuration
//!
//! Settings come from, in order of priority:
//!
//! ```text
//! 1. CLI arguments
//! 2. Config file (RON, passed with --config)
//! 3. Default values
//! ```
//!
//! # Example file
//!
//! ```ron
//! (
//!     echo_input: true,
//!     framing: chunk,
//!     chunk_size: 4096,
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::runtime::interpreter::DEFAULT_MAX_CALL_DEPTH;
use crate::util::logger::LogLevel;

/// How input bytes are split into units
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// One unit per newline-terminated line
    #[default]
    Line,
    /// One unit per read of up to `chunk_size` bytes
    Chunk,
}

/// Loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplConfig {
    /// Attach the input to error outcomes
    #[serde(default)]
    pub echo_input: bool,
    /// Input framing
    #[serde(default)]
    pub framing: Framing,
    /// Read size for chunk framing
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Nested calls allowed before evaluation fails
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,
    /// Log level for stderr
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_chunk_size() -> usize {
    1024
}

fn default_max_call_depth() -> usize {
    DEFAULT_MAX_CALL_DEPTH
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            echo_input: false,
            framing: Framing::default(),
            chunk_size: default_chunk_size(),
            max_call_depth: default_max_call_depth(),
            log_level: LogLevel::default(),
        }
    }
}

impl ReplConfig {
    /// Parse a RON document
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be positive".to_string()));
        }
        if self.max_call_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_call_depth must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from a RON file
pub fn load_config(path: &Path) -> Result<ReplConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ReplConfig::from_ron(&content)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}
