use std::path::{Path, PathBuf};

use rstdoc_core::{ParserConfig, UnknownDirectivePolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "rstdoc.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How the CLI treats directives without a handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectivePolicy {
    #[default]
    Error,
    Warn,
}

/// Contents of `rstdoc.toml`. Every key is optional.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tab_width: Option<usize>,
    pub initial_header_level: Option<usize>,
    pub unknown_directives: Option<DirectivePolicy>,
}

impl Config {
    /// Load a config file that may be absent.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }
        Self::load(config_path).map(Some)
    }

    /// Load a config file that must exist.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        log::debug!("loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Parser settings with unset keys left at their defaults.
    pub fn parser_config(&self) -> ParserConfig {
        let mut config = ParserConfig::default();
        if let Some(width) = self.tab_width {
            config = config.with_tab_width(width);
        }
        if let Some(level) = self.initial_header_level {
            config = config.with_initial_header_level(level);
        }
        if let Some(policy) = self.unknown_directives {
            config = config.with_unknown_directives(match policy {
                DirectivePolicy::Error => UnknownDirectivePolicy::Error,
                DirectivePolicy::Warn => UnknownDirectivePolicy::Warn,
            });
        }
        config
    }
}
