//! Configuration system for tinct.
//!
//! tinct uses TOML configuration files named `.tinct.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.tinct.toml` files
//! found, then loading `~/.tinct.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    fmt,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{RawConfig, RawHighlight, RawSettings, parse_config_file, parse_config_str};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Background color used when no colors are configured.
pub const DEFAULT_COLOR: &str = "yellow";

/// Attribute that tags elements passed to `highlight`.
pub const DEFAULT_MARKER_ATTRIBUTE: &str = "data-highlighted";

/// Top-level merged configuration for tinct.
///
/// This represents the fully resolved configuration after merging all discovered `.tinct.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Search terms and colors.
    pub highlight: HighlightSettings,
    /// Behavior settings for the highlighter.
    pub settings: Settings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.tinct.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective configuration to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableConfig {
            highlight: &self.highlight,
            settings: &self.settings,
        };
        toml::to_string_pretty(&serializable).map_err(ConfigError::SerializeToml)
    }
}

/// The search specification as configured.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Literal terms to highlight, in priority order.
    pub terms: Vec<String>,
    /// Background colors, cycled by term index.
    pub colors: Vec<String>,
    /// Whether matching honors case.
    pub case_sensitive: bool,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            colors: vec![DEFAULT_COLOR.to_string()],
            case_sensitive: false,
        }
    }
}

/// Behavior settings for the highlighter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Keep watching highlighted roots for inserted content.
    pub observe: bool,
    /// What happens to existing wrappers when options change.
    pub update_policy: UpdatePolicy,
    /// Attribute set on highlighted roots.
    pub marker_attribute: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            observe: true,
            update_policy: UpdatePolicy::default(),
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
        }
    }
}

/// Controls how re-highlighting treats wrappers from an earlier pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    /// Unwrap earlier highlights and merge text before matching again.
    #[default]
    Normalize,
    /// Match against whatever text nodes exist, wrappers included.
    Accumulate,
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalize => write!(f, "normalize"),
            Self::Accumulate => write!(f, "accumulate"),
        }
    }
}

/// Internal struct for TOML serialization of the effective configuration.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// Search terms and colors.
    highlight: &'a HighlightSettings,
    /// Behavior settings.
    settings: &'a Settings,
}
