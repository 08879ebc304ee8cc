//! Configuration file parsing.
//!
//! Parses individual `.tinct.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::{ConfigError, UpdatePolicy};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Search specification section.
    pub highlight: Option<RawHighlight>,
    /// Behavior settings section.
    pub settings: Option<RawSettings>,
}

/// Raw `[highlight]` section.
///
/// `terms` and `colors` accept either a single string or an array.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawHighlight {
    /// Literal terms to highlight.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub terms: Option<Vec<String>>,
    /// Background colors.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub colors: Option<Vec<String>>,
    /// Whether matching honors case.
    pub case_sensitive: Option<bool>,
}

/// Raw `[settings]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    /// Keep watching highlighted roots for inserted content.
    pub observe: Option<bool>,
    /// Wrapper handling when options change.
    pub update_policy: Option<UpdatePolicy>,
    /// Attribute set on highlighted roots.
    pub marker_attribute: Option<String>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
