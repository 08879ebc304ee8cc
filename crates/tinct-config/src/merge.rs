//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules.

use std::path::PathBuf;

use crate::{
    Config, HighlightSettings, Settings,
    parse::{RawConfig, RawHighlight, RawSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - `terms` and `colors`: the highest-precedence file that defines the list replaces it whole
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    if configs.is_empty() {
        return Config::default();
    }

    let mut highlight = HighlightSettings::default();
    let mut settings = Settings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.highlight {
            apply_raw_highlight(&mut highlight, raw);
        }
        if let Some(ref raw) = parsed.config.settings {
            apply_raw_settings(&mut settings, raw);
        }
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    Config {
        highlight,
        settings,
        config_root,
    }
}

/// Applies a raw `[highlight]` section, overwriting any present values.
fn apply_raw_highlight(result: &mut HighlightSettings, raw: &RawHighlight) {
    if let Some(ref v) = raw.terms {
        result.terms = v.clone();
    }
    if let Some(ref v) = raw.colors {
        result.colors = v.clone();
    }
    if let Some(v) = raw.case_sensitive {
        result.case_sensitive = v;
    }
}

/// Applies a raw `[settings]` section, overwriting any present values.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(v) = raw.observe {
        result.observe = v;
    }
    if let Some(v) = raw.update_policy {
        result.update_policy = v;
    }
    if let Some(ref v) = raw.marker_attribute {
        result.marker_attribute = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{UpdatePolicy, parse::parse_config_str};

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(toml, Path::new(path)).unwrap(),
        }
    }

    #[test]
    fn test_merge_empty() {
        let config = merge_configs(&[]);
        assert!(config.config_root.is_none());
        assert_eq!(config.highlight, HighlightSettings::default());
    }

    #[test]
    fn test_merge_single() {
        let config = merge_configs(&[parsed(
            "/project/.tinct.toml",
            "[highlight]\nterms = [\"todo\"]\n",
        )]);
        assert_eq!(config.highlight.terms, vec!["todo"]);
        assert_eq!(config.highlight.colors, vec!["yellow"]);
        assert_eq!(config.config_root, Some(PathBuf::from("/project")));
    }

    #[test]
    fn test_merge_higher_precedence_wins() {
        let local = parsed(
            "/home/u/project/.tinct.toml",
            "[highlight]\ncase_sensitive = true\n[settings]\nobserve = false\n",
        );
        let global = parsed(
            "/home/u/.tinct.toml",
            "[highlight]\ncase_sensitive = false\nterms = [\"fixme\"]\n[settings]\nupdate_policy = \"accumulate\"\n",
        );

        let config = merge_configs(&[local, global]);

        assert!(config.highlight.case_sensitive);
        assert_eq!(config.highlight.terms, vec!["fixme"]);
        assert!(!config.settings.observe);
        assert_eq!(config.settings.update_policy, UpdatePolicy::Accumulate);
        assert_eq!(config.config_root, Some(PathBuf::from("/home/u/project")));
    }

    #[test]
    fn test_merge_lists_replace_wholesale() {
        let local = parsed("/a/b/.tinct.toml", "[highlight]\ncolors = [\"pink\"]\n");
        let parent = parsed(
            "/a/.tinct.toml",
            "[highlight]\nterms = [\"x\", \"y\"]\ncolors = [\"red\", \"blue\"]\n",
        );

        let config = merge_configs(&[local, parent]);

        assert_eq!(config.highlight.terms, vec!["x", "y"]);
        assert_eq!(config.highlight.colors, vec!["pink"]);
    }

    #[test]
    fn test_merge_missing_sections_keep_defaults() {
        let config = merge_configs(&[parsed("/a/.tinct.toml", "root = true\n")]);
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.highlight, HighlightSettings::default());
    }
}
