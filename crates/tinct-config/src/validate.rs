//! Configuration validation.
//!
//! Reports non-fatal problems with a loaded configuration.

use std::{collections::HashSet, fmt};

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No search terms are configured, so nothing will be highlighted.
    NoTermsDefined,
    /// A term is the empty string and never matches.
    EmptyTerm {
        /// Position of the term in the list.
        index: usize,
    },
    /// A term appears more than once; later copies never win a region.
    DuplicateTerm {
        /// The repeated term.
        term: String,
        /// Position of the repeated occurrence.
        index: usize,
    },
    /// The color list is empty; the default color is used instead.
    NoColorsDefined,
    /// The marker attribute name is blank.
    EmptyMarkerAttribute,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTermsDefined => write!(f, "no highlight terms are defined"),
            Self::EmptyTerm { index } => write!(f, "term #{index} is empty and never matches"),
            Self::DuplicateTerm { term, index } => {
                write!(f, "term '{term}' at #{index} duplicates an earlier term")
            }
            Self::NoColorsDefined => {
                write!(f, "no colors are defined, falling back to the default color")
            }
            Self::EmptyMarkerAttribute => write!(f, "marker attribute name is empty"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let highlight = &config.highlight;

    if highlight.terms.is_empty() {
        warnings.push(ConfigWarning::NoTermsDefined);
    }

    let mut seen = HashSet::new();
    for (index, term) in highlight.terms.iter().enumerate() {
        if term.is_empty() {
            warnings.push(ConfigWarning::EmptyTerm { index });
            continue;
        }
        // Case-insensitive matching makes "Foo" and "foo" the same pattern
        let key = if highlight.case_sensitive {
            term.clone()
        } else {
            term.to_lowercase()
        };
        if !seen.insert(key) {
            warnings.push(ConfigWarning::DuplicateTerm {
                term: term.clone(),
                index,
            });
        }
    }

    if highlight.colors.is_empty() {
        warnings.push(ConfigWarning::NoColorsDefined);
    }

    if config.settings.marker_attribute.trim().is_empty() {
        warnings.push(ConfigWarning::EmptyMarkerAttribute);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HighlightSettings;

    fn config_with(terms: &[&str], colors: &[&str], case_sensitive: bool) -> Config {
        Config {
            highlight: HighlightSettings {
                terms: terms.iter().map(|t| t.to_string()).collect(),
                colors: colors.iter().map(|c| c.to_string()).collect(),
                case_sensitive,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_default_config() {
        let warnings = Config::default().validate();
        assert_eq!(warnings, vec![ConfigWarning::NoTermsDefined]);
    }

    #[test]
    fn test_validate_clean_config() {
        let config = config_with(&["alpha", "beta"], &["red"], false);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_empty_term() {
        let config = config_with(&["alpha", ""], &["red"], false);
        assert_eq!(config.validate(), vec![ConfigWarning::EmptyTerm { index: 1 }]);
    }

    #[test]
    fn test_validate_duplicate_respects_case() {
        let insensitive = config_with(&["Foo", "foo"], &["red"], false);
        assert_eq!(
            insensitive.validate(),
            vec![ConfigWarning::DuplicateTerm {
                term: "foo".into(),
                index: 1
            }]
        );

        let sensitive = config_with(&["Foo", "foo"], &["red"], true);
        assert!(sensitive.validate().is_empty());
    }

    #[test]
    fn test_validate_no_colors() {
        let config = config_with(&["alpha"], &[], false);
        assert_eq!(config.validate(), vec![ConfigWarning::NoColorsDefined]);
    }

    #[test]
    fn test_validate_blank_marker() {
        let mut config = config_with(&["alpha"], &["red"], false);
        config.settings.marker_attribute = " ".into();
        assert_eq!(config.validate(), vec![ConfigWarning::EmptyMarkerAttribute]);
    }

    #[test]
    fn test_warning_display() {
        assert_eq!(
            ConfigWarning::EmptyTerm { index: 2 }.to_string(),
            "term #2 is empty and never matches"
        );
        assert_eq!(
            ConfigWarning::NoTermsDefined.to_string(),
            "no highlight terms are defined"
        );
    }
}
