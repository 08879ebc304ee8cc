//! What to highlight: terms, colors and case handling.

use serde::{Deserialize, Serialize};
use tinct_config::{DEFAULT_COLOR, HighlightSettings};

/// The full set of options a highlighter matches with.
///
/// Term order matters twice: it assigns colors (`colors[i % colors.len()]`) and breaks ties
/// between matches that start at the same position (earlier term wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    /// Literal terms to find.
    pub terms: Vec<String>,
    /// Background colors, cycled over the terms.
    pub colors: Vec<String>,
    /// Whether matching honors case.
    pub case_sensitive: bool,
}

impl Default for SearchSpec {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            colors: vec![DEFAULT_COLOR.to_string()],
            case_sensitive: false,
        }
    }
}

impl SearchSpec {
    /// Creates a case-insensitive spec.
    pub fn new<T, C>(terms: T, colors: C) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            colors: colors.into_iter().map(Into::into).collect(),
            case_sensitive: false,
        }
    }

    /// Sets case sensitivity.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Returns the color assigned to the term at `index`.
    ///
    /// Falls back to [`DEFAULT_COLOR`] when no colors are configured.
    pub fn color_for(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            return DEFAULT_COLOR;
        }
        &self.colors[index % self.colors.len()]
    }

    /// Shallow-merges a patch: fields the patch leaves unset keep their values.
    pub fn apply_patch(&mut self, patch: SearchSpecPatch) {
        if let Some(terms) = patch.terms {
            self.terms = terms;
        }
        if let Some(colors) = patch.colors {
            self.colors = colors;
        }
        if let Some(case_sensitive) = patch.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
    }
}

impl From<&HighlightSettings> for SearchSpec {
    fn from(settings: &HighlightSettings) -> Self {
        Self {
            terms: settings.terms.clone(),
            colors: settings.colors.clone(),
            case_sensitive: settings.case_sensitive,
        }
    }
}

/// A partial [`SearchSpec`] used to update a running highlighter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpecPatch {
    /// Replacement terms.
    pub terms: Option<Vec<String>>,
    /// Replacement colors.
    pub colors: Option<Vec<String>>,
    /// Replacement case sensitivity.
    pub case_sensitive: Option<bool>,
}

impl SearchSpecPatch {
    /// Replaces the terms.
    #[must_use]
    pub fn terms<T>(mut self, terms: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        self.terms = Some(terms.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the colors.
    #[must_use]
    pub fn colors<C>(mut self, colors: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces case sensitivity.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.terms.is_none() && self.colors.is_none() && self.case_sensitive.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycling() {
        let spec = SearchSpec::new(["a", "b", "c"], ["red", "blue"]);
        assert_eq!(spec.color_for(0), "red");
        assert_eq!(spec.color_for(1), "blue");
        assert_eq!(spec.color_for(2), "red");
    }

    #[test]
    fn test_empty_colors_fall_back() {
        let spec = SearchSpec::new(["a"], Vec::<String>::new());
        assert_eq!(spec.color_for(3), DEFAULT_COLOR);
    }

    #[test]
    fn test_patch_is_shallow() {
        let mut spec = SearchSpec::new(["a"], ["red"]).case_sensitive(true);
        spec.apply_patch(SearchSpecPatch::default().colors(["green", "blue"]));
        assert_eq!(spec.terms, vec!["a"]);
        assert_eq!(spec.colors, vec!["green", "blue"]);
        assert!(spec.case_sensitive);

        spec.apply_patch(SearchSpecPatch::default().case_sensitive(false));
        assert!(!spec.case_sensitive);
        assert!(SearchSpecPatch::default().is_empty());
    }

    #[test]
    fn test_from_settings() {
        let settings = HighlightSettings {
            terms: vec!["x".into()],
            colors: vec!["#fc0".into()],
            case_sensitive: true,
        };
        let spec = SearchSpec::from(&settings);
        assert_eq!(spec.terms, settings.terms);
        assert_eq!(spec.color_for(5), "#fc0");
        assert!(spec.case_sensitive);
    }
}
