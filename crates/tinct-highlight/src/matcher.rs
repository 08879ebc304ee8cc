//! Literal multi-term matching.
//!
//! Splits one run of text into plain and highlighted fragments. Each term is matched
//! literally and independently; the candidates are then ordered by start position and swept
//! left to right, keeping the first candidate that does not overlap what was already
//! accepted. The winner at a given position is therefore the earliest term, not the longest.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{trace, warn};

use crate::SearchSpec;

/// One piece of a text run after matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    /// Text left as is.
    Plain {
        /// The text.
        text: String,
    },
    /// Text to be wrapped in a colored span.
    Highlighted {
        /// The matched text, as it appears in the content.
        text: String,
        /// Background color.
        color: String,
    },
}

impl Fragment {
    /// Returns the text of the fragment.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain { text } | Self::Highlighted { text, .. } => text,
        }
    }

    /// Returns the color of a highlighted fragment.
    pub fn color(&self) -> Option<&str> {
        match self {
            Self::Plain { .. } => None,
            Self::Highlighted { color, .. } => Some(color),
        }
    }

    /// Returns true for highlighted fragments.
    pub fn is_highlighted(&self) -> bool {
        matches!(self, Self::Highlighted { .. })
    }
}

/// An accepted occurrence of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    /// Byte range in the content.
    pub range: Range<usize>,
    /// Index of the term in the spec.
    pub term: usize,
    /// Background color for the term.
    pub color: &'a str,
}

/// A compiled term.
#[derive(Debug)]
struct TermPattern {
    /// Index in the spec's term list.
    index: usize,
    /// Literal pattern for the term.
    regex: Regex,
}

/// Compiled form of a [`SearchSpec`], reusable across text runs.
#[derive(Debug)]
pub struct Matcher {
    /// The spec the patterns were built from.
    spec: SearchSpec,
    /// One pattern per usable term, in term order.
    patterns: Vec<TermPattern>,
}

impl Matcher {
    /// Compiles every term of `spec`.
    ///
    /// Empty terms never match and are left out. A term that fails to compile is logged and
    /// left out without affecting the others.
    pub fn new(spec: SearchSpec) -> Self {
        let mut patterns = Vec::with_capacity(spec.terms.len());
        for (index, term) in spec.terms.iter().enumerate() {
            if term.is_empty() {
                trace!(index, "skipping empty term");
                continue;
            }
            match RegexBuilder::new(&regex::escape(term))
                .case_insensitive(!spec.case_sensitive)
                .build()
            {
                Ok(regex) => patterns.push(TermPattern { index, regex }),
                Err(err) => warn!(term = %term, %err, "skipping term that failed to compile"),
            }
        }
        Self { spec, patterns }
    }

    /// Returns the spec this matcher was built from.
    pub fn spec(&self) -> &SearchSpec {
        &self.spec
    }

    /// Returns true if no term can ever match.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Finds the accepted, non-overlapping matches in `content`, in order.
    pub fn find_matches(&self, content: &str) -> Vec<Match<'_>> {
        let mut candidates: Vec<Match<'_>> = Vec::new();
        for pattern in &self.patterns {
            let color = self.spec.color_for(pattern.index);
            candidates.extend(pattern.regex.find_iter(content).map(|m| Match {
                range: m.range(),
                term: pattern.index,
                color,
            }));
        }
        // Stable: equal starts keep term order, then scan order.
        candidates.sort_by_key(|m| m.range.start);

        let mut cursor = 0;
        candidates.retain(|m| {
            if m.range.start < cursor {
                return false;
            }
            cursor = m.range.end;
            true
        });
        candidates
    }

    /// Splits `content` into fragments.
    ///
    /// Empty or whitespace-only content yields no fragments. Otherwise the fragments
    /// concatenate back to `content` exactly.
    pub fn fragments(&self, content: &str) -> Vec<Fragment> {
        if content.trim().is_empty() {
            return Vec::new();
        }

        let mut fragments = Vec::new();
        let mut cursor = 0;
        for m in self.find_matches(content) {
            if m.range.start > cursor {
                fragments.push(Fragment::Plain {
                    text: content[cursor..m.range.start].to_string(),
                });
            }
            fragments.push(Fragment::Highlighted {
                text: content[m.range.clone()].to_string(),
                color: m.color.to_string(),
            });
            cursor = m.range.end;
        }
        if cursor < content.len() {
            fragments.push(Fragment::Plain {
                text: content[cursor..].to_string(),
            });
        }
        fragments
    }
}

/// Splits `content` into fragments for a one-off spec.
pub fn match_fragments(content: &str, spec: &SearchSpec) -> Vec<Fragment> {
    Matcher::new(spec.clone()).fragments(content)
}
