//! Heading anchors.
//!
//! Headings loaded from markdown get an `id` built the way GitHub builds anchors: lowercase
//! ASCII alphanumerics and underscores are kept, runs of spaces and hyphens become a single
//! hyphen, everything else is dropped. Repeats get a `-N` suffix.

use std::collections::HashMap;

/// Anchor used when a heading has no usable characters.
const FALLBACK: &str = "section";

/// Produces unique anchors for the headings of one document.
#[derive(Debug, Default)]
pub struct Slugifier {
    /// How many times each base anchor has been handed out.
    seen: HashMap<String, usize>,
}

impl Slugifier {
    /// Creates a slugifier with no anchors handed out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a unique anchor for `heading`.
    pub fn slugify(&mut self, heading: &str) -> String {
        let base = base_slug(heading);
        let count = self.seen.entry(base.clone()).or_default();
        let slug = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        slug
    }
}

/// Builds an anchor without deduplication.
fn base_slug(heading: &str) -> String {
    let mut slug = String::with_capacity(heading.len());
    for c in heading.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c.to_ascii_lowercase());
        } else if (c == ' ' || c == '-') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        FALLBACK.to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        let mut s = Slugifier::new();
        assert_eq!(s.slugify("Getting Started"), "getting-started");
        assert_eq!(s.slugify("  What's new -- in v2? "), "whats-new-in-v2");
    }

    #[test]
    fn test_duplicates_get_suffix() {
        let mut s = Slugifier::new();
        assert_eq!(s.slugify("Notes"), "notes");
        assert_eq!(s.slugify("notes"), "notes-1");
        assert_eq!(s.slugify("NOTES"), "notes-2");
    }

    #[test]
    fn test_empty_heading_falls_back() {
        let mut s = Slugifier::new();
        assert_eq!(s.slugify("???"), "section");
        assert_eq!(s.slugify(""), "section-1");
    }
}
