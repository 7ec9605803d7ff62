//! Text matching rules.
//!
//! The same rules are emitted into the page scripts (see `script.rs`), so the
//! mock driver and a real Chromium page agree on what "contains text" means.

/// Collapse every whitespace run into a single space and trim both ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// How a text filter compares against element text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMatch {
    /// Case-insensitive substring of the normalised text
    #[default]
    Substring,
    /// Normalised text equals the needle, case-sensitive
    Exact,
}

impl TextMatch {
    /// Check `haystack` against `needle` under this rule
    #[must_use]
    pub fn matches(self, haystack: &str, needle: &str) -> bool {
        let haystack = normalize_whitespace(haystack);
        let needle = normalize_whitespace(needle);
        match self {
            Self::Substring => haystack.to_lowercase().contains(&needle.to_lowercase()),
            Self::Exact => haystack == needle,
        }
    }
}

/// Case-sensitive containment used by `to_contain_text`.
#[must_use]
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    normalize_whitespace(haystack).contains(&normalize_whitespace(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(
            normalize_whitespace("  La Tomate\n\t grappe   sélection HVE "),
            "La Tomate grappe sélection HVE"
        );
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        assert!(TextMatch::Substring.matches("AJOUTER LE PRODUIT", "Ajouter le produit"));
        assert!(TextMatch::Substring.matches("Mon panier (1)", "mon panier"));
        assert!(!TextMatch::Substring.matches("Mon compte", "Mon panier"));
    }

    #[test]
    fn test_exact_requires_equality() {
        assert!(TextMatch::Exact.matches(" Mon  panier ", "Mon panier"));
        assert!(!TextMatch::Exact.matches("Mon panier (1)", "Mon panier"));
        assert!(!TextMatch::Exact.matches("mon panier", "Mon panier"));
    }

    #[test]
    fn test_contains_normalized_is_case_sensitive() {
        let dialog = "Votre panier\n  La Tomate grappe\n sélection HVE  x1";
        assert!(contains_normalized(dialog, "La Tomate grappe sélection HVE"));
        assert!(!contains_normalized(dialog, "la tomate grappe sélection hve"));
    }

    #[test]
    fn test_accented_text_survives_normalisation() {
        assert!(TextMatch::Substring.matches("SÉLECTION", "sélection"));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "\\PC{0,40}") {
            let once = normalize_whitespace(&s);
            prop_assert_eq!(normalize_whitespace(&once), once);
        }

        #[test]
        fn prop_normalized_has_no_double_spaces(s in "[a-z \\t\\n]{0,40}") {
            let n = normalize_whitespace(&s);
            prop_assert!(!n.contains("  "));
            prop_assert_eq!(n.trim(), n.as_str());
        }

        #[test]
        fn prop_text_contains_itself(s in "[a-zA-Zé ]{0,30}") {
            prop_assert!(TextMatch::Substring.matches(&s, &s));
            prop_assert!(TextMatch::Exact.matches(&s, &s));
            prop_assert!(contains_normalized(&s, &s));
        }
    }
}
