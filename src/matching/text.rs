//! String normalization and similarity helpers.
//!
//! Labels are compared after canonicalization; free text is compared as a
//! token set so word order and punctuation noise from the describer do not
//! matter.

use std::collections::HashSet;

/// Canonical form of a categorical label.
///
/// Lowercases and drops everything that is not alphanumeric, so
/// "KW-1", "kw 1" and "Kw1" all become "kw1".
#[must_use]
pub fn canonical_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split free text into lowercase alphanumeric tokens.
#[must_use]
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard overlap between two token sets.
///
/// Returns `None` when either side has no tokens, since an empty set says
/// nothing about the key.
#[must_use]
pub fn token_overlap(a: &HashSet<String>, b: &HashSet<String>) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let intersection = a.intersection(b).count();
    let union = a.union(b).count();

    Some(intersection as f64 / union as f64)
}

/// Token-overlap similarity of two free-text strings.
#[must_use]
pub fn text_similarity(a: &str, b: &str) -> Option<f64> {
    token_overlap(&tokenize(a), &tokenize(b))
}

/// Find the closest known name, for "did you mean" hints.
///
/// Only names with Jaro-Winkler similarity of at least 0.8 qualify.
#[must_use]
pub fn closest_name<'a, I>(target: &str, names: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let target = target.to_lowercase();
    names
        .into_iter()
        .map(|name| (name, strsim::jaro_winkler(&target, &name.to_lowercase())))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_label() {
        assert_eq!(canonical_label("KW-1"), "kw1");
        assert_eq!(canonical_label(" kw 1 "), "kw1");
        assert_eq!(canonical_label("Nickel_Silver"), "nickelsilver");
        assert_eq!(canonical_label("--"), "");
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        let tokens = tokenize("Do NOT duplicate!!");
        assert_eq!(tokens.len(), 3);
        assert!(tokens.contains("not"));
        assert!(tokenize("... ---").is_empty());
    }

    #[test]
    fn test_text_similarity_identical_and_reordered() {
        assert_eq!(text_similarity("do not duplicate", "DO NOT DUPLICATE"), Some(1.0));
        assert_eq!(text_similarity("red dot", "dot, red"), Some(1.0));
    }

    #[test]
    fn test_text_similarity_partial() {
        // 2 common / 3 total
        let score = text_similarity("do not duplicate", "do not").unwrap();
        assert!((score - 2.0 / 3.0).abs() < 1e-9, "{score}");
    }

    #[test]
    fn test_text_similarity_empty() {
        assert_eq!(text_similarity("", "anything"), None);
        assert_eq!(text_similarity("!!", "??"), None);
        assert_eq!(text_similarity("red", "blue"), Some(0.0));
    }

    #[test]
    fn test_closest_name() {
        let names = ["v1", "v2", "workshop"];
        assert_eq!(closest_name("workshp", names), Some("workshop".to_string()));
        assert_eq!(closest_name("completely-different", names), None);
    }
}
