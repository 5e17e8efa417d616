//! Text canonicalisation, hashing, and similarity scoring.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use super::patterns::{BOILERPLATE, CLOCK_TIME, ISO_DATE, WHITESPACE};

/// Minimum token length (exclusive) considered by similarity scoring.
pub const MIN_TOKEN_LEN: usize = 2;

/// Canonicalises raw page text for comparison.
///
/// Lowercases, collapses whitespace, removes the words `cookie`,
/// `privacy`, `terms`, `policy`, ISO dates (`YYYY-MM-DD`) and clock
/// times (`HH:MM:SS`), then trims. Removal is repeated until nothing
/// matches and whitespace is collapsed again afterwards, which makes the
/// function idempotent.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let mut current = WHITESPACE.replace_all(&text.to_lowercase(), " ").into_owned();
    loop {
        let stripped = BOILERPLATE.replace_all(&current, "");
        let stripped = ISO_DATE.replace_all(&stripped, "");
        let stripped = CLOCK_TIME.replace_all(&stripped, "").into_owned();
        if stripped == current {
            break;
        }
        current = stripped;
    }
    WHITESPACE.replace_all(&current, " ").trim().to_string()
}

/// Hex-encoded SHA-256 of the normalised text.
#[must_use]
pub fn content_hash(normalized_text: &str) -> String {
    hex::encode(Sha256::digest(normalized_text.as_bytes()))
}

/// Whitespace tokens longer than [`MIN_TOKEN_LEN`] characters.
pub fn significant_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_LEN)
}

/// Jaccard similarity of the significant token sets of two texts.
///
/// Symmetric, in `[0, 1]`, and `1.0` when both token sets are empty.
/// Insensitive to token order and frequency.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = significant_tokens(a).collect();
    let right: HashSet<&str> = significant_tokens(b).collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = left.intersection(&right).count();

    #[allow(clippy::cast_precision_loss)]
    let score = intersection as f64 / union as f64;
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_collapses_whitespace() {
        assert_eq!(normalize_text("  Hello\n\tWORLD   again "), "hello world again");
    }

    #[test]
    fn normalize_strips_boilerplate_words_anywhere() {
        assert_eq!(normalize_text("Read our Privacy Policy"), "read our");
        assert_eq!(normalize_text("cookies accepted"), "s accepted");
    }

    #[test]
    fn normalize_strips_dates_and_times() {
        assert_eq!(
            normalize_text("Updated 2024-01-01 at 12:30:45 today"),
            "updated at today"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "Cookie Policy updated 2024-01-01",
            "a cookie b",
            "tecookierms and conditions",
            "2024-0 2024-01-0101-01",
            "   ",
            "",
            "Margherita $14  Pepperoni $15.40",
        ];
        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn normalize_empty_is_empty() {
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn hash_is_deterministic_and_hex() {
        let a = content_hash("margherita $14");
        assert_eq!(a, content_hash("margherita $14"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_hash("margherita $15"));
    }

    #[test]
    fn similarity_of_identical_text_is_one() {
        let text = "fresh margherita pizza with basil";
        assert!((similarity(text, text) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_of_empty_texts_is_one() {
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("a b", "to of") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = "enterprise plan $5,000 / month";
        let b = "enterprise plan $4,250 / month with support";
        assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_is_jaccard_over_long_tokens() {
        // {enterprise, plan, $5,000, month} vs {enterprise, plan, $4,250, month}
        let s = similarity("enterprise plan $5,000 / month", "enterprise plan $4,250 / month");
        assert!((s - 0.6).abs() < 1e-9);
    }

    #[test]
    fn similarity_ignores_order_and_frequency() {
        let s = similarity("alpha beta gamma", "gamma gamma alpha beta");
        assert!((s - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_of_disjoint_texts_is_zero() {
        assert!(similarity("alpha beta", "gamma delta").abs() < f64::EPSILON);
    }
}
