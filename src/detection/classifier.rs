//! Heuristic change classification.
//!
//! [`ChangeClassifier`] is the strategy the detector delegates to once it
//! has decided a change is significant. [`KeywordClassifier`] is the
//! default implementation: its keyword and stop-word lists are plain data
//! and can be replaced without touching the detector.

use std::collections::HashSet;
use std::fmt;

use super::patterns::{BARE_CURRENCY_TOKEN, CURRENCY_AMOUNT};
use super::text::significant_tokens;
use crate::domain::{ChangeType, Severity};

/// Words that signal a product change when found in either text.
pub const DEFAULT_PRODUCT_KEYWORDS: &[&str] = &[
    "new",
    "product",
    "feature",
    "launch",
    "introducing",
    "available",
    "menu item",
];

/// Words that signal a pricing change when found in either text.
pub const DEFAULT_PRICING_KEYWORDS: &[&str] = &[
    "$", "price", "cost", "fee", "pricing", "discount", "sale", "off", "%",
];

/// Vocabulary that appears on menus without indicating a new product.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "and", "with", "for", "from", "that", "this", "san", "marzano", "fresh", "buffalo",
    "garden", "olive", "double", "layer", "spicy", "blend", "oregano", "chili", "flakes",
    "roasted", "wild", "white", "truffle", "oil", "parmesan", "cream", "sauce", "thyme",
    "peppers", "mushrooms", "olives", "mozzarella", "pepperoni", "sausage", "ham", "bacon",
    "chicken", "blue", "cheese", "bbq", "red", "onions", "pineapple", "cheddar", "gorgonzola",
];

/// Novel tokens must be longer than this many characters to count as
/// evidence of a product change.
pub const DEFAULT_MIN_CANDIDATE_LEN: usize = 3;

/// Severity derived from the change type and the similarity score.
///
/// Pricing changes and changes with `1 - similarity > 0.3` are high;
/// product changes and changes with `1 - similarity > 0.15` are medium;
/// everything else is low.
#[must_use]
pub fn determine_severity(change_type: ChangeType, similarity: f64) -> Severity {
    let score = 1.0 - similarity;
    if change_type == ChangeType::Pricing || score > 0.3 {
        Severity::High
    } else if change_type == ChangeType::Product || score > 0.15 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Generic summary used when nothing more specific can be said.
#[must_use]
pub fn generic_summary(similarity: f64) -> String {
    format!("Content changed (similarity: {:.1}%)", similarity * 100.0)
}

/// Strategy for typing, ranking, and describing a significant change.
///
/// Implementations receive the normalised text of both snapshots.
pub trait ChangeClassifier: Send + Sync + fmt::Debug {
    /// Decides what kind of change turned `before` into `after`.
    fn classify(&self, before: &str, after: &str) -> ChangeType;

    /// Ranks a change. Defaults to [`determine_severity`].
    fn severity(&self, change_type: ChangeType, similarity: f64) -> Severity {
        determine_severity(change_type, similarity)
    }

    /// Produces a one-line human-readable summary. Advisory only.
    fn summarize(&self, change_type: ChangeType, before: &str, after: &str, similarity: f64)
    -> String;
}

/// Keyword and novel-vocabulary classifier.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    product_keywords: Vec<String>,
    pricing_keywords: Vec<String>,
    stop_words: HashSet<String>,
    min_candidate_len: usize,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            product_keywords: owned(DEFAULT_PRODUCT_KEYWORDS),
            pricing_keywords: owned(DEFAULT_PRICING_KEYWORDS),
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
            min_candidate_len: DEFAULT_MIN_CANDIDATE_LEN,
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

impl KeywordClassifier {
    /// Creates a classifier with the default word lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the product keyword list.
    #[must_use]
    pub fn with_product_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_keywords = keywords.into_iter().map(|k| k.into().to_lowercase()).collect();
        self
    }

    /// Replaces the pricing keyword list.
    #[must_use]
    pub fn with_pricing_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pricing_keywords = keywords.into_iter().map(|k| k.into().to_lowercase()).collect();
        self
    }

    /// Replaces the stop-word list.
    #[must_use]
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(|w| w.into().to_lowercase()).collect();
        self
    }

    /// Tokens of `after` that `before` lacks, minus stop words and bare
    /// amounts, in the order they appear in `after`.
    fn novel_tokens(&self, before: &str, after: &str) -> Vec<String> {
        let before_lower = before.to_lowercase();
        let seen: HashSet<&str> = significant_tokens(&before_lower).collect();
        significant_tokens(&after.to_lowercase())
            .filter(|token| !seen.contains(token))
            .filter(|token| !self.stop_words.contains(*token))
            .filter(|token| !BARE_CURRENCY_TOKEN.is_match(token))
            .map(str::to_string)
            .collect()
    }

    fn candidates<'a>(&self, novel: &'a [String]) -> impl Iterator<Item = &'a String> {
        let min = self.min_candidate_len;
        novel.iter().filter(move |t| t.chars().count() > min)
    }

    /// Two adjacent novel words, or failing that the first candidate.
    fn product_name(&self, after: &str, novel: &[String]) -> Option<String> {
        let first = self.candidates(novel).next()?;
        let novel_set: HashSet<&str> = novel.iter().map(String::as_str).collect();
        let words: Vec<String> = after.split_whitespace().map(str::to_lowercase).collect();

        let phrase = words.windows(2).find_map(|pair| match pair {
            [a, b] if novel_set.contains(a.as_str()) && novel_set.contains(b.as_str()) => {
                Some(format!("{a} {b}"))
            }
            _ => None,
        });
        Some(title_case(phrase.as_deref().unwrap_or(first)))
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

fn amounts(text: &str) -> Vec<&str> {
    CURRENCY_AMOUNT.find_iter(text).map(|m| m.as_str()).collect()
}

fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl ChangeClassifier for KeywordClassifier {
    fn classify(&self, before: &str, after: &str) -> ChangeType {
        let combined = format!("{before} {after}").to_lowercase();

        let novel = self.novel_tokens(before, after);
        if contains_any(&combined, &self.product_keywords)
            || self.candidates(&novel).next().is_some()
        {
            return ChangeType::Product;
        }

        let old_amounts = amounts(before);
        let new_amounts = amounts(after);
        if !old_amounts.is_empty()
            && old_amounts.len() == new_amounts.len()
            && old_amounts.iter().zip(&new_amounts).any(|(a, b)| a != b)
        {
            return ChangeType::Pricing;
        }

        if contains_any(&combined, &self.pricing_keywords) {
            return ChangeType::Pricing;
        }
        ChangeType::Other
    }

    fn summarize(
        &self,
        change_type: ChangeType,
        before: &str,
        after: &str,
        similarity: f64,
    ) -> String {
        match change_type {
            ChangeType::Product => {
                let novel = self.novel_tokens(before, after);
                match self.product_name(after, &novel) {
                    Some(name) => format!("New Menu Item Added: {name}"),
                    None => "New Menu Item Added".to_string(),
                }
            }
            ChangeType::Pricing => {
                let old_amounts = amounts(before);
                let new_amounts = amounts(after);
                old_amounts
                    .iter()
                    .zip(&new_amounts)
                    .find(|(a, b)| a != b)
                    .map_or_else(
                        || "Price Updated".to_string(),
                        |(a, b)| format!("Price Updated: {a} → {b}"),
                    )
            }
            ChangeType::Other => generic_summary(similarity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_thresholds() {
        assert_eq!(determine_severity(ChangeType::Pricing, 0.99), Severity::High);
        assert_eq!(determine_severity(ChangeType::Other, 0.5), Severity::High);
        assert_eq!(determine_severity(ChangeType::Product, 0.9), Severity::Medium);
        assert_eq!(determine_severity(ChangeType::Other, 0.8), Severity::Medium);
        assert_eq!(determine_severity(ChangeType::Other, 0.9), Severity::Low);
    }

    #[test]
    fn price_change_with_equal_amount_count_is_pricing() {
        let c = KeywordClassifier::new();
        let ty = c.classify(
            "enterprise plan $5,000 / month",
            "enterprise plan $4,250 / month",
        );
        assert_eq!(ty, ChangeType::Pricing);
        assert_eq!(
            c.summarize(
                ty,
                "enterprise plan $5,000 / month",
                "enterprise plan $4,250 / month",
                0.6
            ),
            "Price Updated: $5,000 → $4,250"
        );
    }

    #[test]
    fn novel_vocabulary_is_product() {
        let c = KeywordClassifier::new();
        let before = "margherita pepperoni $14 $15";
        let after = "margherita pepperoni quattro formaggi $14 $15 $17";
        assert_eq!(c.classify(before, after), ChangeType::Product);
        assert_eq!(
            c.summarize(ChangeType::Product, before, after, 0.6),
            "New Menu Item Added: Quattro Formaggi"
        );
    }

    #[test]
    fn single_novel_word_becomes_the_name() {
        let c = KeywordClassifier::new();
        let before = "margherita $14";
        let after = "margherita calzone $14 $12";
        assert_eq!(
            c.summarize(ChangeType::Product, before, after, 0.5),
            "New Menu Item Added: Calzone"
        );
    }

    #[test]
    fn stop_words_and_amounts_are_not_novel() {
        let c = KeywordClassifier::new();
        // Only stop words and a bare amount are new; no keyword present
        // except "$", which makes it pricing.
        let ty = c.classify("margherita $14", "margherita mozzarella $14 $2");
        assert_eq!(ty, ChangeType::Pricing);
    }

    #[test]
    fn product_keyword_wins_over_pricing() {
        let c = KeywordClassifier::new();
        assert_eq!(
            c.classify("our price list $10", "our new price list $12"),
            ChangeType::Product
        );
    }

    #[test]
    fn plain_text_change_is_other() {
        let c = KeywordClassifier::new();
        let ty = c.classify("opening hours monday", "opening hours mon");
        assert_eq!(ty, ChangeType::Other);
        assert_eq!(
            c.summarize(ty, "opening hours monday", "opening hours mon", 0.5),
            "Content changed (similarity: 50.0%)"
        );
    }

    #[test]
    fn custom_word_lists_change_the_outcome() {
        let c = KeywordClassifier::new()
            .with_product_keywords(Vec::<String>::new())
            .with_stop_words(["calzone"]);
        assert_eq!(c.classify("margherita", "margherita calzone"), ChangeType::Other);
    }

    #[test]
    fn pricing_summary_without_pairs() {
        let c = KeywordClassifier::new();
        assert_eq!(
            c.summarize(ChangeType::Pricing, "big sale", "bigger sale", 0.3),
            "Price Updated"
        );
    }

    #[test]
    fn title_case_restores_capitals() {
        assert_eq!(title_case("quattro FORMAGGI"), "Quattro Formaggi");
        assert_eq!(title_case(""), "");
    }
}
