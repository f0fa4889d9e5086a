//! Similarity scoring: pluggable scorers used for plagiarism checks and for
//! de-duplicating generated questions.
//!
//! Default: `DiceScorer` (character-bigram Sørensen–Dice coefficient).
//! Alternate: `TokenOverlapScorer` (share of candidate words found in the reference).
//!
//! `AppState` holds an `Arc<dyn SimilarityScorer>`; callers may pick the other
//! method per request through `SimilarityMethod::scorer`.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::text::tokenize_lower;

/// Scores at or above this value are flagged as plagiarism.
pub const PLAGIARISM_THRESHOLD: f64 = 80.0;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A similarity method producing a score in `[0, 100]`.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, candidate: &str, reference: &str) -> f64;

    fn method(&self) -> SimilarityMethod;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    #[default]
    Dice,
    TokenOverlap,
}

impl SimilarityMethod {
    pub fn scorer(self) -> Arc<dyn SimilarityScorer> {
        match self {
            SimilarityMethod::Dice => Arc::new(DiceScorer),
            SimilarityMethod::TokenOverlap => Arc::new(TokenOverlapScorer),
        }
    }
}

impl FromStr for SimilarityMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dice" => Ok(SimilarityMethod::Dice),
            "token_overlap" | "token-overlap" | "tokens" => Ok(SimilarityMethod::TokenOverlap),
            other => Err(format!("Unknown similarity method '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scorers
// ────────────────────────────────────────────────────────────────────────────

/// Case-insensitive bigram Dice coefficient. Symmetric.
pub struct DiceScorer;

impl SimilarityScorer for DiceScorer {
    fn score(&self, candidate: &str, reference: &str) -> f64 {
        to_percent(dice_coefficient(
            &candidate.to_lowercase(),
            &reference.to_lowercase(),
        ))
    }

    fn method(&self) -> SimilarityMethod {
        SimilarityMethod::Dice
    }
}

/// Fraction of the candidate's tokens that also occur in the reference.
/// Directional: `score(a, b)` and `score(b, a)` generally differ.
pub struct TokenOverlapScorer;

impl SimilarityScorer for TokenOverlapScorer {
    fn score(&self, candidate: &str, reference: &str) -> f64 {
        to_percent(token_overlap(candidate, reference))
    }

    fn method(&self) -> SimilarityMethod {
        SimilarityMethod::TokenOverlap
    }
}

/// Sørensen–Dice coefficient over character bigrams with whitespace removed.
pub fn dice_coefficient(first: &str, second: &str) -> f64 {
    let first: Vec<char> = first.chars().filter(|c| !c.is_whitespace()).collect();
    let second: Vec<char> = second.chars().filter(|c| !c.is_whitespace()).collect();

    if first == second {
        return 1.0;
    }
    if first.len() < 2 || second.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in first.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in second.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2.0 * intersection as f64) / ((first.len() + second.len() - 2) as f64)
}

/// Share of candidate tokens present in the reference, in `[0, 1]`.
pub fn token_overlap(candidate: &str, reference: &str) -> f64 {
    let candidate_tokens = tokenize_lower(candidate);
    if candidate_tokens.is_empty() {
        return 0.0;
    }
    let reference_tokens: HashSet<String> = tokenize_lower(reference).into_iter().collect();
    let matched = candidate_tokens
        .iter()
        .filter(|t| reference_tokens.contains(*t))
        .count();
    matched as f64 / candidate_tokens.len() as f64
}

fn to_percent(ratio: f64) -> f64 {
    round2(ratio.clamp(0.0, 1.0) * 100.0)
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Corpus lookup
// ────────────────────────────────────────────────────────────────────────────

/// Most similar corpus entry for a candidate text.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityMatch {
    pub score: f64,
    /// `None` when the corpus is empty or nothing scored above zero.
    pub most_similar: Option<String>,
}

impl SimilarityMatch {
    pub fn is_plagiarized(&self) -> bool {
        is_plagiarized(self.score)
    }
}

pub fn is_plagiarized(score: f64) -> bool {
    score >= PLAGIARISM_THRESHOLD
}

/// Scans the corpus and returns the highest-scoring entry (first wins on ties).
pub fn best_match<'a, I>(candidate: &str, corpus: I, scorer: &dyn SimilarityScorer) -> SimilarityMatch
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best = SimilarityMatch {
        score: 0.0,
        most_similar: None,
    };

    for text in corpus {
        let score = scorer.score(candidate, text);
        if score > best.score {
            best.score = score;
            best.most_similar = Some(text.to_string());
        }
    }

    best
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(DiceScorer.score("What is Rust?", "what is rust?"), 100.0);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(DiceScorer.score("night light", "nightlight"), 100.0);
    }

    #[test]
    fn test_short_strings_score_zero() {
        assert_eq!(DiceScorer.score("a", "ab"), 0.0);
        assert_eq!(DiceScorer.score("", "abc"), 0.0);
    }

    #[test]
    fn test_known_dice_value() {
        // night: ni ig gh ht / nacht: na ac ch ht → 1 shared of 8 → 0.25
        assert!((dice_coefficient("night", "nacht") - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_bigrams_are_counted_once_each() {
        // "aaa" has aa×2, "aa" has aa×1 → 2*1 / (3+2-2) = 0.6667
        assert!((dice_coefficient("aaa", "aa") - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_dice_is_symmetric_and_bounded() {
        let pairs = [
            ("What is the role of memory?", "Explain the role of memory in CPUs."),
            ("Define entropy.", "Why does entropy increase?"),
            ("abc", "xyz"),
            ("distributed consensus", "consensus in distributed systems"),
        ];
        for (a, b) in pairs {
            let ab = DiceScorer.score(a, b);
            let ba = DiceScorer.score(b, a);
            assert_eq!(ab, ba, "asymmetric for {a:?} / {b:?}");
            assert!((0.0..=100.0).contains(&ab));
        }
    }

    #[test]
    fn test_token_overlap_full_and_partial() {
        assert_eq!(
            TokenOverlapScorer.score("What is rust", "rust: what is it"),
            100.0
        );
        assert_eq!(
            TokenOverlapScorer.score("what is go", "what is rust"),
            66.67
        );
    }

    #[test]
    fn test_token_overlap_empty_candidate_is_zero() {
        assert_eq!(TokenOverlapScorer.score("?!", "anything"), 0.0);
    }

    #[test]
    fn test_best_match_picks_highest_first_on_ties() {
        let corpus = ["alpha beta", "what is rust?", "what is rust?"];
        let m = best_match("What is Rust?", corpus.iter().copied(), &DiceScorer);
        assert_eq!(m.score, 100.0);
        assert_eq!(m.most_similar.as_deref(), Some("what is rust?"));
        assert!(m.is_plagiarized());
    }

    #[test]
    fn test_best_match_empty_corpus() {
        let m = best_match("anything", std::iter::empty(), &DiceScorer);
        assert_eq!(m.score, 0.0);
        assert!(m.most_similar.is_none());
        assert!(!m.is_plagiarized());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_plagiarized(80.0));
        assert!(!is_plagiarized(79.99));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("dice".parse::<SimilarityMethod>(), Ok(SimilarityMethod::Dice));
        assert_eq!(
            "Token_Overlap".parse::<SimilarityMethod>(),
            Ok(SimilarityMethod::TokenOverlap)
        );
        assert!("cosine".parse::<SimilarityMethod>().is_err());
        assert_eq!(
            SimilarityMethod::TokenOverlap.scorer().method(),
            SimilarityMethod::TokenOverlap
        );
    }
}
