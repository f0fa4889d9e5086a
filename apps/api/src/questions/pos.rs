//! Lightweight part-of-speech heuristics.
//!
//! Not a statistical tagger: a closed-class lexicon, a list of common verbs
//! and a handful of suffix rules. Good enough to tell "Explain paging." from
//! a stray heading, and to pick topic nouns out of a question.

use std::collections::HashMap;

use crate::text::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Noun,
    Verb,
    /// Determiners, pronouns, prepositions, conjunctions, auxiliaries, wh-words.
    Function,
    /// Numbers, single letters and other tokens with no useful class.
    Other,
}

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "of", "in", "on", "at", "to", "for",
    "from", "by", "with", "about", "into", "over", "under", "between", "through", "during",
    "and", "or", "but", "nor", "so", "if", "then", "than", "as", "because", "while", "whether",
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "its",
    "their", "our", "your", "my", "his", "what", "why", "how", "where", "when", "who", "whom",
    "whose", "which", "not", "no", "all", "any", "each", "every", "some", "more", "most",
    "such", "very", "also", "only", "other", "same", "both", "either", "neither", "there",
    "here",
];

/// Auxiliaries and modals count as verbs for completeness checks.
const VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "do", "does", "did", "has",
    "have", "had", "can", "could", "will", "would", "shall", "should", "may", "might", "must",
    "explain", "describe", "discuss", "define", "analyze", "analyse", "compare", "evaluate",
    "summarize", "illustrate", "examine", "propose", "imagine", "assume", "state", "list",
    "identify", "justify", "outline", "provide", "suggest", "relate", "assess", "debate",
    "formulate", "clarify", "critique", "support", "review", "create", "design", "devise",
    "predict", "contrast", "plan", "develop", "defend", "choose", "recommend", "determine",
    "conclude", "validate", "highlight", "translate", "show", "write", "estimate", "test",
    "prove", "quantify", "name", "select", "adapt", "solve", "derive", "integrate",
    "generate", "combine", "expand", "trace", "give", "find", "make", "use", "work", "affect",
    "influence", "improve", "cause", "happen", "occur", "play", "mean", "differ", "calculate",
    "implement", "apply", "occurs", "uses", "works", "affects", "plays", "means", "causes",
    "improves", "influences", "happens", "differs", "interact", "interacts",
];

// "-ing" is left out: gerunds in exam questions are mostly topics (paging, caching)
const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify", "ate", "ed"];
const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ism", "ist", "ance", "ence", "ship", "age", "ure",
    "er", "or", "ogy", "ics",
];

/// Tags a single token (case-insensitive).
pub fn tag_word(word: &str) -> Tag {
    let lower = word.to_lowercase();
    if FUNCTION_WORDS.contains(&lower.as_str()) {
        return Tag::Function;
    }
    if lower.chars().all(|c| c.is_ascii_digit()) || lower.chars().count() < 2 {
        return Tag::Other;
    }
    if VERBS.contains(&lower.as_str()) {
        return Tag::Verb;
    }
    if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Tag::Noun;
    }
    if lower.len() > 4 && VERB_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Tag::Verb;
    }
    // Open-class words default to nouns
    Tag::Noun
}

pub fn tag_sentence(text: &str) -> Vec<(String, Tag)> {
    tokenize(text)
        .into_iter()
        .map(|t| {
            let tag = tag_word(&t);
            (t, tag)
        })
        .collect()
}

/// A candidate is complete when it has at least one noun and one verb.
pub fn has_noun_and_verb(text: &str) -> bool {
    let tags = tag_sentence(text);
    tags.iter().any(|(_, t)| *t == Tag::Noun) && tags.iter().any(|(_, t)| *t == Tag::Verb)
}

/// Up to `limit` most frequent nouns (lowercased, ≥ 3 chars). Ties keep first appearance order.
pub fn detect_topics(text: &str, limit: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for (word, tag) in tag_sentence(text) {
        if tag != Tag::Noun || word.chars().count() < 3 {
            continue;
        }
        let word = word.to_lowercase();
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(limit);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_word_classes() {
        assert_eq!(tag_word("the"), Tag::Function);
        assert_eq!(tag_word("Explain"), Tag::Verb);
        assert_eq!(tag_word("optimized"), Tag::Verb);
        assert_eq!(tag_word("virtualization"), Tag::Noun);
        assert_eq!(tag_word("kernel"), Tag::Noun);
        assert_eq!(tag_word("42"), Tag::Other);
        assert_eq!(tag_word("a"), Tag::Function);
        assert_eq!(tag_word("b"), Tag::Other);
    }

    #[test]
    fn test_complete_candidates() {
        assert!(has_noun_and_verb("Explain the role of paging."));
        assert!(has_noun_and_verb("1. What is a deadlock?"));
    }

    #[test]
    fn test_incomplete_candidates() {
        assert!(!has_noun_and_verb("Section 4"));
        assert!(!has_noun_and_verb("Explain."));
        assert!(!has_noun_and_verb("(a)"));
    }

    #[test]
    fn test_detect_topics_by_frequency() {
        let topics = detect_topics(
            "How does paging interact with the kernel scheduler, and why does paging matter?",
            3,
        );
        assert_eq!(topics[0], "paging");
        assert!(topics.contains(&"kernel".to_string()));
        assert!(topics.len() <= 3);
    }

    #[test]
    fn test_detect_topics_empty() {
        assert!(detect_topics("What is it?", 3).is_empty());
    }
}
