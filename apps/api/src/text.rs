//! Shared text normalisation used by scoring, generation and extraction.

use std::sync::OnceLock;

use regex::Regex;

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[\p{L}\p{N}_]+").expect("word pattern is valid"))
}

fn sentence_noise_regex() -> &'static Regex {
    static NOISE: OnceLock<Regex> = OnceLock::new();
    NOISE.get_or_init(|| Regex::new(r"[^\w\s?]").expect("noise pattern is valid"))
}

/// Splits text into word tokens, dropping punctuation and whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    word_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Lowercases and tokenizes in one pass.
pub fn tokenize_lower(text: &str) -> Vec<String> {
    tokenize(&text.to_lowercase())
}

/// Lowercases and strips everything except word characters, whitespace and `?`.
pub fn sanitize_sentence(text: &str) -> String {
    sentence_noise_regex()
        .replace_all(text, "")
        .into_owned()
        .to_lowercase()
}

/// Uppercases the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
