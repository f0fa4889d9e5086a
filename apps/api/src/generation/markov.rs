//! First-order word Markov chain trained on stored question texts.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::text::{sanitize_sentence, tokenize};

/// Default cap on generated sentence length, in words.
pub const DEFAULT_MAX_WORDS: usize = 20;

/// Successor table: word → observed next words. `None` marks end of sentence.
#[derive(Debug, Default, Clone)]
pub struct MarkovChain {
    successors: HashMap<String, Vec<Option<String>>>,
}

impl MarkovChain {
    /// Builds the chain from raw question texts.
    pub fn train<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut chain = MarkovChain::default();
        for text in texts {
            let tokens = tokenize(&sanitize_sentence(text));
            for (i, word) in tokens.iter().enumerate() {
                chain
                    .successors
                    .entry(word.clone())
                    .or_default()
                    .push(tokens.get(i + 1).cloned());
            }
        }
        chain
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn successors(&self, word: &str) -> Option<&[Option<String>]> {
        self.successors.get(word).map(Vec::as_slice)
    }

    /// Random walk from one of `start_words`, producing at most `max_words` words.
    /// Stops early at an end marker or a word with no recorded successor.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        start_words: &[String],
        max_words: usize,
        rng: &mut R,
    ) -> String {
        let Some(start) = start_words.choose(rng) else {
            return String::new();
        };
        if max_words == 0 {
            return String::new();
        }

        let mut sentence = vec![start.clone()];
        let mut current = start.clone();

        while sentence.len() < max_words {
            let Some(next_words) = self.successors(&current) else {
                break;
            };
            match next_words.choose(rng) {
                Some(Some(next)) => {
                    sentence.push(next.clone());
                    current = next.clone();
                }
                // End-of-sentence marker or no successors recorded
                Some(None) | None => break,
            }
        }

        sentence.join(" ")
    }
}
