//! Question generation: combines the three generators and scores the output.
//!
//! Slot layout for `count` questions:
//!   - last slot  → embedding substitution ("What is the significance of ...")
//!   - even slots → Markov sentence seeded from the type word and keywords
//!   - odd slots  → template `i mod len` for the requested type
//! followed by one extra question derived from the most keyword-relevant
//! stored question.
//!
//! Every candidate is scored against the corpus; candidates outside 5–25 words,
//! with unresolved placeholders, or near-duplicates of an accepted question are dropped.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generation::embeddings::EmbeddingTable;
use crate::generation::markov::{MarkovChain, DEFAULT_MAX_WORDS};
use crate::generation::templates::{
    has_unresolved_placeholder, placeholder_count, render, QuestionType,
};
use crate::similarity::{best_match, is_plagiarized, DiceScorer, SimilarityScorer};
use crate::text::{capitalize_first, word_count};

pub const MIN_KEYWORDS: usize = 3;
pub const DEFAULT_COUNT: usize = 5;
pub const MAX_COUNT: usize = 20;

const MIN_QUESTION_WORDS: usize = 5;
const MAX_QUESTION_WORDS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    Markov,
    Template,
    Embedding,
    Corpus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    /// Highest similarity to any stored question, 0–100.
    pub plagiarism_score: f64,
    pub source: GenerationSource,
}

/// Validated generation request.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub keywords: Vec<String>,
    /// Raw type key as requested; unknown keys use the `what` templates.
    pub question_type: String,
    pub count: usize,
}

impl GenerationParams {
    fn parsed_type(&self) -> Option<QuestionType> {
        self.question_type.parse().ok()
    }

    fn template_type(&self) -> QuestionType {
        self.parsed_type().unwrap_or(QuestionType::What)
    }
}

/// Runs the full generation pipeline over the stored corpus.
pub fn generate_questions<R: Rng + ?Sized>(
    corpus: &[String],
    params: &GenerationParams,
    embeddings: &EmbeddingTable,
    rng: &mut R,
) -> Vec<GeneratedQuestion> {
    let scorer = DiceScorer;
    let question_type = params.template_type();
    let chain = MarkovChain::train(corpus.iter().map(String::as_str));
    if chain.is_empty() {
        debug!("Markov chain is empty; Markov slots will hold seed words only");
    }

    let mut start_words = vec![params.question_type.trim().to_lowercase()];
    start_words.extend(params.keywords.iter().map(|k| k.to_lowercase()));

    let mut accepted: Vec<GeneratedQuestion> = Vec::new();

    for i in 0..params.count {
        let (question, source) = if i + 1 == params.count {
            (
                embedding_question(&params.keywords, embeddings),
                GenerationSource::Embedding,
            )
        } else if i % 2 == 0 {
            let sentence = chain.generate(&start_words, DEFAULT_MAX_WORDS, rng);
            (
                format!("{}?", capitalize_first(&sentence)),
                GenerationSource::Markov,
            )
        } else {
            (
                render(question_type.template(i), &params.keywords),
                GenerationSource::Template,
            )
        };

        accept_candidate(&mut accepted, question, source, corpus, &scorer);
    }

    if let Some(question) = question_from_corpus(corpus, params) {
        accept_candidate(&mut accepted, question, GenerationSource::Corpus, corpus, &scorer);
    }

    accepted
}

fn embedding_question(keywords: &[String], embeddings: &EmbeddingTable) -> String {
    let first = keywords.first().map(|k| embeddings.nearest(k)).unwrap_or_default();
    let second = keywords.get(1).map(|k| embeddings.nearest(k)).unwrap_or_default();
    format!("What is the significance of {first} in {second}?")
}

/// Fills the type's first template from the stored question that contains the
/// most keywords. `None` when no stored question mentions any keyword or the
/// type is unknown.
fn question_from_corpus(corpus: &[String], params: &GenerationParams) -> Option<String> {
    let question_type = params.parsed_type()?;
    let lowered: Vec<String> = params.keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut best_relevance = 0usize;
    for text in corpus {
        let text = text.to_lowercase();
        let relevance = lowered.iter().filter(|k| text.contains(k.as_str())).count();
        best_relevance = best_relevance.max(relevance);
    }
    if best_relevance == 0 {
        return None;
    }

    let template = question_type.template(0);
    let used = placeholder_count(template).min(params.keywords.len());
    Some(render(template, &params.keywords[..used]))
}

fn accept_candidate(
    accepted: &mut Vec<GeneratedQuestion>,
    question: String,
    source: GenerationSource,
    corpus: &[String],
    scorer: &dyn SimilarityScorer,
) {
    let words = word_count(&question);
    if !(MIN_QUESTION_WORDS..=MAX_QUESTION_WORDS).contains(&words)
        || has_unresolved_placeholder(&question)
    {
        debug!("Dropping generated candidate ({words} words): {question}");
        return;
    }

    let duplicate = best_match(
        &question,
        accepted.iter().map(|q| q.question.as_str()),
        scorer,
    );
    if is_plagiarized(duplicate.score) {
        debug!(
            "Dropping near-duplicate candidate ({:.2}): {question}",
            duplicate.score
        );
        return;
    }

    let plagiarism = best_match(&question, corpus.iter().map(String::as_str), scorer);
    accepted.push(GeneratedQuestion {
        question,
        plagiarism_score: plagiarism.score,
        source,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn corpus() -> Vec<String> {
        [
            "What is the role of memory in operating systems?",
            "Explain how paging improves memory utilisation in modern kernels.",
            "Why do operating systems use virtual memory for process isolation?",
            "Describe the scheduler in a preemptive operating system kernel.",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn params(question_type: &str, count: usize) -> GenerationParams {
        GenerationParams {
            keywords: vec!["memory".into(), "kernels".into(), "paging".into()],
            question_type: question_type.to_string(),
            count,
        }
    }

    fn embeddings() -> EmbeddingTable {
        EmbeddingTable::parse("memory 1 0.1 0\nstorage 0.9 0.2 0\nkernels 0 1 0.1\nkernel 0.1 0.9 0.1\n").0
    }

    #[test]
    fn test_output_respects_word_bounds_and_placeholders() {
        let mut rng = StdRng::seed_from_u64(11);
        let out = generate_questions(&corpus(), &params("how", 8), &embeddings(), &mut rng);
        assert!(!out.is_empty());
        for q in &out {
            let words = word_count(&q.question);
            assert!((5..=25).contains(&words), "{}", q.question);
            assert!(!has_unresolved_placeholder(&q.question));
            assert!((0.0..=100.0).contains(&q.plagiarism_score));
        }
    }

    #[test]
    fn test_embedding_slot_uses_nearest_words() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = generate_questions(&corpus(), &params("what", 1), &embeddings(), &mut rng);
        let embedded = out
            .iter()
            .find(|q| q.source == GenerationSource::Embedding)
            .expect("embedding question present");
        assert_eq!(
            embedded.question,
            "What is the significance of storage in kernel?"
        );
    }

    #[test]
    fn test_template_slot_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(9);
        let out = generate_questions(&corpus(), &params("why", 3), &embeddings(), &mut rng);
        let template = out
            .iter()
            .find(|q| q.source == GenerationSource::Template)
            .expect("template question present");
        assert_eq!(template.question, "Why does memory influence kernels?");
    }

    #[test]
    fn test_corpus_question_added_for_known_type_only() {
        let mut rng = StdRng::seed_from_u64(2);
        let known = generate_questions(&corpus(), &params("discuss", 2), &embeddings(), &mut rng);
        assert!(known.iter().any(|q| q.source == GenerationSource::Corpus
            && q.question == "Discuss the implications of memory for kernels."));

        let unknown = generate_questions(&corpus(), &params("ponder", 2), &embeddings(), &mut rng);
        assert!(unknown.iter().all(|q| q.source != GenerationSource::Corpus));
    }

    #[test]
    fn test_no_corpus_match_skips_corpus_question() {
        let mut p = params("what", 2);
        p.keywords = vec!["quantum".into(), "biology".into(), "finance".into()];
        let mut rng = StdRng::seed_from_u64(2);
        let out = generate_questions(&corpus(), &p, &EmbeddingTable::empty(), &mut rng);
        assert!(out.iter().all(|q| q.source != GenerationSource::Corpus));
    }

    #[test]
    fn test_accepted_questions_are_not_near_duplicates() {
        let mut rng = StdRng::seed_from_u64(21);
        let out = generate_questions(&corpus(), &params("explain", 12), &embeddings(), &mut rng);
        for (i, a) in out.iter().enumerate() {
            for b in out.iter().skip(i + 1) {
                let score = DiceScorer.score(&a.question, &b.question);
                assert!(score < 80.0, "{} ~ {} ({score})", a.question, b.question);
            }
        }
    }

    #[test]
    fn test_copy_of_stored_question_scores_100() {
        let corpus = vec!["Why does memory influence kernels?".to_string()];
        let mut rng = StdRng::seed_from_u64(1);
        let out = generate_questions(&corpus, &params("why", 3), &embeddings(), &mut rng);
        // Either the Markov walk or the template reproduces the stored question;
        // only the first copy survives de-duplication
        let copies: Vec<_> = out
            .iter()
            .filter(|q| q.question == "Why does memory influence kernels?")
            .collect();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].plagiarism_score, 100.0);
    }
}
