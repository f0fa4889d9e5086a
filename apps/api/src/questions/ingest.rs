//! Saving submitted questions with plagiarism annotations.
//!
//! Each line is compared against every stored question and every line saved
//! earlier in the same batch, so pasting the same question twice flags the
//! second copy.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::question::QuestionRow;
use crate::questions::pos::detect_topics;
use crate::questions::store::{self, NewQuestion};
use crate::similarity::{best_match, SimilarityScorer};

pub const MAX_QUESTION_CHARS: usize = 2000;
const TOPIC_LIMIT: usize = 3;

/// Splits submitted text into trimmed, non-blank lines.
pub fn split_lines(text: &str) -> Result<Vec<String>, AppError> {
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(AppError::Validation("Question text is required".to_string()));
    }
    if let Some(long) = lines.iter().find(|l| l.chars().count() > MAX_QUESTION_CHARS) {
        return Err(AppError::Validation(format!(
            "Each question must be at most {MAX_QUESTION_CHARS} characters (got {})",
            long.chars().count()
        )));
    }
    Ok(lines)
}

/// Builds annotated rows for `lines`, growing `corpus` as each line is accepted.
pub fn annotate(
    lines: Vec<String>,
    corpus: &mut Vec<String>,
    scorer: &dyn SimilarityScorer,
) -> Vec<NewQuestion> {
    let mut annotated = Vec::with_capacity(lines.len());
    for text in lines {
        let found = best_match(&text, corpus.iter().map(String::as_str), scorer);
        let is_plagiarized = found.is_plagiarized();
        // Only flagged rows point at the question they copy
        let most_similar_question = if is_plagiarized { found.most_similar } else { None };
        annotated.push(NewQuestion {
            topics: detect_topics(&text, TOPIC_LIMIT),
            is_plagiarized,
            plagiarism_score: found.score,
            most_similar_question,
            text: text.clone(),
        });
        corpus.push(text);
    }
    annotated
}

pub async fn save_questions(
    pool: &PgPool,
    lines: Vec<String>,
    scorer: &dyn SimilarityScorer,
) -> Result<Vec<QuestionRow>> {
    let mut corpus = store::all_texts(pool).await?;
    let annotated = annotate(lines, &mut corpus, scorer);

    let mut saved = Vec::with_capacity(annotated.len());
    for question in annotated {
        saved.push(store::insert_question(pool, question).await?);
    }

    let flagged = saved.iter().filter(|q| q.is_plagiarized).count();
    info!("Saved {} questions ({flagged} flagged as plagiarized)", saved.len());
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::DiceScorer;

    #[test]
    fn test_split_lines_drops_blanks() {
        let lines = split_lines("  What is TCP?\n\n   \nDefine latency.\r\n").unwrap();
        assert_eq!(lines, vec!["What is TCP?", "Define latency."]);
    }

    #[test]
    fn test_split_lines_rejects_empty_and_oversized() {
        assert!(matches!(split_lines(" \n\t"), Err(AppError::Validation(_))));
        let long = "a".repeat(MAX_QUESTION_CHARS + 1);
        assert!(split_lines(&long).is_err());
        assert!(split_lines(&"a".repeat(MAX_QUESTION_CHARS)).is_ok());
    }

    #[test]
    fn test_annotate_against_stored_corpus() {
        let mut corpus = vec!["What is the role of the kernel scheduler?".to_string()];
        let rows = annotate(
            vec![
                "What is the role of the kernel scheduler?".into(),
                "Describe photosynthesis in plants.".into(),
            ],
            &mut corpus,
            &DiceScorer,
        );
        assert!(rows[0].is_plagiarized);
        assert_eq!(rows[0].plagiarism_score, 100.0);
        assert!(!rows[1].is_plagiarized);
        assert!(rows[1].plagiarism_score < 80.0);
        assert!(rows[1].most_similar_question.is_none());
        assert_eq!(corpus.len(), 3);
    }

    #[test]
    fn test_unflagged_rows_keep_no_similar_question() {
        let mut corpus = vec!["What is the role of the kernel scheduler?".to_string()];
        let rows = annotate(
            vec!["What is the role of paging?".into()],
            &mut corpus,
            &DiceScorer,
        );
        assert!(rows[0].plagiarism_score > 0.0);
        assert!(rows[0].plagiarism_score < 80.0);
        assert!(!rows[0].is_plagiarized);
        assert!(rows[0].most_similar_question.is_none());
    }

    #[test]
    fn test_duplicate_within_batch_is_flagged() {
        let mut corpus = Vec::new();
        let rows = annotate(
            vec![
                "Explain how paging works.".into(),
                "Explain how paging works.".into(),
            ],
            &mut corpus,
            &DiceScorer,
        );
        assert!(!rows[0].is_plagiarized);
        assert_eq!(rows[0].plagiarism_score, 0.0);
        assert!(rows[0].most_similar_question.is_none());
        assert!(rows[1].is_plagiarized);
        assert_eq!(
            rows[1].most_similar_question.as_deref(),
            Some("Explain how paging works.")
        );
    }

    #[test]
    fn test_topics_are_detected() {
        let mut corpus = Vec::new();
        let rows = annotate(
            vec!["How does paging interact with the kernel?".into()],
            &mut corpus,
            &DiceScorer,
        );
        assert!(rows[0].topics.contains(&"paging".to_string()));
        assert!(rows[0].topics.len() <= 3);
    }
}
