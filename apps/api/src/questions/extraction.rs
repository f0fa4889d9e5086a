//! Question extraction from PDF text.
//!
//! Lines that look like a question start open a new candidate; following lines
//! are joined onto it until the next start. Candidates are then split into
//! complete/incomplete by the noun+verb heuristic.

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use regex::{Regex, RegexSet};
use serde::Serialize;

use crate::questions::pos::has_noun_and_verb;

const STARTER_WORDS: &[&str] = &[
    "what", "why", "how", "where", "when", "who", "which", "explain", "describe", "discuss",
    "analyze", "analyse", "compare", "evaluate", "summarize", "illustrate", "examine",
    "propose", "imagine", "assume", "given", "state", "list", "define", "identify", "justify",
    "outline", "provide", "suggest", "relate", "assess", "debate", "formulate", "clarify",
    "critique", "review", "create", "design", "devise", "predict", "contrast", "plan",
    "develop", "defend", "choose", "recommend", "determine", "conclude", "validate",
    "highlight", "translate", "show", "write", "estimate", "prove", "quantify", "name",
    "select", "solve", "derive", "calculate", "trace", "differentiate", "distinguish",
];

fn question_start_patterns() -> &'static RegexSet {
    static PATTERNS: OnceLock<RegexSet> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let starters = format!(r"(?i)^({})\b", STARTER_WORDS.join("|"));
        RegexSet::new([
            r"^(Q\.?\s*)?\d+\s*[.):]\s*",   // 1.  1)  Q1.  Q.2:
            r"^[a-zA-Z][.)]\s",             // a) b.
            r"^[(\[][a-zA-Z0-9]{1,4}[)\]]", // (a) [b] (iv)
            starters.as_str(),
            r"\?$",
        ])
        .expect("question start patterns are valid")
    })
}

fn line_break_regex() -> &'static Regex {
    static BREAKS: OnceLock<Regex> = OnceLock::new();
    BREAKS.get_or_init(|| Regex::new(r"(\r?\n)+").expect("line break pattern is valid"))
}

/// Output of a PDF extraction pass.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedQuestions {
    /// Candidates with both a noun and a verb.
    pub complete: Vec<String>,
    /// Candidates missing a noun or a verb.
    pub incomplete: Vec<String>,
    /// Non-empty lines seen before the first question start.
    pub undetected: Vec<String>,
}

/// True when a trimmed line opens a new question.
pub fn is_question_start(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && question_start_patterns().is_match(line)
}

/// Splits raw text into question candidates, joining continuation lines.
pub fn split_candidates(text: &str) -> (Vec<String>, Vec<String>) {
    let mut candidates = Vec::new();
    let mut undetected = Vec::new();
    let mut current = String::new();

    for line in line_break_regex().split(text) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_question_start(line) {
            if !current.is_empty() {
                candidates.push(std::mem::take(&mut current));
            }
            current.push_str(line);
        } else if !current.is_empty() {
            current.push(' ');
            current.push_str(line);
        } else {
            undetected.push(line.to_string());
        }
    }

    if !current.is_empty() {
        candidates.push(current);
    }

    (candidates, undetected)
}

/// Full extraction: split into candidates, then classify completeness.
pub fn extract_questions(text: &str) -> ExtractedQuestions {
    let (candidates, undetected) = split_candidates(text);
    let (complete, incomplete): (Vec<String>, Vec<String>) =
        candidates.into_iter().partition(|c| has_noun_and_verb(c));
    ExtractedQuestions {
        complete,
        incomplete,
        undetected,
    }
}

/// Extracts plain text from PDF bytes.
pub fn pdf_to_text(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow!("Failed to extract text from PDF: {e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_and_lettered_lines_start_questions() {
        assert!(is_question_start("1. Define an operating system."));
        assert!(is_question_start("12) Explain paging"));
        assert!(is_question_start("Q3: Compare TCP and UDP"));
        assert!(is_question_start("a) State two advantages"));
        assert!(is_question_start("(iv) Give an example"));
        assert!(is_question_start("[b] Sketch the circuit"));
    }

    #[test]
    fn test_starter_words_and_question_marks() {
        assert!(is_question_start("Explain the role of a scheduler"));
        assert!(is_question_start("why is the sky blue"));
        assert!(is_question_start("The scheduler picks which task?"));
        assert!(!is_question_start("Whatever happens next"));
        assert!(!is_question_start("The kernel manages memory."));
        assert!(!is_question_start("   "));
    }

    #[test]
    fn test_continuation_lines_are_joined() {
        let text = "Department of Computing\nFinal Exam\n\n1. Explain how virtual memory\nisolates processes.\n2. What is a page fault?\n";
        let (candidates, undetected) = split_candidates(text);
        assert_eq!(
            candidates,
            vec![
                "1. Explain how virtual memory isolates processes.".to_string(),
                "2. What is a page fault?".to_string(),
            ]
        );
        assert_eq!(undetected, vec!["Department of Computing", "Final Exam"]);
    }

    #[test]
    fn test_extract_classifies_completeness() {
        let text = "1. Explain the purpose of a mutex.\n2. Section B\n3) Why are semaphores used?";
        let extracted = extract_questions(text);
        assert_eq!(
            extracted.complete,
            vec![
                "1. Explain the purpose of a mutex.".to_string(),
                "3) Why are semaphores used?".to_string(),
            ]
        );
        assert_eq!(extracted.incomplete, vec!["2. Section B".to_string()]);
        assert!(extracted.undetected.is_empty());
    }

    #[test]
    fn test_windows_line_endings() {
        let (candidates, _) = split_candidates("1. What is DNS?\r\n2. What is ARP?\r\n");
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert_eq!(extract_questions(""), ExtractedQuestions::default());
    }

    #[test]
    fn test_invalid_pdf_bytes_error() {
        assert!(pdf_to_text(b"not a pdf").is_err());
    }
}
