//! Numbered question extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use bandscore_core::error::ScoreError;
use bandscore_core::model::QuestionId;

use crate::answer_key::is_answer_key_heading;

/// `1. text`, `1) text`, `Question 1: text`. The `.`/`)` must be followed by
/// whitespace or end the line, so `3.5 million` is not a question.
static QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:question\s+(\d+)\s*[:.)]?|(\d+)[.)](?:\s+|$))\s*(.*)$")
        .expect("question regex")
});

/// A question as it appears in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedQuestion {
    pub number: QuestionId,
    pub text: String,
}

fn start_of_question(line: &str) -> Option<(QuestionId, &str)> {
    let caps = QUESTION_START.captures(line)?;
    let number = caps
        .get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<QuestionId>().ok())
        .filter(|n| *n > 0)?;
    let rest = caps.get(3).map_or("", |m| m.as_str());
    Some((number, rest))
}

/// Collect numbered questions up to the answer-key heading.
///
/// Unnumbered lines after a question continue it; unnumbered lines before
/// the first question (passage text, headings) are skipped. A repeated
/// number keeps its first occurrence.
pub fn extract_questions(text: &str) -> Result<Vec<ExtractedQuestion>, ScoreError> {
    let mut questions: Vec<ExtractedQuestion> = Vec::new();
    let mut seen = HashSet::new();
    let mut current: Option<ExtractedQuestion> = None;

    let mut flush = |current: &mut Option<ExtractedQuestion>, questions: &mut Vec<ExtractedQuestion>| {
        if let Some(q) = current.take() {
            if q.text.is_empty() {
                tracing::debug!(number = q.number, "dropping question with no text");
            } else if seen.insert(q.number) {
                questions.push(q);
            } else {
                tracing::warn!(number = q.number, "duplicate question number, keeping the first");
            }
        }
    };

    for line in text.lines() {
        if is_answer_key_heading(line) {
            break;
        }
        if let Some((number, rest)) = start_of_question(line) {
            flush(&mut current, &mut questions);
            current = Some(ExtractedQuestion {
                number,
                text: rest.trim().to_string(),
            });
        } else if let Some(q) = current.as_mut() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !q.text.is_empty() {
                q.text.push(' ');
            }
            q.text.push_str(line);
        }
    }
    flush(&mut current, &mut questions);

    if questions.is_empty() {
        return Err(ScoreError::ExtractionFailed(
            "no numbered questions found".into(),
        ));
    }

    tracing::debug!(count = questions.len(), "extracted questions");
    Ok(questions)
}
