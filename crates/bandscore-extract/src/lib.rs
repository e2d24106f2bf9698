//! bandscore-extract — Question, answer-key and summary extraction.
//!
//! Works on plain text that a PDF tool has already produced. Matching is a
//! best-effort line pattern match; anything it cannot find is reported as
//! [`ScoreError::ExtractionFailed`] rather than an empty result.

pub mod answer_key;
pub mod questions;
pub mod summary;

use serde::{Deserialize, Serialize};

use bandscore_core::error::ScoreError;
use bandscore_core::model::AnswerKey;

pub use answer_key::extract_answer_key;
pub use questions::{extract_questions, ExtractedQuestion};
pub use summary::{split_sentences, summarize_passage};

/// Shortest text (in characters, after trimming) worth scanning.
pub const MIN_TEXT_CHARS: usize = 50;

/// Questions and key pulled from one practice test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTest {
    /// Questions in the order they appear.
    pub questions: Vec<ExtractedQuestion>,
    pub answer_key: AnswerKey,
}

impl ExtractedTest {
    pub fn question_texts(&self) -> Vec<&str> {
        self.questions.iter().map(|q| q.text.as_str()).collect()
    }
}

/// Reject text too short to be a practice test.
pub fn check_text(text: &str) -> Result<(), ScoreError> {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(ScoreError::ExtractionFailed(
            "text too short or unreadable; is the PDF text-based?".into(),
        ));
    }
    Ok(())
}

/// Extract both the questions and the answer key.
pub fn extract_test(text: &str) -> Result<ExtractedTest, ScoreError> {
    check_text(text)?;
    let questions = extract_questions(text)?;
    let answer_key = extract_answer_key(text)?;

    if questions.len() != answer_key.len() {
        tracing::warn!(
            questions = questions.len(),
            answers = answer_key.len(),
            "question count does not match answer key size"
        );
    }

    Ok(ExtractedTest {
        questions,
        answer_key,
    })
}
