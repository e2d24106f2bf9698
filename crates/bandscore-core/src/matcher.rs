//! Answer matching.
//!
//! Marks a response set against an answer key. Comparison trims surrounding
//! whitespace and ignores case; there is no partial credit or fuzzy match.

use std::collections::BTreeMap;

use crate::error::ScoreError;
use crate::model::{AnswerKey, MarkRecord, QuestionId, UserResponseSet};

/// Normalize an answer for comparison.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Whether a submitted answer matches the canonical one.
pub fn answers_match(user_answer: &str, correct_answer: &str) -> bool {
    normalize_answer(user_answer) == normalize_answer(correct_answer)
}

/// Mark every question in `key` against `responses`.
///
/// Returns one record per key entry, in ascending question order. Questions
/// with no response are marked against an empty answer. Response ids that
/// are not in the key are ignored.
pub fn mark_answers(
    key: &AnswerKey,
    responses: &UserResponseSet,
) -> Result<BTreeMap<QuestionId, MarkRecord>, ScoreError> {
    if key.is_empty() {
        return Err(ScoreError::InvalidKey("answer key is empty".into()));
    }

    let unknown: Vec<QuestionId> = responses.ids().filter(|id| !key.contains(*id)).collect();
    if !unknown.is_empty() {
        tracing::debug!(?unknown, "ignoring responses for questions not in the key");
    }

    let marks: BTreeMap<QuestionId, MarkRecord> = key
        .iter()
        .map(|(id, correct)| {
            let user_answer = responses.get(id).unwrap_or_default();
            let record = MarkRecord {
                question_id: id,
                user_answer: user_answer.to_string(),
                correct_answer: correct.to_string(),
                is_correct: answers_match(user_answer, correct),
            };
            (id, record)
        })
        .collect();

    tracing::debug!(
        questions = marks.len(),
        correct = marks.values().filter(|m| m.is_correct).count(),
        "marked responses"
    );

    Ok(marks)
}
