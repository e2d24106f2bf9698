//! JSON answer-key and response loading.
//!
//! Answer keys and responses arrive as JSON objects keyed by question
//! number. JSON object keys are always strings, so every key passes through
//! [`parse_question_id`] before it reaches the core.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::band::RAW_SCALE;
use crate::error::ScoreError;
use crate::model::{parse_question_id, AnswerKey, QuestionId, UserResponseSet};

fn parse_object(content: &str, what: &str) -> Result<Map<String, Value>> {
    let value: Value =
        serde_json::from_str(content).with_context(|| format!("failed to parse {what} JSON"))?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!(
            "{what} must be a JSON object keyed by question number, found {}",
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Scalar JSON answer as text; numbers are accepted for numeric answers.
fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse an answer key such as `{"1": "A", "2": "TRUE"}`.
pub fn parse_answer_key_json(content: &str) -> Result<AnswerKey> {
    let map = parse_object(content, "answer key")?;
    if map.is_empty() {
        return Err(ScoreError::InvalidKey("answer key is empty".into()).into());
    }

    let mut entries = Vec::with_capacity(map.len());
    for (raw_id, value) in &map {
        let id = parse_question_id(raw_id)
            .ok_or_else(|| ScoreError::InvalidKey(format!("malformed question id {raw_id:?}")))?;
        let answer = answer_text(value).ok_or_else(|| {
            ScoreError::InvalidKey(format!(
                "answer for question {id} must be a string, found {}",
                json_kind(value)
            ))
        })?;
        entries.push((id, answer));
    }

    Ok(AnswerKey::from_entries(entries)?)
}

/// Parse responses such as `{"1": "a", "Q2": "true", "3": null}`.
///
/// Null answers are treated as blank.
pub fn parse_responses_json(content: &str) -> Result<UserResponseSet> {
    let map = parse_object(content, "responses")?;

    let mut entries = Vec::with_capacity(map.len());
    for (raw_id, value) in &map {
        let id = parse_question_id(raw_id).ok_or_else(|| {
            ScoreError::InvalidInput(format!("malformed response question id {raw_id:?}"))
        })?;
        let answer = answer_text(value).ok_or_else(|| {
            ScoreError::InvalidInput(format!(
                "response for question {id} must be a string, found {}",
                json_kind(value)
            ))
        })?;
        entries.push((id, answer));
    }

    Ok(UserResponseSet::from_entries(entries)?)
}

/// Load an answer key from a JSON file.
pub fn load_answer_key(path: &Path) -> Result<AnswerKey> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer key: {}", path.display()))?;
    parse_answer_key_json(&content)
        .with_context(|| format!("failed to load answer key: {}", path.display()))
}

/// Load user responses from a JSON file.
pub fn load_responses(path: &Path) -> Result<UserResponseSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responses: {}", path.display()))?;
    parse_responses_json(&content)
        .with_context(|| format!("failed to load responses: {}", path.display()))
}

/// Load per-question timings (seconds) from a JSON array.
pub fn load_timings(path: &Path) -> Result<Vec<f64>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read timings: {}", path.display()))?;
    let timings: Vec<f64> = serde_json::from_str(&content)
        .with_context(|| format!("timings must be a JSON array of seconds: {}", path.display()))?;
    if let Some(bad) = timings.iter().find(|t| !t.is_finite() || **t < 0.0) {
        return Err(ScoreError::InvalidInput(format!("invalid question time {bad}")).into());
    }
    Ok(timings)
}

/// Serialize an answer key back to pretty JSON.
pub fn answer_key_to_json(key: &AnswerKey) -> Result<String> {
    serde_json::to_string_pretty(key).context("failed to serialize answer key")
}

/// A warning from answer-key validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question (if applicable).
    pub question_id: Option<QuestionId>,
    /// Warning message.
    pub message: String,
}

/// Check an answer key for common issues that do not prevent scoring.
pub fn validate_answer_key(key: &AnswerKey) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let ids: BTreeSet<QuestionId> = key.ids().collect();
    if let (Some(&first), Some(&last)) = (ids.first(), ids.last()) {
        if first != 1 {
            warnings.push(ValidationWarning {
                question_id: Some(first),
                message: format!("numbering starts at {first}, not 1"),
            });
        }
        for id in first..=last {
            if !ids.contains(&id) {
                warnings.push(ValidationWarning {
                    question_id: Some(id),
                    message: "question missing from the key".into(),
                });
            }
        }
    }

    if key.len() != RAW_SCALE as usize {
        warnings.push(ValidationWarning {
            question_id: None,
            message: format!(
                "key has {} questions; full-length sections have {RAW_SCALE}, so the percentage strategy will use its linear fallback",
                key.len()
            ),
        });
    }

    for (id, answer) in key.iter() {
        if answer.split_whitespace().count() > 3 {
            warnings.push(ValidationWarning {
                question_id: Some(id),
                message: format!("answer {answer:?} is longer than three words"),
            });
        }
    }

    warnings
}
