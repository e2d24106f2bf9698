//! Answer-key extraction.
//!
//! Looks for an `Answer Key` heading and reads `N answer` pairs after it.
//! Answers are limited to the closed forms that can be recognized without
//! understanding the passage: a letter A-D, TRUE/FALSE/NOT GIVEN, YES/NO.

use std::sync::LazyLock;

use regex::Regex;

use bandscore_core::error::ScoreError;
use bandscore_core::model::{AnswerKey, QuestionId};

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*answer\s+key\b\s*:?\s*(.*)$").expect("answer key heading regex")
});

static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*[.):]?\s+(not\s+given|true|false|yes|no|[a-d])\b")
        .expect("answer pair regex")
});

pub(crate) fn is_answer_key_heading(line: &str) -> bool {
    HEADING.is_match(line)
}

fn canonical_answer(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Read the answer key that follows an `Answer Key` heading.
pub fn extract_answer_key(text: &str) -> Result<AnswerKey, ScoreError> {
    let mut lines = text.lines();
    let first = lines
        .by_ref()
        .find_map(|line| HEADING.captures(line))
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()).to_string())
        .ok_or_else(|| ScoreError::ExtractionFailed("no \"Answer Key\" heading found".into()))?;

    let block = std::iter::once(first.as_str())
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n");

    let mut entries: Vec<(QuestionId, String)> = Vec::new();
    for caps in PAIR.captures_iter(&block) {
        let Ok(id) = caps[1].parse::<QuestionId>() else {
            continue;
        };
        if id == 0 {
            continue;
        }
        if entries.iter().any(|(existing, _)| *existing == id) {
            return Err(ScoreError::ExtractionFailed(format!(
                "question {id} appears twice in the answer key"
            )));
        }
        entries.push((id, canonical_answer(&caps[2])));
    }

    if entries.is_empty() {
        return Err(ScoreError::ExtractionFailed(
            "no answers found after the \"Answer Key\" heading".into(),
        ));
    }

    tracing::debug!(count = entries.len(), "extracted answer key");
    AnswerKey::from_entries(entries)
        .map_err(|e| ScoreError::ExtractionFailed(format!("extracted key is unusable: {e}")))
}
