//! Core data model types for bandscore.
//!
//! Answer keys, response sets, per-question marks and section summaries.
//! Question identifiers are normalized to a single integer type at the
//! boundary, before anything reaches the matcher.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::band::{Band, BandScoreCalculator};
use crate::error::ScoreError;

/// Question number within a test (1-based).
pub type QuestionId = u32;

/// Parse a question identifier as written by a user or a file.
///
/// Accepts surrounding whitespace and an optional `Q`/`q` prefix
/// (`"7"`, `" 7 "`, `"Q7"`). Zero and anything non-numeric are rejected.
pub fn parse_question_id(raw: &str) -> Option<QuestionId> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('Q')
        .or_else(|| trimmed.strip_prefix('q'))
        .unwrap_or(trimmed)
        .trim();
    match digits.parse::<QuestionId>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(id),
    }
}

/// Exam section a band table applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Reading,
    Listening,
}

impl SectionType {
    /// All recognized sections.
    pub const ALL: [SectionType; 2] = [SectionType::Reading, SectionType::Listening];
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionType::Reading => write!(f, "reading"),
            SectionType::Listening => write!(f, "listening"),
        }
    }
}

impl FromStr for SectionType {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reading" => Ok(SectionType::Reading),
            "listening" => Ok(SectionType::Listening),
            other => Err(ScoreError::UnknownSection(other.to_string())),
        }
    }
}

/// A question identifier before normalization.
///
/// Submission layers hand over either integers or strings; both are reduced
/// to a [`QuestionId`] before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuestionId {
    Number(i64),
    Text(String),
}

impl RawQuestionId {
    /// Normalize to a positive integer id.
    pub fn normalize(&self) -> Option<QuestionId> {
        match self {
            RawQuestionId::Number(n) => QuestionId::try_from(*n).ok().filter(|id| *id > 0),
            RawQuestionId::Text(s) => parse_question_id(s),
        }
    }
}

impl fmt::Display for RawQuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawQuestionId::Number(n) => write!(f, "{n}"),
            RawQuestionId::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<QuestionId> for RawQuestionId {
    fn from(id: QuestionId) -> Self {
        RawQuestionId::Number(i64::from(id))
    }
}

impl From<&str> for RawQuestionId {
    fn from(s: &str) -> Self {
        RawQuestionId::Text(s.to_string())
    }
}

impl From<String> for RawQuestionId {
    fn from(s: String) -> Self {
        RawQuestionId::Text(s)
    }
}

/// Canonical answers for one test, keyed by question id.
///
/// Immutable once built. Construction rejects zero ids, duplicate ids and
/// blank answers; an empty key can be built but is rejected by the matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<QuestionId, String>",
    into = "BTreeMap<QuestionId, String>"
)]
pub struct AnswerKey {
    entries: BTreeMap<QuestionId, String>,
}

impl AnswerKey {
    /// Build a key from `(id, answer)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = (QuestionId, S)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (id, answer) in entries {
            if id == 0 {
                return Err(ScoreError::InvalidKey(
                    "question ids must be positive".into(),
                ));
            }
            let answer = answer.into();
            if answer.trim().is_empty() {
                return Err(ScoreError::InvalidKey(format!(
                    "question {id} has a blank answer"
                )));
            }
            if map.insert(id, answer).is_some() {
                return Err(ScoreError::InvalidKey(format!(
                    "question {id} appears more than once"
                )));
            }
        }
        Ok(Self { entries: map })
    }

    /// Build a key whose ids still need normalizing.
    pub fn from_raw<I, K, S>(entries: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<RawQuestionId>,
        S: Into<String>,
    {
        let normalized = entries
            .into_iter()
            .map(|(raw, answer)| {
                let raw = raw.into();
                raw.normalize()
                    .map(|id| (id, answer.into()))
                    .ok_or_else(|| ScoreError::InvalidKey(format!("malformed question id {raw}")))
            })
            .collect::<Result<Vec<(QuestionId, String)>, _>>()?;
        Self::from_entries(normalized)
    }

    /// Canonical answer for a question.
    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: QuestionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending question order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.entries.iter().map(|(id, a)| (*id, a.as_str()))
    }

    /// Question ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.entries.keys().copied()
    }
}

impl TryFrom<BTreeMap<QuestionId, String>> for AnswerKey {
    type Error = ScoreError;

    fn try_from(map: BTreeMap<QuestionId, String>) -> Result<Self, Self::Error> {
        Self::from_entries(map)
    }
}

impl From<AnswerKey> for BTreeMap<QuestionId, String> {
    fn from(key: AnswerKey) -> Self {
        key.entries
    }
}

/// Answers submitted by a test taker for one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<QuestionId, String>",
    into = "BTreeMap<QuestionId, String>"
)]
pub struct UserResponseSet {
    answers: BTreeMap<QuestionId, String>,
}

impl UserResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a response set from already-normalized ids.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = (QuestionId, S)>,
        S: Into<String>,
    {
        let mut answers = BTreeMap::new();
        for (id, answer) in entries {
            if id == 0 {
                return Err(ScoreError::InvalidInput(
                    "response question ids must be positive".into(),
                ));
            }
            if answers.insert(id, answer.into()).is_some() {
                return Err(ScoreError::InvalidInput(format!(
                    "question {id} was answered more than once"
                )));
            }
        }
        Ok(Self { answers })
    }

    /// Build a response set from string-or-integer ids.
    pub fn from_raw<I, K, S>(entries: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<RawQuestionId>,
        S: Into<String>,
    {
        let normalized = entries
            .into_iter()
            .map(|(raw, answer)| {
                let raw = raw.into();
                raw.normalize()
                    .map(|id| (id, answer.into()))
                    .ok_or_else(|| {
                        ScoreError::InvalidInput(format!("malformed response question id {raw}"))
                    })
            })
            .collect::<Result<Vec<(QuestionId, String)>, _>>()?;
        Self::from_entries(normalized)
    }

    /// Record (or replace) the answer for one question.
    pub fn insert(&mut self, id: QuestionId, answer: impl Into<String>) {
        self.answers.insert(id, answer.into());
    }

    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.answers.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.answers.keys().copied()
    }
}

impl TryFrom<BTreeMap<QuestionId, String>> for UserResponseSet {
    type Error = ScoreError;

    fn try_from(map: BTreeMap<QuestionId, String>) -> Result<Self, Self::Error> {
        Self::from_entries(map)
    }
}

impl From<UserResponseSet> for BTreeMap<QuestionId, String> {
    fn from(responses: UserResponseSet) -> Self {
        responses.answers
    }
}

/// Outcome of marking a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkRecord {
    pub question_id: QuestionId,
    /// The answer as submitted (empty if the question was skipped).
    pub user_answer: String,
    /// The canonical answer from the key.
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Band outcome for one section attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub section_type: SectionType,
    pub raw_correct_count: u32,
    pub total_questions: u32,
    pub band_score: Band,
}

impl ScoreSummary {
    /// Tally a completed set of marks and convert it to a band.
    pub fn from_marks<'a, I>(
        section_type: SectionType,
        marks: I,
        calculator: &BandScoreCalculator,
    ) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = &'a MarkRecord>,
    {
        let (correct, total) = marks.into_iter().fold((0u32, 0u32), |(c, t), m| {
            (c + u32::from(m.is_correct), t + 1)
        });
        let band_score =
            calculator.band_score(i64::from(correct), i64::from(total), section_type)?;
        Ok(Self {
            section_type,
            raw_correct_count: correct,
            total_questions: total,
            band_score,
        })
    }

    /// Fraction of questions answered correctly, in `0.0..=1.0`.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.raw_correct_count) / f64::from(self.total_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_display_and_parse() {
        assert_eq!(SectionType::Reading.to_string(), "reading");
        assert_eq!("Listening".parse::<SectionType>().unwrap(), SectionType::Listening);
        assert_eq!(" reading ".parse::<SectionType>().unwrap(), SectionType::Reading);
        assert!(matches!(
            "writing".parse::<SectionType>(),
            Err(ScoreError::UnknownSection(s)) if s == "writing"
        ));
    }

    #[test]
    fn question_id_parsing() {
        assert_eq!(parse_question_id("7"), Some(7));
        assert_eq!(parse_question_id(" 12 "), Some(12));
        assert_eq!(parse_question_id("Q3"), Some(3));
        assert_eq!(parse_question_id("q 4"), Some(4));
        assert_eq!(parse_question_id("0"), None);
        assert_eq!(parse_question_id("-1"), None);
        assert_eq!(parse_question_id("abc"), None);
        assert_eq!(parse_question_id(""), None);
    }

    #[test]
    fn raw_ids_normalize_to_same_id() {
        assert_eq!(RawQuestionId::from(5u32).normalize(), Some(5));
        assert_eq!(RawQuestionId::from("5").normalize(), Some(5));
        assert_eq!(RawQuestionId::Number(-2).normalize(), None);
    }

    #[test]
    fn answer_key_rejects_bad_entries() {
        assert!(matches!(
            AnswerKey::from_entries([(0, "A")]),
            Err(ScoreError::InvalidKey(_))
        ));
        assert!(matches!(
            AnswerKey::from_entries([(1, "  ")]),
            Err(ScoreError::InvalidKey(_))
        ));
        assert!(matches!(
            AnswerKey::from_entries([(1, "A"), (1, "B")]),
            Err(ScoreError::InvalidKey(_))
        ));
        assert!(matches!(
            AnswerKey::from_raw([("one", "A")]),
            Err(ScoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn answer_key_from_mixed_raw_ids() {
        let key = AnswerKey::from_raw([
            (RawQuestionId::from("2"), "B"),
            (RawQuestionId::from(1u32), "A"),
        ])
        .unwrap();
        assert_eq!(key.ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(key.get(2), Some("B"));
    }

    #[test]
    fn response_set_rejects_duplicate_after_normalizing() {
        let result = UserResponseSet::from_raw([("1", "A"), ("Q1", "B")]);
        assert!(matches!(result, Err(ScoreError::InvalidInput(_))));
    }

    #[test]
    fn answer_key_serde_uses_plain_map() {
        let key = AnswerKey::from_entries([(1, "A"), (2, "TRUE")]).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"1":"A","2":"TRUE"}"#);
        let back: AnswerKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<AnswerKey>(r#"{"0":"A"}"#).is_err());
    }

    #[test]
    fn response_set_deserialize_validates_ids() {
        let responses: UserResponseSet = serde_json::from_str(r#"{"2":"b","1":""}"#).unwrap();
        assert_eq!(responses.get(1), Some(""));
        assert_eq!(serde_json::to_string(&responses).unwrap(), r#"{"1":"","2":"b"}"#);
        assert!(serde_json::from_str::<UserResponseSet>(r#"{"0":"A"}"#).is_err());
    }

    #[test]
    fn summary_from_marks() {
        let marks: Vec<MarkRecord> = (1..=40)
            .map(|id| MarkRecord {
                question_id: id,
                user_answer: "A".into(),
                correct_answer: "A".into(),
                is_correct: id <= 39,
            })
            .collect();
        let summary = ScoreSummary::from_marks(
            SectionType::Reading,
            &marks,
            &BandScoreCalculator::default(),
        )
        .unwrap();
        assert_eq!(summary.raw_correct_count, 39);
        assert_eq!(summary.total_questions, 40);
        assert_eq!(summary.band_score.value(), 8.5);
        assert!((summary.accuracy() - 0.975).abs() < 1e-9);
    }
}
