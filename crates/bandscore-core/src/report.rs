//! Score report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::band::{BandScoreCalculator, ScoringStrategy};
use crate::error::ScoreError;
use crate::insights::SectionInsights;
use crate::matcher::mark_answers;
use crate::model::{AnswerKey, MarkRecord, ScoreSummary, SectionType, UserResponseSet};

/// A complete scored attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Name of the practice test.
    pub test_name: String,
    /// Conversion strategy used for the band.
    pub strategy: ScoringStrategy,
    /// Headline result.
    pub summary: ScoreSummary,
    /// One record per key question, ascending.
    pub marks: Vec<MarkRecord>,
    /// Passage accuracy and review lists.
    pub insights: SectionInsights,
}

impl ScoreReport {
    /// Mark `responses`, convert to a band, and collect insights.
    pub fn score(
        test_name: impl Into<String>,
        section: SectionType,
        key: &AnswerKey,
        responses: &UserResponseSet,
        calculator: &BandScoreCalculator,
        timings: Option<&[f64]>,
    ) -> Result<Self, ScoreError> {
        let marks = mark_answers(key, responses)?;
        let summary = ScoreSummary::from_marks(section, marks.values(), calculator)?;
        let insights = SectionInsights::compute(marks.values(), timings);

        tracing::info!(
            %section,
            correct = summary.raw_correct_count,
            total = summary.total_questions,
            band = %summary.band_score,
            "scored attempt"
        );

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            test_name: test_name.into(),
            strategy: calculator.strategy(),
            summary,
            marks: marks.into_values().collect(),
            insights,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ScoreReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let s = &self.summary;

        md.push_str(&format!("## {} ({})\n\n", self.test_name, s.section_type));
        md.push_str(&format!(
            "**Band {}** with {}/{} correct ({:.1}%), {} conversion\n\n",
            s.band_score,
            s.raw_correct_count,
            s.total_questions,
            s.accuracy() * 100.0,
            self.strategy
        ));

        if !self.insights.passages.is_empty() {
            md.push_str("### Passages\n\n");
            md.push_str("| Passage | Correct | Accuracy |\n");
            md.push_str("|---------|---------|----------|\n");
            for p in &self.insights.passages {
                md.push_str(&format!(
                    "| {} | {}/{} | {:.1}% |\n",
                    p.passage, p.correct, p.total, p.accuracy_percent
                ));
            }
            md.push('\n');
        }

        if !self.insights.review.is_empty() {
            md.push_str("### Review\n\n");
            md.push_str("| Question | Your answer | Correct answer |\n");
            md.push_str("|----------|-------------|----------------|\n");
            for m in self.marks.iter().filter(|m| !m.is_correct) {
                let given = if m.user_answer.trim().is_empty() {
                    "-"
                } else {
                    m.user_answer.as_str()
                };
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    m.question_id, given, m.correct_answer
                ));
            }
            md.push('\n');
        }

        if let Some(timing) = &self.insights.timing {
            md.push_str(&format!(
                "Time: {:.0}s total, {:.1}s per question",
                timing.total_secs, timing.mean_secs
            ));
            if let Some((id, secs)) = timing.slowest {
                md.push_str(&format!(", slowest Q{id} ({secs:.0}s)"));
            }
            md.push('\n');
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn full_key() -> AnswerKey {
        AnswerKey::from_entries((1..=40).map(|id| (id, "A"))).unwrap()
    }

    fn responses_with_correct(n: QuestionId) -> UserResponseSet {
        UserResponseSet::from_entries((1..=40).map(|id| (id, if id <= n { "a" } else { "b" })))
            .unwrap()
    }

    #[test]
    fn score_full_section() {
        let report = ScoreReport::score(
            "Practice 1",
            SectionType::Listening,
            &full_key(),
            &responses_with_correct(32),
            &BandScoreCalculator::default(),
            None,
        )
        .unwrap();

        assert_eq!(report.summary.raw_correct_count, 32);
        assert_eq!(report.summary.band_score.value(), 7.0);
        assert_eq!(report.marks.len(), 40);
        assert_eq!(report.insights.review.len(), 8);
        assert_eq!(report.strategy, ScoringStrategy::RawTable);
    }

    #[test]
    fn score_rejects_empty_key() {
        let result = ScoreReport::score(
            "Empty",
            SectionType::Reading,
            &AnswerKey::default(),
            &UserResponseSet::new(),
            &BandScoreCalculator::default(),
            None,
        );
        assert!(matches!(result, Err(ScoreError::InvalidKey(_))));
    }

    #[test]
    fn json_roundtrip() {
        let report = ScoreReport::score(
            "Practice 1",
            SectionType::Reading,
            &full_key(),
            &responses_with_correct(39),
            &BandScoreCalculator::default(),
            None,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = ScoreReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.summary, report.summary);
        assert_eq!(loaded.marks, report.marks);
    }

    #[test]
    fn markdown_output() {
        let report = ScoreReport::score(
            "Practice 2",
            SectionType::Reading,
            &full_key(),
            &responses_with_correct(30),
            &BandScoreCalculator::default(),
            Some(&[30.0; 40][..]),
        )
        .unwrap();
        let md = report.to_markdown();
        assert!(md.contains("Practice 2"));
        assert!(md.contains("Band 6.5"));
        assert!(md.contains("### Review"));
        assert!(md.contains("| 31 | b | A |"));
        assert!(md.contains("1200s total"));
    }
}
