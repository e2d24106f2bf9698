//! Per-passage accuracy, review lists, and timing statistics.
//!
//! These are derived from a finished set of marks and feed the reports.
//! Rendering them (charts, tables) is left to the report layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{MarkRecord, QuestionId};

/// Last question number of each passage; anything later is the final passage.
const PASSAGE_BOUNDARIES: [QuestionId; 2] = [13, 26];

/// Passage (1-based) a question belongs to.
pub fn passage_for(question_id: QuestionId) -> u32 {
    PASSAGE_BOUNDARIES
        .iter()
        .position(|&last| question_id <= last)
        .map(|idx| idx as u32 + 1)
        .unwrap_or(PASSAGE_BOUNDARIES.len() as u32 + 1)
}

/// Accuracy within one passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageAccuracy {
    pub passage: u32,
    pub correct: u32,
    pub total: u32,
    /// Percentage correct, `0.0..=100.0`.
    pub accuracy_percent: f64,
}

/// Timing statistics for an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    pub total_secs: f64,
    pub mean_secs: f64,
    /// Question that took longest, with its time.
    pub slowest: Option<(QuestionId, f64)>,
}

/// Everything a report needs beyond the headline band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInsights {
    pub passages: Vec<PassageAccuracy>,
    /// Incorrectly answered questions, ascending.
    pub review: Vec<QuestionId>,
    /// Questions left blank, ascending.
    pub unanswered: Vec<QuestionId>,
    #[serde(default)]
    pub timing: Option<TimingStats>,
}

impl SectionInsights {
    /// Derive insights from marks.
    ///
    /// `timings` are seconds per question in ascending question order; they
    /// are ignored unless there is exactly one per mark.
    pub fn compute<'a, I>(marks: I, timings: Option<&[f64]>) -> Self
    where
        I: IntoIterator<Item = &'a MarkRecord>,
    {
        let mut marks: Vec<&MarkRecord> = marks.into_iter().collect();
        marks.sort_by_key(|m| m.question_id);

        let mut per_passage: BTreeMap<u32, (u32, u32)> = BTreeMap::new();
        for m in &marks {
            let entry = per_passage.entry(passage_for(m.question_id)).or_default();
            entry.0 += u32::from(m.is_correct);
            entry.1 += 1;
        }
        let passages = per_passage
            .into_iter()
            .map(|(passage, (correct, total))| PassageAccuracy {
                passage,
                correct,
                total,
                accuracy_percent: f64::from(correct) * 100.0 / f64::from(total),
            })
            .collect();

        let review = marks
            .iter()
            .filter(|m| !m.is_correct)
            .map(|m| m.question_id)
            .collect();
        let unanswered = marks
            .iter()
            .filter(|m| m.user_answer.trim().is_empty())
            .map(|m| m.question_id)
            .collect();

        let timing = match timings {
            Some(t) if t.len() == marks.len() && !t.is_empty() => {
                Some(timing_stats(marks.iter().map(|m| m.question_id).zip(t.iter().copied())))
            }
            Some(t) => {
                tracing::warn!(
                    timings = t.len(),
                    questions = marks.len(),
                    "timing count does not match question count, ignoring timings"
                );
                None
            }
            None => None,
        };

        Self {
            passages,
            review,
            unanswered,
            timing,
        }
    }
}

fn timing_stats(per_question: impl Iterator<Item = (QuestionId, f64)>) -> TimingStats {
    let mut total = 0.0;
    let mut count = 0usize;
    let mut slowest: Option<(QuestionId, f64)> = None;
    for (id, secs) in per_question {
        total += secs;
        count += 1;
        if slowest.map_or(true, |(_, s)| secs > s) {
            slowest = Some((id, secs));
        }
    }
    TimingStats {
        total_secs: total,
        mean_secs: if count == 0 { 0.0 } else { total / count as f64 },
        slowest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(id: QuestionId, user: &str, correct: bool) -> MarkRecord {
        MarkRecord {
            question_id: id,
            user_answer: user.into(),
            correct_answer: "A".into(),
            is_correct: correct,
        }
    }

    #[test]
    fn passage_boundaries() {
        assert_eq!(passage_for(1), 1);
        assert_eq!(passage_for(13), 1);
        assert_eq!(passage_for(14), 2);
        assert_eq!(passage_for(26), 2);
        assert_eq!(passage_for(27), 3);
        assert_eq!(passage_for(40), 3);
    }

    #[test]
    fn per_passage_accuracy() {
        let marks: Vec<MarkRecord> = (1..=40)
            .map(|id| mark(id, "A", id <= 13 || id % 2 == 0))
            .collect();
        let insights = SectionInsights::compute(&marks, None);

        assert_eq!(insights.passages.len(), 3);
        assert_eq!(insights.passages[0].correct, 13);
        assert_eq!(insights.passages[0].accuracy_percent, 100.0);
        assert_eq!(insights.passages[1].total, 13);
        assert_eq!(insights.passages[2].total, 14);
        assert_eq!(insights.passages[2].correct, 7);
    }

    #[test]
    fn review_and_unanswered_lists() {
        let marks = vec![mark(3, "", false), mark(1, "A", true), mark(2, "B", false)];
        let insights = SectionInsights::compute(&marks, None);
        assert_eq!(insights.review, vec![2, 3]);
        assert_eq!(insights.unanswered, vec![3]);
        assert!(insights.timing.is_none());
    }

    #[test]
    fn timings_follow_question_order() {
        let marks = vec![mark(2, "A", true), mark(1, "A", true), mark(3, "A", true)];
        let insights = SectionInsights::compute(&marks, Some(&[10.0, 40.0, 10.0][..]));
        let timing = insights.timing.unwrap();
        assert_eq!(timing.total_secs, 60.0);
        assert_eq!(timing.mean_secs, 20.0);
        assert_eq!(timing.slowest, Some((2, 40.0)));
    }

    #[test]
    fn mismatched_timings_are_ignored() {
        let marks = vec![mark(1, "A", true), mark(2, "A", true)];
        let insights = SectionInsights::compute(&marks, Some(&[10.0][..]));
        assert!(insights.timing.is_none());
    }
}
