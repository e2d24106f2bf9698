//! Band score conversion.
//!
//! Two conversion strategies are supported and kept separate, since their
//! boundaries differ slightly (for example 80% versus 32/40):
//!
//! - [`ScoringStrategy::RawTable`] (the default): the correct count is
//!   normalized to a 40-point raw score and looked up in a per-section
//!   ascending threshold table.
//! - [`ScoringStrategy::Percentage`]: a section-independent cascade of
//!   percentage cutoffs, used only for full-length (40 question) tests. Any
//!   other length falls back to a coarse linear approximation.
//!
//! Thresholds are inclusive lower bounds. Both tables are data, not code:
//! they are injected into [`BandScoreCalculator`] and can be replaced from
//! the config file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::model::SectionType;

/// Length of a standard section; raw scores are normalized to this scale.
pub const RAW_SCALE: u32 = 40;

const EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Band value
// ---------------------------------------------------------------------------

/// A band score between 0 and 9.0 in half-point steps.
///
/// Stored as a count of half points so that values off the grid cannot be
/// represented. Serializes as a plain float (`6.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Band {
    half_points: u8,
}

impl Band {
    /// Sentinel for "below the lowest threshold".
    pub const ZERO: Band = Band { half_points: 0 };
    /// Highest band.
    pub const MAX: Band = Band { half_points: 18 };

    /// Build from a number of half points (`13` is band 6.5).
    pub const fn from_half_points(half_points: u8) -> Option<Band> {
        if half_points <= Self::MAX.half_points {
            Some(Band { half_points })
        } else {
            None
        }
    }

    /// Build from an exact band value; rejects values off the half-point grid.
    pub fn from_value(value: f64) -> Result<Band, ScoreError> {
        if !value.is_finite() || !(0.0..=9.0).contains(&value) {
            return Err(ScoreError::InvalidInput(format!(
                "band {value} is outside 0-9"
            )));
        }
        let doubled = value * 2.0;
        if (doubled - doubled.round()).abs() > EPSILON {
            return Err(ScoreError::InvalidInput(format!(
                "band {value} is not a multiple of 0.5"
            )));
        }
        Ok(Band {
            half_points: doubled.round() as u8,
        })
    }

    /// Snap an arbitrary value down onto the band grid, clamping to 0-9.
    pub fn floor_from(value: f64) -> Band {
        if !value.is_finite() || value <= 0.0 {
            return Band::ZERO;
        }
        let half_points = (value * 2.0 + EPSILON).floor().min(18.0);
        Band {
            half_points: half_points as u8,
        }
    }

    /// The band as a float (`6.5`).
    pub fn value(self) -> f64 {
        f64::from(self.half_points) / 2.0
    }

    pub fn half_points(self) -> u8 {
        self.half_points
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value())
    }
}

impl TryFrom<f64> for Band {
    type Error = ScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Band::from_value(value)
    }
}

impl From<Band> for f64 {
    fn from(band: Band) -> Self {
        band.value()
    }
}

/// Shorthand for the built-in tables; only ever called with grid values.
const fn band(half_points: u8) -> Band {
    Band { half_points }
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// A validated correct/total pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    correct: u32,
    total: u32,
}

impl Tally {
    /// Validate a correct count against a question total.
    ///
    /// Counts arrive from callers as signed integers; negatives, a zero
    /// total, and `correct > total` are all rejected.
    pub fn new(correct: i64, total: i64) -> Result<Tally, ScoreError> {
        if total <= 0 {
            return Err(ScoreError::InvalidInput(format!(
                "total questions must be positive, got {total}"
            )));
        }
        if correct < 0 {
            return Err(ScoreError::InvalidInput(format!(
                "correct count cannot be negative, got {correct}"
            )));
        }
        if correct > total {
            return Err(ScoreError::InvalidInput(format!(
                "correct count {correct} exceeds total questions {total}"
            )));
        }
        let total = u32::try_from(total)
            .map_err(|_| ScoreError::InvalidInput(format!("total {total} is too large")))?;
        // correct <= total, so this cannot fail once total fits.
        let correct = correct as u32;
        Ok(Tally { correct, total })
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Correct count normalized to the 40-point raw scale.
    pub fn raw_score(&self) -> f64 {
        f64::from(self.correct) * f64::from(RAW_SCALE) / f64::from(self.total)
    }

    /// Correct count as a percentage of the total.
    pub fn percentage(&self) -> f64 {
        f64::from(self.correct) * 100.0 / f64::from(self.total)
    }
}

// ---------------------------------------------------------------------------
// Raw-score threshold tables
// ---------------------------------------------------------------------------

/// One step of a threshold table: raw scores at or above `min_raw` earn `band`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub min_raw: f64,
    pub band: Band,
}

/// Ascending step function from a 0-40 raw score to a band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Threshold>", into = "Vec<Threshold>")]
pub struct ThresholdTable {
    thresholds: Vec<Threshold>,
}

impl ThresholdTable {
    /// Build a table, checking that it is a well-formed step function.
    pub fn new(thresholds: Vec<Threshold>) -> Result<Self, ScoreError> {
        if thresholds.is_empty() {
            return Err(ScoreError::InvalidInput(
                "threshold table has no entries".into(),
            ));
        }
        for t in &thresholds {
            if !t.min_raw.is_finite() || !(0.0..=f64::from(RAW_SCALE)).contains(&t.min_raw) {
                return Err(ScoreError::InvalidInput(format!(
                    "threshold {} is outside 0-{RAW_SCALE}",
                    t.min_raw
                )));
            }
        }
        for pair in thresholds.windows(2) {
            if pair[1].min_raw <= pair[0].min_raw {
                return Err(ScoreError::InvalidInput(format!(
                    "thresholds must be strictly ascending ({} then {})",
                    pair[0].min_raw, pair[1].min_raw
                )));
            }
            if pair[1].band < pair[0].band {
                return Err(ScoreError::InvalidInput(format!(
                    "band drops from {} to {} at threshold {}",
                    pair[0].band, pair[1].band, pair[1].min_raw
                )));
            }
        }
        Ok(Self { thresholds })
    }

    /// Band for a raw score: the band of the largest threshold `<= raw`.
    pub fn lookup(&self, raw: f64) -> Band {
        let mut result = Band::ZERO;
        for t in &self.thresholds {
            if raw + EPSILON >= t.min_raw {
                result = t.band;
            } else {
                break;
            }
        }
        result
    }

    pub fn thresholds(&self) -> &[Threshold] {
        &self.thresholds
    }

    /// Built-in reading table.
    pub fn reading() -> Self {
        Self::from_static(&[
            (0.0, band(0)),
            (13.0, band(6)),
            (15.0, band(7)),
            (18.0, band(8)),
            (23.0, band(10)),
            (27.0, band(12)),
            (30.0, band(13)),
            (33.0, band(14)),
            (35.0, band(15)),
            (37.0, band(16)),
            (39.0, band(17)),
            (40.0, band(18)),
        ])
    }

    /// Built-in listening table. Coarser than reading at the low end.
    pub fn listening() -> Self {
        Self::from_static(&[
            (0.0, band(0)),
            (13.0, band(6)),
            (16.0, band(8)),
            (23.0, band(10)),
            (27.0, band(12)),
            (30.0, band(13)),
            (32.0, band(14)),
            (35.0, band(15)),
            (37.0, band(16)),
            (39.0, band(17)),
            (40.0, band(18)),
        ])
    }

    fn from_static(rows: &[(f64, Band)]) -> Self {
        Self {
            thresholds: rows
                .iter()
                .map(|&(min_raw, band)| Threshold { min_raw, band })
                .collect(),
        }
    }
}

impl TryFrom<Vec<Threshold>> for ThresholdTable {
    type Error = ScoreError;

    fn try_from(thresholds: Vec<Threshold>) -> Result<Self, Self::Error> {
        Self::new(thresholds)
    }
}

impl From<ThresholdTable> for Vec<Threshold> {
    fn from(table: ThresholdTable) -> Self {
        table.thresholds
    }
}

/// Per-section raw-score tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTables {
    #[serde(default = "ThresholdTable::reading")]
    pub reading: ThresholdTable,
    #[serde(default = "ThresholdTable::listening")]
    pub listening: ThresholdTable,
}

impl BandTables {
    pub fn for_section(&self, section: SectionType) -> &ThresholdTable {
        match section {
            SectionType::Reading => &self.reading,
            SectionType::Listening => &self.listening,
        }
    }
}

impl Default for BandTables {
    fn default() -> Self {
        Self {
            reading: ThresholdTable::reading(),
            listening: ThresholdTable::listening(),
        }
    }
}

// ---------------------------------------------------------------------------
// Percentage cascade
// ---------------------------------------------------------------------------

/// Percentages at or above `min_percent` earn `band`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentCutoff {
    pub min_percent: f64,
    pub band: Band,
}

/// Percentage-based conversion for full-length tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageCascade {
    /// Only tests with exactly this many questions use the cutoffs.
    #[serde(default = "default_full_length")]
    pub full_length: u32,
    /// Cutoffs in any order; the highest satisfied one wins.
    #[serde(default = "default_cutoffs")]
    pub cutoffs: Vec<PercentCutoff>,
    /// Band when no cutoff is reached.
    #[serde(default = "default_floor")]
    pub floor: Band,
}

fn default_full_length() -> u32 {
    RAW_SCALE
}

fn default_cutoffs() -> Vec<PercentCutoff> {
    [
        (97.5, band(18)),
        (92.5, band(17)),
        (87.5, band(16)),
        (80.0, band(15)),
        (72.5, band(14)),
        (65.0, band(13)),
        (57.5, band(12)),
        (50.0, band(11)),
    ]
    .into_iter()
    .map(|(min_percent, band)| PercentCutoff { min_percent, band })
    .collect()
}

fn default_floor() -> Band {
    band(10)
}

impl Default for PercentageCascade {
    fn default() -> Self {
        Self {
            full_length: default_full_length(),
            cutoffs: default_cutoffs(),
            floor: default_floor(),
        }
    }
}

impl PercentageCascade {
    /// Check cutoffs are in range, unique, and never lower the band as the
    /// percentage rises.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.full_length == 0 {
            return Err(ScoreError::InvalidInput(
                "percentage full_length must be positive".into(),
            ));
        }
        let mut sorted = self.cutoffs.clone();
        for c in &sorted {
            if !c.min_percent.is_finite() || !(0.0..=100.0).contains(&c.min_percent) {
                return Err(ScoreError::InvalidInput(format!(
                    "percentage cutoff {} is outside 0-100",
                    c.min_percent
                )));
            }
        }
        sorted.sort_by(|a, b| a.min_percent.total_cmp(&b.min_percent));
        for pair in sorted.windows(2) {
            if pair[0].min_percent == pair[1].min_percent {
                return Err(ScoreError::InvalidInput(format!(
                    "duplicate percentage cutoff {}",
                    pair[0].min_percent
                )));
            }
            if pair[1].band < pair[0].band {
                return Err(ScoreError::InvalidInput(format!(
                    "band drops from {} to {} at {}%",
                    pair[0].band, pair[1].band, pair[1].min_percent
                )));
            }
        }
        if let Some(lowest) = sorted.first() {
            if lowest.band < self.floor {
                return Err(ScoreError::InvalidInput(format!(
                    "floor band {} is above the lowest cutoff band {}",
                    self.floor, lowest.band
                )));
            }
        }
        Ok(())
    }

    /// Convert a tally. Non-standard lengths use `round(percentage / 10, 1)`
    /// snapped down to the half-point grid.
    pub fn lookup(&self, tally: Tally) -> Band {
        let percentage = tally.percentage();
        if tally.total() != self.full_length {
            let linear = (percentage / 10.0 * 10.0).round() / 10.0;
            return Band::floor_from(linear);
        }
        self.cutoffs
            .iter()
            .filter(|c| percentage + EPSILON >= c.min_percent)
            .max_by(|a, b| a.min_percent.total_cmp(&b.min_percent))
            .map(|c| c.band)
            .unwrap_or(self.floor)
    }
}

// ---------------------------------------------------------------------------
// Strategy selection
// ---------------------------------------------------------------------------

/// Which conversion table to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringStrategy {
    /// Per-section 0-40 raw-score threshold table.
    #[default]
    RawTable,
    /// Percentage cascade for 40-question tests.
    Percentage,
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringStrategy::RawTable => write!(f, "raw-table"),
            ScoringStrategy::Percentage => write!(f, "percentage"),
        }
    }
}

impl FromStr for ScoringStrategy {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw-table" | "raw" | "table" => Ok(ScoringStrategy::RawTable),
            "percentage" | "percent" | "cascade" => Ok(ScoringStrategy::Percentage),
            other => Err(ScoreError::InvalidInput(format!(
                "unknown scoring strategy: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Converts correct counts to bands using injected tables.
///
/// Holds no mutable state; one instance can be shared across sessions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandScoreCalculator {
    strategy: ScoringStrategy,
    tables: BandTables,
    cascade: PercentageCascade,
}

impl BandScoreCalculator {
    pub fn new(strategy: ScoringStrategy, tables: BandTables, cascade: PercentageCascade) -> Self {
        Self {
            strategy,
            tables,
            cascade,
        }
    }

    /// Same tables, different strategy.
    pub fn with_strategy(mut self, strategy: ScoringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.strategy
    }

    pub fn tables(&self) -> &BandTables {
        &self.tables
    }

    pub fn cascade(&self) -> &PercentageCascade {
        &self.cascade
    }

    /// Band for `correct` out of `total` in the given section.
    pub fn band_score(
        &self,
        correct: i64,
        total: i64,
        section: SectionType,
    ) -> Result<Band, ScoreError> {
        let tally = Tally::new(correct, total)?;
        let band = match self.strategy {
            ScoringStrategy::RawTable => self.tables.for_section(section).lookup(tally.raw_score()),
            ScoringStrategy::Percentage => self.cascade.lookup(tally),
        };
        tracing::debug!(
            correct,
            total,
            %section,
            strategy = %self.strategy,
            %band,
            "converted tally to band"
        );
        Ok(band)
    }

    /// As [`band_score`](Self::band_score), with the section given by name.
    pub fn band_score_for(
        &self,
        correct: i64,
        total: i64,
        section: &str,
    ) -> Result<Band, ScoreError> {
        let section: SectionType = section.parse()?;
        self.band_score(correct, total, section)
    }
}
