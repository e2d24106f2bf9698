//! bandscore-core — Answer marking and band score conversion.
//!
//! This crate defines the data model, the answer matcher, the band
//! conversion tables, and the report types that the rest of bandscore
//! builds on. Everything here is synchronous and free of global state:
//! answer keys and table configuration are always passed in explicitly.

pub mod band;
pub mod config;
pub mod error;
pub mod insights;
pub mod matcher;
pub mod model;
pub mod parser;
pub mod report;

pub use band::{Band, BandScoreCalculator, ScoringStrategy};
pub use error::ScoreError;
pub use matcher::mark_answers;
pub use model::{AnswerKey, MarkRecord, QuestionId, ScoreSummary, SectionType, UserResponseSet};
