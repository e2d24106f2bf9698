//! bandscore-report — Report rendering.
//!
//! JSON and markdown output live on `ScoreReport` itself; this crate adds
//! the self-contained HTML page.

pub mod html;
