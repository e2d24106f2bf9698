pub mod band;
pub mod extract;
pub mod init;
pub mod score;
pub mod summarize;
pub mod tables;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use bandscore_core::band::{BandScoreCalculator, ScoringStrategy};
use bandscore_core::config::{load_config_from, BandscoreConfig};
use bandscore_core::model::SectionType;

/// Config plus the section and calculator after command-line overrides.
pub struct Resolved {
    pub config: BandscoreConfig,
    pub section: SectionType,
    pub calculator: BandScoreCalculator,
}

pub fn resolve(
    config_path: Option<&Path>,
    section: Option<&str>,
    strategy: Option<&str>,
) -> Result<Resolved> {
    let config = load_config_from(config_path)?;
    let section = match section {
        Some(s) => s.parse::<SectionType>()?,
        None => config.default_section,
    };
    let strategy = match strategy {
        Some(s) => s.parse::<ScoringStrategy>()?,
        None => config.strategy,
    };
    let calculator = config.calculator().with_strategy(strategy);
    tracing::debug!(%section, %strategy, "resolved scoring options");
    Ok(Resolved {
        config,
        section,
        calculator,
    })
}
