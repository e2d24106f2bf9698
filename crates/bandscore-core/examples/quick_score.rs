//! Quick score example: minimal programmatic usage of bandscore-core.
//!
//! ```bash
//! cargo run -p bandscore-core --example quick_score
//! ```

use bandscore_core::band::ScoringStrategy;
use bandscore_core::config::load_config;
use bandscore_core::model::{AnswerKey, SectionType, UserResponseSet};
use bandscore_core::report::ScoreReport;

fn main() -> anyhow::Result<()> {
    // Built-in tables unless a bandscore.toml is found.
    let config = load_config()?;
    let calculator = config.calculator();

    let key = AnswerKey::from_entries([
        (1, "B"),
        (2, "TRUE"),
        (3, "NOT GIVEN"),
        (4, "river delta"),
    ])?;
    let responses = UserResponseSet::from_entries([(1, "b"), (2, " true "), (4, "Delta")])?;

    let report = ScoreReport::score(
        "Quick example",
        SectionType::Reading,
        &key,
        &responses,
        &calculator,
        None,
    )?;
    println!("{}", report.to_markdown());

    // The same tally under each conversion.
    for strategy in [ScoringStrategy::RawTable, ScoringStrategy::Percentage] {
        let band = calculator
            .clone()
            .with_strategy(strategy)
            .band_score(30, 40, SectionType::Listening)?;
        println!("listening 30/40 with {strategy}: band {band}");
    }

    Ok(())
}
