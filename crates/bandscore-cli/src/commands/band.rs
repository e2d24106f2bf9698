//! The `bandscore band` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(
    correct: i64,
    total: i64,
    section: Option<String>,
    strategy: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let resolved = super::resolve(config_path.as_deref(), section.as_deref(), strategy.as_deref())?;
    let band = resolved
        .calculator
        .band_score(correct, total, resolved.section)?;

    println!(
        "{} {correct}/{total}: band {band} ({})",
        resolved.section,
        resolved.calculator.strategy()
    );
    Ok(())
}
