//! The `bandscore summarize` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn execute(text_path: PathBuf, ratio: f64) -> Result<()> {
    let text = std::fs::read_to_string(&text_path)
        .with_context(|| format!("failed to read text: {}", text_path.display()))?;
    let summary = bandscore_extract::summarize_passage(&text, ratio)?;
    println!("{summary}");
    Ok(())
}
