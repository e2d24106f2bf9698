//! The `bandscore extract` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use bandscore_core::parser::answer_key_to_json;

pub fn execute(text_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let text = std::fs::read_to_string(&text_path)
        .with_context(|| format!("failed to read text: {}", text_path.display()))?;
    let extracted = bandscore_extract::extract_test(&text)?;

    println!(
        "Extracted {} questions and {} answers",
        extracted.questions.len(),
        extracted.answer_key.len()
    );
    for q in &extracted.questions {
        println!("  {:>2}. {}", q.number, q.text);
    }

    let json = answer_key_to_json(&extracted.answer_key)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write answer key: {}", path.display()))?;
            println!("Answer key written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
