//! The `bandscore validate` command.

use std::path::PathBuf;

use anyhow::Result;

use bandscore_core::config::load_config_from;
use bandscore_core::parser;

pub fn execute(key_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    // Loading validates every table and the cascade.
    let config = load_config_from(config_path.as_deref())?;
    println!("Config: {} strategy, tables valid", config.strategy);

    let key = parser::load_answer_key(&key_path)?;
    println!("Answer key: {} ({} questions)", key_path.display(), key.len());

    let warnings = parser::validate_answer_key(&key);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [Q{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Answer key valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
