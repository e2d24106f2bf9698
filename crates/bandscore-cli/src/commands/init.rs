//! The `bandscore init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("bandscore.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("answers")?;
    write_if_missing(Path::new("answers/key.json"), SAMPLE_KEY)?;
    write_if_missing(Path::new("answers/responses.json"), SAMPLE_RESPONSES)?;

    println!("\nNext steps:");
    println!("  1. Put your answer key in answers/key.json");
    println!("  2. Run: bandscore validate --key answers/key.json");
    println!("  3. Run: bandscore score --key answers/key.json --responses answers/responses.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# bandscore configuration

default_section = "reading"
# raw-table or percentage
strategy = "raw-table"
output_dir = "./bandscore-results"

# Replace with an official conversion table if you have one.
# Each row: raw scores at or above min_raw earn band.
# [tables]
# reading = [
#     { min_raw = 0.0, band = 0.0 },
#     { min_raw = 13.0, band = 3.0 },
#     { min_raw = 30.0, band = 6.5 },
#     { min_raw = 40.0, band = 9.0 },
# ]

[percentage]
full_length = 40
floor = 5.0
cutoffs = [
    { min_percent = 97.5, band = 9.0 },
    { min_percent = 92.5, band = 8.5 },
    { min_percent = 87.5, band = 8.0 },
    { min_percent = 80.0, band = 7.5 },
    { min_percent = 72.5, band = 7.0 },
    { min_percent = 65.0, band = 6.5 },
    { min_percent = 57.5, band = 6.0 },
    { min_percent = 50.0, band = 5.5 },
]
"#;

const SAMPLE_KEY: &str = r#"{
  "1": "B",
  "2": "TRUE",
  "3": "NOT GIVEN",
  "4": "river delta",
  "5": "1987"
}
"#;

const SAMPLE_RESPONSES: &str = r#"{
  "1": "b",
  "2": "true",
  "3": "false",
  "4": " River Delta "
}
"#;
