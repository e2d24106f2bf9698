//! The `bandscore tables` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use bandscore_core::band::ThresholdTable;
use bandscore_core::model::SectionType;

pub fn execute(section: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = bandscore_core::config::load_config_from(config_path.as_deref())?;
    let sections: Vec<SectionType> = match section {
        Some(s) => vec![s.parse()?],
        None => SectionType::ALL.to_vec(),
    };

    for section in sections {
        println!("{section} (raw score out of 40)");
        println!("{}", threshold_table(config.tables.for_section(section)));
    }

    let cascade = &config.percentage;
    let mut cutoffs = cascade.cutoffs.clone();
    cutoffs.sort_by(|a, b| b.min_percent.total_cmp(&a.min_percent));
    let mut table = Table::new();
    table.set_header(vec!["Percentage", "Band"]);
    for c in &cutoffs {
        table.add_row(vec![
            Cell::new(format!(">= {}%", c.min_percent)),
            Cell::new(c.band),
        ]);
    }
    table.add_row(vec![Cell::new("below"), Cell::new(cascade.floor)]);
    println!(
        "percentage ({}-question tests; other lengths use percentage / 10)",
        cascade.full_length
    );
    println!("{table}");
    println!("Active strategy: {}", config.strategy);

    Ok(())
}

fn threshold_table(thresholds: &ThresholdTable) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Raw score", "Band"]);
    for t in thresholds.thresholds().iter().rev() {
        table.add_row(vec![Cell::new(format!(">= {}", t.min_raw)), Cell::new(t.band)]);
    }
    table
}
