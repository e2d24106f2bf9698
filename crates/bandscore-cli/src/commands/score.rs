//! The `bandscore score` command.

use std::path::PathBuf;

use anyhow::Result;

use bandscore_core::parser;
use bandscore_core::report::ScoreReport;
use bandscore_report::html::write_html_report;

pub struct ScoreArgs {
    pub key: PathBuf,
    pub responses: PathBuf,
    pub section: Option<String>,
    pub strategy: Option<String>,
    pub test_name: Option<String>,
    pub timings: Option<PathBuf>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: ScoreArgs) -> Result<()> {
    let formats: Vec<&str> = if args.format == "all" {
        vec!["text", "json", "html", "markdown"]
    } else {
        args.format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "text" | "json" | "html" | "markdown" | "md"),
            "unknown format: {fmt} (expected text, json, html, markdown or all)"
        );
    }

    let resolved = super::resolve(
        args.config.as_deref(),
        args.section.as_deref(),
        args.strategy.as_deref(),
    )?;

    let key = parser::load_answer_key(&args.key)?;
    let responses = parser::load_responses(&args.responses)?;
    let timings = args
        .timings
        .as_deref()
        .map(parser::load_timings)
        .transpose()?;

    let test_name = args.test_name.unwrap_or_else(|| {
        args.key
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "practice test".into())
    });

    let report = ScoreReport::score(
        test_name,
        resolved.section,
        &key,
        &responses,
        &resolved.calculator,
        timings.as_deref(),
    )?;

    let output = args.output.unwrap_or(resolved.config.output_dir);
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match *fmt {
            "text" => print_summary(&report),
            "json" => {
                let path = output.join(format!("score-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("score-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => println!("{}", report.to_markdown()),
            _ => eprintln!("Unknown format: {fmt}"),
        }
    }

    Ok(())
}

fn print_summary(report: &ScoreReport) {
    use comfy_table::{Cell, Table};

    let s = &report.summary;
    let mut table = Table::new();
    table.set_header(vec!["Section", "Correct", "Accuracy", "Band", "Conversion"]);
    table.add_row(vec![
        Cell::new(s.section_type),
        Cell::new(format!("{}/{}", s.raw_correct_count, s.total_questions)),
        Cell::new(format!("{:.1}%", s.accuracy() * 100.0)),
        Cell::new(s.band_score),
        Cell::new(report.strategy),
    ]);
    println!("{table}");

    if !report.insights.passages.is_empty() {
        let mut passages = Table::new();
        passages.set_header(vec!["Passage", "Correct", "Accuracy"]);
        for p in &report.insights.passages {
            passages.add_row(vec![
                Cell::new(p.passage),
                Cell::new(format!("{}/{}", p.correct, p.total)),
                Cell::new(format!("{:.1}%", p.accuracy_percent)),
            ]);
        }
        println!("{passages}");
    }

    if !report.insights.review.is_empty() {
        let ids: Vec<String> = report
            .insights
            .review
            .iter()
            .map(|id| id.to_string())
            .collect();
        println!("Review: {}", ids.join(", "));
    }
    if !report.insights.unanswered.is_empty() {
        println!("Unanswered: {}", report.insights.unanswered.len());
    }
    if let Some(timing) = &report.insights.timing {
        println!(
            "Time: {:.0}s total, {:.1}s per question",
            timing.total_secs, timing.mean_secs
        );
    }
}
