//! bandscore CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "bandscore",
    version,
    about = "Band score calculator for reading and listening practice tests"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark a set of responses against an answer key
    Score {
        /// Answer key JSON ({"1": "A", ...})
        #[arg(long)]
        key: PathBuf,

        /// Responses JSON ({"1": "a", ...})
        #[arg(long)]
        responses: PathBuf,

        /// Section: reading or listening (default from config)
        #[arg(long)]
        section: Option<String>,

        /// Conversion: raw-table or percentage (default from config)
        #[arg(long)]
        strategy: Option<String>,

        /// Name shown in reports (default: key file stem)
        #[arg(long)]
        test_name: Option<String>,

        /// JSON array of seconds spent per question
        #[arg(long)]
        timings: Option<PathBuf>,

        /// Output format: text, json, html, markdown, all
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert a correct count to a band
    Band {
        /// Number of correct answers
        #[arg(long, allow_hyphen_values = true)]
        correct: i64,

        /// Number of questions
        #[arg(long, allow_hyphen_values = true)]
        total: i64,

        /// Section: reading or listening (default from config)
        #[arg(long)]
        section: Option<String>,

        /// Conversion: raw-table or percentage (default from config)
        #[arg(long)]
        strategy: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Extract questions and the answer key from practice-test text
    Extract {
        /// Plain text of the practice test
        #[arg(long)]
        text: PathBuf,

        /// Write the extracted answer key to this JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Summarize a reading passage by its opening sentences
    Summarize {
        /// Plain text of the passage
        #[arg(long)]
        text: PathBuf,

        /// Share of sentences to keep, above 0 (values over 1 keep everything)
        #[arg(long, default_value_t = bandscore_extract::summary::DEFAULT_RATIO, allow_hyphen_values = true)]
        ratio: f64,
    },

    /// Show the active band conversion tables
    Tables {
        /// Only show this section
        #[arg(long)]
        section: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check an answer key and the configured tables
    Validate {
        /// Answer key JSON
        #[arg(long)]
        key: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample answer files
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bandscore=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            key,
            responses,
            section,
            strategy,
            test_name,
            timings,
            format,
            output,
            config,
        } => commands::score::execute(commands::score::ScoreArgs {
            key,
            responses,
            section,
            strategy,
            test_name,
            timings,
            format,
            output,
            config,
        }),
        Commands::Band {
            correct,
            total,
            section,
            strategy,
            config,
        } => commands::band::execute(correct, total, section, strategy, config),
        Commands::Extract { text, output } => commands::extract::execute(text, output),
        Commands::Summarize { text, ratio } => commands::summarize::execute(text, ratio),
        Commands::Tables { section, config } => commands::tables::execute(section, config),
        Commands::Validate { key, config } => commands::validate::execute(key, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
