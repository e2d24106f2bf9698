//! Configuration loading.
//!
//! The band tables live here as data so that an authoritative conversion
//! table can replace the built-in approximations without touching code.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::band::{BandScoreCalculator, BandTables, PercentageCascade, ScoringStrategy};
use crate::model::SectionType;

/// Top-level bandscore configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandscoreConfig {
    /// Section assumed when a command does not name one.
    #[serde(default = "default_section")]
    pub default_section: SectionType,
    /// Conversion strategy.
    #[serde(default)]
    pub strategy: ScoringStrategy,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Raw-score threshold tables.
    #[serde(default)]
    pub tables: BandTables,
    /// Percentage cascade.
    #[serde(default)]
    pub percentage: PercentageCascade,
}

fn default_section() -> SectionType {
    SectionType::Reading
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./bandscore-results")
}

impl Default for BandscoreConfig {
    fn default() -> Self {
        Self {
            default_section: default_section(),
            strategy: ScoringStrategy::default(),
            output_dir: default_output_dir(),
            tables: BandTables::default(),
            percentage: PercentageCascade::default(),
        }
    }
}

impl BandscoreConfig {
    /// Build a calculator from the configured tables and strategy.
    pub fn calculator(&self) -> BandScoreCalculator {
        BandScoreCalculator::new(self.strategy, self.tables.clone(), self.percentage.clone())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `bandscore.toml` in the current directory
/// 2. `~/.config/bandscore/config.toml`
///
/// Environment variable overrides: `BANDSCORE_SECTION`, `BANDSCORE_STRATEGY`.
pub fn load_config() -> Result<BandscoreConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<BandscoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("bandscore.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => BandscoreConfig::default(),
    };

    if let Ok(section) = std::env::var("BANDSCORE_SECTION") {
        config.default_section = section
            .parse()
            .context("invalid BANDSCORE_SECTION")?;
    }
    if let Ok(strategy) = std::env::var("BANDSCORE_STRATEGY") {
        config.strategy = strategy
            .parse()
            .context("invalid BANDSCORE_STRATEGY")?;
    }

    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));

    tracing::debug!(
        source = %config_path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".into()),
        strategy = %config.strategy,
        "loaded configuration"
    );

    Ok(config)
}

/// Parse and validate a TOML config document.
///
/// Threshold tables are validated while deserializing; the percentage
/// cascade is checked afterwards.
pub fn parse_config_str(content: &str) -> Result<BandscoreConfig> {
    let config: BandscoreConfig = toml::from_str(content)?;
    config.percentage.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("bandscore"))
}
