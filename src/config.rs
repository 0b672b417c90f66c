//! Pipeline configuration
//!
//! Every field defaults to the reference constants; a YAML file may override
//! any subset of them.
//!
//! ```yaml
//! period: "2022-23"
//! canonicalize_donors: false
//! visual:
//!   size: { min: 10.0, max: 100.0 }
//!   wrap_width: 16
//! output:
//!   graphml: out/donations.graphml
//!   yed: out/donations_yed.graphml
//! ```

use crate::canonical::{default_rules, Canonicalizer, Rule, RuleError};
use crate::graph::VisualConfig;
use crate::source::{ColumnNames, PeriodFilter};
use donorflow_visual::ScaleRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid rule list: {0}")]
    Rule(#[from] RuleError),

    #[error("invalid {name} range: min {min} must be non-negative and not above max {max}")]
    InvalidRange { name: &'static str, min: f64, max: f64 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the two documents are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Standard GraphML document
    pub graphml: PathBuf,
    /// yEd-enriched document
    pub yed: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graphml: PathBuf::from("donations.graphml"),
            yed: PathBuf::from("donations_yed.graphml"),
        }
    }
}

impl OutputConfig {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let defaults = Self::default();
        Self {
            graphml: dir.as_ref().join(defaults.graphml),
            yed: dir.as_ref().join(defaults.yed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Ordered canonicalization rules
    pub rules: Vec<Rule>,
    /// Financial year to keep; `None` keeps every record
    pub period: Option<String>,
    pub columns: ColumnNames,
    /// Run donor names through the rules too
    pub canonicalize_donors: bool,
    pub visual: VisualConfig,
    pub output: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            period: Some("2014-15".to_string()),
            columns: ColumnNames::default(),
            canonicalize_donors: false,
            visual: VisualConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check ranges and compile the rule list
    pub fn validate(&self) -> ConfigResult<Canonicalizer> {
        check_range("size", self.visual.size)?;
        check_range("thickness", self.visual.thickness)?;
        Ok(Canonicalizer::new(&self.rules)?)
    }

    pub fn period_filter(&self) -> PeriodFilter {
        PeriodFilter::from(self.period.clone())
    }
}

fn check_range(name: &'static str, range: ScaleRange) -> ConfigResult<()> {
    let valid = range.min.is_finite()
        && range.max.is_finite()
        && range.min >= 0.0
        && range.min <= range.max;
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            name,
            min: range.min,
            max: range.max,
        })
    }
}
