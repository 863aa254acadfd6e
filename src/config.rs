//! YAML configuration file support for the tagmatch engine.
//!
//! This module lets deployments describe a metric (with its modifier
//! stack) and a selector in a single YAML document and build both at
//! runtime.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # tagmatch engine configuration
//! version: "1.0"
//! name: "phase-free streak matcher"
//!
//! metric:
//!   variant: streak
//!   width: 32
//!   modifiers: [slide]
//!
//! selector:
//!   policy: roulette
//!   threshold: 0.8
//!   skew: 0.1
//!   max_baseline: 1.0
//!   seed: 1732584193
//! ```
//!
//! The metric section builds bit-vector metrics (`hamming`, `asym_wrap`,
//! `asym_no_wrap`, `sym_wrap`, `sym_no_wrap`, `streak`); the integer
//! metrics (`AbsDiffMetric`, `NextUpMetric`) use different tag types and
//! are constructed directly in code, so naming them here is a validation
//! error. Modifiers apply in list order, last outermost.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use metric::{
    AntiMod, AsymmetricNoWrapMetric, AsymmetricWrapMetric, BitTag, HammingMetric, Metric,
    SlideMod, StreakMetric, SymmetricNoWrapMetric, SymmetricWrapMetric,
};
use selector::{
    DynamicSelector, RankedSelector, RouletteConfig, RouletteSelector, Selector, SelectorError,
};

/// A metric over the bit-vector tag space, ready to plug into a bin.
pub type BitMetric = Box<dyn Metric<Query = BitTag, Tag = BitTag>>;

/// Errors that can occur when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

impl From<SelectorError> for ConfigError {
    fn from(err: SelectorError) -> Self {
        ConfigError::Validation(err.to_string())
    }
}

/// Top-level YAML configuration for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TagmatchConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Metric choice and modifier stack.
    pub metric: MetricYamlConfig,

    /// Selector policy.
    pub selector: SelectorYamlConfig,
}

impl TagmatchConfig {
    /// Parse a YAML string, checking the version and validating all
    /// sections.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(input)?;
        if !config.version.starts_with("1.") {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metric.validate()?;
        self.selector.validate()
    }

    /// Build the configured metric.
    pub fn build_metric(&self) -> Result<BitMetric, ConfigError> {
        self.metric.build()
    }

    /// Build the configured selector.
    pub fn build_selector(&self) -> Result<Box<dyn Selector>, ConfigError> {
        self.selector.build()
    }
}

/// Bit-vector metric variants nameable from YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricVariant {
    Hamming,
    AsymWrap,
    AsymNoWrap,
    SymWrap,
    SymNoWrap,
    Streak,
    /// Integer-space metric; present so configs can name it, rejected at
    /// build time with a pointer to direct construction.
    AbsDiff,
    /// Integer-space metric; same treatment as `AbsDiff`.
    NextUp,
}

/// Modifier stack entries, applied in list order (last outermost).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Slide,
    Anti,
}

/// Metric section of the YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricYamlConfig {
    pub variant: MetricVariant,
    /// Tag width in bits; required for every bit-vector variant.
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub modifiers: Vec<ModifierKind>,
}

impl MetricYamlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.variant {
            MetricVariant::AbsDiff | MetricVariant::NextUp => {
                return Err(ConfigError::Validation(format!(
                    "{:?} is not a bit-vector metric; construct it directly in code",
                    self.variant
                )));
            }
            _ => {}
        }
        match self.width {
            Some(width) if width >= 1 => Ok(()),
            Some(width) => Err(ConfigError::Validation(format!(
                "width must be at least 1 (got {width})"
            ))),
            None => Err(ConfigError::Validation(
                "width is required for bit-vector metrics".into(),
            )),
        }
    }

    /// Build the metric with its modifier stack applied.
    pub fn build(&self) -> Result<BitMetric, ConfigError> {
        self.validate()?;
        let width = self.width.expect("validated above");
        let mut built: BitMetric = match self.variant {
            MetricVariant::Hamming => Box::new(HammingMetric::new(width)),
            MetricVariant::AsymWrap => Box::new(AsymmetricWrapMetric::new(width)),
            MetricVariant::AsymNoWrap => Box::new(AsymmetricNoWrapMetric::new(width)),
            MetricVariant::SymWrap => Box::new(SymmetricWrapMetric::new(width)),
            MetricVariant::SymNoWrap => Box::new(SymmetricNoWrapMetric::new(width)),
            MetricVariant::Streak => Box::new(StreakMetric::new(width)),
            MetricVariant::AbsDiff | MetricVariant::NextUp => unreachable!("rejected by validate"),
        };
        for modifier in &self.modifiers {
            built = match modifier {
                ModifierKind::Slide => Box::new(SlideMod::new(built)),
                ModifierKind::Anti => Box::new(AntiMod::new(built)),
            };
        }
        Ok(built)
    }
}

fn default_skew() -> f64 {
    RouletteConfig::default().skew
}

fn default_max_baseline() -> Option<f64> {
    RouletteConfig::default().max_baseline
}

/// Selector section of the YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SelectorYamlConfig {
    Ranked {
        #[serde(default)]
        threshold: Option<f64>,
    },
    Roulette {
        #[serde(default)]
        threshold: Option<f64>,
        #[serde(default = "default_skew")]
        skew: f64,
        #[serde(default = "default_max_baseline")]
        max_baseline: Option<f64>,
        /// Seed for the selector's deterministic RNG.
        seed: u64,
    },
    Dynamic {
        children: Vec<SelectorYamlConfig>,
        #[serde(default)]
        mode: usize,
    },
}

impl SelectorYamlConfig {
    fn roulette_config(
        threshold: Option<f64>,
        skew: f64,
        max_baseline: Option<f64>,
    ) -> RouletteConfig {
        RouletteConfig::default()
            .with_threshold(threshold)
            .with_skew(skew)
            .with_max_baseline(max_baseline)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            SelectorYamlConfig::Ranked { .. } => Ok(()),
            SelectorYamlConfig::Roulette {
                threshold,
                skew,
                max_baseline,
                ..
            } => {
                Self::roulette_config(*threshold, *skew, *max_baseline).validate()?;
                Ok(())
            }
            SelectorYamlConfig::Dynamic { children, mode } => {
                if children.is_empty() {
                    return Err(ConfigError::Validation(
                        "dynamic selector requires at least one child".into(),
                    ));
                }
                if *mode >= children.len() {
                    return Err(ConfigError::Validation(format!(
                        "mode {mode} out of range for {} children",
                        children.len()
                    )));
                }
                for child in children {
                    child.validate()?;
                }
                Ok(())
            }
        }
    }

    /// Build the selector tree.
    pub fn build(&self) -> Result<Box<dyn Selector>, ConfigError> {
        self.validate()?;
        match self {
            SelectorYamlConfig::Ranked { threshold } => {
                Ok(Box::new(RankedSelector::new(*threshold)))
            }
            SelectorYamlConfig::Roulette {
                threshold,
                skew,
                max_baseline,
                seed,
            } => {
                let cfg = Self::roulette_config(*threshold, *skew, *max_baseline);
                Ok(Box::new(RouletteSelector::from_seed(cfg, *seed)?))
            }
            SelectorYamlConfig::Dynamic { children, mode } => {
                let built = children
                    .iter()
                    .map(|child| child.build())
                    .collect::<Result<Vec<_>, _>>()?;
                let mut dynamic = DynamicSelector::new(built)?;
                dynamic.set_mode(*mode)?;
                Ok(Box::new(dynamic))
            }
        }
    }
}
