//! Workspace umbrella crate for the tagmatch engine.
//!
//! The `tagmatch` crate re-exports the metric, selector, and bin layers so
//! applications can drive the whole engine through a single dependency.
//! The engine answers queries of the form "given this query key, return the
//! `n` stored entries whose tags are most similar to it": a metric scores
//! the query against every stored tag, and a selector turns the score table
//! into a ranked or sampled result.
//!
//! ## Quick start
//!
//! ```
//! use tagmatch::{ranked_hamming_bin, BitTag};
//!
//! let mut bin = ranked_hamming_bin::<&str>(8, Some(0.5));
//! let close = bin.put("00000011".parse().unwrap(), "close");
//! bin.put("11111111".parse().unwrap(), "distant");
//!
//! let query: BitTag = "00000001".parse().unwrap();
//! // the distant tag falls over the 0.5 threshold
//! assert_eq!(bin.query_ids(&query, 2), vec![close]);
//! ```
//!
//! Engines can also be assembled from YAML through [`config::TagmatchConfig`],
//! which enumerates the metric variants, the modifier stack, and the
//! selector policies with their thresholds.
//!
//! ## Observability
//!
//! Structured query events can be captured by installing a
//! [`QueryEventLogger`] with [`install_query_logger`]; the bundled
//! [`KeyValueLogger`] writes escaped `key="value"` lines to any writer.
//! Lower-level callers can install a [`MatchBinMetrics`] recorder directly
//! via [`set_matchbin_metrics`]. Both hooks are registered once during
//! startup and shared by every bin.

pub mod config;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use matchbin::{set_matchbin_metrics, BinError, MatchBin, MatchBinMetrics};
pub use metric::{
    AbsDiffMetric, AntiMod, AsymmetricNoWrapMetric, AsymmetricWrapMetric, BitTag, CyclicRotate,
    DimMod, HammingMetric, Metric, NextUpMetric, SlideMod, StreakMetric, SymmetricNoWrapMetric,
    SymmetricWrapMetric, TagParseError,
};
pub use selector::{
    DynamicSelector, RankedSelector, RouletteConfig, RouletteSelector, ScoreTable, Selector,
    SelectorError, Uid, WeightMap,
};

pub use crate::config::{ConfigError, MetricYamlConfig, SelectorYamlConfig, TagmatchConfig};

/// Structured observation describing one serviced query.
#[derive(Debug, Clone)]
pub struct QueryEvent {
    pub metric: String,
    pub selector: String,
    pub latency: Duration,
    pub candidates: usize,
    pub results: usize,
}

impl QueryEvent {
    fn format_key_values(&self) -> String {
        let metric = escape_kv(&self.metric);
        let selector = escape_kv(&self.selector);
        let latency_us = self.latency.as_micros();
        format!(
            "metric=\"{metric}\" selector=\"{selector}\" latency_us={latency_us} candidates={} results={}",
            self.candidates, self.results
        )
    }
}

fn escape_kv(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Hook for emitting structured events per query.
pub trait QueryEventLogger: Send + Sync {
    fn log(&self, event: &QueryEvent);
}

/// Simple key-value logger that writes structured events to any writer.
pub struct KeyValueLogger {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl KeyValueLogger {
    /// Create a logger that writes to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Create a logger backed by the provided writer.
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

impl QueryEventLogger for KeyValueLogger {
    fn log(&self, event: &QueryEvent) {
        if let Ok(mut writer) = self.writer.lock() {
            let line = event.format_key_values();
            let _ = writeln!(writer, "{line}");
        }
    }
}

struct EventLoggerRecorder(Arc<dyn QueryEventLogger>);

impl MatchBinMetrics for EventLoggerRecorder {
    fn record_query(
        &self,
        metric: &str,
        selector: &str,
        latency: Duration,
        candidates: usize,
        results: usize,
    ) {
        self.0.log(&QueryEvent {
            metric: metric.to_string(),
            selector: selector.to_string(),
            latency,
            candidates,
            results,
        });
    }
}

/// Install or clear a structured query logger.
///
/// This wraps the logger in a [`MatchBinMetrics`] recorder, so it replaces
/// any recorder previously installed with [`set_matchbin_metrics`].
pub fn install_query_logger(logger: Option<Arc<dyn QueryEventLogger>>) {
    set_matchbin_metrics(
        logger.map(|l| Arc::new(EventLoggerRecorder(l)) as Arc<dyn MatchBinMetrics>),
    );
}

/// Bin ranking by Hamming distance, the most common composition.
pub fn ranked_hamming_bin<V>(
    width: usize,
    threshold: Option<f64>,
) -> MatchBin<V, HammingMetric, RankedSelector> {
    MatchBin::new(HammingMetric::new(width), RankedSelector::new(threshold))
}

/// Bin sampling by Hamming distance with a seeded roulette selector.
pub fn roulette_hamming_bin<V>(
    width: usize,
    cfg: RouletteConfig,
    seed: u64,
) -> Result<MatchBin<V, HammingMetric, RouletteSelector>, SelectorError> {
    Ok(MatchBin::new(
        HammingMetric::new(width),
        RouletteSelector::from_seed(cfg, seed)?,
    ))
}

/// Bin ranking by the streak metric.
pub fn ranked_streak_bin<V>(
    width: usize,
    threshold: Option<f64>,
) -> MatchBin<V, StreakMetric, RankedSelector> {
    MatchBin::new(StreakMetric::new(width), RankedSelector::new(threshold))
}
