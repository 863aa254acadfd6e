// Metrics hooks for the `matchbin` crate.
//
// Callers install a global `MatchBinMetrics` implementation via
// [`set_matchbin_metrics`], then every bin reports per-query latency,
// candidate count, and result count. This keeps instrumentation decoupled
// from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for bin queries.
pub trait MatchBinMetrics: Send + Sync {
    /// Record the outcome of a query.
    ///
    /// `metric` and `selector` are the diagnostic names of the components
    /// that serviced the query, `latency` is the wall-clock duration of the
    /// scoring plus selection, `candidates` is the number of live entries
    /// scored, and `results` is the number of uids returned.
    fn record_query(
        &self,
        metric: &str,
        selector: &str,
        latency: Duration,
        candidates: usize,
        results: usize,
    );
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchBinMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchBinMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchBinMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global bin metrics recorder.
///
/// Typically called once during startup so all bins share the same metrics
/// backend.
pub fn set_matchbin_metrics(recorder: Option<Arc<dyn MatchBinMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("matchbin metrics lock poisoned");
    *guard = recorder;
}
