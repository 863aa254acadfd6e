//! # MatchBin
//!
//! ## Purpose
//!
//! `matchbin` sits on top of the `metric` and `selector` crates and owns
//! the tagged entries. It services associative lookups: a query key is
//! scored against every stored tag by the configured metric, the resulting
//! score table is handed to the configured selector, and the chosen uids
//! (or the values behind them) come back. Symbolic references resolve by
//! approximate similarity rather than identity.
//!
//! ## Core Types
//!
//! - [`MatchBin`]: the indexed collection of `(uid, tag, value)` entries.
//! - [`BinError`]: `UnknownUid` for direct access to absent entries.
//! - [`MatchBinMetrics`] / [`set_matchbin_metrics`]: optional global
//!   observability hook recording per-query latency and counts.
//!
//! ## Example
//!
//! ```
//! use matchbin::MatchBin;
//! use metric::{BitTag, HammingMetric};
//! use selector::RankedSelector;
//!
//! let mut bin = MatchBin::new(HammingMetric::new(8), RankedSelector::new(None));
//! let close = bin.put("00000011".parse().unwrap(), "close");
//! let far = bin.put("11110000".parse().unwrap(), "far");
//!
//! let query: BitTag = "00000001".parse().unwrap();
//! assert_eq!(bin.query_ids(&query, 2), vec![close, far]);
//! assert_eq!(bin.query_values(&query, 1), vec![&"close"]);
//! ```
//!
//! Queries never fail; an empty bin returns an empty list, as does a
//! roulette selector whose thresholded pool is empty. Each bin is
//! single-threaded: all operations run to completion on the calling
//! thread, and external synchronization is the caller's job.

mod bin;
pub mod metrics;
mod types;

pub use crate::bin::MatchBin;
pub use crate::metrics::{set_matchbin_metrics, MatchBinMetrics};
pub use crate::types::BinError;
