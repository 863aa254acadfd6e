//! # Selector
//!
//! Selection policies for the tagmatch engine: given a candidate list and a
//! score table produced by a metric, a selector returns up to `n` chosen
//! uids according to its policy.
//!
//! ## Core Types
//!
//! - [`Uid`]: opaque, stable entry identifier assigned by the bin.
//! - [`ScoreTable`]: per-query `uid -> score` map; scratch, read-only for
//!   selectors.
//! - [`Selector`]: the policy trait.
//! - [`RankedSelector`]: lowest-score-first, thresholded.
//! - [`RouletteSelector`]: probabilistic, thresholded, skew-weighted,
//!   sampling with replacement from an injected RNG.
//! - [`DynamicSelector`]: forwards to one of several owned child selectors
//!   by a mode index.
//! - [`WeightMap`]: cumulative-weight map backing the roulette draws.
//!
//! Selectors may reorder the candidate list in place; they never touch the
//! score table. Thresholds, skew, and baseline caps use `Option<f64>`
//! where `None` means "no limit" (+∞).

pub mod dynamic;
pub mod ranked;
pub mod roulette;
pub mod weights;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::dynamic::DynamicSelector;
pub use crate::ranked::RankedSelector;
pub use crate::roulette::{RouletteConfig, RouletteSelector};
pub use crate::weights::WeightMap;

/// Opaque, unique, stable entry identifier assigned by the bin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Uid(u64);

impl Uid {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uid:{}", self.0)
    }
}

/// Per-query score table. Scratch structure; lifetime is one query.
pub type ScoreTable = hashbrown::HashMap<Uid, f64>;

/// Errors produced when configuring selectors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectorError {
    /// A selector parameter is outside its legal range.
    #[error("invalid selector config: {0}")]
    InvalidConfig(String),
    /// A dynamic selector needs at least one child to forward to.
    #[error("dynamic selector has no children")]
    EmptyChildren,
    /// A dynamic selector mode index points past its children.
    #[error("mode {mode} out of range for {count} children")]
    ModeOutOfRange { mode: usize, count: usize },
}

/// A selection policy.
///
/// `select` receives the candidate uids, the score table, and the requested
/// count `n`, and returns up to `n` chosen uids in policy order. The
/// candidate list may be reordered as a side effect.
pub trait Selector {
    fn name(&self) -> String;
    fn select(&mut self, uids: &mut Vec<Uid>, scores: &ScoreTable, n: usize) -> Vec<Uid>;
}

impl<S: Selector + ?Sized> Selector for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn select(&mut self, uids: &mut Vec<Uid>, scores: &ScoreTable, n: usize) -> Vec<Uid> {
        (**self).select(uids, scores, n)
    }
}
