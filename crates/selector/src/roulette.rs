//! Roulette selection: probabilistic, thresholded, skew-weighted sampling
//! with replacement.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::weights::WeightMap;
use crate::{ScoreTable, Selector, SelectorError, Uid};

/// Tuning knobs for [`RouletteSelector`].
///
/// `None` thresholds mean "no limit". The defaults mirror the classic
/// parameterization: no score threshold, skew `0.1`, baseline capped at
/// `1.0` (without upregulation the best possible score is 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouletteConfig {
    /// Maximum raw score admitted into the sampling pool.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// How sharply the best matches dominate the draw: near zero
    /// concentrates on the minimum-score candidates, large values flatten
    /// toward uniform.
    #[serde(default = "RouletteConfig::default_skew")]
    pub skew: f64,
    /// Cap on the normalization baseline subtracted from scores.
    #[serde(default = "RouletteConfig::default_max_baseline")]
    pub max_baseline: Option<f64>,
}

impl RouletteConfig {
    pub(crate) fn default_skew() -> f64 {
        0.1
    }

    pub(crate) fn default_max_baseline() -> Option<f64> {
        Some(1.0)
    }

    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_skew(mut self, skew: f64) -> Self {
        self.skew = skew;
        self
    }

    pub fn with_max_baseline(mut self, max_baseline: Option<f64>) -> Self {
        self.max_baseline = max_baseline;
        self
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), SelectorError> {
        if !(self.skew.is_finite() && self.skew > 0.0) {
            return Err(SelectorError::InvalidConfig(format!(
                "skew must be finite and greater than zero (got {})",
                self.skew
            )));
        }
        if let Some(threshold) = self.threshold {
            if !(threshold.is_finite() && threshold >= 0.0) {
                return Err(SelectorError::InvalidConfig(format!(
                    "threshold must be finite and non-negative (got {threshold})"
                )));
            }
        }
        if let Some(max_baseline) = self.max_baseline {
            if !(max_baseline.is_finite() && max_baseline >= 0.0) {
                return Err(SelectorError::InvalidConfig(format!(
                    "max_baseline must be finite and non-negative (got {max_baseline})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            skew: Self::default_skew(),
            max_baseline: Self::default_max_baseline(),
        }
    }
}

/// Chooses probabilistically based on match quality, with replacement.
///
/// Candidates at or under the threshold are weighted
/// `1 / (skew + score - baseline)` where the baseline is the smallest
/// observed score clamped to `max_baseline`, then `n` draws are taken from
/// the injected RNG. Draw order is the result order.
#[derive(Debug, Clone)]
pub struct RouletteSelector<R = SmallRng> {
    cfg: RouletteConfig,
    rng: R,
}

impl RouletteSelector<SmallRng> {
    /// Selector with a deterministic small RNG; two selectors built from
    /// the same seed draw identical sequences.
    pub fn from_seed(cfg: RouletteConfig, seed: u64) -> Result<Self, SelectorError> {
        Self::with_rng(cfg, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RouletteSelector<R> {
    /// Selector drawing from a caller-supplied random source.
    pub fn with_rng(cfg: RouletteConfig, rng: R) -> Result<Self, SelectorError> {
        cfg.validate()?;
        Ok(Self { cfg, rng })
    }

    pub fn config(&self) -> &RouletteConfig {
        &self.cfg
    }
}

impl<R: Rng> Selector for RouletteSelector<R> {
    fn name(&self) -> String {
        "Roulette Selector".to_string()
    }

    fn select(&mut self, uids: &mut Vec<Uid>, scores: &ScoreTable, n: usize) -> Vec<Uid> {
        let thresh = self.cfg.threshold.unwrap_or(f64::INFINITY);
        let max_baseline = self.cfg.max_baseline.unwrap_or(f64::INFINITY);

        // Partition admissible uids to the front, tracking the minimum
        // score over the whole candidate list.
        let mut partition = 0;
        let mut min_score = f64::INFINITY;
        for i in 0..uids.len() {
            let score = scores[&uids[i]];
            debug_assert!(score >= 0.0, "negative score {score} for {}", uids[i]);
            min_score = min_score.min(score);
            if score <= thresh {
                uids.swap(i, partition);
                partition += 1;
            }
        }

        if partition == 0 {
            return Vec::new();
        }

        // Skew relative to the strongest match, capped so post-processed
        // score ranges cannot blow up the dynamic range.
        let baseline = min_score.min(max_baseline);

        let mut weights = WeightMap::new(partition);
        for p in 0..partition {
            weights.adjust(p, 1.0 / (self.cfg.skew + scores[&uids[p]] - baseline));
        }

        let mut chosen = Vec::with_capacity(n);
        for _ in 0..n {
            let draw = self.rng.gen_range(0.0..weights.total());
            chosen.push(uids[weights.index(draw)]);
        }
        chosen
    }
}
