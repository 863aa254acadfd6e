//! Ranked selection: the `n` best-scoring candidates under a threshold.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{ScoreTable, Selector, Uid};

/// Returns the uids with the `n` smallest scores, non-decreasing by score,
/// dropping any whose score exceeds the threshold (`None` = no threshold).
///
/// Small requests run a bounded selection sort instead of sorting the whole
/// candidate list; both paths return the same set, up to the order of tied
/// scores. Callers must not rely on order among equal scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedSelector {
    threshold: Option<f64>,
}

impl RankedSelector {
    pub fn new(threshold: Option<f64>) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }
}

impl Selector for RankedSelector {
    fn name(&self) -> String {
        "Ranked Selector".to_string()
    }

    fn select(&mut self, uids: &mut Vec<Uid>, scores: &ScoreTable, n: usize) -> Vec<Uid> {
        let thresh = self.threshold.unwrap_or(f64::INFINITY);
        let mut back = 0;

        if (n as f64) < (uids.len() as f64).log2() {
            // Bounded selection sort: pull the minimum under the threshold
            // into each leading slot until n are placed or none remain.
            while back < n {
                let mut min_index = None;
                for j in back..uids.len() {
                    let score = scores[&uids[j]];
                    if score <= thresh
                        && min_index.is_none_or(|m: usize| score < scores[&uids[m]])
                    {
                        min_index = Some(j);
                    }
                }
                match min_index {
                    Some(m) => {
                        uids.swap(back, m);
                        back += 1;
                    }
                    None => break,
                }
            }
        } else {
            uids.sort_unstable_by(|a, b| {
                scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal)
            });
            while back < uids.len() && back < n && scores[&uids[back]] <= thresh {
                back += 1;
            }
        }

        uids[..back].to_vec()
    }
}
