//! The bin: entry ownership and query composition.

use std::time::Instant;

use hashbrown::HashMap;
use metric::Metric;
use selector::{ScoreTable, Selector, Uid};

use crate::metrics::metrics_recorder;
use crate::types::BinError;

struct StoredEntry<T, V> {
    tag: T,
    value: V,
}

/// An indexed collection of `(uid, tag, value)` entries that answers
/// similarity queries by composing a metric with a selector.
///
/// A query runs the metric against every live tag, builds a score table,
/// hands it to the selector, and returns the chosen uids (or the values
/// behind them). Uids are assigned at insertion, monotonically increasing,
/// and never reused. Duplicate tags are permitted; uids distinguish them.
///
/// The bin performs no internal synchronization: callers serialize
/// mutation and queries through the usual `&mut` borrow.
pub struct MatchBin<V, M: Metric, S: Selector> {
    metric: M,
    selector: S,
    entries: HashMap<Uid, StoredEntry<M::Tag, V>>,
    /// Insertion order of live uids; the candidate order selectors observe.
    order: Vec<Uid>,
    next_uid: u64,
}

impl<V, M: Metric, S: Selector> MatchBin<V, M, S> {
    /// Empty bin over the given metric and selector.
    pub fn new(metric: M, selector: S) -> Self {
        Self {
            metric,
            selector,
            entries: HashMap::new(),
            order: Vec::new(),
            next_uid: 0,
        }
    }

    /// Store a tagged value and return its freshly assigned uid.
    pub fn put(&mut self, tag: M::Tag, value: V) -> Uid {
        let uid = Uid::from_raw(self.next_uid);
        self.next_uid += 1;
        self.entries.insert(uid, StoredEntry { tag, value });
        self.order.push(uid);
        uid
    }

    /// Remove an entry, making it invisible to subsequent queries.
    /// Silently does nothing when the uid is absent.
    pub fn erase(&mut self, uid: Uid) {
        if self.entries.remove(&uid).is_some() {
            self.order.retain(|&u| u != uid);
        }
    }

    /// Strict variant of [`erase`](Self::erase) that reports an absent uid.
    pub fn try_erase(&mut self, uid: Uid) -> Result<(), BinError> {
        if self.entries.remove(&uid).is_some() {
            self.order.retain(|&u| u != uid);
            Ok(())
        } else {
            Err(BinError::UnknownUid(uid))
        }
    }

    /// Direct access to a stored value.
    pub fn get(&self, uid: Uid) -> Result<&V, BinError> {
        self.entries
            .get(&uid)
            .map(|entry| &entry.value)
            .ok_or(BinError::UnknownUid(uid))
    }

    /// Mutable access to a stored value.
    pub fn get_mut(&mut self, uid: Uid) -> Result<&mut V, BinError> {
        self.entries
            .get_mut(&uid)
            .map(|entry| &mut entry.value)
            .ok_or(BinError::UnknownUid(uid))
    }

    /// The tag an entry was stored under.
    pub fn tag(&self, uid: Uid) -> Result<&M::Tag, BinError> {
        self.entries
            .get(&uid)
            .map(|entry| &entry.tag)
            .ok_or(BinError::UnknownUid(uid))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live uids in insertion order.
    pub fn uids(&self) -> impl Iterator<Item = Uid> + '_ {
        self.order.iter().copied()
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    /// Mutable selector access, e.g. to switch a dynamic selector's mode.
    /// The `&mut` borrow serializes the switch against in-flight queries.
    pub fn selector_mut(&mut self) -> &mut S {
        &mut self.selector
    }

    /// Score every live entry against the query and return up to `n` uids
    /// chosen by the selector. Never fails: an empty bin yields an empty
    /// list.
    pub fn query_ids(&mut self, query: &M::Query, n: usize) -> Vec<Uid> {
        let span = metrics_recorder().map(|recorder| (recorder, Instant::now()));

        let mut uids = self.order.clone();
        let mut scores = ScoreTable::with_capacity(uids.len());
        for &uid in &uids {
            let score = self.metric.distance(query, &self.entries[&uid].tag);
            debug_assert!(
                score.is_finite() && score >= 0.0,
                "{} produced invalid score {score}",
                self.metric.name()
            );
            scores.insert(uid, score);
        }

        let candidates = uids.len();
        let chosen = self.selector.select(&mut uids, &scores, n);

        if let Some((recorder, start)) = span {
            recorder.record_query(
                &self.metric.name(),
                &self.selector.name(),
                start.elapsed(),
                candidates,
                chosen.len(),
            );
        }
        chosen
    }

    /// Like [`query_ids`](Self::query_ids), mapped to the stored values.
    pub fn query_values(&mut self, query: &M::Query, n: usize) -> Vec<&V> {
        let chosen = self.query_ids(query, n);
        chosen
            .into_iter()
            .map(|uid| &self.entries[&uid].value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric::{AntiMod, BitTag, HammingMetric, NextUpMetric, SlideMod};
    use selector::{RankedSelector, RouletteConfig, RouletteSelector};

    fn tag(s: &str) -> BitTag {
        s.parse().expect("valid bit string")
    }

    fn hamming_bin(threshold: Option<f64>) -> MatchBin<&'static str, HammingMetric, RankedSelector>
    {
        MatchBin::new(HammingMetric::new(8), RankedSelector::new(threshold))
    }

    #[test]
    fn put_assigns_monotonic_uids() {
        let mut bin = hamming_bin(None);
        let a = bin.put(tag("00000000"), "a");
        let b = bin.put(tag("00000000"), "b");
        assert!(b > a);
        assert_eq!(bin.len(), 2);
        // duplicate tags coexist; uids tell them apart
        assert_eq!(*bin.get(a).unwrap(), "a");
        assert_eq!(*bin.get(b).unwrap(), "b");
    }

    #[test]
    fn erased_uids_are_not_reused() {
        let mut bin = hamming_bin(None);
        let a = bin.put(tag("00000000"), "a");
        bin.erase(a);
        let b = bin.put(tag("00000000"), "b");
        assert!(b > a);
        assert!(bin.get(a).is_err());
    }

    #[test]
    fn erase_is_silent_but_try_erase_reports() {
        let mut bin = hamming_bin(None);
        let ghost = Uid::from_raw(999);
        bin.erase(ghost);
        assert_eq!(bin.try_erase(ghost), Err(BinError::UnknownUid(ghost)));

        let a = bin.put(tag("00000000"), "a");
        assert_eq!(bin.try_erase(a), Ok(()));
        assert!(bin.is_empty());
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut bin = MatchBin::new(HammingMetric::new(8), RankedSelector::new(None));
        let a = bin.put(tag("00000000"), String::from("before"));
        *bin.get_mut(a).unwrap() = String::from("after");
        assert_eq!(bin.get(a).unwrap(), "after");
    }

    #[test]
    fn hamming_ranked_query_orders_by_distance() {
        // tags at Hamming distances 1, 3, 5, 7 from the query
        let mut bin = hamming_bin(None);
        let a = bin.put(tag("00000000"), "a");
        let b = bin.put(tag("00001111"), "b");
        let c = bin.put(tag("11110000"), "c");
        let _d = bin.put(tag("11111111"), "d");

        let query = tag("00000001");
        assert_eq!(bin.query_ids(&query, 3), vec![a, b, c]);
        assert_eq!(bin.query_values(&query, 3), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn threshold_cuts_the_result() {
        let mut bin = hamming_bin(Some(0.5));
        let a = bin.put(tag("00000000"), "a");
        let b = bin.put(tag("00001111"), "b");
        bin.put(tag("11110000"), "c");
        bin.put(tag("11111111"), "d");

        assert_eq!(bin.query_ids(&tag("00000001"), 3), vec![a, b]);
    }

    #[test]
    fn next_up_wraps_forward() {
        let mut bin = MatchBin::new(NextUpMetric::new(9), RankedSelector::new(None));
        let x = bin.put(3, "x");
        bin.put(7, "y");
        let z = bin.put(0, "z");

        // from 8, the ring forward distances are z: 2/9, x: 5/9, y: 1
        assert_eq!(bin.query_ids(&8, 2), vec![z, x]);
    }

    #[test]
    fn anti_metric_inverts_the_ranking() {
        let mut bin = MatchBin::new(
            AntiMod::new(HammingMetric::new(8)),
            RankedSelector::new(None),
        );
        bin.put(tag("00000000"), "a");
        bin.put(tag("00001111"), "b");
        let c = bin.put(tag("11110000"), "c");
        let d = bin.put(tag("11111111"), "d");

        assert_eq!(bin.query_ids(&tag("00000001"), 2), vec![d, c]);
    }

    #[test]
    fn slide_metric_matches_any_rotation() {
        let mut bin = MatchBin::new(
            SlideMod::new(HammingMetric::new(4)),
            RankedSelector::new(None),
        );
        let b = bin.put(tag("0011"), "b");
        let ids = bin.query_ids(&tag("1100"), 1);
        assert_eq!(ids, vec![b]);
        // the winning score is an exact match under rotation
        let m = SlideMod::new(HammingMetric::new(4));
        assert_eq!(m.distance(&tag("1100"), &tag("0011")), 0.0);
    }

    #[test]
    fn empty_bin_queries_return_empty() {
        let mut bin = hamming_bin(None);
        assert!(bin.query_ids(&tag("00000000"), 5).is_empty());
        assert!(bin.query_values(&tag("00000000"), 5).is_empty());
    }

    #[test]
    fn erased_entries_are_invisible_to_queries() {
        let mut bin = hamming_bin(None);
        let a = bin.put(tag("00000001"), "a");
        let b = bin.put(tag("11111110"), "b");
        bin.erase(a);
        assert_eq!(bin.query_ids(&tag("00000001"), 2), vec![b]);
    }

    #[test]
    fn roulette_bin_draws_n_with_replacement() {
        let mut bin = MatchBin::new(
            HammingMetric::new(8),
            RouletteSelector::from_seed(RouletteConfig::default(), 13).unwrap(),
        );
        bin.put(tag("00000000"), "a");
        bin.put(tag("00000011"), "b");

        let ids = bin.query_ids(&tag("00000000"), 10);
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn uids_iterate_in_insertion_order() {
        let mut bin = hamming_bin(None);
        let a = bin.put(tag("00000001"), "a");
        let b = bin.put(tag("00000010"), "b");
        let c = bin.put(tag("00000100"), "c");
        bin.erase(b);
        let live: Vec<Uid> = bin.uids().collect();
        assert_eq!(live, vec![a, c]);
    }
}
