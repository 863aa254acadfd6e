//! Metric modifiers: wrappers that are metrics themselves and nest freely.

use crate::tag::BitTag;
use crate::Metric;

/// Query spaces that support cyclic rotation, required by [`SlideMod`].
pub trait CyclicRotate {
    /// Rotate left by `k` positions.
    fn rotate_left(&self, k: usize) -> Self;
}

impl CyclicRotate for BitTag {
    fn rotate_left(&self, k: usize) -> Self {
        BitTag::rotate_left(self, k)
    }
}

/// Minimum of the inner metric over every cyclic rotation of the query.
/// Use when the phase of the query within the tag is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideMod<M> {
    inner: M,
}

impl<M> SlideMod<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M> Metric for SlideMod<M>
where
    M: Metric,
    M::Query: CyclicRotate + Clone,
{
    type Query = M::Query;
    type Tag = M::Tag;

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn name(&self) -> String {
        format!("Sliding {}", self.inner.name())
    }

    fn distance(&self, a: &Self::Query, b: &Self::Tag) -> f64 {
        let mut best = 1.0;
        let mut rotated = a.clone();
        for _ in 0..self.inner.width() {
            best = self.inner.distance(&rotated, b).min(best);
            rotated = rotated.rotate_left(1);
        }
        best
    }
}

/// Complement of the inner metric: `1 - d`. Composes dissimilarity-seeking
/// variants; applying it twice restores the original metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntiMod<M> {
    inner: M,
}

impl<M> AntiMod<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: Metric> Metric for AntiMod<M> {
    type Query = M::Query;
    type Tag = M::Tag;

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn name(&self) -> String {
        format!("Inverse {}", self.inner.name())
    }

    fn distance(&self, a: &Self::Query, b: &Self::Tag) -> f64 {
        1.0 - self.inner.distance(a, b)
    }
}

/// Mean of the inner metric over fixed-length arrays of components.
/// Queries and tags are `Vec`s of the inner spaces with exactly `dim`
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimMod<M> {
    inner: M,
    dim: usize,
}

impl<M> DimMod<M> {
    pub fn new(inner: M, dim: usize) -> Self {
        assert!(dim >= 1, "dimension must be at least 1");
        Self { inner, dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl<M: Metric> Metric for DimMod<M> {
    type Query = Vec<M::Query>;
    type Tag = Vec<M::Tag>;

    fn width(&self) -> usize {
        self.dim * self.inner.width()
    }

    fn name(&self) -> String {
        format!("{}-Dimensional {}", self.dim, self.inner.name())
    }

    fn distance(&self, a: &Self::Query, b: &Self::Tag) -> f64 {
        debug_assert_eq!(a.len(), self.dim, "query component count mismatch");
        debug_assert_eq!(b.len(), self.dim, "tag component count mismatch");
        let sum: f64 = a
            .iter()
            .zip(b.iter())
            .map(|(qa, qb)| self.inner.distance(qa, qb))
            .sum();
        sum / self.dim as f64
    }
}
