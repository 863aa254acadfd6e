//! # Metric
//!
//! Tag spaces and the similarity-metric family for the tagmatch engine.
//!
//! A metric is a pure function `distance(query, tag) -> f64` scoring into
//! `[0, 1]`, where 0 means identical and 1 maximally dissimilar. The bin
//! runs a metric against every stored tag to build the score table that a
//! selector then turns into a ranked result.
//!
//! ## Core Types
//!
//! - [`BitTag`]: fixed-width bit vector, the primary tag space.
//! - [`Metric`]: the trait every metric and modifier implements.
//! - Bit-space metrics: [`HammingMetric`], [`AsymmetricWrapMetric`],
//!   [`AsymmetricNoWrapMetric`], [`SymmetricWrapMetric`],
//!   [`SymmetricNoWrapMetric`], [`StreakMetric`].
//! - Integer metrics: [`AbsDiffMetric`], [`NextUpMetric`].
//! - Modifiers, themselves metrics and freely nestable: [`SlideMod`]
//!   (minimum over cyclic query rotations), [`AntiMod`] (complement),
//!   [`DimMod`] (mean over fixed-length arrays).
//!
//! ## Example
//!
//! ```
//! use metric::{BitTag, HammingMetric, Metric, SlideMod};
//!
//! let metric = SlideMod::new(HammingMetric::new(8));
//! let query: BitTag = "11000000".parse().unwrap();
//! let tag: BitTag = "00000011".parse().unwrap();
//! // some rotation of the query matches the tag exactly
//! assert_eq!(metric.distance(&query, &tag), 0.0);
//! ```
//!
//! Asymmetric metrics ([`AsymmetricWrapMetric`], [`AsymmetricNoWrapMetric`],
//! [`NextUpMetric`]) are oriented query → tag; everything else is
//! symmetric.

pub mod bits;
pub mod modifiers;
pub mod scalar;
pub mod streak;
pub mod tag;

pub use crate::bits::{
    AsymmetricNoWrapMetric, AsymmetricWrapMetric, HammingMetric, SymmetricNoWrapMetric,
    SymmetricWrapMetric,
};
pub use crate::modifiers::{AntiMod, CyclicRotate, DimMod, SlideMod};
pub use crate::scalar::{AbsDiffMetric, NextUpMetric};
pub use crate::streak::StreakMetric;
pub use crate::tag::{BitTag, TagParseError};

/// A similarity metric over a tag space.
///
/// `distance` scores into `[0, 1]` with 0 meaning identical; every provided
/// metric uses the same type for queries and tags. `width` reports the
/// nominal bit-width of the tag space so modifiers can compose, and `name`
/// is a stable label for diagnostics.
pub trait Metric: std::fmt::Debug {
    type Query;
    type Tag;

    fn width(&self) -> usize;
    fn name(&self) -> String;
    fn distance(&self, a: &Self::Query, b: &Self::Tag) -> f64;
}

impl<M: Metric + ?Sized> Metric for Box<M> {
    type Query = M::Query;
    type Tag = M::Tag;

    fn width(&self) -> usize {
        (**self).width()
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn distance(&self, a: &Self::Query, b: &Self::Tag) -> f64 {
        (**self).distance(a, b)
    }
}
