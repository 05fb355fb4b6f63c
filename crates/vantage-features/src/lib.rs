//! # vantage-features
//!
//! Turns an indicator history into a fixed-shape [`FeatureVector`](vantage_core::FeatureVector).
//!
//! A [`FeatureSchema`] lists `(feature_name, extractor)` pairs. The [`FeatureBuilder`]
//! walks them in declared order over the history at or before `as_of`, so the same
//! inputs always produce the same vector. Extractors whose window exceeds the
//! available history yield an `InsufficientHistory` marker, never a zero.

pub mod builder;
pub mod cache;
pub mod extractor;
pub mod schema;
pub mod stats;

pub use builder::FeatureBuilder;
pub use cache::{FeatureCache, FeatureKey};
pub use extractor::{CustomFn, Extractor};
pub use schema::{FeatureSchema, FeatureSpec};
