//! # Recommender Module
//!
//! Re-expands a label into a filter over the catalog.
//!
//! Each bucket name is resolved to its numeric interval by the categorizer
//! of its axis; the four intervals are ANDed over the `danceability`,
//! `valence`, `energy` and `instrumentalness` columns. Intervals are
//! half-open (`min <= v < max`), with the top bucket of an axis also
//! accepting exactly `1.0`.
//!
//! ## Examples
//!
//! ```
//! use moodmatch::catalog::{Catalog, Track};
//! use moodmatch::recommender::Recommender;
//!
//! let track = Track {
//!     id: "1".into(),
//!     name: "Song".into(),
//!     artists: vec!["Artist".into()],
//!     genre: None,
//!     danceability: 0.6,
//!     energy: 0.6,
//!     instrumentalness: 0.3,
//!     valence: 0.6,
//! };
//! let catalog = Catalog::new(vec![track]);
//!
//! let recommended = Recommender::new()
//!     .recommend("danceable", "positive", "high", "low", &catalog)?;
//! assert_eq!(recommended.len(), 1);
//! # Ok::<(), moodmatch::MoodError>(())
//! ```

use crate::catalog::{Catalog, Track};
use crate::categorizer::{Axis, BucketRange, Categorizer, DANCEABILITY, ENERGY, INSTRUMENTALNESS, MOOD};
use crate::error::Result;
use crate::label::{LabelCodec, LabelParts};
use log::debug;
use rayon::prelude::*;

/// Catalog size from which filtering is spread over the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10_000;

lazy_static::lazy_static! {
    /// Shared recommender with the default parallel threshold.
    pub static ref DEFAULT_RECOMMENDER: Recommender = Recommender::new();
}

/// The four resolved bucket intervals of one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketFilter {
    ranges: [(Axis, BucketRange); 4],
}

impl BucketFilter {
    #[must_use]
    pub fn matches(&self, track: &Track) -> bool {
        let features = track.features();
        self.ranges
            .iter()
            .all(|(axis, range)| range.contains(features.get(*axis)))
    }

    /// Interval applied to one axis.
    #[must_use]
    pub fn range(&self, axis: Axis) -> Option<BucketRange> {
        self.ranges
            .iter()
            .find(|(candidate, _)| *candidate == axis)
            .map(|(_, range)| *range)
    }
}

/// Label-driven track recommender.
#[derive(Debug, Clone)]
pub struct Recommender {
    danceability: Categorizer,
    energy: Categorizer,
    instrumentalness: Categorizer,
    mood: Categorizer,
    parallel_threshold: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new()
    }
}

impl Recommender {
    #[must_use]
    pub fn new() -> Self {
        Self::with_parallel_threshold(DEFAULT_PARALLEL_THRESHOLD)
    }

    #[must_use]
    pub fn with_parallel_threshold(parallel_threshold: usize) -> Self {
        Self {
            danceability: DANCEABILITY,
            energy: ENERGY,
            instrumentalness: INSTRUMENTALNESS,
            mood: MOOD,
            parallel_threshold,
        }
    }

    /// Resolves the four bucket names to their intervals.
    ///
    /// # Errors
    ///
    /// [`crate::MoodError::UnknownBucket`] if a name is not valid for its
    /// axis.
    pub fn bucket_filter(
        &self,
        danceability_category: &str,
        mood: &str,
        energy_category: &str,
        instrumentalness_category: &str,
    ) -> Result<BucketFilter> {
        Ok(BucketFilter {
            ranges: [
                (Axis::Danceability, self.danceability.range(danceability_category)?),
                (Axis::Energy, self.energy.range(energy_category)?),
                (Axis::Instrumentalness, self.instrumentalness.range(instrumentalness_category)?),
                (Axis::Mood, self.mood.range(mood)?),
            ],
        })
    }

    /// Rows of `catalog` that fall into all four buckets, in catalog order.
    ///
    /// An empty result is not an error. The catalog is left untouched.
    ///
    /// # Errors
    ///
    /// [`crate::MoodError::UnknownBucket`] if a name is not valid for its
    /// axis.
    pub fn recommend(
        &self,
        danceability_category: &str,
        mood: &str,
        energy_category: &str,
        instrumentalness_category: &str,
        catalog: &Catalog,
    ) -> Result<Catalog> {
        let filter = self.bucket_filter(
            danceability_category,
            mood,
            energy_category,
            instrumentalness_category,
        )?;

        let result: Catalog = if catalog.len() >= self.parallel_threshold {
            catalog
                .tracks()
                .par_iter()
                .filter(|track| filter.matches(track))
                .cloned()
                .collect::<Vec<_>>()
                .into()
        } else {
            catalog.retain_cloned(|track| filter.matches(track))
        };

        debug!(
            "Recommended {} of {} tracks for ({danceability_category}, {mood}, {energy_category}, {instrumentalness_category})",
            result.len(),
            catalog.len()
        );
        Ok(result)
    }

    /// Same as [`Recommender::recommend`] for decoded label parts.
    pub fn recommend_parts(&self, parts: &LabelParts, catalog: &Catalog) -> Result<Catalog> {
        self.recommend(
            parts.danceability,
            parts.mood,
            parts.energy,
            parts.instrumentalness,
            catalog,
        )
    }

    /// Decodes `label` with `codec` and recommends from the parts.
    ///
    /// # Errors
    ///
    /// Any label parse error of [`LabelCodec::decode`].
    pub fn recommend_label(&self, label: &str, codec: &LabelCodec, catalog: &Catalog) -> Result<Catalog> {
        let parts = codec.decode(label)?;
        self.recommend_parts(&parts, catalog)
    }
}
