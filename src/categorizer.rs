//! # Categorizer Module
//!
//! Quartile bucketing of the four audio-feature axes. Each axis owns four
//! ordered buckets over `[0, 1]`:
//!
//! ```text
//! [0.00, 0.25)  [0.25, 0.50)  [0.50, 0.75)  [0.75, 1.00]
//! ```
//!
//! Only the vocabulary differs between axes, so a single [`Categorizer`]
//! type is parametrized by a static bucket table. The same table drives
//! both directions: score to bucket name ([`Categorizer::categorize`]) and
//! bucket name back to its numeric range ([`Categorizer::range`]), which is
//! what the recommender uses to rebuild a filter from a label.
//!
//! ## Examples
//!
//! ```
//! use moodmatch::categorizer::DANCEABILITY;
//!
//! assert_eq!(DANCEABILITY.categorize(0.5)?, "danceable");
//! assert_eq!(DANCEABILITY.min_inclusive("danceable")?, 0.5);
//! assert_eq!(DANCEABILITY.max_exclusive("danceable")?, 0.75);
//! # Ok::<(), moodmatch::MoodError>(())
//! ```

use crate::error::{MoodError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of buckets on every axis.
pub const BUCKET_COUNT: usize = 4;

/// One of the four scored musical attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Danceability,
    Energy,
    Instrumentalness,
    /// Valence, read as the track's mood.
    Mood,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Danceability,
        Axis::Energy,
        Axis::Instrumentalness,
        Axis::Mood,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Axis::Danceability => "danceability",
            Axis::Energy => "energy",
            Axis::Instrumentalness => "instrumentalness",
            Axis::Mood => "mood",
        }
    }

    /// Catalog column holding this axis' score.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Axis::Mood => "valence",
            other => other.name(),
        }
    }

    const fn buckets(self) -> &'static [BucketSpec; BUCKET_COUNT] {
        match self {
            Axis::Danceability => &DANCEABILITY_BUCKETS,
            Axis::Energy => &LEVEL_BUCKETS,
            Axis::Instrumentalness => &LEVEL_BUCKETS,
            Axis::Mood => &MOOD_BUCKETS,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Axis {
    type Err = MoodError;

    /// Accepts the axis name or its column name (`valence` for mood).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "danceability" => Ok(Axis::Danceability),
            "energy" => Ok(Axis::Energy),
            "instrumentalness" => Ok(Axis::Instrumentalness),
            "mood" | "valence" => Ok(Axis::Mood),
            other => Err(MoodError::InvalidArgument(format!("unknown axis `{other}`"))),
        }
    }
}

/// Static description of one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSpec {
    pub name: &'static str,
    pub min_inclusive: f64,
    pub max_exclusive: f64,
}

const fn quartiles(names: [&'static str; BUCKET_COUNT]) -> [BucketSpec; BUCKET_COUNT] {
    [
        BucketSpec { name: names[0], min_inclusive: 0.0, max_exclusive: 0.25 },
        BucketSpec { name: names[1], min_inclusive: 0.25, max_exclusive: 0.5 },
        BucketSpec { name: names[2], min_inclusive: 0.5, max_exclusive: 0.75 },
        BucketSpec { name: names[3], min_inclusive: 0.75, max_exclusive: 1.0 },
    ]
}

const DANCEABILITY_BUCKETS: [BucketSpec; BUCKET_COUNT] =
    quartiles(["very undanceable", "undanceable", "danceable", "very danceable"]);

// Energy and instrumentalness share one vocabulary.
const LEVEL_BUCKETS: [BucketSpec; BUCKET_COUNT] =
    quartiles(["very low", "low", "high", "very high"]);

const MOOD_BUCKETS: [BucketSpec; BUCKET_COUNT] =
    quartiles(["very negative", "negative", "positive", "very positive"]);

/// Numeric interval of a bucket.
///
/// Half-open `[min, max)` except for the top bucket of an axis, which is
/// closed so that a score of exactly `1.0` still belongs to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketRange {
    pub min_inclusive: f64,
    pub max_exclusive: f64,
    pub includes_max: bool,
}

impl BucketRange {
    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_inclusive
            && (value < self.max_exclusive || (self.includes_max && value == self.max_exclusive))
    }
}

/// Quantizer for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Categorizer {
    axis: Axis,
    buckets: &'static [BucketSpec; BUCKET_COUNT],
}

pub const DANCEABILITY: Categorizer = Categorizer::new(Axis::Danceability);
pub const ENERGY: Categorizer = Categorizer::new(Axis::Energy);
pub const INSTRUMENTALNESS: Categorizer = Categorizer::new(Axis::Instrumentalness);
pub const MOOD: Categorizer = Categorizer::new(Axis::Mood);

impl Categorizer {
    #[must_use]
    pub const fn new(axis: Axis) -> Self {
        Self {
            axis,
            buckets: axis.buckets(),
        }
    }

    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Bucket names in ordinal order.
    pub fn buckets(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.buckets.iter().map(|spec| spec.name)
    }

    /// Maps a score in `[0, 1]` to its bucket name.
    ///
    /// Breakpoints belong to the upper bucket: `0.25` is the second bucket,
    /// `1.0` the top one.
    ///
    /// # Errors
    ///
    /// [`MoodError::OutOfRange`] for values below 0, above 1, or NaN.
    pub fn categorize(&self, value: f64) -> Result<&'static str> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MoodError::OutOfRange {
                axis: self.axis.name(),
                value,
            });
        }

        (0..BUCKET_COUNT)
            .find(|&index| self.range_at(index).contains(value))
            .map(|index| self.buckets[index].name)
            .ok_or(MoodError::OutOfRange {
                axis: self.axis.name(),
                value,
            })
    }

    /// Ordinal position (0..=3) of a bucket name.
    pub fn index_of(&self, bucket: &str) -> Result<usize> {
        self.buckets
            .iter()
            .position(|spec| spec.name == bucket)
            .ok_or_else(|| MoodError::UnknownBucket {
                axis: self.axis.name(),
                bucket: bucket.to_string(),
            })
    }

    /// Bucket name at an ordinal position, if any.
    #[must_use]
    pub fn name_at(&self, index: usize) -> Option<&'static str> {
        self.buckets.get(index).map(|spec| spec.name)
    }

    pub fn min_inclusive(&self, bucket: &str) -> Result<f64> {
        Ok(self.range(bucket)?.min_inclusive)
    }

    /// Upper bound of a bucket. For the top bucket this is `1.0`, which the
    /// bucket includes; see [`BucketRange`].
    pub fn max_exclusive(&self, bucket: &str) -> Result<f64> {
        Ok(self.range(bucket)?.max_exclusive)
    }

    /// Full interval of a bucket name.
    ///
    /// # Errors
    ///
    /// [`MoodError::UnknownBucket`] if `bucket` is not one of this axis'
    /// names.
    pub fn range(&self, bucket: &str) -> Result<BucketRange> {
        let index = self.index_of(bucket)?;
        Ok(self.range_at(index))
    }

    fn range_at(&self, index: usize) -> BucketRange {
        let spec = &self.buckets[index];
        BucketRange {
            min_inclusive: spec.min_inclusive,
            max_exclusive: spec.max_exclusive,
            includes_max: index == BUCKET_COUNT - 1,
        }
    }
}

impl From<Axis> for Categorizer {
    fn from(axis: Axis) -> Self {
        Self::new(axis)
    }
}
