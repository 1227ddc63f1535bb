//! # Label Module
//!
//! Packs one bucket per axis into a compound label and unpacks it again.
//!
//! The wire format is four digits joined by commas, in the fixed axis order
//! danceability, instrumentalness, mood, energy:
//!
//! ```text
//! "2,1,2,2"  =>  danceable, low, positive, high
//! ```
//!
//! Digits are the ordinal position of the bucket inside its axis, so the
//! codec is a bijection over the 256 valid tuples.

use crate::categorizer::{Axis, Categorizer, BUCKET_COUNT};
use crate::error::{MoodError, Result};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Axis order of the four label digits.
pub const LABEL_AXES: [Axis; 4] = [
    Axis::Danceability,
    Axis::Instrumentalness,
    Axis::Mood,
    Axis::Energy,
];

const SEPARATOR: char = ',';

lazy_static::lazy_static! {
    /// Shared codec; its tables are never mutated after construction.
    pub static ref DEFAULT_CODEC: LabelCodec = LabelCodec::new();
}

/// A validated compound label.
///
/// Ordering follows the digits, which matches the ordering of the label
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompoundLabel {
    digits: [u8; 4],
}

impl fmt::Display for CompoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [d, i, m, e] = self.digits;
        write!(f, "{d},{i},{m},{e}")
    }
}

impl FromStr for CompoundLabel {
    type Err = MoodError;

    fn from_str(label: &str) -> Result<Self> {
        let fields: Vec<&str> = label.split(SEPARATOR).collect();
        if fields.len() != LABEL_AXES.len() {
            return Err(MoodError::MalformedLabel(label.to_string()));
        }

        let mut digits = [0u8; 4];
        for (slot, field) in digits.iter_mut().zip(&fields) {
            *slot = parse_digit(field)?;
        }
        Ok(Self { digits })
    }
}

impl Serialize for CompoundLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompoundLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn parse_digit(field: &str) -> Result<u8> {
    let invalid = || MoodError::InvalidDigit {
        field: field.to_string(),
    };
    let digit: u8 = field.trim().parse().map_err(|_| invalid())?;
    if usize::from(digit) >= BUCKET_COUNT {
        return Err(invalid());
    }
    Ok(digit)
}

/// Bucket names recovered from a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelParts {
    pub danceability: &'static str,
    pub instrumentalness: &'static str,
    pub mood: &'static str,
    pub energy: &'static str,
}

/// Digit tables of one axis.
#[derive(Debug)]
struct AxisTable {
    axis: Axis,
    names: [&'static str; BUCKET_COUNT],
    digits: HashMap<&'static str, u8>,
}

impl AxisTable {
    fn new(axis: Axis) -> Self {
        let categorizer = Categorizer::new(axis);
        let mut names = [""; BUCKET_COUNT];
        let mut digits = HashMap::with_capacity(BUCKET_COUNT);
        for (digit, name) in categorizer.buckets().enumerate() {
            names[digit] = name;
            digits.insert(name, digit as u8);
        }
        Self { axis, names, digits }
    }

    fn digit(&self, bucket: &str) -> Result<u8> {
        self.digits
            .get(bucket)
            .copied()
            .ok_or_else(|| MoodError::UnknownBucket {
                axis: self.axis.name(),
                bucket: bucket.to_string(),
            })
    }

    fn name(&self, digit: u8) -> Result<&'static str> {
        self.names
            .get(usize::from(digit))
            .copied()
            .ok_or(MoodError::UnknownDigit {
                axis: self.axis.name(),
                digit,
            })
    }
}

/// Encoder/decoder between bucket names and compound labels.
#[derive(Debug)]
pub struct LabelCodec {
    tables: [AxisTable; 4],
}

impl Default for LabelCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelCodec {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: LABEL_AXES.map(AxisTable::new),
        }
    }

    /// Builds the label for one bucket per axis.
    ///
    /// # Errors
    ///
    /// [`MoodError::UnknownBucket`] if a name is not valid for its axis.
    pub fn encode(
        &self,
        danceability: &str,
        instrumentalness: &str,
        mood: &str,
        energy: &str,
    ) -> Result<CompoundLabel> {
        let [d, i, m, e] = &self.tables;
        let digits = [
            d.digit(danceability)?,
            i.digit(instrumentalness)?,
            m.digit(mood)?,
            e.digit(energy)?,
        ];
        let label = CompoundLabel { digits };
        trace!("Encoded ({danceability}, {instrumentalness}, {mood}, {energy}) as `{label}'");
        Ok(label)
    }

    /// Splits a label string back into bucket names.
    ///
    /// # Errors
    ///
    /// - [`MoodError::MalformedLabel`] unless there are exactly 4 fields
    /// - [`MoodError::InvalidDigit`] if a field is not an integer in `0..=3`
    pub fn decode(&self, label: &str) -> Result<LabelParts> {
        let parsed: CompoundLabel = label.parse()?;
        self.decode_label(&parsed)
    }

    /// Bucket names of an already parsed label.
    pub fn decode_label(&self, label: &CompoundLabel) -> Result<LabelParts> {
        let [d, i, m, e] = &self.tables;
        let [dd, id, md, ed] = label.digits;
        let parts = LabelParts {
            danceability: d.name(dd)?,
            instrumentalness: i.name(id)?,
            mood: m.name(md)?,
            energy: e.name(ed)?,
        };
        trace!("Decoded `{label}' as {parts:?}");
        Ok(parts)
    }
}
