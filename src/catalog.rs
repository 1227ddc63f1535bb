//! Track rows and the catalog they live in.
//!
//! The catalog is a plain ordered `Vec<Track>` with named-column access so
//! that filters can be expressed the way a data frame would express them:
//! by column name.

use crate::categorizer::Axis;
use crate::error::{MoodError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const ARTISTS: &str = "artists";
pub const GENRE: &str = "genre";
pub const DANCEABILITY: &str = "danceability";
pub const ENERGY: &str = "energy";
pub const INSTRUMENTALNESS: &str = "instrumentalness";
pub const VALENCE: &str = "valence";

/// Every column a catalog row exposes.
pub const COLUMNS: [&str; 8] = [
    ID,
    NAME,
    ARTISTS,
    GENRE,
    DANCEABILITY,
    ENERGY,
    INSTRUMENTALNESS,
    VALENCE,
];

/// A track's four audio-feature scores, nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub danceability: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub valence: f64,
}

impl FeatureVector {
    #[must_use]
    pub const fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Danceability => self.danceability,
            Axis::Energy => self.energy,
            Axis::Instrumentalness => self.instrumentalness,
            Axis::Mood => self.valence,
        }
    }
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    #[serde(default, alias = "track_genre")]
    pub genre: Option<String>,
    pub danceability: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub valence: f64,
}

impl Track {
    #[must_use]
    pub const fn features(&self) -> FeatureVector {
        FeatureVector {
            danceability: self.danceability,
            energy: self.energy,
            instrumentalness: self.instrumentalness,
            valence: self.valence,
        }
    }

    /// Numeric cell of a feature column, `None` for text columns.
    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        match column {
            DANCEABILITY => Some(self.danceability),
            ENERGY => Some(self.energy),
            INSTRUMENTALNESS => Some(self.instrumentalness),
            VALENCE => Some(self.valence),
            _ => None,
        }
    }

    /// Cell value of any column.
    ///
    /// # Errors
    ///
    /// [`MoodError::MissingColumn`] for unknown column names.
    pub fn value(&self, column: &str) -> Result<Value> {
        if let Some(number) = self.number(column) {
            return Ok(Value::Number(number));
        }
        match column {
            ID => Ok(Value::Text(self.id.clone())),
            NAME => Ok(Value::Text(self.name.clone())),
            ARTISTS => Ok(Value::Text(self.artists_display())),
            GENRE => Ok(Value::Text(self.genre.clone().unwrap_or_default())),
            other => Err(MoodError::MissingColumn(other.to_string())),
        }
    }

    #[must_use]
    pub fn artists_display(&self) -> String {
        self.artists.join(", ")
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artists_display(), self.name)
    }
}

/// Kind of data a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Number,
    Text,
}

/// Kind of a named column.
///
/// # Errors
///
/// [`MoodError::MissingColumn`] for unknown column names.
pub fn column_kind(column: &str) -> Result<ColumnKind> {
    match column {
        DANCEABILITY | ENERGY | INSTRUMENTALNESS | VALENCE => Ok(ColumnKind::Number),
        ID | NAME | ARTISTS | GENRE => Ok(ColumnKind::Text),
        other => Err(MoodError::MissingColumn(other.to_string())),
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Value::Number(_) => ColumnKind::Number,
            Value::Text(_) => ColumnKind::Text,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered collection of tracks.
///
/// Filtering never mutates a catalog; it yields a new one with the
/// surviving rows in their original order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    #[must_use]
    pub const fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    /// New catalog with the rows matching `keep`.
    #[must_use]
    pub fn retain_cloned(&self, mut keep: impl FnMut(&Track) -> bool) -> Self {
        self.tracks
            .iter()
            .filter(|&track| keep(track))
            .cloned()
            .collect()
    }
}

impl From<Vec<Track>> for Catalog {
    fn from(tracks: Vec<Track>) -> Self {
        Self::new(tracks)
    }
}

impl FromIterator<Track> for Catalog {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn track(id: &str, danceability: f64, valence: f64, energy: f64, instrumentalness: f64) -> Track {
        Track {
            id: id.to_string(),
            name: format!("Track {id}"),
            artists: vec![format!("Artist {id}")],
            genre: None,
            danceability,
            energy,
            instrumentalness,
            valence,
        }
    }

    pub fn ids(catalog: &Catalog) -> Vec<&str> {
        catalog.iter().map(|track| track.id.as_str()).collect()
    }
}
