//! # Browse Module
//!
//! Catalog browsing on top of the core: range criteria, genre selection,
//! free-text search, pagination, and turning "tracks like this one" into a
//! recommendation set.
//!
//! [`BrowseState::refilter`] applies the steps in a fixed order:
//!
//! 1. range criteria ([`apply_range_filter`], inclusive bounds)
//! 2. genre ([`apply_equality_filter`] on `genre`)
//! 3. search string ([`search`])
//! 4. recommendations, if active: keep only recommended ids

use crate::catalog::{Catalog, Track, GENRE};
use crate::categorizer::Axis;
use crate::classifier::LabelClassifier;
use crate::error::{MoodError, Result};
use crate::frame_filter::{apply_equality_filter, apply_range_filter, RangeCriterion};
use crate::label::LabelCodec;
use crate::recommender::Recommender;
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Genres offered for selection, as `(display name, key)`.
pub const GENRES: [(&str, &str); 16] = [
    ("Avant-garde", "avant-garde"),
    ("Blues", "blues"),
    ("Country", "country"),
    ("Easy listening", "easy listening"),
    ("Electronic", "electronic"),
    ("Experimental", "experimental"),
    ("Folk", "folk"),
    ("Hip Hop", "hip hop"),
    ("Jazz", "jazz"),
    ("Metal", "metal"),
    ("Pop", "pop"),
    ("Punk", "punk"),
    ("R&B", "r&b"),
    ("Rap", "rap"),
    ("Rock", "rock"),
    ("Soul", "soul"),
];

const ALL_GENRES: &str = "all";

/// Genre filter choice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Genre {
    #[default]
    All,
    Only(&'static str),
}

impl FromStr for Genre {
    type Err = MoodError;

    /// Accepts a genre key or display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if wanted == ALL_GENRES {
            return Ok(Genre::All);
        }
        GENRES
            .iter()
            .find(|(display, key)| *key == wanted || display.to_lowercase() == wanted)
            .map(|(_, key)| Genre::Only(*key))
            .ok_or_else(|| MoodError::InvalidArgument(format!("unknown genre `{s}`")))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Genre::All => f.write_str(ALL_GENRES),
            Genre::Only(key) => f.write_str(key),
        }
    }
}

/// Keeps the rows of the selected genre.
pub fn apply_genre(catalog: &Catalog, genre: &Genre) -> Result<Catalog> {
    match genre {
        Genre::All => Ok(catalog.clone()),
        Genre::Only(key) => apply_equality_filter(catalog, &[(GENRE, (*key).into())]),
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase().replace(' ', "")
}

/// Rows whose track name or any artist contains `query`.
///
/// Matching ignores case and spaces. An empty query returns the catalog
/// unchanged.
#[must_use]
pub fn search(catalog: &Catalog, query: &str) -> Catalog {
    if query.is_empty() {
        return catalog.clone();
    }
    let needle = normalize(query);
    let result = catalog.retain_cloned(|track| {
        normalize(&track.name).contains(&needle)
            || track
                .artists
                .iter()
                .any(|artist| normalize(artist).contains(&needle))
    });
    debug!("Search `{query}' matched {} of {} tracks", result.len(), catalog.len());
    result
}

/// Window over a filtered catalog.
///
/// Starts at `[0, step)`. Moving forward is refused once the window's end
/// is past the catalog length; moving back is refused at the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    left: usize,
    right: usize,
    step: usize,
    page: usize,
}

impl Paginator {
    #[must_use]
    pub fn new(step: usize) -> Self {
        let step = step.max(1);
        Self {
            left: 0,
            right: step,
            step,
            page: 0,
        }
    }

    /// Paginator positioned on `page` (0-based). Pages past the end give an
    /// empty window; the bounds saturate instead of overflowing.
    #[must_use]
    pub fn at_page(step: usize, page: usize) -> Self {
        let mut paginator = Self::new(step);
        paginator.page = page;
        paginator.left = page.saturating_mul(paginator.step);
        paginator.right = paginator.left.saturating_add(paginator.step);
        paginator
    }

    /// Moves one page forward. Returns `false` if already past the end.
    pub fn next(&mut self, len: usize) -> bool {
        if self.right > len {
            return false;
        }
        self.left = self.right;
        self.right += self.step;
        self.page += 1;
        true
    }

    /// Moves one page back. Returns `false` on the first page.
    pub fn prev(&mut self) -> bool {
        if self.left == 0 {
            return false;
        }
        self.right = self.left;
        self.left = self.left.saturating_sub(self.step);
        self.page -= 1;
        true
    }

    /// Back to the first page.
    pub fn reset(&mut self) {
        *self = Self::new(self.step);
    }

    /// Rows inside the current window.
    #[must_use]
    pub fn slice<'a>(&self, catalog: &'a Catalog) -> &'a [Track] {
        let tracks = catalog.tracks();
        let start = self.left.min(tracks.len());
        let end = self.right.min(tracks.len());
        &tracks[start..end]
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn bounds(&self) -> (usize, usize) {
        (self.left, self.right)
    }
}

impl fmt::Display for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {}, Entries ({}-{})", self.page, self.left, self.right)
    }
}

/// Looks up a track, labels it and recommends from the catalog.
///
/// # Errors
///
/// - [`MoodError::UnknownTrack`] if `track_id` is not in the catalog
/// - classifier, label and recommender errors are propagated
pub fn get_recommendations(
    track_id: &str,
    catalog: &Catalog,
    classifier: &dyn LabelClassifier,
    recommender: &Recommender,
    codec: &LabelCodec,
) -> Result<Catalog> {
    let track = catalog
        .find(track_id)
        .ok_or_else(|| MoodError::UnknownTrack(track_id.to_string()))?;
    let label = classifier.predict(&track.features())?;
    let parts = codec.decode_label(&label)?;
    info!("Track `{track}' labelled `{label}' ({parts:?})");
    recommender.recommend_parts(&parts, catalog)
}

/// Everything that narrows what is displayed.
#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    criteria: Vec<(Axis, (f64, f64))>,
    pub genre: Genre,
    pub search: String,
    recommendations: Option<HashSet<String>>,
}

impl BrowseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inclusive range of one axis, replacing an earlier one.
    pub fn set_range(&mut self, axis: Axis, min: f64, max: f64) {
        self.criteria.retain(|(existing, _)| *existing != axis);
        self.criteria.push((axis, (min, max)));
    }

    /// Restricts the view to a recommendation set.
    pub fn enable_recommendations(&mut self, recommended: &Catalog) {
        self.recommendations = Some(recommended.iter().map(|track| track.id.clone()).collect());
    }

    pub fn disable_recommendations(&mut self) {
        self.recommendations = None;
    }

    #[must_use]
    pub const fn recommendations_enabled(&self) -> bool {
        self.recommendations.is_some()
    }

    /// Applies criteria, genre, search and recommendations in that order.
    pub fn refilter(&self, catalog: &Catalog) -> Result<Catalog> {
        let criteria: Vec<RangeCriterion<'_>> = self
            .criteria
            .iter()
            .map(|(axis, bounds)| (axis.column(), *bounds))
            .collect();
        let mut result = apply_range_filter(catalog, &criteria)?;
        result = apply_genre(&result, &self.genre)?;
        result = search(&result, &self.search);

        if let Some(ids) = &self.recommendations {
            result = result.retain_cloned(|track| ids.contains(&track.id));
        }
        Ok(result)
    }
}
