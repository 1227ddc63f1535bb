//! # Classifier Module
//!
//! The boundary between a track's feature vector and its compound label.
//!
//! Two implementations of [`LabelClassifier`] are provided:
//!
//! - [`NearestNeighborClassifier`]: majority vote of the `k` closest
//!   labelled samples of a pre-trained model export. The model is loaded,
//!   never fitted here.
//! - [`QuantileClassifier`]: labels a vector directly through the four
//!   categorizers. Used when no model file is available.
//!
//! ## Model export format
//!
//! ```json
//! {
//!   "k": 5,
//!   "samples": [
//!     { "features": { "danceability": 0.61, "energy": 0.7,
//!                     "instrumentalness": 0.0, "valence": 0.52 },
//!       "label": "2,0,2,2" }
//!   ]
//! }
//! ```

use crate::catalog::FeatureVector;
use crate::categorizer::{DANCEABILITY, ENERGY, INSTRUMENTALNESS, MOOD};
use crate::error::{MoodError, Result};
use crate::label::{CompoundLabel, LabelCodec, DEFAULT_CODEC};
use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Produces a compound label for a feature vector.
pub trait LabelClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<CompoundLabel>;
}

/// Rule-based labelling through the categorizers.
#[derive(Debug, Clone, Copy)]
pub struct QuantileClassifier<'a> {
    codec: &'a LabelCodec,
}

impl Default for QuantileClassifier<'static> {
    fn default() -> Self {
        Self { codec: &*DEFAULT_CODEC }
    }
}

impl LabelClassifier for QuantileClassifier<'_> {
    /// # Errors
    ///
    /// [`MoodError::OutOfRange`] if any score is outside `[0, 1]`.
    fn predict(&self, features: &FeatureVector) -> Result<CompoundLabel> {
        self.codec.encode(
            DANCEABILITY.categorize(features.danceability)?,
            INSTRUMENTALNESS.categorize(features.instrumentalness)?,
            MOOD.categorize(features.valence)?,
            ENERGY.categorize(features.energy)?,
        )
    }
}

/// One labelled reference point of a nearest-neighbor model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledSample {
    pub features: FeatureVector,
    pub label: CompoundLabel,
}

const fn default_k() -> usize {
    5
}

/// Serialized nearest-neighbor model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborModel {
    #[serde(default = "default_k")]
    pub k: usize,
    pub samples: Vec<LabelledSample>,
}

/// k-nearest-neighbor label classifier with uniform weights and Euclidean
/// distance.
#[derive(Debug, Clone)]
pub struct NearestNeighborClassifier {
    k: usize,
    samples: Vec<LabelledSample>,
}

impl NearestNeighborClassifier {
    /// # Errors
    ///
    /// [`MoodError::InvalidArgument`] if `k` is zero or there are no
    /// samples.
    pub fn new(model: NeighborModel) -> Result<Self> {
        if model.k == 0 {
            return Err(MoodError::InvalidArgument(
                "nearest-neighbor model needs k >= 1".to_string(),
            ));
        }
        if model.samples.is_empty() {
            return Err(MoodError::InvalidArgument(
                "nearest-neighbor model has no samples".to_string(),
            ));
        }
        Ok(Self {
            k: model.k,
            samples: model.samples,
        })
    }

    /// Loads a model export from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        let model: NeighborModel = serde_json::from_str(&raw)
            .with_context(|| format!("Model file {} is not a valid model export", path.display()))?;
        let classifier = Self::new(model)
            .with_context(|| format!("Model file {} cannot be used", path.display()))?;
        info!(
            "Loaded nearest-neighbor model with {} samples (k = {})",
            classifier.samples.len(),
            classifier.k
        );
        Ok(classifier)
    }
}

fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    [
        a.danceability - b.danceability,
        a.valence - b.valence,
        a.instrumentalness - b.instrumentalness,
        a.energy - b.energy,
    ]
    .iter()
    .map(|delta| delta * delta)
    .sum()
}

impl LabelClassifier for NearestNeighborClassifier {
    /// Majority label among the `k` closest samples. Ties between labels go
    /// to the smallest label.
    fn predict(&self, features: &FeatureVector) -> Result<CompoundLabel> {
        let mut neighbors: Vec<(f64, CompoundLabel)> = self
            .samples
            .iter()
            .map(|sample| (squared_distance(features, &sample.features), sample.label))
            .collect();
        // Stable sort keeps sample order among equal distances.
        neighbors.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let mut votes: BTreeMap<CompoundLabel, usize> = BTreeMap::new();
        for (_, label) in neighbors.iter().take(self.k) {
            *votes.entry(*label).or_default() += 1;
        }

        let (label, count) = votes
            .into_iter()
            .fold(None, |best: Option<(CompoundLabel, usize)>, (label, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((label, count)),
            })
            .ok_or_else(|| MoodError::InvalidArgument("no neighbors to vote".to_string()))?;

        debug!("Predicted `{label}' with {count} of {} votes", self.k.min(self.samples.len()));
        Ok(label)
    }
}
