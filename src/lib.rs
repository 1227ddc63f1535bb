//! Mood-based track recommendation over an in-memory catalog.
//!
//! Core modules:
//! - [`categorizer`] - Quartile buckets for each feature axis
//! - [`label`] - Compound labels such as `"2,0,2,3"`
//! - [`recommender`] - Tracks that fall into the same four buckets
//! - [`frame_filter`] - Generic range and equality filters
//! - [`classifier`] - Feature vector to label (nearest-neighbor or rules)
//!
//! ### Supporting Modules
//!
//! - [`catalog`] - Track rows and the catalog collection
//! - [`browse`] - Genre, search, pagination and the refilter pipeline
//! - [`db`] - SQLite catalog store
//! - [`config`] - Data directory and runtime settings
//! - [`error`] - Error type shared by the core modules
//!
//! ## Quick Start Example
//!
//! ```
//! use moodmatch::catalog::{Catalog, Track};
//! use moodmatch::categorizer::{DANCEABILITY, MOOD};
//! use moodmatch::label::DEFAULT_CODEC;
//! use moodmatch::recommender::DEFAULT_RECOMMENDER;
//!
//! assert_eq!(DANCEABILITY.categorize(0.6)?, "danceable");
//! assert_eq!(MOOD.categorize(0.1)?, "very negative");
//!
//! let label = DEFAULT_CODEC.encode("danceable", "very low", "positive", "high")?;
//! assert_eq!(label.to_string(), "2,0,2,2");
//!
//! let catalog = Catalog::new(vec![Track {
//!     id: "t1".to_string(),
//!     name: "Song".to_string(),
//!     artists: vec!["Someone".to_string()],
//!     genre: None,
//!     danceability: 0.6,
//!     energy: 0.6,
//!     instrumentalness: 0.1,
//!     valence: 0.6,
//! }]);
//! let picks = DEFAULT_RECOMMENDER.recommend_label("2,0,2,2", &DEFAULT_CODEC, &catalog)?;
//! assert_eq!(picks.len(), 1);
//! # Ok::<(), moodmatch::MoodError>(())
//! ```
//!
//! ## Error Handling
//!
//! The core modules return [`Result`] with a [`MoodError`]; the store and
//! configuration layers use `anyhow` for context-rich errors.

pub mod browse;
pub mod catalog;
pub mod categorizer;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod frame_filter;
pub mod label;
pub mod recommender;

pub use error::{MoodError, Result};
