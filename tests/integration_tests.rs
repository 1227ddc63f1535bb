//! # Integration Tests for Moodmatch
//!
//! End-to-end workflows: JSON import into the store, browsing the loaded
//! catalog, and recommendations through both classifiers. A few tests drive
//! the compiled binary.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const TRACKS_JSON: &str = r#"[
  { "id": "a1", "name": "So What", "artists": ["Miles Davis"], "genre": "jazz",
    "danceability": 0.55, "energy": 0.3, "instrumentalness": 0.8, "valence": 0.4 },
  { "id": "a2", "name": "Paranoid", "artists": ["Black Sabbath"], "genre": "metal",
    "danceability": 0.4, "energy": 0.9, "instrumentalness": 0.0, "valence": 0.35 },
  { "id": "a3", "name": "Blue in Green", "artists": ["Miles Davis", "Bill Evans"], "genre": "jazz",
    "danceability": 0.6, "energy": 0.35, "instrumentalness": 0.9, "valence": 0.45 },
  { "id": "a4", "name": "Happy", "artists": ["Pharrell Williams"], "track_genre": "pop",
    "danceability": 0.8, "energy": 0.8, "instrumentalness": 0.0, "valence": 1.0 },
  { "id": "a5", "name": "Chameleon", "artists": ["Herbie Hancock"], "genre": "jazz",
    "danceability": 0.7, "energy": 0.55, "instrumentalness": 0.76, "valence": 0.26 }
]"#;

/// Test helper to create a data directory with a track file
fn create_test_data_dir() -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let json_path = temp_dir.path().join("tracks.json");
    fs::write(&json_path, TRACKS_JSON)?;
    Ok((temp_dir, json_path))
}

fn ids(catalog: &moodmatch::catalog::Catalog) -> Vec<&str> {
    catalog.iter().map(|track| track.id.as_str()).collect()
}

#[cfg(test)]
mod store_integration_tests {
    use super::*;
    use moodmatch::config::RuntimeConfig;
    use moodmatch::db;

    #[test]
    fn test_import_then_load() -> Result<()> {
        let (temp_dir, json_path) = create_test_data_dir()?;
        let config = RuntimeConfig::load(Some(temp_dir.path()))?;

        let tracks = db::read_tracks_json(&json_path)?;
        let mut conn = db::init_store(&config.db_path, false)?;
        assert_eq!(db::import_tracks(&mut conn, &tracks)?, 5);

        let catalog = db::load_catalog(&conn)?;
        assert_eq!(ids(&catalog), vec!["a1", "a2", "a3", "a4", "a5"]);
        assert_eq!(catalog.find("a4").and_then(|t| t.genre.clone()), Some("pop".to_string()));
        Ok(())
    }

    #[test]
    fn test_reimport_updates_in_place() -> Result<()> {
        let (temp_dir, json_path) = create_test_data_dir()?;
        let db_path = temp_dir.path().join("tracks.db");

        let mut tracks = db::read_tracks_json(&json_path)?;
        let mut conn = db::connect(&db_path)?;
        db::import_tracks(&mut conn, &tracks)?;

        tracks[0].energy = 0.99;
        db::import_tracks(&mut conn, &tracks[..1])?;

        let catalog = db::load_catalog(&conn)?;
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.tracks()[0].energy, 0.99);
        Ok(())
    }
}

#[cfg(test)]
mod browse_integration_tests {
    use super::*;
    use moodmatch::browse::{get_recommendations, BrowseState, Genre, Paginator};
    use moodmatch::catalog::Catalog;
    use moodmatch::categorizer::Axis;
    use moodmatch::classifier::{NearestNeighborClassifier, QuantileClassifier};
    use moodmatch::label::DEFAULT_CODEC;
    use moodmatch::recommender::Recommender;
    use moodmatch::MoodError;

    fn catalog() -> Result<Catalog> {
        Ok(serde_json::from_str(TRACKS_JSON)?)
    }

    #[test]
    fn test_refilter_pipeline() -> Result<()> {
        let catalog = catalog()?;
        let mut state = BrowseState::new();
        state.genre = "Jazz".parse::<Genre>()?;
        state.search = "milesdavis".to_string();
        assert_eq!(ids(&state.refilter(&catalog)?), vec!["a1", "a3"]);

        state.set_range(Axis::Danceability, 0.58, 1.0);
        assert_eq!(ids(&state.refilter(&catalog)?), vec!["a3"]);
        Ok(())
    }

    #[test]
    fn test_rule_based_recommendations() -> Result<()> {
        let catalog = catalog()?;
        let recommended = get_recommendations(
            "a1",
            &catalog,
            &QuantileClassifier::default(),
            &Recommender::new(),
            &DEFAULT_CODEC,
        )?;
        assert_eq!(ids(&recommended), vec!["a1", "a3"]);
        Ok(())
    }

    #[test]
    fn test_recommendations_restrict_the_view() -> Result<()> {
        let catalog = catalog()?;
        let recommended = get_recommendations(
            "a4",
            &catalog,
            &QuantileClassifier::default(),
            &Recommender::new(),
            &DEFAULT_CODEC,
        )?;

        let mut state = BrowseState::new();
        state.enable_recommendations(&recommended);
        assert_eq!(ids(&state.refilter(&catalog)?), vec!["a4"]);

        state.disable_recommendations();
        assert_eq!(state.refilter(&catalog)?.len(), 5);
        Ok(())
    }

    #[test]
    fn test_model_based_recommendations() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let model_path = temp_dir.path().join("model.json");
        fs::write(
            &model_path,
            r#"{ "k": 1, "samples": [
                { "features": { "danceability": 0.4, "energy": 0.9,
                                "instrumentalness": 0.0, "valence": 0.35 },
                  "label": "2,3,1,1" },
                { "features": { "danceability": 0.9, "energy": 0.9,
                                "instrumentalness": 0.0, "valence": 0.9 },
                  "label": "3,0,3,3" }
            ] }"#,
        )?;
        let classifier = NearestNeighborClassifier::load(&model_path)?;

        let recommended = get_recommendations(
            "a2",
            &catalog()?,
            &classifier,
            &Recommender::new(),
            &DEFAULT_CODEC,
        )?;
        // a2 sits on the first sample, whose buckets match a1 and a3.
        assert_eq!(ids(&recommended), vec!["a1", "a3"]);
        Ok(())
    }

    #[test]
    fn test_unknown_track() -> Result<()> {
        let err = get_recommendations(
            "missing",
            &catalog()?,
            &QuantileClassifier::default(),
            &Recommender::new(),
            &DEFAULT_CODEC,
        )
        .unwrap_err();
        assert_eq!(err, MoodError::UnknownTrack("missing".to_string()));
        Ok(())
    }

    #[test]
    fn test_paging_through_results() -> Result<()> {
        let catalog = catalog()?;
        let mut paginator = Paginator::new(2);
        assert_eq!(paginator.slice(&catalog).len(), 2);
        assert!(paginator.next(catalog.len()));
        assert!(paginator.next(catalog.len()));
        assert_eq!(paginator.slice(&catalog).len(), 1);
        assert!(!paginator.next(catalog.len()));
        assert_eq!(paginator.to_string(), "Page 2, Entries (4-6)");
        Ok(())
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn moodmatch(data_dir: &Path, args: &[&str]) -> std::process::Output {
        Command::new(env!("CARGO_BIN_EXE_moodmatch"))
            .arg("--data-dir")
            .arg(data_dir)
            .args(args)
            .output()
            .expect("Failed to run moodmatch")
    }

    #[test]
    fn test_import_list_recommend() -> Result<()> {
        let (temp_dir, json_path) = create_test_data_dir()?;
        let json_arg = json_path.to_string_lossy().to_string();

        let output = moodmatch(temp_dir.path(), &["import", &json_arg]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        assert!(String::from_utf8_lossy(&output.stdout).contains("Stored 5 tracks"));

        let output = moodmatch(temp_dir.path(), &["list", "--genre", "metal"]);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success());
        assert!(stdout.contains("Paranoid"));
        assert!(!stdout.contains("So What"));

        let output = moodmatch(temp_dir.path(), &["recommend", "a1"]);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success());
        assert!(stdout.contains("Blue in Green"));
        assert!(!stdout.contains("Happy"));
        Ok(())
    }

    #[test]
    fn test_list_without_store_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let output = moodmatch(temp_dir.path(), &["list"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("moodmatch import"));
        Ok(())
    }

    #[test]
    fn test_label_commands() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let output = moodmatch(
            temp_dir.path(),
            &["label", "encode", "danceable", "very low", "positive", "very high"],
        );
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "2,0,2,3");

        let output = moodmatch(temp_dir.path(), &["label", "decode", "1,2,3"]);
        assert!(!output.status.success());
        Ok(())
    }

    #[test]
    fn test_categorize_out_of_range() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let output = moodmatch(temp_dir.path(), &["categorize", "energy", "1.5"]);
        assert!(!output.status.success());

        let output = moodmatch(temp_dir.path(), &["categorize", "valence", "0.1"]);
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "very negative");
        Ok(())
    }
}
