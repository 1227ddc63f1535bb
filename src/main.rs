//! # Moodmatch
//!
//! Command-line front end: imports a track catalog, browses it, and
//! recommends tracks that share a seed track's mood/energy label.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `completion`: Shell completion scripts
//! - everything else lives in the `moodmatch` library
//!
//! ## Usage
//!
//! ```bash
//! moodmatch import tracks.json
//! moodmatch list --genre rock --danceability 0.6..1
//! moodmatch recommend 5SuOikwiRyPMVoIQDJUgSV
//! ```

mod cli;
mod completion;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use moodmatch::browse::{self, BrowseState, Genre, Paginator};
use moodmatch::catalog::Catalog;
use moodmatch::categorizer::Categorizer;
use moodmatch::classifier::{LabelClassifier, NearestNeighborClassifier, QuantileClassifier};
use moodmatch::config::RuntimeConfig;
use moodmatch::db;
use moodmatch::label::DEFAULT_CODEC;
use moodmatch::recommender::Recommender;
use std::path::Path;

/// Main entry point for Moodmatch.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug moodmatch list` - Enable debug logging
/// - `RUST_LOG=moodmatch::recommender=trace moodmatch recommend ID` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Import { path, force } => {
            let config = RuntimeConfig::load(args.data_dir.as_deref())?;
            info!("Importing tracks from: {}", path.display());
            let tracks = db::read_tracks_json(&path)?;
            let mut conn = if force {
                db::init_store(&config.db_path, true)?
            } else {
                db::connect(&config.db_path)?
            };
            let stored = db::import_tracks(&mut conn, &tracks)?;
            println!(
                "Stored {stored} tracks ({} in catalog)",
                db::count_tracks(&conn)?
            );
        }
        cli::Command::List {
            ranges,
            genre,
            search,
            page,
        } => {
            let config = RuntimeConfig::load(args.data_dir.as_deref())?;
            let catalog = open_catalog(&config.db_path)?;

            let mut state = BrowseState::new();
            for (axis, (min, max)) in ranges.ranges() {
                state.set_range(axis, min, max);
            }
            state.genre = genre.parse::<Genre>()?;
            state.search = search;

            let view = state.refilter(&catalog)?;
            print_page(&view, Paginator::at_page(config.page_step, page));
        }
        cli::Command::Recommend {
            track_id,
            model,
            rules,
            page,
        } => {
            let config = RuntimeConfig::load(args.data_dir.as_deref())?;
            let catalog = open_catalog(&config.db_path)?;
            let model_path = model.unwrap_or_else(|| config.model_path.clone());

            let classifier: Box<dyn LabelClassifier> = if !rules && model_path.exists() {
                info!("Using nearest-neighbor model {}", model_path.display());
                Box::new(NearestNeighborClassifier::load(&model_path)?)
            } else {
                debug!("No model in use, labelling through quartile rules");
                Box::new(QuantileClassifier::default())
            };
            let recommender = Recommender::with_parallel_threshold(config.parallel_threshold);

            let recommended = browse::get_recommendations(
                &track_id,
                &catalog,
                classifier.as_ref(),
                &recommender,
                &DEFAULT_CODEC,
            )?;
            print_page(&recommended, Paginator::at_page(config.page_step, page));
        }
        cli::Command::Categorize { axis, value } => {
            let bucket = Categorizer::from(axis).categorize(value)?;
            println!("{bucket}");
        }
        cli::Command::Label { action } => match action {
            cli::LabelAction::Encode {
                danceability,
                instrumentalness,
                mood,
                energy,
            } => {
                let label = DEFAULT_CODEC.encode(&danceability, &instrumentalness, &mood, &energy)?;
                println!("{label}");
            }
            cli::LabelAction::Decode { label } => {
                let parts = DEFAULT_CODEC.decode(&label)?;
                println!("{}", serde_json::to_string_pretty(&parts)?);
            }
        },
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        }
    }

    Ok(())
}

fn open_catalog(db_path: &Path) -> Result<Catalog> {
    if !db_path.exists() {
        anyhow::bail!(
            "No catalog store at {}. Run `moodmatch import <tracks.json>` first.",
            db_path.display()
        );
    }
    let conn = db::connect(db_path)?;
    db::load_catalog(&conn)
        .with_context(|| format!("Failed to load catalog from {}", db_path.display()))
}

fn print_page(view: &Catalog, paginator: Paginator) {
    let rows = paginator.slice(view);
    if rows.is_empty() {
        println!("No tracks ({} matching)", view.len());
        return;
    }

    println!("{paginator} of {}", view.len());
    for track in rows {
        println!(
            "{:<24} {:<40} {:<30} d={:.2} e={:.2} i={:.2} v={:.2}",
            track.id,
            track.name,
            track.artists_display(),
            track.danceability,
            track.energy,
            track.instrumentalness,
            track.valence,
        );
    }
}
