//! # Command-Line Interface Module
//!
//! Clap definitions for the `moodmatch` binary.
//!
//! ## Commands
//!
//! - `import`: load a JSON track file into the catalog store
//! - `list`: browse the catalog with range, genre and search filters
//! - `recommend`: tracks sharing a track's mood/energy label
//! - `categorize`: bucket name of a single score
//! - `label`: encode or decode compound labels
//!
//! ## Examples
//!
//! ```bash
//! moodmatch import tracks.json
//! moodmatch list --genre jazz --energy 0.5..1 --search "miles"
//! moodmatch recommend 4uLU6hMCjMI75M1A2tKUQC --page 1
//! moodmatch label decode 2,0,2,3
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use moodmatch::categorizer::Axis;
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Parses `min..max` into an inclusive range.
fn parse_range(raw: &str) -> Result<(f64, f64), String> {
    let (min, max) = raw
        .split_once("..")
        .ok_or_else(|| format!("expected MIN..MAX, got `{raw}`"))?;
    let min: f64 = min.trim().parse().map_err(|_| format!("invalid minimum `{min}`"))?;
    let max: f64 = max.trim().parse().map_err(|_| format!("invalid maximum `{max}`"))?;
    if min > max {
        return Err(format!("minimum {min} is greater than maximum {max}"));
    }
    Ok((min, max))
}

/// Main application arguments structure.
#[derive(Parser)]
#[command(name = "moodmatch")]
#[command(about = "Moodmatch: browse a track catalog and get label-based recommendations")]
#[command(version)]
pub struct Args {
    /// Directory holding the catalog store, model and config
    #[arg(long, global = true, env = "MOODMATCH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Feature range filters shared by `list`.
#[derive(clap::Args, Debug, Default)]
pub struct RangeArgs {
    /// Inclusive danceability range, e.g. 0.2..0.8
    #[arg(long, value_parser = parse_range)]
    pub danceability: Option<(f64, f64)>,

    /// Inclusive energy range
    #[arg(long, value_parser = parse_range)]
    pub energy: Option<(f64, f64)>,

    /// Inclusive instrumentalness range
    #[arg(long, value_parser = parse_range)]
    pub instrumentalness: Option<(f64, f64)>,

    /// Inclusive valence (mood) range
    #[arg(long, value_parser = parse_range)]
    pub valence: Option<(f64, f64)>,
}

impl RangeArgs {
    /// The ranges that were given, per axis.
    pub fn ranges(&self) -> Vec<(Axis, (f64, f64))> {
        [
            (Axis::Danceability, self.danceability),
            (Axis::Energy, self.energy),
            (Axis::Instrumentalness, self.instrumentalness),
            (Axis::Mood, self.valence),
        ]
        .into_iter()
        .filter_map(|(axis, range)| range.map(|range| (axis, range)))
        .collect()
    }
}

/// Enumeration of all available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Import tracks from a JSON file into the catalog store
    ///
    /// The file holds an array of objects with `id`, `name`, `artists`,
    /// optional `genre`, and the four feature scores.
    Import {
        /// JSON file to import
        path: PathBuf,

        /// Replace the existing catalog store instead of adding to it
        #[arg(long)]
        force: bool,
    },

    /// Browse the catalog
    List {
        #[command(flatten)]
        ranges: RangeArgs,

        /// Genre key or name ("all" for no genre filter)
        #[arg(long, default_value = "all")]
        genre: String,

        /// Match artists or track names (case and spaces ignored)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Page to show, starting at 0
        #[arg(short, long, default_value = "0")]
        page: usize,
    },

    /// Recommend tracks with the same mood/energy label as a track
    Recommend {
        /// Id of the seed track
        #[arg(value_hint = clap::ValueHint::Other)]
        track_id: String,

        /// Nearest-neighbor model export (defaults to model.json in the data dir)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Label through the quartile rules instead of a model
        #[arg(long, conflicts_with = "model")]
        rules: bool,

        /// Page to show, starting at 0
        #[arg(short, long, default_value = "0")]
        page: usize,
    },

    /// Print the bucket of a single score
    Categorize {
        /// danceability, energy, instrumentalness, mood (or valence)
        axis: Axis,

        /// Score in [0, 1]
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Encode or decode compound labels
    Label {
        #[command(subcommand)]
        action: LabelAction,
    },

    /// Generate shell completions
    ///
    /// Usage: moodmatch completion bash > ~/.local/share/bash-completion/completions/moodmatch
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Compound label actions
#[derive(Subcommand, Debug)]
pub enum LabelAction {
    /// Build a label from four bucket names
    Encode {
        danceability: String,
        instrumentalness: String,
        mood: String,
        energy: String,
    },

    /// Show the bucket names of a label such as "2,0,2,3"
    Decode { label: String },
}
