//! # Configuration Module
//!
//! Data directory setup and runtime settings for Moodmatch.
//!
//! ## Data Storage
//!
//! Everything lives in the platform-standard data directory unless
//! `--data-dir` (or `MOODMATCH_DATA_DIR`) points elsewhere:
//! - Linux: `~/.local/share/moodmatch/`
//! - macOS: `~/Library/Application Support/moodmatch/`
//! - Windows: `%APPDATA%\moodmatch\`
//!
//! | File          | Purpose                                      |
//! |---------------|----------------------------------------------|
//! | `tracks.db`   | catalog store                                |
//! | `model.json`  | nearest-neighbor model export (optional)     |
//! | `config.json` | overrides for [`RuntimeConfig`] (optional)   |

use crate::recommender::DEFAULT_PARALLEL_THRESHOLD;
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_FILE: &str = "tracks.db";
pub const MODEL_FILE: &str = "model.json";
pub const CONFIG_FILE: &str = "config.json";

/// Rows shown per page.
pub const DEFAULT_PAGE_STEP: usize = 10;

/// Returns the platform-appropriate data directory for Moodmatch,
/// creating it if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The moodmatch subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Use --data-dir to choose one explicitly."
        )
    })?;
    ensure_dir(data_dir.join("moodmatch"))
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&dir).with_context(|| {
        format!(
            "Failed to create Moodmatch data directory at {}. Please check file permissions.",
            dir.display()
        )
    })?;
    Ok(dir)
}

/// Configuration for runtime behavior
///
/// ```no_run
/// use moodmatch::config::RuntimeConfig;
///
/// let config = RuntimeConfig::load(None)?;
/// println!("Catalog location: {}", config.db_path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Path to the catalog store
    pub db_path: PathBuf,
    /// Path to the nearest-neighbor model export
    pub model_path: PathBuf,
    /// Rows per page when listing
    pub page_step: usize,
    /// Catalog size from which recommendations filter in parallel
    pub parallel_threshold: usize,
}

impl RuntimeConfig {
    /// Defaults rooted at `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            db_path: dir.join(DB_FILE),
            model_path: dir.join(MODEL_FILE),
            page_step: DEFAULT_PAGE_STEP,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Loads the configuration for a data directory.
    ///
    /// Uses the platform directory when `data_dir` is `None`. Values from
    /// `config.json` override the defaults; a missing file is not an error.
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let dir = match data_dir {
            Some(dir) => ensure_dir(dir.to_path_buf())?,
            None => get_data_dir()?,
        };

        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            debug!("No {} found, using defaults", config_path.display());
            return Ok(Self::in_dir(&dir));
        }

        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let overrides: ConfigFile = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
        debug!("Loaded configuration overrides from {}", config_path.display());
        Ok(overrides.apply(Self::in_dir(&dir)))
    }
}

/// Optional keys of `config.json`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    db_path: Option<PathBuf>,
    model_path: Option<PathBuf>,
    page_step: Option<usize>,
    parallel_threshold: Option<usize>,
}

impl ConfigFile {
    fn apply(self, base: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            db_path: self.db_path.unwrap_or(base.db_path),
            model_path: self.model_path.unwrap_or(base.model_path),
            page_step: self.page_step.filter(|step| *step > 0).unwrap_or(base.page_step),
            parallel_threshold: self.parallel_threshold.unwrap_or(base.parallel_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_in_explicit_dir() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = RuntimeConfig::load(Some(temp_dir.path()))?;

        assert_eq!(config.db_path, temp_dir.path().join("tracks.db"));
        assert_eq!(config.model_path, temp_dir.path().join("model.json"));
        assert_eq!(config.page_step, 10);
        Ok(())
    }

    #[test]
    fn test_config_file_overrides() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"{ "page_step": 25, "model_path": "/srv/models/knn.json" }"#,
        )?;

        let config = RuntimeConfig::load(Some(temp_dir.path()))?;
        assert_eq!(config.page_step, 25);
        assert_eq!(config.model_path, PathBuf::from("/srv/models/knn.json"));
        assert_eq!(config.db_path, temp_dir.path().join("tracks.db"));
        Ok(())
    }

    #[test]
    fn test_config_file_rejects_unknown_keys() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join(CONFIG_FILE), r#"{ "pagestep": 25 }"#)?;
        assert!(RuntimeConfig::load(Some(temp_dir.path())).is_err());
        Ok(())
    }

    #[test]
    fn test_zero_page_step_is_ignored() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join(CONFIG_FILE), r#"{ "page_step": 0 }"#)?;
        assert_eq!(RuntimeConfig::load(Some(temp_dir.path()))?.page_step, DEFAULT_PAGE_STEP);
        Ok(())
    }

    #[test]
    fn test_load_creates_missing_data_dir() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("nested").join("moodmatch");
        let config = RuntimeConfig::load(Some(&nested))?;

        assert!(nested.is_dir());
        assert_eq!(config.db_path, nested.join(DB_FILE));
        Ok(())
    }
}
