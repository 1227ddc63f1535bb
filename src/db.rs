//! # Catalog Store Module
//!
//! SQLite storage for the track catalog.
//!
//! ## Schema
//!
//! ```sql
//! CREATE TABLE tracks (
//!     position          INTEGER PRIMARY KEY,
//!     id                TEXT NOT NULL UNIQUE,
//!     name              TEXT NOT NULL,
//!     artists           TEXT NOT NULL,   -- JSON array
//!     genre             TEXT,
//!     danceability      REAL NOT NULL,
//!     energy            REAL NOT NULL,
//!     instrumentalness  REAL NOT NULL,
//!     valence           REAL NOT NULL
//! )
//! ```
//!
//! `position` keeps the import order, which is the catalog order every
//! filter preserves.

use crate::catalog::{Catalog, Track};
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;

const CREATE_TRACKS: &str = "CREATE TABLE IF NOT EXISTS tracks (
    position          INTEGER PRIMARY KEY,
    id                TEXT NOT NULL UNIQUE,
    name              TEXT NOT NULL,
    artists           TEXT NOT NULL,
    genre             TEXT,
    danceability      REAL NOT NULL,
    energy            REAL NOT NULL,
    instrumentalness  REAL NOT NULL,
    valence           REAL NOT NULL
)";

const SELECT_TRACKS: &str = "SELECT id, name, artists, genre, danceability, energy, instrumentalness, valence
     FROM tracks";

/// Opens the store, creating the file and the schema if needed.
pub fn connect(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open catalog store at {}", db_path.display()))?;
    conn.execute(CREATE_TRACKS, [])
        .context("Failed to create tracks table")?;
    Ok(conn)
}

/// Creates an empty store. With `force`, an existing store is replaced.
pub fn init_store(db_path: &Path, force: bool) -> Result<Connection> {
    if db_path.exists() {
        if !force {
            bail!(
                "Catalog store already exists at {}. Use --force to replace it.",
                db_path.display()
            );
        }
        fs::remove_file(db_path)
            .with_context(|| format!("Failed to remove old store {}", db_path.display()))?;
        info!("Removed existing catalog store at {}", db_path.display());
    }
    connect(db_path)
}

/// Reads a JSON array of tracks.
pub fn read_tracks_json(path: &Path) -> Result<Vec<Track>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read track file {}", path.display()))?;
    let tracks: Vec<Track> = serde_json::from_str(&raw)
        .with_context(|| format!("Track file {} is not a JSON array of tracks", path.display()))?;
    Ok(tracks)
}

/// Inserts tracks in one transaction and returns how many were stored.
///
/// Rows with an empty id or a non-finite feature are skipped with a
/// warning; duplicate ids replace the earlier row's data but keep its
/// position.
pub fn import_tracks(conn: &mut Connection, tracks: &[Track]) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut stored = 0;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO tracks (id, name, artists, genre, danceability, energy, instrumentalness, valence)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                artists = excluded.artists,
                genre = excluded.genre,
                danceability = excluded.danceability,
                energy = excluded.energy,
                instrumentalness = excluded.instrumentalness,
                valence = excluded.valence",
        )?;

        for track in tracks {
            let features = track.features();
            let finite = [
                features.danceability,
                features.energy,
                features.instrumentalness,
                features.valence,
            ]
            .iter()
            .all(|value| value.is_finite());
            if track.id.is_empty() || !finite {
                warn!("Skipping invalid track `{}' ({})", track.id, track.name);
                continue;
            }

            let artists = serde_json::to_string(&track.artists)?;
            stmt.execute(params![
                track.id,
                track.name,
                artists,
                track.genre,
                track.danceability,
                track.energy,
                track.instrumentalness,
                track.valence,
            ])
            .with_context(|| format!("Failed to store track {track:?}"))?;
            stored += 1;
        }
    }

    tx.commit().context("Committing track import failed")?;
    info!("Imported {stored} of {} tracks", tracks.len());
    Ok(stored)
}

fn row_to_track(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Track, String)> {
    let artists: String = row.get(2)?;
    Ok((
        Track {
            id: row.get(0)?,
            name: row.get(1)?,
            artists: Vec::new(),
            genre: row.get(3)?,
            danceability: row.get(4)?,
            energy: row.get(5)?,
            instrumentalness: row.get(6)?,
            valence: row.get(7)?,
        },
        artists,
    ))
}

fn decode_artists((mut track, artists): (Track, String)) -> Result<Track> {
    track.artists = serde_json::from_str(&artists)
        .with_context(|| format!("Corrupt artists column for track {}", track.id))?;
    Ok(track)
}

/// Loads the whole catalog in import order.
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_TRACKS} ORDER BY position"))
        .context("Invalid SQL statement when SELECTing tracks")?;

    let tracks = stmt
        .query_map([], row_to_track)
        .context("Cannot query tracks")?
        .map(|row| decode_artists(row?))
        .collect::<Result<Vec<_>>>()?;

    debug!("Loaded {} tracks from catalog store", tracks.len());
    Ok(Catalog::new(tracks))
}

/// Looks up a single track by id.
pub fn find_track(conn: &Connection, id: &str) -> Result<Option<Track>> {
    let mut stmt = conn.prepare(&format!("{SELECT_TRACKS} WHERE id = ?1"))?;
    let row = stmt
        .query_row([id], row_to_track)
        .optional()
        .with_context(|| format!("Failed to look up track {id}"))?;
    row.map(decode_artists).transpose()
}

/// Number of tracks in the store.
pub fn count_tracks(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or_default())
}
