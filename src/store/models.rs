use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StoreError;

/// Placeholder stored when the scraper could not find a title or an artist.
pub const MISSING_FIELD: &str = "N/A";

/// Popularity counter of a search keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub count: u64,
}

/// A persisted chart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub rank: i64,
    pub title: String,
    pub artist: String,
    pub recorded_at: DateTime<Utc>,
}

/// A chart row ready to be written, rank already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewChartEntry {
    pub rank: i64,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistSongCount {
    pub artist: String,
    pub song_count: u64,
}

/// Result of writing a batch of chart entries.
///
/// Every row is its own atomic write, so when `failure` is set the rows
/// counted in `inserted` are still committed.
#[derive(Debug, Default)]
pub struct BatchInsertOutcome {
    pub inserted: usize,
    pub duplicates: usize,
    pub failure: Option<StoreError>,
}
