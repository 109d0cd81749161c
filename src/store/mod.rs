mod error;
mod models;
mod schema;
mod sqlite_rank_store;

pub use error::StoreError;
pub use models::*;
pub use schema::RANK_VERSIONED_SCHEMAS;
pub use sqlite_rank_store::SqliteRankStore;

use chrono::{DateTime, Utc};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable storage shared by the keyword counter, the chart ingestor and the
/// artist aggregator.
///
/// Implementations must make every method independently consistent: each call
/// acquires its own handle to the underlying storage and releases it before
/// returning.
pub trait RankStore: Send + Sync {
    // Keywords
    /// Inserts `keyword` with count 1, or increments its count, as a single
    /// atomic write. Returns the count after the write.
    fn increment_keyword(&self, keyword: &str) -> StoreResult<u64>;
    fn get_keyword(&self, keyword: &str) -> StoreResult<Option<KeywordRecord>>;
    /// Keywords by count descending, ties by keyword ascending.
    fn top_keywords(&self, limit: usize) -> StoreResult<Vec<KeywordRecord>>;
    fn keyword_count(&self) -> StoreResult<usize>;

    // Chart entries
    /// Writes each entry unless its (rank, title, artist) triple is already
    /// stored. Stops at the first store failure.
    fn insert_chart_entries(
        &self,
        entries: &[NewChartEntry],
        recorded_at: DateTime<Utc>,
    ) -> BatchInsertOutcome;
    /// Entries whose artist contains `query`, ASCII case-insensitively, by rank.
    fn songs_by_artist(&self, query: &str) -> StoreResult<Vec<ChartEntry>>;
    /// Song count per exact artist string, count descending then artist ascending.
    fn artist_ranking(&self) -> StoreResult<Vec<ArtistSongCount>>;
    fn chart_entry_count(&self) -> StoreResult<usize>;
}
