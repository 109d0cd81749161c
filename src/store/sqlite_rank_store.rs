use super::models::{ArtistSongCount, BatchInsertOutcome, ChartEntry, KeywordRecord, NewChartEntry};
use super::schema::RANK_VERSIONED_SCHEMAS;
use super::{RankStore, StoreError, StoreResult};
use crate::sqlite_persistence::read_schema_version;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// SQLite-backed [`RankStore`].
///
/// Holds only the database path: every operation opens its own connection and
/// closes it when the operation returns, so concurrent requests never share a
/// handle. The database runs in WAL mode, readers don't wait for writers.
pub struct SqliteRankStore {
    db_path: PathBuf,
}

impl SqliteRankStore {
    /// Opens (creating if needed) the database at `db_path` and makes sure the
    /// schema is in place.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open(path).context("Failed to open ranking database")?;
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
        debug!("Ranking database journal mode: {}", journal_mode);

        let latest_schema = RANK_VERSIONED_SCHEMAS
            .last()
            .context("No ranking schema defined")?;

        match read_schema_version(&conn)? {
            None => {
                info!("Initializing ranking database schema at {:?}", path);
                latest_schema.create(&conn)?;
            }
            Some(version) if version != latest_schema.version => {
                bail!(
                    "Ranking database version {} is not supported (expected {})",
                    version,
                    latest_schema.version
                );
            }
            Some(_) => {}
        }

        latest_schema.validate(&conn).with_context(|| {
            format!(
                "Ranking database schema validation failed for version {}",
                latest_schema.version
            )
        })?;

        Ok(Self {
            db_path: path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Opens a connection for a single operation. The file must already exist.
    fn connection(&self) -> StoreResult<Connection> {
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Unavailable(format!("{:?}: {}", self.db_path, e)))
    }

    fn format_datetime(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    fn parse_datetime(s: &str) -> StoreResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| StoreError::Corrupt {
                column: "recorded_at",
                value: s.to_string(),
            })
    }

    fn to_count(value: i64, column: &'static str) -> StoreResult<u64> {
        u64::try_from(value).map_err(|_| StoreError::Corrupt {
            column,
            value: value.to_string(),
        })
    }
}

/// Escapes `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'`.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl RankStore for SqliteRankStore {
    fn increment_keyword(&self, keyword: &str) -> StoreResult<u64> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row(
            "INSERT INTO keywords (keyword, count) VALUES (?1, 1)
             ON CONFLICT(keyword) DO UPDATE SET count = count + 1
             RETURNING count",
            params![keyword],
            |row| row.get(0),
        )?;
        Self::to_count(count, "count")
    }

    fn get_keyword(&self, keyword: &str) -> StoreResult<Option<KeywordRecord>> {
        let conn = self.connection()?;
        let count: Option<i64> = conn
            .query_row(
                "SELECT count FROM keywords WHERE keyword = ?1",
                params![keyword],
                |row| row.get(0),
            )
            .optional()?;
        count
            .map(|count| -> StoreResult<KeywordRecord> {
                Ok(KeywordRecord {
                    keyword: keyword.to_string(),
                    count: Self::to_count(count, "count")?,
                })
            })
            .transpose()
    }

    fn top_keywords(&self, limit: usize) -> StoreResult<Vec<KeywordRecord>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT keyword, count FROM keywords ORDER BY count DESC, keyword ASC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(keyword, count)| -> StoreResult<KeywordRecord> {
                Ok(KeywordRecord {
                    keyword,
                    count: Self::to_count(count, "count")?,
                })
            })
            .collect()
    }

    fn keyword_count(&self) -> StoreResult<usize> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM keywords", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn insert_chart_entries(
        &self,
        entries: &[NewChartEntry],
        recorded_at: DateTime<Utc>,
    ) -> BatchInsertOutcome {
        let mut outcome = BatchInsertOutcome::default();
        if entries.is_empty() {
            return outcome;
        }

        let conn = match self.connection() {
            Ok(conn) => conn,
            Err(err) => {
                outcome.failure = Some(err);
                return outcome;
            }
        };
        let mut stmt = match conn.prepare(
            "INSERT OR IGNORE INTO chart_entries (rank, title, artist, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
        ) {
            Ok(stmt) => stmt,
            Err(err) => {
                outcome.failure = Some(err.into());
                return outcome;
            }
        };

        let recorded_at = Self::format_datetime(&recorded_at);
        for entry in entries {
            // Autocommit: each row is committed on its own
            match stmt.execute(params![entry.rank, entry.title, entry.artist, recorded_at]) {
                Ok(0) => outcome.duplicates += 1,
                Ok(_) => outcome.inserted += 1,
                Err(err) => {
                    outcome.failure = Some(err.into());
                    break;
                }
            }
        }
        outcome
    }

    fn songs_by_artist(&self, query: &str) -> StoreResult<Vec<ChartEntry>> {
        let conn = self.connection()?;
        let pattern = format!("%{}%", escape_like(query));
        let mut stmt = conn.prepare(
            "SELECT rank, title, artist, recorded_at FROM chart_entries
             WHERE artist LIKE ?1 ESCAPE '\\'
             ORDER BY rank ASC, recorded_at ASC, title ASC",
        )?;
        let rows = stmt
            .query_map(params![pattern], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(rank, title, artist, recorded_at)| -> StoreResult<ChartEntry> {
                Ok(ChartEntry {
                    rank,
                    title,
                    artist,
                    recorded_at: Self::parse_datetime(&recorded_at)?,
                })
            })
            .collect()
    }

    fn artist_ranking(&self) -> StoreResult<Vec<ArtistSongCount>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT artist, COUNT(*) AS song_count FROM chart_entries
             GROUP BY artist
             ORDER BY song_count DESC, artist ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(artist, song_count)| -> StoreResult<ArtistSongCount> {
                Ok(ArtistSongCount {
                    artist,
                    song_count: Self::to_count(song_count, "song_count")?,
                })
            })
            .collect()
    }

    fn chart_entry_count(&self) -> StoreResult<usize> {
        let conn = self.connection()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM chart_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
