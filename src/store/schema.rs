//! SQLite schema of the ranking database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

/// Search keywords and how many times each was searched.
const KEYWORDS_TABLE_V1: Table = Table {
    name: "keywords",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("keyword", &SqlType::Text, non_null = true),
        sqlite_column!(
            "count",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("1")
        ),
    ],
    indices: &[("idx_keywords_count", "count DESC")],
    unique_constraints: &[&["keyword"]],
};

/// Scraped chart rows. A (rank, title, artist) triple is stored once, ever.
const CHART_ENTRIES_TABLE_V1: Table = Table {
    name: "chart_entries",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("rank", &SqlType::Integer, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("recorded_at", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_chart_entries_artist", "artist")],
    unique_constraints: &[&["rank", "title", "artist"]],
};

pub const RANK_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[KEYWORDS_TABLE_V1, CHART_ENTRIES_TABLE_V1],
}];
