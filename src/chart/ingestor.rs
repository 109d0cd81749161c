//! Deduplicated ingestion of scraped chart snapshots.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::ChartRow;
use crate::store::{NewChartEntry, RankStore};

/// What happened to a submitted batch of chart rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub received: usize,
    pub inserted: usize,
    /// Rows whose (rank, title, artist) is already stored or repeated in the batch.
    pub skipped_duplicates: usize,
    /// Rows without a usable rank.
    pub skipped_malformed: usize,
    /// False when a store failure stopped the batch.
    pub persisted: bool,
}

impl IngestionReport {
    pub fn is_success(&self) -> bool {
        self.persisted
    }
}

pub struct ChartIngestor {
    store: Arc<dyn RankStore>,
}

impl ChartIngestor {
    pub fn new(store: Arc<dyn RankStore>) -> Self {
        Self { store }
    }

    /// Stores every row not seen before.
    ///
    /// All rows of one call share the same `recorded_at`. A store failure stops
    /// the batch, rows written before it stay written, and the report comes
    /// back with `persisted == false`. Callers should still display the rows.
    pub fn ingest_chart(&self, rows: &[ChartRow]) -> IngestionReport {
        let mut report = IngestionReport {
            received: rows.len(),
            persisted: true,
            ..Default::default()
        };
        if rows.is_empty() {
            return report;
        }

        let mut seen = HashSet::with_capacity(rows.len());
        let mut entries: Vec<NewChartEntry> = Vec::with_capacity(rows.len());
        for row in rows {
            match row.normalize() {
                Some(entry) => {
                    if seen.insert(entry.clone()) {
                        entries.push(entry);
                    } else {
                        report.skipped_duplicates += 1;
                    }
                }
                None => {
                    debug!("Skipping chart row with unusable rank {:?}", row.rank);
                    report.skipped_malformed += 1;
                }
            }
        }
        if report.skipped_malformed > 0 {
            warn!(
                "Skipped {} of {} chart rows without a usable rank",
                report.skipped_malformed,
                rows.len()
            );
        }

        let outcome = self.store.insert_chart_entries(&entries, Utc::now());
        report.inserted = outcome.inserted;
        report.skipped_duplicates += outcome.duplicates;

        if let Some(err) = outcome.failure {
            error!(
                "Chart ingestion stopped after {} new rows: {}",
                outcome.inserted, err
            );
            report.persisted = false;
            return report;
        }

        info!(
            "Ingested chart snapshot: {} rows, {} new, {} already known",
            report.received, report.inserted, report.skipped_duplicates
        );
        report
    }
}
