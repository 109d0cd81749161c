//! Per-artist views over the stored chart entries.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::{ArtistSongCount, ChartEntry, RankStore};

pub struct ArtistAggregator {
    store: Arc<dyn RankStore>,
}

impl ArtistAggregator {
    pub fn new(store: Arc<dyn RankStore>) -> Self {
        Self { store }
    }

    /// Every stored entry whose artist contains `query`, ignoring ASCII case,
    /// ordered by rank. The query is matched as given, surrounding spaces
    /// included. A blank query matches nothing.
    pub fn songs_by_artist(&self, query: &str) -> Vec<ChartEntry> {
        if query.trim().is_empty() {
            debug!("Blank artist query");
            return vec![];
        }

        self.store.songs_by_artist(query).unwrap_or_else(|err| {
            warn!("Failed to search songs of artist {:?}: {}", query, err);
            vec![]
        })
    }

    /// Number of stored entries per artist, most entries first, ties by name.
    pub fn artist_ranking(&self) -> Vec<ArtistSongCount> {
        self.store.artist_ranking().unwrap_or_else(|err| {
            warn!("Failed to load artist ranking: {}", err);
            vec![]
        })
    }
}
