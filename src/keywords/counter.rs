//! Popularity counting of search keywords.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::{KeywordRecord, RankStore};

/// Counts how often each keyword is searched.
///
/// Keywords are stored verbatim: matching is exact and case-sensitive.
/// Store failures never reach the caller; they are logged and the operation
/// reports a benign value, a failed count must not break the search itself.
pub struct KeywordCounter {
    store: Arc<dyn RankStore>,
}

impl KeywordCounter {
    pub fn new(store: Arc<dyn RankStore>) -> Self {
        Self { store }
    }

    /// Records one search of `keyword`.
    ///
    /// Returns true when the count was persisted. The empty keyword is ignored;
    /// any other keyword, whitespace included, is counted as given.
    pub fn record_search(&self, keyword: &str) -> bool {
        if keyword.is_empty() {
            debug!("Ignoring empty search keyword");
            return false;
        }

        match self.store.increment_keyword(keyword) {
            Ok(count) => {
                debug!("Keyword {:?} searched {} times", keyword, count);
                true
            }
            Err(err) => {
                warn!("Failed to record search of {:?}: {}", keyword, err);
                false
            }
        }
    }

    /// The `limit` most searched keywords, most popular first.
    pub fn top_keywords(&self, limit: usize) -> Vec<KeywordRecord> {
        if limit == 0 {
            return vec![];
        }
        self.store.top_keywords(limit).unwrap_or_else(|err| {
            warn!("Failed to load top {} keywords: {}", limit, err);
            vec![]
        })
    }

    pub fn search_count(&self, keyword: &str) -> Option<u64> {
        match self.store.get_keyword(keyword) {
            Ok(record) => record.map(|r| r.count),
            Err(err) => {
                warn!("Failed to load count of {:?}: {}", keyword, err);
                None
            }
        }
    }
}
