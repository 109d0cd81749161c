use axum::extract::FromRef;

use crate::artists::ArtistAggregator;
use crate::blog::BlogSearch;
use crate::chart::{ChartIngestor, ChartSource};
use crate::keywords::KeywordCounter;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedKeywordCounter = Arc<KeywordCounter>;
pub type GuardedChartIngestor = Arc<ChartIngestor>;
pub type GuardedArtistAggregator = Arc<ArtistAggregator>;
pub type GuardedChartSource = Arc<dyn ChartSource>;
pub type OptionalBlogSearch = Option<Arc<dyn BlogSearch>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub keyword_counter: GuardedKeywordCounter,
    pub chart_ingestor: GuardedChartIngestor,
    pub artist_aggregator: GuardedArtistAggregator,
    pub chart_source: GuardedChartSource,
    pub blog_search: OptionalBlogSearch,
    pub version: String,
}

impl FromRef<ServerState> for GuardedKeywordCounter {
    fn from_ref(input: &ServerState) -> Self {
        input.keyword_counter.clone()
    }
}

impl FromRef<ServerState> for GuardedChartIngestor {
    fn from_ref(input: &ServerState) -> Self {
        input.chart_ingestor.clone()
    }
}

impl FromRef<ServerState> for GuardedArtistAggregator {
    fn from_ref(input: &ServerState) -> Self {
        input.artist_aggregator.clone()
    }
}

impl FromRef<ServerState> for GuardedChartSource {
    fn from_ref(input: &ServerState) -> Self {
        input.chart_source.clone()
    }
}

impl FromRef<ServerState> for OptionalBlogSearch {
    fn from_ref(input: &ServerState) -> Self {
        input.blog_search.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
