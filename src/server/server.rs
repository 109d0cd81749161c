use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{info, warn};

use axum::{
    extract::{Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use super::{log_requests, state::*, ServerConfig};
use crate::artists::ArtistAggregator;
use crate::blog::{BlogPost, BlogSearch};
use crate::chart::{refresh_chart, ChartIngestor, ChartRow, ChartSource};
use crate::keywords::KeywordCounter;
use crate::store::RankStore;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct SearchBody {
    pub query: String,
}

#[derive(Serialize, Debug)]
struct SearchResponse {
    query: String,
    recorded: bool,
    /// None when blog search is disabled or failed.
    items: Option<Vec<BlogPost>>,
}

#[derive(Deserialize, Debug)]
struct RankingParams {
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct ChartBody {
    pub rows: Vec<ChartRow>,
}

#[derive(Deserialize, Debug)]
struct ArtistSearchParams {
    pub artist_name: Option<String>,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: state.version.clone(),
    };
    Json(stats)
}

async fn post_search(
    State(counter): State<GuardedKeywordCounter>,
    State(blog_search): State<OptionalBlogSearch>,
    Json(body): Json<SearchBody>,
) -> impl IntoResponse {
    let query = body.query;
    if query.trim().is_empty() {
        return Json(SearchResponse {
            query,
            recorded: false,
            items: None,
        });
    }

    let recorded = counter.record_search(&query);

    let items = match blog_search {
        Some(blog_search) => match blog_search.search(&query).await {
            Ok(items) => Some(items),
            Err(err) => {
                warn!("Blog search for {:?} failed: {}", query, err);
                None
            }
        },
        None => None,
    };

    Json(SearchResponse {
        query,
        recorded,
        items,
    })
}

async fn get_ranking(
    State(counter): State<GuardedKeywordCounter>,
    State(config): State<ServerConfig>,
    Query(params): Query<RankingParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(config.top_keywords_limit);
    Json(counter.top_keywords(limit))
}

async fn get_chart(
    State(source): State<GuardedChartSource>,
    State(ingestor): State<GuardedChartIngestor>,
) -> impl IntoResponse {
    Json(refresh_chart(source.as_ref(), &ingestor).await)
}

async fn post_chart(
    State(ingestor): State<GuardedChartIngestor>,
    Json(body): Json<ChartBody>,
) -> impl IntoResponse {
    Json(ingestor.ingest_chart(&body.rows))
}

async fn search_artist(
    State(aggregator): State<GuardedArtistAggregator>,
    Query(params): Query<ArtistSearchParams>,
) -> impl IntoResponse {
    let songs = match params.artist_name {
        Some(artist_name) => aggregator.songs_by_artist(&artist_name),
        None => vec![],
    };
    Json(songs)
}

async fn get_artist_ranking(State(aggregator): State<GuardedArtistAggregator>) -> impl IntoResponse {
    Json(aggregator.artist_ranking())
}

impl ServerState {
    fn new(
        config: ServerConfig,
        store: Arc<dyn RankStore>,
        chart_source: Arc<dyn ChartSource>,
        blog_search: Option<Arc<dyn BlogSearch>>,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            keyword_counter: Arc::new(KeywordCounter::new(store.clone())),
            chart_ingestor: Arc::new(ChartIngestor::new(store.clone())),
            artist_aggregator: Arc::new(ArtistAggregator::new(store)),
            chart_source,
            blog_search,
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    store: Arc<dyn RankStore>,
    chart_source: Arc<dyn ChartSource>,
    blog_search: Option<Arc<dyn BlogSearch>>,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), store, chart_source, blog_search);

    let keyword_routes: Router = Router::new()
        .route("/search", post(post_search))
        .route("/ranking", get(get_ranking))
        .with_state(state.clone());

    let chart_routes: Router = Router::new()
        .route("/chart", get(get_chart).post(post_chart))
        .route("/artists/search", get(search_artist))
        .route("/artists/ranking", get(get_artist_ranking))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new().route("/", get(home)).with_state(state.clone()),
    };

    let app: Router = home_router
        .nest("/v1", keyword_routes.merge(chart_routes))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    store: Arc<dyn RankStore>,
    chart_source: Arc<dyn ChartSource>,
    blog_search: Option<Arc<dyn BlogSearch>>,
    config: ServerConfig,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, store, chart_source, blog_search)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}
