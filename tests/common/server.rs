//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own database and its own fake
//! upstream services.

use super::constants::*;
use super::fixtures::{spawn_fake_upstream, BLOG_SEARCH_PATH, BROKEN_CHART_PATH, CHART_PATH};
use chart_rank_server::blog::{BlogSearch, NaverBlogClient};
use chart_rank_server::chart::{ChartSource, WebChartSource};
use chart_rank_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use chart_rank_server::store::SqliteRankStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Knobs for [`TestServer::spawn_with`].
pub struct TestServerOptions {
    /// Configure blog search credentials.
    pub blog_search: bool,
    /// Point the chart source at a page that always fails.
    pub broken_chart: bool,
}

impl Default for TestServerOptions {
    fn default() -> Self {
        Self {
            blog_search: true,
            broken_chart: false,
        }
    }
}

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Store for direct database access in tests
    pub store: Arc<SqliteRankStore>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port with blog search enabled
    pub async fn spawn() -> Self {
        Self::spawn_with(TestServerOptions::default()).await
    }

    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created, the port cannot be bound or
    /// the server doesn't become ready within the timeout.
    pub async fn spawn_with(options: TestServerOptions) -> Self {
        let upstream_url = spawn_fake_upstream().await;

        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            SqliteRankStore::new(temp_db_dir.path().join("search_rank.db"))
                .expect("Failed to open rank store"),
        );

        let chart_path = if options.broken_chart {
            BROKEN_CHART_PATH
        } else {
            CHART_PATH
        };
        let chart_source: Arc<dyn ChartSource> = Arc::new(
            WebChartSource::new(&format!("{}{}", upstream_url, chart_path), REQUEST_TIMEOUT_SECS)
                .expect("Failed to create chart source"),
        );

        let blog_search: Option<Arc<dyn BlogSearch>> = if options.blog_search {
            Some(Arc::new(
                NaverBlogClient::new(
                    &format!("{}{}", upstream_url, BLOG_SEARCH_PATH),
                    BLOG_CLIENT_ID,
                    BLOG_CLIENT_SECRET,
                    REQUEST_TIMEOUT_SECS,
                )
                .expect("Failed to create blog client"),
            ))
        } else {
            None
        };

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            frontend_dir_path: None,
            top_keywords_limit: 10,
        };
        let app = make_app(config, store.clone(), chart_source, blog_search)
            .expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            store,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
