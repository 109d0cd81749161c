use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chart_rank_server::blog::{BlogSearch, NaverBlogClient, DEFAULT_BLOG_SEARCH_URL};
use chart_rank_server::chart::{refresh_chart, ChartIngestor, ChartSource, WebChartSource};
use chart_rank_server::config::{self, DEFAULT_CHART_URL};
use chart_rank_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use chart_rank_server::store::{RankStore, SqliteRankStore};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

fn parse_dir(s: &str) -> Result<PathBuf, String> {
    let path = parse_path(s)?;
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", s));
    }
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", s));
    }
    Ok(path)
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory containing the database file (search_rank.db).
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_dir)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Number of keywords returned by the popularity ranking by default.
    #[clap(long, default_value_t = 10)]
    pub top_keywords_limit: usize,

    /// Timeout in seconds for outbound requests (chart page, blog search).
    #[clap(long, default_value_t = 10)]
    pub http_timeout_sec: u64,

    /// URL of the chart page to scrape.
    #[clap(long, default_value = DEFAULT_CHART_URL)]
    pub chart_url: String,

    /// Minutes between automatic chart refreshes. Set to 0 to disable them.
    #[clap(long, default_value_t = 60)]
    pub chart_refresh_interval_minutes: u64,

    /// URL of the blog search API.
    #[clap(long, default_value = DEFAULT_BLOG_SEARCH_URL)]
    pub blog_search_url: String,

    /// Client id for the blog search API. Blog search is disabled without credentials.
    #[clap(long)]
    pub blog_client_id: Option<String>,

    /// Client secret for the blog search API.
    #[clap(long)]
    pub blog_client_secret: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            top_keywords_limit: args.top_keywords_limit,
            http_timeout_sec: args.http_timeout_sec,
            chart_url: args.chart_url.clone(),
            chart_refresh_interval_minutes: args.chart_refresh_interval_minutes,
            blog_search_url: args.blog_search_url.clone(),
            blog_client_id: args.blog_client_id.clone(),
            blog_client_secret: args.blog_client_secret.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_dir: {:?}", app_config.db_dir);
    info!("  port: {}", app_config.port);
    info!("  chart_url: {}", app_config.chart.url);

    if !app_config.rank_db_path().exists() {
        info!(
            "Creating new rank database at {:?}",
            app_config.rank_db_path()
        );
    }
    let store: Arc<dyn RankStore> = Arc::new(SqliteRankStore::new(app_config.rank_db_path())?);

    let chart_source: Arc<dyn ChartSource> = Arc::new(WebChartSource::new(
        &app_config.chart.url,
        app_config.http_timeout_sec,
    )?);

    let blog_search: Option<Arc<dyn BlogSearch>> = match &app_config.blog {
        Some(blog) => {
            info!("Blog search enabled at {}", blog.search_url);
            Some(Arc::new(NaverBlogClient::new(
                &blog.search_url,
                &blog.client_id,
                &blog.client_secret,
                app_config.http_timeout_sec,
            )?))
        }
        None => {
            info!("Blog search disabled: no API credentials configured");
            None
        }
    };

    // Spawn background task for periodic chart refresh if enabled
    if app_config.chart.refresh_enabled() {
        let interval_minutes = app_config.chart.refresh_interval_minutes;
        let interval = app_config.chart.refresh_period();
        let refresh_source = chart_source.clone();
        let refresh_ingestor = ChartIngestor::new(store.clone());

        info!("Chart refresh enabled: every {} minutes", interval_minutes);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            // Skip the first immediate tick, wait for the first interval
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let refresh = refresh_chart(refresh_source.as_ref(), &refresh_ingestor).await;
                if refresh.report.inserted > 0 {
                    info!(
                        "Periodic chart refresh stored {} new entries",
                        refresh.report.inserted
                    );
                }
            }
        });
    }

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        frontend_dir_path: app_config.frontend_dir_path.clone(),
        top_keywords_limit: app_config.top_keywords_limit,
    };

    info!("Ready to serve at port {}!", app_config.port);
    run_server(store, chart_source, blog_search, server_config).await
}
