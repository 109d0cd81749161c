mod file_config;

pub use file_config::{BlogConfig, ChartConfig, FileConfig};

use crate::blog::DEFAULT_BLOG_SEARCH_URL;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CHART_URL: &str = "https://www.melon.com/chart/index.htm";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub top_keywords_limit: usize,
    pub http_timeout_sec: u64,
    pub chart_url: String,
    pub chart_refresh_interval_minutes: u64,
    pub blog_search_url: String,
    pub blog_client_id: Option<String>,
    pub blog_client_secret: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_dir: None,
            port: 5000,
            logging_level: RequestsLoggingLevel::default(),
            frontend_dir_path: None,
            top_keywords_limit: 10,
            http_timeout_sec: 10,
            chart_url: DEFAULT_CHART_URL.to_string(),
            chart_refresh_interval_minutes: 60,
            blog_search_url: DEFAULT_BLOG_SEARCH_URL.to_string(),
            blog_client_id: None,
            blog_client_secret: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub top_keywords_limit: usize,
    pub http_timeout_sec: u64,

    // Feature configs (with defaults)
    pub chart: ChartSettings,
    /// None when no API credentials are configured.
    pub blog: Option<BlogSettings>,
}

#[derive(Debug, Clone)]
pub struct ChartSettings {
    pub url: String,
    pub refresh_interval_minutes: u64,
}

impl ChartSettings {
    pub fn refresh_enabled(&self) -> bool {
        self.refresh_interval_minutes > 0
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone)]
pub struct BlogSettings {
    pub search_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let top_keywords_limit = file.top_keywords_limit.unwrap_or(cli.top_keywords_limit);
        let http_timeout_sec = file.http_timeout_sec.unwrap_or(cli.http_timeout_sec);

        let chart_file = file.chart.unwrap_or_default();
        let chart = ChartSettings {
            url: chart_file.url.unwrap_or_else(|| cli.chart_url.clone()),
            refresh_interval_minutes: chart_file
                .refresh_interval_minutes
                .unwrap_or(cli.chart_refresh_interval_minutes),
        };

        // Blog search is enabled only with both credentials
        let blog_file = file.blog.unwrap_or_default();
        let blog_client_id = blog_file.client_id.or_else(|| cli.blog_client_id.clone());
        let blog_client_secret = blog_file
            .client_secret
            .or_else(|| cli.blog_client_secret.clone());
        let blog = match (blog_client_id, blog_client_secret) {
            (Some(client_id), Some(client_secret)) => Some(BlogSettings {
                search_url: blog_file
                    .search_url
                    .unwrap_or_else(|| cli.blog_search_url.clone()),
                client_id,
                client_secret,
            }),
            (None, None) => None,
            _ => bail!("Both the blog client id and client secret must be provided together"),
        };

        Ok(Self {
            db_dir,
            port,
            logging_level,
            frontend_dir_path,
            top_keywords_limit,
            http_timeout_sec,
            chart,
            blog,
        })
    }

    pub fn rank_db_path(&self) -> PathBuf {
        self.db_dir.join("search_rank.db")
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
