//! Where chart snapshots come from, and the scrape-then-ingest refresh.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::{parse_chart_html, ChartIngestor, ChartRow, IngestionReport};

// The chart site rejects requests without a browser user agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Error)]
pub enum ChartFetchError {
    #[error("Chart page request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chart page returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait ChartSource: Send + Sync {
    /// Fetches the current chart snapshot, in chart order.
    async fn fetch_chart(&self) -> Result<Vec<ChartRow>, ChartFetchError>;
}

/// Scrapes the public chart page.
pub struct WebChartSource {
    client: reqwest::Client,
    url: String,
}

impl WebChartSource {
    pub fn new(url: &str, timeout_sec: u64) -> Result<Self, ChartFetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl ChartSource for WebChartSource {
    async fn fetch_chart(&self) -> Result<Vec<ChartRow>, ChartFetchError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(ChartFetchError::Status(response.status().as_u16()));
        }
        let html = response.text().await?;
        Ok(parse_chart_html(&html))
    }
}

/// Result of one scrape-and-ingest round.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRefresh {
    pub rows: Vec<ChartRow>,
    pub report: IngestionReport,
}

/// Scrapes the chart and stores what is new.
///
/// A failed scrape is logged and treated as an empty snapshot, so the caller
/// always gets something to display.
pub async fn refresh_chart(source: &dyn ChartSource, ingestor: &ChartIngestor) -> ChartRefresh {
    let rows = match source.fetch_chart().await {
        Ok(rows) => rows,
        Err(err) => {
            warn!("Chart scrape failed: {}", err);
            vec![]
        }
    };
    if rows.is_empty() {
        info!("Chart scrape returned no rows");
    }

    let report = ingestor.ingest_chart(&rows);
    ChartRefresh { rows, report }
}
