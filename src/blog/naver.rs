//! Naver blog search API client.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{BlogPost, BlogSearch, BlogSearchError};

pub const DEFAULT_BLOG_SEARCH_URL: &str = "https://openapi.naver.com/v1/search/blog.json";

/// Results requested per search.
const DISPLAY: u32 = 20;
/// Similarity ordering; the API alternative is "date".
const SORT: &str = "sim";

pub struct NaverBlogClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct BlogSearchResponse {
    #[serde(default)]
    items: Vec<BlogPost>,
}

impl NaverBlogClient {
    pub fn new(
        base_url: &str,
        client_id: &str,
        client_secret: &str,
        timeout_sec: u64,
    ) -> Result<Self, BlogSearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}?query={}&display={}&sort={}",
            self.base_url,
            urlencoding::encode(query),
            DISPLAY,
            SORT
        )
    }
}

#[async_trait]
impl BlogSearch for NaverBlogClient {
    async fn search(&self, query: &str) -> Result<Vec<BlogPost>, BlogSearchError> {
        let response = self
            .client
            .get(self.search_url(query))
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlogSearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: BlogSearchResponse = response.json().await?;
        Ok(body.items)
    }
}
