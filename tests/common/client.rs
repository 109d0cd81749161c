//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_stats(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Stats request failed")
    }

    pub async fn search(&self, query: &str) -> Response {
        self.client
            .post(self.url("/v1/search"))
            .json(&json!({ "query": query }))
            .send()
            .await
            .expect("Search request failed")
    }

    pub async fn get_ranking(&self, limit: Option<usize>) -> Response {
        let mut request = self.client.get(self.url("/v1/ranking"));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        request.send().await.expect("Ranking request failed")
    }

    pub async fn get_chart(&self) -> Response {
        self.client
            .get(self.url("/v1/chart"))
            .send()
            .await
            .expect("Chart request failed")
    }

    pub async fn post_chart(&self, rows: Value) -> Response {
        self.client
            .post(self.url("/v1/chart"))
            .json(&json!({ "rows": rows }))
            .send()
            .await
            .expect("Chart ingestion request failed")
    }

    pub async fn search_artist(&self, artist_name: &str) -> Response {
        self.client
            .get(self.url("/v1/artists/search"))
            .query(&[("artist_name", artist_name)])
            .send()
            .await
            .expect("Artist search request failed")
    }

    pub async fn get_artist_ranking(&self) -> Response {
        self.client
            .get(self.url("/v1/artists/ranking"))
            .send()
            .await
            .expect("Artist ranking request failed")
    }
}
