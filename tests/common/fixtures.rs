//! Fake upstream services for end-to-end tests
//!
//! The chart page and the blog search API are served from a local axum
//! server so the real HTTP clients are exercised without network access.

use super::constants::*;
use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use tokio::net::TcpListener;

pub const CHART_PATH: &str = "/chart/index.htm";
pub const BROKEN_CHART_PATH: &str = "/chart/broken.htm";
pub const BLOG_SEARCH_PATH: &str = "/v1/search/blog.json";

/// Chart page markup shaped like the real one: a header row, then one
/// `lst50` row per entry.
pub fn chart_page_html() -> String {
    let rows: String = CHART_ROWS
        .iter()
        .map(|(rank, title, artist)| {
            format!(
                r#"<tr class="lst50" data-song-no="{rank}">
                    <td><div class="wrap t_center"><span class="rank ">{rank}</span></div></td>
                    <td><div class="wrap">
                        <div class="ellipsis rank01"><span><a href="javascript:;">{title}</a></span></div><br>
                        <div class="ellipsis rank02"><a href="javascript:;">{artist}</a><span class="checkEllipsis"><a href="javascript:;">{artist}</a></span></div>
                    </div></td>
                </tr>"#
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html><html><head><title>chart</title></head><body>
        <table><thead><tr><th><div class="wrap">rank</div></th></tr></thead>
        <tbody>{}</tbody></table></body></html>"#,
        rows
    )
}

async fn chart_page(headers: HeaderMap) -> impl IntoResponse {
    let is_browser = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ua| ua.starts_with("Mozilla/"));
    if !is_browser {
        return (StatusCode::FORBIDDEN, Html(String::new()));
    }
    (StatusCode::OK, Html(chart_page_html()))
}

async fn broken_chart_page() -> impl IntoResponse {
    StatusCode::SERVICE_UNAVAILABLE
}

async fn blog_search(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    if header("x-naver-client-id") != Some(BLOG_CLIENT_ID)
        || header("x-naver-client-secret") != Some(BLOG_CLIENT_SECRET)
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"errorMessage": "Authentication failed"})),
        );
    }

    let query = params.get("query").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "total": 1,
            "display": params.get("display"),
            "items": [{
                "title": format!("<b>{}</b> review", query),
                "link": "https://blog.example.com/1",
                "description": format!("sorted by {}", params.get("sort").cloned().unwrap_or_default()),
                "bloggername": "tester",
                "bloggerlink": "blog.example.com/tester",
                "postdate": "20251001",
            }],
        })),
    )
}

/// Serves the fake chart page and blog API on a random port.
/// Returns the base URL; the server lives until the runtime shuts down.
pub async fn spawn_fake_upstream() -> String {
    let app = Router::new()
        .route(CHART_PATH, get(chart_page))
        .route(BROKEN_CHART_PATH, get(broken_chart_page))
        .route(BLOG_SEARCH_PATH, get(blog_search));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fake upstream failed");
    });

    format!("http://127.0.0.1:{}", port)
}
