mod naver;

pub use naver::{NaverBlogClient, DEFAULT_BLOG_SEARCH_URL};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One blog post of a search result. Title and description may carry the
/// API's `<b>` highlight markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPost {
    pub title: String,
    pub link: String,
    pub description: String,
    pub bloggername: String,
    pub bloggerlink: String,
    pub postdate: String,
}

#[derive(Debug, Error)]
pub enum BlogSearchError {
    #[error("Blog search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Blog search returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// External full-text blog search, queried on behalf of the user.
#[async_trait]
pub trait BlogSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<BlogPost>, BlogSearchError>;
}
