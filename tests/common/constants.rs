//! Shared constants for end-to-end tests

/// Maximum time to wait for a spawned server to answer
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for a single test request
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Delay between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Credentials the fake blog API expects
pub const BLOG_CLIENT_ID: &str = "test-client-id";
pub const BLOG_CLIENT_SECRET: &str = "test-client-secret";

/// Chart rows served by the fake chart page, as (rank, title, artist)
pub const CHART_ROWS: [(&str, &str, &str); 5] = [
    ("1", "Supernova", "aespa"),
    ("2", "Love wins all", "IU"),
    ("3", "Armageddon", "aespa"),
    ("4", "Magnetic", "ILLIT"),
    ("5", "Whiplash", "aespa"),
];
