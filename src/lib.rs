//! Search keyword popularity and music chart tracking server library.
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod artists;
pub mod blog;
pub mod chart;
pub mod config;
pub mod keywords;
pub mod server;
pub mod sqlite_persistence;
pub mod store;

// Re-export commonly used types for convenience
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use store::{RankStore, SqliteRankStore};
