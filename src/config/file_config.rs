use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub top_keywords_limit: Option<usize>,
    pub http_timeout_sec: Option<u64>,

    // Feature configs
    pub chart: Option<ChartConfig>,
    pub blog: Option<BlogConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ChartConfig {
    pub url: Option<String>,
    /// Minutes between automatic chart refreshes, 0 disables them.
    pub refresh_interval_minutes: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct BlogConfig {
    pub search_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
db_dir = "/var/lib/rank"
port = 8080
logging_level = "headers"
top_keywords_limit = 5

[chart]
url = "http://localhost:9999/chart"
refresh_interval_minutes = 0

[blog]
client_id = "my-id"
client_secret = "my-secret"
"#,
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap();

        assert_eq!(config.db_dir.as_deref(), Some("/var/lib/rank"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.logging_level.as_deref(), Some("headers"));
        assert_eq!(config.top_keywords_limit, Some(5));
        assert_eq!(config.http_timeout_sec, None);
        let chart = config.chart.unwrap();
        assert_eq!(chart.url.as_deref(), Some("http://localhost:9999/chart"));
        assert_eq!(chart.refresh_interval_minutes, Some(0));
        let blog = config.blog.unwrap();
        assert_eq!(blog.client_id.as_deref(), Some("my-id"));
        assert_eq!(blog.client_secret.as_deref(), Some("my-secret"));
        assert!(blog.search_url.is_none());
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = FileConfig::load(&path).unwrap();

        assert!(config.db_dir.is_none());
        assert!(config.chart.is_none());
        assert!(config.blog.is_none());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        let err = FileConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
