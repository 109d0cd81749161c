mod html;
mod ingestor;
mod row;
mod scraper;
mod source;

pub use ingestor::{ChartIngestor, IngestionReport};
pub use row::{ChartRow, RawRank};
pub use scraper::parse_chart_html;
pub use source::{refresh_chart, ChartFetchError, ChartRefresh, ChartSource, WebChartSource};
