mod aggregator;

pub use aggregator::ArtistAggregator;
