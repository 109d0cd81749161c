use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::{NewChartEntry, MISSING_FIELD};

/// Rank as handed over by a scraper: either already numeric or the raw cell text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRank {
    Number(i64),
    Text(String),
}

impl RawRank {
    /// The rank as a positive integer, `None` when it isn't one.
    pub fn parse(&self) -> Option<i64> {
        let rank = match self {
            RawRank::Number(n) => *n,
            RawRank::Text(text) => text.trim().parse::<i64>().ok()?,
        };
        (rank >= 1).then_some(rank)
    }
}

impl fmt::Display for RawRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawRank::Number(n) => write!(f, "{}", n),
            RawRank::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<i64> for RawRank {
    fn from(value: i64) -> Self {
        RawRank::Number(value)
    }
}

impl From<i32> for RawRank {
    fn from(value: i32) -> Self {
        RawRank::Number(value.into())
    }
}

impl From<String> for RawRank {
    fn from(value: String) -> Self {
        RawRank::Text(value)
    }
}

impl From<&str> for RawRank {
    fn from(value: &str) -> Self {
        RawRank::Text(value.to_string())
    }
}

/// One row of a scraped chart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRow {
    pub rank: RawRank,
    pub title: String,
    pub artist: String,
}

impl ChartRow {
    pub fn new(rank: impl Into<RawRank>, title: &str, artist: &str) -> Self {
        Self {
            rank: rank.into(),
            title: title.to_string(),
            artist: artist.to_string(),
        }
    }

    /// Converts to a storable entry. Blank title or artist become the `N/A`
    /// placeholder; a row without a usable rank is rejected.
    pub fn normalize(&self) -> Option<NewChartEntry> {
        Some(NewChartEntry {
            rank: self.rank.parse()?,
            title: or_missing(&self.title),
            artist: or_missing(&self.artist),
        })
    }
}

fn or_missing(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        MISSING_FIELD.to_string()
    } else {
        value.to_string()
    }
}
