//! Extraction of chart rows from the chart page markup.

use super::html::{find_element, find_elements, has_classes, Element};
use super::ChartRow;
use crate::store::MISSING_FIELD;

const ROW_CLASSES: [&str; 2] = ["lst50", "lst100"];
const TITLE_CELL_CLASSES: [&str; 2] = ["ellipsis", "rank01"];
const ARTIST_CELL_CLASSES: [&str; 2] = ["ellipsis", "rank02"];

/// Parses every chart row of the page, in page order.
///
/// A row without a title or artist link gets `N/A` in that field. A row without
/// a rank cell keeps `N/A` as its rank text, which ingestion skips as malformed.
pub fn parse_chart_html(html: &str) -> Vec<ChartRow> {
    find_elements(html, |tag, classes| {
        tag == "tr" && ROW_CLASSES.iter().any(|c| classes.contains(c))
    })
    .iter()
    .map(parse_row)
    .collect()
}

fn parse_row(row: &Element) -> ChartRow {
    let rank = find_element(row.inner, |_, classes| classes.contains(&"rank"))
        .map(|e| e.text())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| MISSING_FIELD.to_string());

    ChartRow {
        rank: rank.into(),
        title: linked_text(row, &TITLE_CELL_CLASSES),
        artist: linked_text(row, &ARTIST_CELL_CLASSES),
    }
}

/// Text of the first link inside the `div` carrying all `classes`.
fn linked_text(row: &Element, classes: &[&str]) -> String {
    find_element(row.inner, |tag, c| tag == "div" && has_classes(c, classes))
        .and_then(|cell| find_element(cell.inner, |tag, _| tag == "a"))
        .map(|link| link.text())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| MISSING_FIELD.to_string())
}
