//! Small HTML helpers for pulling text out of chart markup.
//! Naive on purpose: they only need to understand the chart table rows.

use regex::Regex;
use once_cell::sync::Lazy;

static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<([a-z][a-z0-9]*)\b([^>]*)>"#).unwrap()
});
static CLASS_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static NUMERIC_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap());

/// An element found by [`find_elements`]: its tag name and the markup between
/// its opening tag and the first matching closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    pub tag: String,
    pub classes: Vec<&'a str>,
    pub inner: &'a str,
}

impl Element<'_> {
    pub fn text(&self) -> String {
        element_text(self.inner)
    }
}

/// All elements of `html` whose tag name and class list satisfy `accept`,
/// in document order.
///
/// Nested elements of the same tag are not balanced: the inner content stops at
/// the first closing tag, which is enough for table rows and leaf cells.
pub fn find_elements<'a>(html: &'a str, accept: impl Fn(&str, &[&str]) -> bool) -> Vec<Element<'a>> {
    let lowercase = html.to_ascii_lowercase();
    let mut found = Vec::new();
    for caps in OPEN_TAG_RE.captures_iter(html) {
        let (Some(whole), Some(tag), Some(attrs)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let tag = tag.as_str().to_ascii_lowercase();
        let classes = class_list(attrs.as_str());
        if !accept(tag.as_str(), classes.as_slice()) {
            continue;
        }
        let content_start = whole.end();
        let content_end = lowercase[content_start..]
            .find(&format!("</{}", tag))
            .map(|i| content_start + i)
            .unwrap_or(html.len());
        found.push(Element {
            tag,
            classes,
            inner: &html[content_start..content_end],
        });
    }
    found
}

/// First element of `html` matching `accept`.
pub fn find_element<'a>(html: &'a str, accept: impl Fn(&str, &[&str]) -> bool) -> Option<Element<'a>> {
    find_elements(html, accept).into_iter().next()
}

/// Class-list predicate: every class in `wanted` is present.
pub fn has_classes(classes: &[&str], wanted: &[&str]) -> bool {
    wanted.iter().all(|w| classes.iter().any(|c| c == w))
}

fn class_list(attrs: &str) -> Vec<&str> {
    CLASS_ATTR_RE
        .captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().split_whitespace().collect())
        .unwrap_or_default()
}

/// Visible text of an HTML fragment: tags removed, entities decoded,
/// whitespace collapsed.
pub fn element_text(html: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(html)))
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn decode_entities(s: &str) -> String {
    let named = s
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");
    let numeric = NUMERIC_ENTITY_RE.replace_all(&named, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    // last, so "&amp;lt;" stays "&lt;"
    numeric.replace("&amp;", "&")
}

/// Collapse runs of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
