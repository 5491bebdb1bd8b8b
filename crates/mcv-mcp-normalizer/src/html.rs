//! Shared HTML helpers.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

/// Compile a selector that is known to be valid at compile time.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e:?}"))
}

/// Parse table rows returned without their enclosing table.
pub(crate) fn parse_rows_fragment(rows_html: &str) -> Html {
    Html::parse_fragment(&format!("<table><tbody>{rows_html}</tbody></table>"))
}

/// Concatenated text of an element, trimmed.
pub(crate) fn text_of(elem: ElementRef<'_>) -> String {
    elem.text().collect::<String>().trim().to_string()
}

/// Text of an element with runs of whitespace collapsed to single spaces.
pub(crate) fn inline_text(elem: ElementRef<'_>) -> String {
    elem.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First element matching `sel` under `root`.
pub(crate) fn first<'a>(root: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    root.select(sel).next()
}

/// Attribute value or empty string.
pub(crate) fn attr<'a>(elem: ElementRef<'a>, name: &str) -> &'a str {
    elem.value().attr(name).unwrap_or("")
}

/// Make `href` absolute against the portal base URL. Empty stays empty.
pub(crate) fn absolute_url(base: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() || href.starts_with("http") {
        return href.to_string();
    }
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{}{}", base.as_str().trim_end_matches('/'), href))
}

/// Read a JSON value that may be a number or a numeric string.
pub(crate) fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a JSON value that may be a number or a numeric string, allowing negatives.
pub(crate) fn json_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a JSON scalar as a string.
pub(crate) fn json_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
