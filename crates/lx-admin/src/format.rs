//! Display helpers shared by the table rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const PLACEHOLDER_HOST: &str = "https://via.placeholder.com";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// First `max` characters, with `...` appended when anything was cut.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Stored file names live under `/uploads/<folder>/`; absolute URLs pass through.
pub fn upload_url(folder: &str, stored: Option<&str>, placeholder: (u32, u32)) -> String {
    match stored.map(str::trim).filter(|s| !s.is_empty()) {
        Some(url) if url.starts_with("http") || url.starts_with('/') => url.to_owned(),
        Some(name) => format!("/uploads/{folder}/{name}"),
        None => format!("{PLACEHOLDER_HOST}/{}x{}", placeholder.0, placeholder.1),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(parsed);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// `2024-05-01`; unparseable input is shown as-is, missing input as empty.
pub fn date(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => parse_timestamp(raw)
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| raw.to_owned()),
        None => String::new(),
    }
}

pub fn date_time(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => parse_timestamp(raw)
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| raw.to_owned()),
        None => String::new(),
    }
}
