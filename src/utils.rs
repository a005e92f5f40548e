//! Utility functions for string manipulation, timestamps and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Capitalisation for headers
//! - Character-safe truncation for fallback summaries and logging
//! - HTML escaping for the HTML renderer
//! - Date and timestamp formatting for headers and file names

use chrono::{DateTime, Local, NaiveDate};

/// Capitalize the first character of a string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("technology"), "Technology");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Keep the first `max` characters of `s`, appending `"..."` if anything was cut.
///
/// Counts Unicode scalar values, so multi-byte text is never split mid character.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with `"…(+N chars)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => {
            let rest = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], rest)
        }
        None => s.to_string(),
    }
}

/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Long-form date used in briefing headers, e.g. "Tuesday, May 06, 2025".
pub fn briefing_date(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}

/// Second-resolution timestamp used in output file names, e.g. "20250506_083000".
pub fn file_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}
