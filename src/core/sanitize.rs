// src/core/sanitize.rs
//
// Cell clean-up and login extraction. Everything here is total: any input
// string produces some output string, and a non-empty input never produces
// an empty login.

use crate::config::consts::{GITHUB_HOST_MARKER, LEETCODE_HOST_MARKER};

/// Trim whitespace and a leading UTF-8 BOM (spreadsheet exports love those).
pub fn clean_cell(s: &str) -> &str {
    s.trim_start_matches('\u{feff}').trim()
}

/// Path component of a URL-ish string: scheme, host, query and fragment removed.
/// `"https://github.com/octocat?tab=repos"` → `"/octocat"`.
/// A value without a `/` after the host has an empty path.
pub fn url_path(raw: &str) -> &str {
    let rest = match raw.find("://") {
        Some(i) => &raw[i + 3..],
        None => raw,
    };
    let path = match rest.find('/') {
        Some(i) => &rest[i..],
        None => "",
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Shared extraction rule: when `raw` mentions the platform host, the login is
/// the URL path with surrounding `/` stripped; otherwise `raw` is the login.
/// Falls back to the trimmed input when the path is empty.
pub fn extract_login(raw: &str, host_marker: &str) -> String {
    let cleaned = clean_cell(raw);
    if cleaned.to_ascii_lowercase().contains(host_marker) {
        let login = url_path(cleaned).trim_matches('/');
        if !login.is_empty() {
            return s!(login);
        }
    }
    if cleaned.is_empty() { s!(raw) } else { s!(cleaned) }
}

/// Row-processor normalization for GitHub cells.
pub fn github_login(raw: &str) -> String {
    extract_login(raw, GITHUB_HOST_MARKER)
}

/// LeetCode login: the last non-empty path segment.
/// `"https://leetcode.com/u/alice/"` → `"alice"`, `"alice"` → `"alice"`.
pub fn derive_login(raw: &str) -> String {
    let cleaned = clean_cell(raw);
    let without_query = match cleaned.find(['?', '#']) {
        Some(i) => &cleaned[..i],
        None => cleaned,
    };
    without_query
        .trim_matches('/')
        .rsplit('/')
        .find(|seg| !seg.trim().is_empty())
        .map(|seg| s!(seg.trim()))
        .unwrap_or_else(|| {
            if cleaned.is_empty() { s!(raw) } else { s!(cleaned) }
        })
}

/// Does this look like a LeetCode link (as opposed to a bare username)?
pub fn is_leetcode_url(raw: &str) -> bool {
    raw.to_ascii_lowercase().contains(LEETCODE_HOST_MARKER)
}

/// Decode `%XX` escapes in a URL path segment. Invalid escapes pass through as-is.
pub fn percent_decode(s: &str) -> String {
    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
