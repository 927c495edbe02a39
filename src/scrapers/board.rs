//! Job board detection by hostname.

use url::Url;

use crate::models::BoardKind;

/// Host substrings that identify a known board, checked in order.
const BOARD_PATTERNS: &[(&str, BoardKind)] = &[
    ("linkedin.com", BoardKind::LinkedIn),
    ("indeed.com", BoardKind::Indeed),
    ("glassdoor.com", BoardKind::Glassdoor),
    ("glassdoor.co.uk", BoardKind::Glassdoor),
];

/// Classify a normalized URL. Unknown hosts are `Generic`.
pub fn detect_board(url: &Url) -> BoardKind {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    BOARD_PATTERNS
        .iter()
        .find(|(pattern, _)| host.contains(pattern))
        .map(|(_, kind)| *kind)
        .unwrap_or_default()
}
