//! Error taxonomy for the import pipeline.
//!
//! Neither enum is ever returned as an `Err` from the public entry points:
//! both are folded into an [`ImportResult`](crate::models::ImportResult) so
//! callers only ever see a typed status plus a message.

use serde::Serialize;
use thiserror::Error;

/// Classified failure of a single document fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed")]
    ConnectionFailed,
    #[error("blocked by the remote site")]
    Blocked,
    #[error("not found")]
    NotFound,
    #[error("remote server error")]
    ServerError,
}

impl FetchErrorKind {
    /// Classify an HTTP status code. Returns `None` for non-error statuses.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            404 | 410 => Some(FetchErrorKind::NotFound),
            403 | 429 => Some(FetchErrorKind::Blocked),
            500..=u16::MAX => Some(FetchErrorKind::ServerError),
            400..=499 => Some(FetchErrorKind::NotFound),
            _ => None,
        }
    }

    /// Classify a transport-level reqwest failure.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchErrorKind::Timeout
        } else {
            FetchErrorKind::ConnectionFailed
        }
    }

    /// Whether a bounded retry on the direct path may help.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchErrorKind::Timeout | FetchErrorKind::ServerError)
    }
}

/// User-facing import failure. The `Display` text is what the caller shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportErrorKind {
    #[error("Invalid URL")]
    InvalidUrl,
    /// Reserved for boards that are recognised but deliberately unsupported.
    #[error("This job board is not supported yet.")]
    UnsupportedBoard,
    #[error("The request took too long. Please try again.")]
    Timeout,
    #[error("Could not connect to the job site.")]
    ConnectionFailed,
    #[error("The site is blocking automated access. Please copy the job details manually.")]
    Blocked,
    #[error("This job posting could not be found (it may have been removed).")]
    NotFound,
    #[error("The job site is having problems. Please try again later.")]
    ServerError,
    #[error("Could not extract job details from this page.")]
    ExtractionFailed,
    #[error("The import was cancelled.")]
    Cancelled,
    #[error("An unexpected error occurred while importing this job.")]
    Internal,
}

impl From<FetchErrorKind> for ImportErrorKind {
    fn from(kind: FetchErrorKind) -> Self {
        match kind {
            FetchErrorKind::Timeout => ImportErrorKind::Timeout,
            FetchErrorKind::ConnectionFailed => ImportErrorKind::ConnectionFailed,
            FetchErrorKind::Blocked => ImportErrorKind::Blocked,
            FetchErrorKind::NotFound => ImportErrorKind::NotFound,
            FetchErrorKind::ServerError => ImportErrorKind::ServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(FetchErrorKind::from_status(200), None);
        assert_eq!(FetchErrorKind::from_status(304), None);
        assert_eq!(
            FetchErrorKind::from_status(404),
            Some(FetchErrorKind::NotFound)
        );
        assert_eq!(
            FetchErrorKind::from_status(410),
            Some(FetchErrorKind::NotFound)
        );
        assert_eq!(
            FetchErrorKind::from_status(403),
            Some(FetchErrorKind::Blocked)
        );
        assert_eq!(
            FetchErrorKind::from_status(429),
            Some(FetchErrorKind::Blocked)
        );
        assert_eq!(
            FetchErrorKind::from_status(503),
            Some(FetchErrorKind::ServerError)
        );
        assert_eq!(
            FetchErrorKind::from_status(400),
            Some(FetchErrorKind::NotFound)
        );
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(ImportErrorKind::InvalidUrl.to_string(), "Invalid URL");
        let not_found = ImportErrorKind::from(FetchErrorKind::NotFound).to_string();
        assert!(not_found.contains("not be found"));
        assert!(not_found.contains("removed"));
        let blocked = ImportErrorKind::from(FetchErrorKind::Blocked).to_string();
        assert!(blocked.contains("blocking"));
    }

    #[test]
    fn test_transient_kinds() {
        assert!(FetchErrorKind::Timeout.is_transient());
        assert!(FetchErrorKind::ServerError.is_transient());
        assert!(!FetchErrorKind::Blocked.is_transient());
        assert!(!FetchErrorKind::NotFound.is_transient());
        assert!(!FetchErrorKind::ConnectionFailed.is_transient());
    }
}
