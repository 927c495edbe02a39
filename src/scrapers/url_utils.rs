//! URL normalization and validation for user-supplied posting links.

use url::Url;

use crate::error::ImportErrorKind;

/// Normalize a raw user-supplied URL.
///
/// Trims surrounding whitespace and requires an absolute `http`/`https` URL
/// with a host. Scheme and host come back lower-cased; path, query and
/// fragment keep their case.
pub fn normalize_url(raw: &str) -> Result<Url, ImportErrorKind> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ImportErrorKind::InvalidUrl);
    }

    let url = Url::parse(trimmed).map_err(|e| {
        tracing::debug!("Rejecting URL {:?}: {}", trimmed, e);
        ImportErrorKind::InvalidUrl
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        tracing::debug!("Rejecting URL {:?}: scheme {}", trimmed, url.scheme());
        return Err(ImportErrorKind::InvalidUrl);
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ImportErrorKind::InvalidUrl);
    }

    Ok(url)
}

/// Compare two URLs ignoring the fragment.
pub fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_scheme_and_host() {
        let url = normalize_url("  HTTPS://WWW.LinkedIn.COM/jobs/view/ABC?Ref=X#Top \n").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("www.linkedin.com"));
        assert_eq!(url.path(), "/jobs/view/ABC");
        assert_eq!(url.query(), Some("Ref=X"));
        assert_eq!(url.fragment(), Some("Top"));
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert_eq!(normalize_url(""), Err(ImportErrorKind::InvalidUrl));
        assert_eq!(normalize_url("   "), Err(ImportErrorKind::InvalidUrl));
        assert_eq!(
            normalize_url("www.indeed.com/viewjob?jk=1"),
            Err(ImportErrorKind::InvalidUrl)
        );
        assert_eq!(
            normalize_url("ftp://example.com/job"),
            Err(ImportErrorKind::InvalidUrl)
        );
        assert_eq!(
            normalize_url("javascript:alert(1)"),
            Err(ImportErrorKind::InvalidUrl)
        );
        assert_eq!(normalize_url("not a url"), Err(ImportErrorKind::InvalidUrl));
    }

    #[test]
    fn test_same_document_ignores_fragment() {
        let a = Url::parse("https://example.com/job#apply").unwrap();
        let b = Url::parse("https://example.com/job").unwrap();
        let c = Url::parse("https://example.com/other").unwrap();
        assert!(same_document(&a, &b));
        assert!(!same_document(&a, &c));
    }
}
