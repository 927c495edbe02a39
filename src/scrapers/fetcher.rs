//! Document fetching with content-driven redirect following.
//!
//! A fetch runs in this order for each hop:
//! 1. Direct GET (bounded retry on timeouts and server errors)
//! 2. On 403/429, a single attempt through the reader proxy
//! 3. On success, look for a `<link rel="canonical">` or
//!    `<meta http-equiv="refresh">` pointing elsewhere and follow it,
//!    bounded by depth and a visited set
//!
//! Expected failures never escape as errors; they are classified into a
//! [`FetchErrorKind`] on the returned [`FetchOutcome`].

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use futures::future::BoxFuture;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use super::http_client::HttpClient;
use super::url_utils::same_document;
use crate::error::FetchErrorKind;

/// Maximum number of redirect signals followed from the original URL.
pub const MAX_REDIRECT_DEPTH: u32 = 3;

/// `content` of a meta refresh, e.g. `0; url='https://example.com/job'`.
static META_REFRESH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*\d*(?:\.\d*)?\s*[;,]?\s*url\s*=\s*['"]?([^'"]+?)['"]?\s*$"#).unwrap()
});

/// Raw HTML of a fetched page plus the URL it was rendered from.
///
/// The tree is parsed on demand with [`FetchedPage::parse`] so the page can
/// cross await points (`scraper::Html` is not `Send`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: Url,
    pub html: String,
}

impl FetchedPage {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }

    /// Parse the page into an HTML tree.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Result of fetching one URL, after redirects and fallbacks.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The final document, absent on failure.
    pub document: Option<FetchedPage>,
    /// URL actually rendered (may differ from the requested URL).
    pub final_url: Url,
    /// Whether the reader proxy produced the document or was attempted.
    pub used_proxy: bool,
    /// Failure classification; `None` when a document was obtained.
    pub error_kind: Option<FetchErrorKind>,
}

impl FetchOutcome {
    fn fetched(page: FetchedPage, used_proxy: bool) -> Self {
        Self {
            final_url: page.url.clone(),
            document: Some(page),
            used_proxy,
            error_kind: None,
        }
    }

    fn failed(url: &Url, kind: FetchErrorKind, used_proxy: bool) -> Self {
        Self {
            document: None,
            final_url: url.clone(),
            used_proxy,
            error_kind: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.document.is_some()
    }
}

/// Redirect bookkeeping threaded through one top-level fetch.
///
/// Each hop gets a new value from [`RedirectState::follow`]; nothing is
/// shared between concurrent fetches.
#[derive(Debug, Clone, Default)]
pub struct RedirectState {
    visited: HashSet<String>,
    depth: u32,
}

impl RedirectState {
    /// Start state for a fetch of `start`.
    pub fn new(start: &Url) -> Self {
        let mut visited = HashSet::new();
        visited.insert(visit_key(start));
        Self { visited, depth: 0 }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn has_visited(&self, url: &Url) -> bool {
        self.visited.contains(&visit_key(url))
    }

    /// State for the hop from the document at `from` to `target`.
    ///
    /// `from` is the URL the document was served from, which differs from
    /// the requested one after HTTP redirects.
    pub fn follow(&self, from: &Url, target: &Url) -> Self {
        let mut visited = self.visited.clone();
        visited.insert(visit_key(from));
        visited.insert(visit_key(target));
        Self {
            visited,
            depth: self.depth + 1,
        }
    }
}

fn visit_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Fetcher tuning.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum redirect signals followed.
    pub max_redirect_depth: u32,
    /// Extra direct attempts on timeouts and server errors.
    pub retry_attempts: u32,
    /// Fixed delay before each retry.
    pub retry_delay: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_redirect_depth: MAX_REDIRECT_DEPTH,
            retry_attempts: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Resolves a posting URL to its final renderable document.
#[derive(Clone)]
pub struct DocumentFetcher {
    client: HttpClient,
    config: FetcherConfig,
}

impl DocumentFetcher {
    pub fn new(client: HttpClient, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Fetch `url`, following redirect signals and falling back to the
    /// reader proxy when blocked.
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        self.fetch_hop(url.clone(), RedirectState::new(url)).await
    }

    fn fetch_hop(&self, url: Url, state: RedirectState) -> BoxFuture<'_, FetchOutcome> {
        Box::pin(async move {
            let outcome = self.fetch_single(&url).await;

            let Some(page) = outcome.document.as_ref() else {
                return outcome;
            };

            let Some(target) = find_redirect_signal(page) else {
                return outcome;
            };

            if state.has_visited(&target) {
                debug!(
                    "Redirect signal {} -> {} already visited, stopping",
                    page.url, target
                );
                return outcome;
            }

            if state.depth() >= self.config.max_redirect_depth {
                warn!(
                    "Redirect depth {} reached at {}, not following {}",
                    state.depth(),
                    page.url,
                    target
                );
                return outcome;
            }

            info!("Following redirect signal {} -> {}", page.url, target);
            let next_state = state.follow(&page.url, &target);
            let next = self.fetch_hop(target, next_state).await;

            if next.is_success() {
                FetchOutcome {
                    used_proxy: outcome.used_proxy || next.used_proxy,
                    ..next
                }
            } else {
                warn!(
                    "Redirect target {} failed ({:?}), keeping {}",
                    next.final_url, next.error_kind, outcome.final_url
                );
                outcome
            }
        })
    }

    /// Fetch one URL without following redirect signals.
    async fn fetch_single(&self, url: &Url) -> FetchOutcome {
        let mut attempt = 0;
        loop {
            match self.fetch_direct(url).await {
                Ok(page) => return FetchOutcome::fetched(page, false),
                Err(kind) if kind.is_transient() && attempt < self.config.retry_attempts => {
                    attempt += 1;
                    warn!(
                        "Fetch of {} failed ({}), retry {}/{} in {:?}",
                        url, kind, attempt, self.config.retry_attempts, self.config.retry_delay
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(FetchErrorKind::Blocked) => return self.fetch_via_reader(url).await,
                Err(kind) => return FetchOutcome::failed(url, kind, false),
            }
        }
    }

    async fn fetch_direct(&self, url: &Url) -> Result<FetchedPage, FetchErrorKind> {
        let response = self.client.get(url).await.map_err(|e| {
            let kind = FetchErrorKind::from_reqwest(&e);
            warn!("Request to {} failed ({}): {}", url, kind, e);
            kind
        })?;

        let status = response.status.as_u16();
        if let Some(kind) = FetchErrorKind::from_status(status) {
            warn!("{} returned HTTP {} ({})", url, status, kind);
            return Err(kind);
        }

        if !response.is_html_like() {
            debug!(
                "{} returned non-HTML content type {:?}",
                url,
                response.content_type()
            );
        }

        let final_url = response.final_url.clone();
        let html = response.text().await.map_err(|e| {
            let kind = FetchErrorKind::from_reqwest(&e);
            warn!("Reading body of {} failed ({}): {}", url, kind, e);
            kind
        })?;

        Ok(FetchedPage::new(final_url, html))
    }

    /// Single reader proxy attempt; any failure stays `Blocked`.
    async fn fetch_via_reader(&self, url: &Url) -> FetchOutcome {
        let Some(result) = self.client.get_via_reader(url).await else {
            debug!("No reader proxy configured, {} stays blocked", url);
            return FetchOutcome::failed(url, FetchErrorKind::Blocked, false);
        };

        info!("Direct fetch of {} blocked, trying reader proxy", url);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Reader proxy request for {} failed: {}", url, e);
                return FetchOutcome::failed(url, FetchErrorKind::Blocked, true);
            }
        };

        if !response.is_success() {
            warn!(
                "Reader proxy returned HTTP {} for {}",
                response.status.as_u16(),
                url
            );
            return FetchOutcome::failed(url, FetchErrorKind::Blocked, true);
        }

        match response.text().await {
            Ok(html) if !html.trim().is_empty() => {
                FetchOutcome::fetched(FetchedPage::new(url.clone(), html), true)
            }
            Ok(_) => {
                warn!("Reader proxy returned an empty body for {}", url);
                FetchOutcome::failed(url, FetchErrorKind::Blocked, true)
            }
            Err(e) => {
                warn!("Reading reader proxy body for {} failed: {}", url, e);
                FetchOutcome::failed(url, FetchErrorKind::Blocked, true)
            }
        }
    }
}

/// First redirect signal on the page that points somewhere else.
///
/// Canonical links win over meta refresh. Targets are resolved against the
/// page URL and must be http(s).
pub fn find_redirect_signal(page: &FetchedPage) -> Option<Url> {
    let document = page.parse();
    redirect_candidates(&document)
        .into_iter()
        .filter_map(|href| page.url.join(&href).ok())
        .filter(|target| matches!(target.scheme(), "http" | "https"))
        .find(|target| !same_document(target, &page.url))
}

/// Raw redirect targets in priority order.
fn redirect_candidates(document: &Html) -> Vec<String> {
    let mut candidates = Vec::new();

    if let Ok(selector) = Selector::parse("link[rel][href]") {
        for link in document.select(&selector) {
            let is_canonical = link
                .value()
                .attr("rel")
                .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")));
            if let (true, Some(href)) = (is_canonical, link.value().attr("href")) {
                let href = href.trim();
                if !href.is_empty() {
                    candidates.push(href.to_string());
                    break;
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("meta[http-equiv][content]") {
        for meta in document.select(&selector) {
            let is_refresh = meta
                .value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"));
            if !is_refresh {
                continue;
            }
            if let Some(target) = meta.value().attr("content").and_then(parse_meta_refresh) {
                candidates.push(target);
                break;
            }
        }
    }

    candidates
}

/// Extract the target from a meta refresh `content` value.
pub fn parse_meta_refresh(content: &str) -> Option<String> {
    META_REFRESH_URL
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, html: &str) -> FetchedPage {
        FetchedPage::new(Url::parse(url).unwrap(), html.to_string())
    }

    #[test]
    fn test_parse_meta_refresh() {
        assert_eq!(
            parse_meta_refresh("0; url=https://example.com/job"),
            Some("https://example.com/job".to_string())
        );
        assert_eq!(
            parse_meta_refresh("5;URL='/jobs/42'"),
            Some("/jobs/42".to_string())
        );
        assert_eq!(
            parse_meta_refresh(r#"0;url="https://example.com/a""#),
            Some("https://example.com/a".to_string())
        );
        assert_eq!(parse_meta_refresh("30"), None);
        assert_eq!(parse_meta_refresh(""), None);
    }

    #[test]
    fn test_canonical_signal_resolves_relative() {
        let p = page(
            "https://jobs.example.com/amp/42",
            r#"<html><head><link rel="canonical" href="/jobs/42"></head></html>"#,
        );
        assert_eq!(
            find_redirect_signal(&p).map(|u| u.to_string()),
            Some("https://jobs.example.com/jobs/42".to_string())
        );
    }

    #[test]
    fn test_self_canonical_is_not_a_signal() {
        let p = page(
            "https://jobs.example.com/jobs/42",
            r#"<html><head><link rel="canonical" href="https://jobs.example.com/jobs/42#top"></head></html>"#,
        );
        assert_eq!(find_redirect_signal(&p), None);
    }

    #[test]
    fn test_canonical_beats_meta_refresh() {
        let p = page(
            "https://example.com/interstitial",
            r#"<html><head>
                <meta http-equiv="refresh" content="0; url=https://example.com/refresh">
                <link rel="canonical" href="https://example.com/canonical">
            </head></html>"#,
        );
        assert_eq!(
            find_redirect_signal(&p).map(|u| u.to_string()),
            Some("https://example.com/canonical".to_string())
        );
    }

    #[test]
    fn test_meta_refresh_used_when_canonical_is_self() {
        let p = page(
            "https://example.com/interstitial",
            r#"<html><head>
                <link rel="canonical" href="https://example.com/interstitial">
                <meta http-equiv="Refresh" content="0;URL=/real">
            </head></html>"#,
        );
        assert_eq!(
            find_redirect_signal(&p).map(|u| u.to_string()),
            Some("https://example.com/real".to_string())
        );
    }

    #[test]
    fn test_non_http_targets_ignored() {
        let p = page(
            "https://example.com/job",
            r#"<html><head><link rel="canonical" href="javascript:void(0)"></head></html>"#,
        );
        assert_eq!(find_redirect_signal(&p), None);
    }

    #[test]
    fn test_redirect_state_tracks_visits() {
        let a = Url::parse("https://example.com/a").unwrap();
        let b = Url::parse("https://example.com/b").unwrap();
        let state = RedirectState::new(&a);
        assert_eq!(state.depth(), 0);
        assert!(state.has_visited(&a));
        assert!(!state.has_visited(&b));

        let next = state.follow(&a, &b);
        assert_eq!(next.depth(), 1);
        assert!(next.has_visited(&a));
        assert!(next.has_visited(&b));
        // The original state is untouched.
        assert!(!state.has_visited(&b));
    }

    #[test]
    fn test_follow_records_served_url() {
        let requested = Url::parse("http://example.com/old").unwrap();
        let served = Url::parse("https://example.com/new").unwrap();
        let target = Url::parse("https://example.com/canonical").unwrap();
        let next = RedirectState::new(&requested).follow(&served, &target);
        assert!(next.has_visited(&requested));
        assert!(next.has_visited(&served));
        assert!(next.has_visited(&target));
    }

    #[test]
    fn test_visit_key_ignores_fragment() {
        let a = Url::parse("https://example.com/a#one").unwrap();
        let a2 = Url::parse("https://example.com/a#two").unwrap();
        let state = RedirectState::new(&a);
        assert!(state.has_visited(&a2));
    }
}
