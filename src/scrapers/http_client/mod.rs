//! HTTP client for fetching job postings.
//!
//! Two paths share one connection pool per client:
//! - direct requests with a realistic browser user agent
//! - an optional read-only "reader" proxy that renders bot-gated or
//!   JS-heavy pages server-side, used only as a fallback when blocked

mod response;
mod user_agent;

pub use response::HttpResponse;
pub use user_agent::{random_user_agent, resolve_user_agent};

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use url::Url;

/// Header asking the reader proxy for rendered HTML instead of markdown.
const READER_FORMAT_HEADER: &str = "X-Return-Format";

/// Default primary fetch timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default reader proxy timeout (rendering adds latency).
pub const DEFAULT_PROXY_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP client with direct and reader-proxy paths.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    proxy_client: Client,
    reader_proxy_url: Option<String>,
    user_agent: String,
}

/// Builder for constructing `HttpClient` with optional configuration.
pub struct HttpClientBuilder {
    timeout: Duration,
    proxy_timeout: Duration,
    user_agent: Option<String>,
    reader_proxy_url: Option<String>,
    resolve: Vec<(String, SocketAddr)>,
}

impl HttpClientBuilder {
    /// Set the user agent string.
    /// - `"impersonate"` or not called: random real browser user agent
    /// - Any other string: used as-is
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = Some(ua.to_string());
        self
    }

    /// Set the reader proxy timeout.
    pub fn proxy_timeout(mut self, timeout: Duration) -> Self {
        self.proxy_timeout = timeout;
        self
    }

    /// Set the reader proxy base URL (e.g. `https://r.jina.ai`).
    /// Empty strings disable the proxy.
    pub fn reader_proxy(mut self, base_url: Option<&str>) -> Self {
        self.reader_proxy_url = base_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        self
    }

    /// Pin DNS resolution for a host. The port in the request URL is used.
    pub fn resolve(mut self, host: &str, addr: SocketAddr) -> Self {
        self.resolve.push((host.to_string(), addr));
        self
    }

    /// Build the `HttpClient`.
    pub fn build(self) -> Result<HttpClient, reqwest::Error> {
        let user_agent = resolve_user_agent(self.user_agent.as_deref());

        let client = self.client_builder(&user_agent, self.timeout).build()?;
        let proxy_client = self
            .client_builder(&user_agent, self.proxy_timeout)
            .build()?;

        if let Some(ref proxy) = self.reader_proxy_url {
            tracing::debug!("HTTP client configured with reader proxy {}", proxy);
        }

        Ok(HttpClient {
            client,
            proxy_client,
            reader_proxy_url: self.reader_proxy_url,
            user_agent,
        })
    }

    fn client_builder(&self, user_agent: &str, timeout: Duration) -> reqwest::ClientBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let mut builder = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        for (host, addr) in &self.resolve {
            builder = builder.resolve(host, *addr);
        }

        builder
    }
}

impl HttpClient {
    /// Create a builder with the primary fetch timeout.
    pub fn builder(timeout: Duration) -> HttpClientBuilder {
        HttpClientBuilder {
            timeout,
            proxy_timeout: DEFAULT_PROXY_TIMEOUT,
            user_agent: None,
            reader_proxy_url: None,
            resolve: Vec::new(),
        }
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Build the reader proxy URL for a target page.
    pub fn reader_url(&self, url: &Url) -> Option<String> {
        self.reader_proxy_url
            .as_ref()
            .map(|base| format!("{}/{}", base, url.as_str()))
    }

    /// Direct GET. Status codes are not turned into errors.
    pub async fn get(&self, url: &Url) -> Result<HttpResponse, reqwest::Error> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.as_str()).send().await?;
        Ok(HttpResponse::from_reqwest(response))
    }

    /// GET through the reader proxy. Returns `None` when no proxy is configured.
    pub async fn get_via_reader(&self, url: &Url) -> Option<Result<HttpResponse, reqwest::Error>> {
        let reader_url = self.reader_url(url)?;
        tracing::debug!("GET {} via reader proxy", url);
        let result = self
            .proxy_client
            .get(&reader_url)
            .header(READER_FORMAT_HEADER, "html")
            .send()
            .await
            .map(HttpResponse::from_reqwest);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_url_joins_target() {
        let client = HttpClient::builder(DEFAULT_TIMEOUT)
            .reader_proxy(Some("https://r.jina.ai/"))
            .build()
            .unwrap();
        let target = Url::parse("https://careers.acme.io/jobs/42?src=x").unwrap();
        assert_eq!(
            client.reader_url(&target).as_deref(),
            Some("https://r.jina.ai/https://careers.acme.io/jobs/42?src=x")
        );
    }

    #[test]
    fn test_empty_reader_proxy_disables_fallback() {
        let client = HttpClient::builder(DEFAULT_TIMEOUT)
            .reader_proxy(Some("  "))
            .build()
            .unwrap();
        let target = Url::parse("https://example.com").unwrap();
        assert!(client.reader_url(&target).is_none());
    }

    #[test]
    fn test_custom_user_agent() {
        let client = HttpClient::builder(DEFAULT_TIMEOUT)
            .user_agent("JobImportTest/1.0")
            .build()
            .unwrap();
        assert_eq!(client.user_agent(), "JobImportTest/1.0");
    }
}
