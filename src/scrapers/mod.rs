//! Fetching and scraping of job posting pages.

mod board;
pub mod extract;
pub mod fetcher;
mod http_client;
mod url_utils;

pub use board::detect_board;
pub use fetcher::{DocumentFetcher, FetchOutcome, FetchedPage, FetcherConfig, RedirectState};
pub use http_client::{
    random_user_agent, resolve_user_agent, HttpClient, HttpClientBuilder, HttpResponse,
    DEFAULT_PROXY_TIMEOUT, DEFAULT_TIMEOUT,
};
pub use url_utils::{normalize_url, same_document};
