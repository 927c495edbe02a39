//! Job import pipeline: URL in, structured result out.
//!
//! Stages: normalize URL, detect board, fetch, extract, normalize fields.
//! Every expected failure is folded into a `Failed` [`ImportResult`]; the
//! synchronous extraction stage is also guarded against panics.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::error::ImportErrorKind;
use crate::models::{BoardKind, ImportResult, JobData};
use crate::scrapers::extract;
use crate::scrapers::fetcher::{DocumentFetcher, FetchedPage, FetcherConfig};
use crate::scrapers::{detect_board, normalize_url, HttpClient};
use crate::services::normalize::normalize_fields;

/// Pipeline stage, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    NotStarted,
    Normalizing,
    Fetching,
    Extracting,
    NormalizingFields,
    Done,
}

impl ImportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Normalizing => "normalizing",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::NormalizingFields => "normalizing_fields",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for ImportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Imports job postings. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct JobImporter {
    fetcher: DocumentFetcher,
}

impl JobImporter {
    /// Build an importer from resolved settings.
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = settings.http_client()?;
        Ok(Self::from_client(client, settings.fetcher_config()))
    }

    /// Build an importer around an existing HTTP client.
    pub fn from_client(client: HttpClient, config: FetcherConfig) -> Self {
        Self {
            fetcher: DocumentFetcher::new(client, config),
        }
    }

    /// Import the job posting at `raw_url`.
    pub async fn import(&self, raw_url: &str) -> ImportResult {
        let result = self.run(raw_url).await;
        log_stage(raw_url, ImportStage::Done);
        match result.error.as_deref() {
            None => info!("Imported {} ({})", raw_url, result.status.as_str()),
            Some(error) => info!(
                "Imported {} ({}): {}",
                raw_url,
                result.status.as_str(),
                error
            ),
        }
        result
    }

    /// Import, abandoning the in-flight work when `cancel` fires.
    pub async fn import_with_cancel(&self, raw_url: &str, cancel: &CancellationToken) -> ImportResult {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Import of {} cancelled", raw_url);
                ImportResult::failed(ImportErrorKind::Cancelled)
            }
            result = self.import(raw_url) => result,
        }
    }

    async fn run(&self, raw_url: &str) -> ImportResult {
        log_stage(raw_url, ImportStage::NotStarted);

        log_stage(raw_url, ImportStage::Normalizing);
        let url = match normalize_url(raw_url) {
            Ok(url) => url,
            Err(kind) => return ImportResult::failed(kind),
        };

        let board = detect_board(&url);
        debug!("Detected board {} for {}", board, url);

        log_stage(raw_url, ImportStage::Fetching);
        let outcome = self.fetcher.fetch(&url).await;
        if outcome.used_proxy {
            info!("Reader proxy used for {}", url);
        }

        let page = match (outcome.document, outcome.error_kind) {
            (Some(page), _) => page,
            (None, Some(kind)) => {
                warn!("Fetch of {} failed: {:?}", url, kind);
                return ImportResult::failed(kind.into());
            }
            (None, None) => {
                error!("Fetch of {} returned neither a document nor an error", url);
                return ImportResult::failed(ImportErrorKind::Internal);
            }
        };

        if page.url != url {
            info!("Final document for {} is {}", url, page.url);
        }

        match extract_job(raw_url, &page, board) {
            Ok(data) => ImportResult::from_data(data),
            Err(kind) => ImportResult::failed(kind),
        }
    }
}

/// Extraction and field normalization, with panics converted to `Internal`.
fn extract_job(raw_url: &str, page: &FetchedPage, board: BoardKind) -> Result<JobData, ImportErrorKind> {
    catch_unwind(AssertUnwindSafe(|| {
        log_stage(raw_url, ImportStage::Extracting);
        let document = page.parse();
        let raw = extract::extract(board, &document);

        log_stage(raw_url, ImportStage::NormalizingFields);
        normalize_fields(raw, &page.url, board)
    }))
    .map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(
            "Extraction panicked for {} ({}): {}",
            page.url, board, message
        );
        ImportErrorKind::Internal
    })
}

fn log_stage(raw_url: &str, stage: ImportStage) {
    debug!("Import {} -> {}", raw_url.trim(), stage);
}

static DEFAULT_IMPORTER: OnceLock<Result<JobImporter, String>> = OnceLock::new();

/// Import a job posting with default settings and environment overrides.
///
/// The underlying HTTP client is built once and reused across calls.
pub async fn import_job_from_url(url: &str) -> ImportResult {
    let importer = DEFAULT_IMPORTER.get_or_init(|| {
        let mut settings = Settings::default();
        settings.apply_env(|name| std::env::var(name).ok());
        JobImporter::new(&settings).map_err(|e| e.to_string())
    });

    match importer {
        Ok(importer) => importer.import(url).await,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            ImportResult::failed(ImportErrorKind::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportStatus, JobField, JobType};
    use url::Url;

    fn page(url: &str, html: &str) -> FetchedPage {
        FetchedPage::new(Url::parse(url).unwrap(), html.to_string())
    }

    #[test]
    fn test_extract_linkedin_page() {
        let page = page(
            "https://www.linkedin.com/jobs/view/123",
            r#"<html><body>
                <h1 class="top-card-layout__title">Senior Rust Engineer</h1>
                <a class="topcard__org-name-link">Ferrous Systems</a>
                <span class="topcard__flavor--bullet">Remote</span>
                <div class="show-more-less-html__markup">Full-time role writing Rust.</div>
            </body></html>"#,
        );
        let data = extract_job("x", &page, BoardKind::LinkedIn).unwrap();
        let result = ImportResult::from_data(data);
        assert_eq!(result.status, ImportStatus::Success);
        assert_eq!(result.data.job_type, Some(JobType::Ft));
        assert_eq!(result.data.source_board, Some(BoardKind::LinkedIn));
        assert!(result.fields_extracted.contains(&JobField::Title));
        assert!(result.fields_extracted.contains(&JobField::CompanyName));
    }

    #[test]
    fn test_extract_without_title() {
        let page = page("https://example.com/", "<html><body><p>Nothing here</p></body></html>");
        let data = extract_job("x", &page, BoardKind::Generic).unwrap();
        let result = ImportResult::from_data(data);
        assert_eq!(result.error_kind, Some(ImportErrorKind::ExtractionFailed));
    }

    #[tokio::test]
    async fn test_invalid_urls_fail_without_network() {
        let importer = JobImporter::new(&Settings::default()).unwrap();
        for input in ["", "   ", "ftp://example.com/job", "not a url"] {
            let result = importer.import(input).await;
            assert_eq!(result.status, ImportStatus::Failed);
            assert_eq!(result.error.as_deref(), Some("Invalid URL"));
        }
    }

    #[tokio::test]
    async fn test_already_cancelled_import() {
        let importer = JobImporter::new(&Settings::default()).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let result = importer
            .import_with_cancel("https://example.invalid/job", &token)
            .await;
        assert_eq!(result.error_kind, Some(ImportErrorKind::Cancelled));
        assert_eq!(result.error.as_deref(), Some("The import was cancelled."));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(ImportStage::NormalizingFields.to_string(), "normalizing_fields");
    }
}
