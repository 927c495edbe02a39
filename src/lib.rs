//! jobimport - turn a job posting URL into a structured job record.
//!
//! The pipeline normalizes the URL, detects the job board, fetches the page
//! (following canonical and meta-refresh redirects, falling back to a reader
//! proxy when blocked), runs an extractor cascade and normalizes the fields.
//!
//! ```no_run
//! # async fn demo() {
//! let result = jobimport::import_job_from_url("https://www.linkedin.com/jobs/view/123").await;
//! println!("{}", serde_json::to_string(&result).unwrap());
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod server;
pub mod services;

pub use config::{Config, Settings};
pub use error::{FetchErrorKind, ImportErrorKind};
pub use models::{BoardKind, ImportResult, ImportStatus, JobData, JobField, JobType};
pub use services::{import_job_from_url, JobImporter};
