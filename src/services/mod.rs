//! Service layer for the job import pipeline.
//!
//! Services are used by the CLI, the web server, and library callers alike.

pub mod import;
pub mod normalize;

pub use import::{import_job_from_url, ImportStage, JobImporter};
pub use normalize::{clean_text, infer_job_type, normalize_fields, parse_salary_text};
