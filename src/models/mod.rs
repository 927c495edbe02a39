//! Data models for the job import pipeline.

mod board;
mod import_result;
mod job;

pub use board::BoardKind;
pub use import_result::{ImportResult, ImportStatus};
pub use job::{JobData, JobField, JobType};
