//! Outcome of a single job import.

use serde::{Deserialize, Serialize};

use super::{JobData, JobField};
use crate::error::ImportErrorKind;

/// Terminal status of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Title plus the expected fields were extracted.
    Success,
    /// Title was extracted but some expected fields are missing.
    Partial,
    /// No usable document or no title.
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

/// Result of importing one job posting URL.
///
/// `fields_extracted` is always a subset of the populated keys of `data`,
/// and `error` is set exactly when `status` is not `Success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub status: ImportStatus,
    pub data: JobData,
    pub fields_extracted: Vec<JobField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Typed failure reason, for callers that branch on it.
    #[serde(skip)]
    pub error_kind: Option<ImportErrorKind>,
}

impl ImportResult {
    /// A failed import with no extracted data.
    pub fn failed(kind: ImportErrorKind) -> Self {
        Self::failed_with_data(kind, JobData::default())
    }

    /// A failed import that still reports whatever was recovered.
    pub fn failed_with_data(kind: ImportErrorKind, data: JobData) -> Self {
        Self {
            status: ImportStatus::Failed,
            fields_extracted: data.extracted_fields(),
            data,
            error: Some(kind.to_string()),
            error_kind: Some(kind),
        }
    }

    /// Grade normalized data: no title fails, missing expected fields is partial.
    pub fn from_data(data: JobData) -> Self {
        if !data.has(JobField::Title) {
            return Self::failed_with_data(ImportErrorKind::ExtractionFailed, data);
        }

        let missing: Vec<&str> = JobField::EXPECTED
            .iter()
            .filter(|f| !data.has(**f))
            .map(|f| f.as_str())
            .collect();

        let fields_extracted = data.extracted_fields();

        if missing.is_empty() {
            Self {
                status: ImportStatus::Success,
                data,
                fields_extracted,
                error: None,
                error_kind: None,
            }
        } else {
            Self {
                status: ImportStatus::Partial,
                data,
                fields_extracted,
                error: Some(format!(
                    "Some fields could not be extracted: {}",
                    missing.join(", ")
                )),
                error_kind: None,
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == ImportStatus::Failed
    }
}
