//! Structured job record produced by an import.

use serde::{Deserialize, Serialize};

use super::BoardKind;

/// Normalized employment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Ft,
    Pt,
    Contract,
    Intern,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ft => "ft",
            Self::Pt => "pt",
            Self::Contract => "contract",
            Self::Intern => "intern",
        }
    }
}

/// Name of a field in [`JobData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobField {
    Title,
    CompanyName,
    Location,
    Description,
    SalaryMin,
    SalaryMax,
    SalaryCurrency,
    JobType,
    PostingUrl,
    SourceBoard,
}

impl JobField {
    /// Fields that come out of the page itself, in reporting order.
    pub const EXTRACTABLE: [JobField; 8] = [
        JobField::Title,
        JobField::CompanyName,
        JobField::Location,
        JobField::Description,
        JobField::SalaryMin,
        JobField::SalaryMax,
        JobField::SalaryCurrency,
        JobField::JobType,
    ];

    /// Missing any of these demotes an import to partial.
    pub const EXPECTED: [JobField; 2] = [JobField::CompanyName, JobField::Description];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CompanyName => "company_name",
            Self::Location => "location",
            Self::Description => "description",
            Self::SalaryMin => "salary_min",
            Self::SalaryMax => "salary_max",
            Self::SalaryCurrency => "salary_currency",
            Self::JobType => "job_type",
            Self::PostingUrl => "posting_url",
            Self::SourceBoard => "source_board",
        }
    }
}

impl std::fmt::Display for JobField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed job record. Absent fields are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_board: Option<BoardKind>,
}

impl JobData {
    /// Check whether a field carries a value.
    pub fn has(&self, field: JobField) -> bool {
        match field {
            JobField::Title => self.title.is_some(),
            JobField::CompanyName => self.company_name.is_some(),
            JobField::Location => self.location.is_some(),
            JobField::Description => self.description.is_some(),
            JobField::SalaryMin => self.salary_min.is_some(),
            JobField::SalaryMax => self.salary_max.is_some(),
            JobField::SalaryCurrency => self.salary_currency.is_some(),
            JobField::JobType => self.job_type.is_some(),
            JobField::PostingUrl => self.posting_url.is_some(),
            JobField::SourceBoard => self.source_board.is_some(),
        }
    }

    /// Populated page-derived fields, in reporting order.
    pub fn extracted_fields(&self) -> Vec<JobField> {
        JobField::EXTRACTABLE
            .into_iter()
            .filter(|f| self.has(*f))
            .collect()
    }
}
