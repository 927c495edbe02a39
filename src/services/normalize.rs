//! Post-processing of raw extracted values into typed job fields.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::models::{BoardKind, JobData, JobType};
use crate::scrapers::extract::{RawFields, StructuredSalary};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Employment type keywords, checked in order; first match wins.
static JOB_TYPE_PATTERNS: LazyLock<Vec<(JobType, Regex)>> = LazyLock::new(|| {
    vec![
        (JobType::Ft, Regex::new(r"\bfull[\s-]?time\b").unwrap()),
        (JobType::Pt, Regex::new(r"\bpart[\s-]?time\b").unwrap()),
        (JobType::Contract, Regex::new(r"\bcontract(?:or)?\b").unwrap()),
        (JobType::Intern, Regex::new(r"\bintern(?:ship)?\b").unwrap()),
    ]
});

/// A dollar amount, optionally followed by a second bound: `$85,000 - $95,000`,
/// `$120k`, `$18.50 to $22 an hour`, `$200,000.00/yr - $250,000.00/yr`.
static SALARY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    const AMOUNT: &str = r"(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?";
    Regex::new(&format!(
        r"(?i)\$\s*{AMOUNT}(k)?(?:\s*/\s*[a-z]+)?(?:\s*(?:-|–|—|to)\s*\$?\s*{AMOUNT}(k)?)?"
    ))
    .unwrap()
});

/// Amounts above this are treated as noise, not salaries.
const MAX_SALARY: u64 = 100_000_000;

/// Collapse whitespace runs to single spaces and trim. `None` becomes empty.
pub fn clean_text(text: Option<&str>) -> String {
    WHITESPACE
        .replace_all(text.unwrap_or_default(), " ")
        .trim()
        .to_string()
}

fn clean_field(text: Option<&str>) -> Option<String> {
    Some(clean_text(text)).filter(|s| !s.is_empty())
}

/// Match a piece of text against the employment type keywords.
pub fn match_job_type(text: &str) -> Option<JobType> {
    let text = text.to_lowercase().replace('_', " ");
    JOB_TYPE_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&text))
        .map(|(job_type, _)| *job_type)
}

/// Employment type from a structured value, else from title + description.
///
/// No keyword match leaves the type absent rather than guessing.
pub fn infer_job_type(
    structured: Option<&str>,
    title: Option<&str>,
    description: Option<&str>,
) -> Option<JobType> {
    if let Some(job_type) = structured.and_then(match_job_type) {
        return Some(job_type);
    }
    let combined = format!("{} {}", title.unwrap_or_default(), description.unwrap_or_default());
    match_job_type(&combined)
}

/// Parse the first dollar amount or range in free text.
///
/// A single amount fills both bounds. Unparseable text yields `None`.
pub fn parse_salary_text(text: &str) -> Option<(u64, u64)> {
    let caps = SALARY_RANGE.captures(text)?;

    let first_k = caps.get(2).is_some();
    let second_k = caps.get(4).is_some();

    let first = parse_amount(caps.get(1)?.as_str(), first_k)?;
    let Some(second) = caps.get(3) else {
        return salary_bounds(Some(first), Some(first));
    };

    // "$85-95k": the suffix applies to both bounds.
    let first = if second_k && !first_k && first < 1000 {
        first * 1000
    } else {
        first
    };
    let second = parse_amount(second.as_str(), second_k)?;

    salary_bounds(Some(first), Some(second))
}

fn parse_amount(digits: &str, thousands: bool) -> Option<u64> {
    let value: u64 = digits.replace(',', "").parse().ok()?;
    let value = if thousands { value.checked_mul(1000)? } else { value };
    (value <= MAX_SALARY).then_some(value)
}

/// Bounds from a structured salary. Fractions are truncated.
pub fn structured_salary_bounds(salary: &StructuredSalary) -> Option<(u64, u64)> {
    let to_dollars =
        |v: f64| (v.is_finite() && (1.0..=MAX_SALARY as f64).contains(&v)).then(|| v.trunc() as u64);
    salary_bounds(
        salary.min.and_then(to_dollars),
        salary.max.and_then(to_dollars),
    )
}

/// Fill a missing bound from the other, drop zeros, order the pair.
fn salary_bounds(min: Option<u64>, max: Option<u64>) -> Option<(u64, u64)> {
    let min = min.filter(|v| *v > 0);
    let max = max.filter(|v| *v > 0);
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(v), None) | (None, Some(v)) => (v, v),
        (None, None) => return None,
    };
    Some((min.min(max), min.max(max)))
}

/// Turn raw extracted fields into a typed job record.
pub fn normalize_fields(raw: RawFields, final_url: &Url, board: BoardKind) -> JobData {
    let title = clean_field(raw.title.as_deref());
    let description = clean_field(raw.description.as_deref());

    let structured = raw
        .salary
        .as_ref()
        .and_then(|s| structured_salary_bounds(s).map(|bounds| (bounds, s.currency.clone())));
    let (salary, salary_currency) = match structured {
        Some((bounds, currency)) => (Some(bounds), currency),
        None => (
            raw.salary_text.as_deref().and_then(parse_salary_text),
            None,
        ),
    };

    let job_type = infer_job_type(
        raw.employment_type.as_deref(),
        title.as_deref(),
        description.as_deref(),
    );

    JobData {
        title,
        company_name: clean_field(raw.company.as_deref()),
        location: clean_field(raw.location.as_deref()),
        description,
        posting_url: Some(final_url.to_string()),
        salary_min: salary.map(|(min, _)| min),
        salary_max: salary.map(|(_, max)| max),
        salary_currency: clean_field(salary_currency.as_deref()).map(|c| c.to_uppercase()),
        job_type,
        source_board: Some(board),
    }
}
