//! Field extraction from fetched job pages.
//!
//! Extraction runs as a cascade ordered from most specific to most generic:
//! a board's dedicated selector table first (LinkedIn, Indeed, Glassdoor),
//! then the generic extractor (JSON-LD, Open Graph, heuristic DOM).

mod boards;
pub mod dom;
mod generic;
mod json_ld;

pub use boards::{board_extractor, BoardSelectors, SelectorExtractor};
pub use generic::{GenericExtractor, HeuristicExtractor, OpenGraphExtractor};
pub use json_ld::JsonLdExtractor;

use scraper::Html;
use tracing::{debug, info};

use crate::models::BoardKind;

/// A salary taken from structured data, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredSalary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
}

impl StructuredSalary {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Raw, pre-normalization values pulled from a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Free-text salary badge, e.g. `$85,000 - $95,000 a year`.
    pub salary_text: Option<String>,
    pub salary: Option<StructuredSalary>,
    /// Structured or badge employment type, e.g. `FULL_TIME`.
    pub employment_type: Option<String>,
}

impl RawFields {
    pub fn has_title(&self) -> bool {
        self.title.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.set_fields().is_empty()
    }

    /// Names of the raw fields this strategy actually set.
    pub fn set_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.company.is_some() {
            fields.push("company");
        }
        if self.location.is_some() {
            fields.push("location");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.salary_text.is_some() {
            fields.push("salary_text");
        }
        if self.salary.as_ref().is_some_and(|s| !s.is_empty()) {
            fields.push("salary");
        }
        if self.employment_type.is_some() {
            fields.push("employment_type");
        }
        fields
    }

    /// Fill fields missing here from `other`. Existing values win.
    pub fn fill_gaps(mut self, other: RawFields) -> Self {
        self.title = self.title.or(other.title);
        self.company = self.company.or(other.company);
        self.location = self.location.or(other.location);
        self.description = self.description.or(other.description);
        self.salary_text = self.salary_text.or(other.salary_text);
        self.salary = self.salary.or(other.salary);
        self.employment_type = self.employment_type.or(other.employment_type);
        self
    }
}

/// One extraction strategy.
pub trait Extractor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Pull whatever fields this strategy understands out of `document`.
    fn extract(&self, document: &Html) -> RawFields;
}

/// Run the extraction cascade for a page from `board`.
pub fn extract(board: BoardKind, document: &Html) -> RawFields {
    let generic = GenericExtractor;

    let Some(dedicated) = board_extractor(board) else {
        return generic.extract(document);
    };

    let fields = dedicated.extract(document);
    debug!(
        "{} extractor set [{}]",
        dedicated.name(),
        fields.set_fields().join(", ")
    );

    match (fields.title.is_some(), fields.company.is_some()) {
        (true, _) => fields,
        (false, true) => {
            info!(
                "{} extractor found a company but no title, filling gaps from generic extractor",
                dedicated.name()
            );
            fields.fill_gaps(generic.extract(document))
        }
        (false, false) => {
            info!(
                "{} extractor found neither title nor company, falling back to generic extractor",
                dedicated.name()
            );
            generic.extract(document)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINKEDIN_PAGE: &str = r#"<html><body>
        <h1 class="top-card-layout__title">Staff Engineer</h1>
        <a class="topcard__org-name-link" href="/company/acme">Acme Corp</a>
        <span class="topcard__flavor topcard__flavor--bullet">Berlin, Germany</span>
        <div class="show-more-less-html__markup"><p>Build the platform.</p></div>
    </body></html>"#;

    #[test]
    fn test_dedicated_extractor_wins() {
        let doc = Html::parse_document(LINKEDIN_PAGE);
        let fields = extract(BoardKind::LinkedIn, &doc);
        assert_eq!(fields.title.as_deref(), Some("Staff Engineer"));
        assert_eq!(fields.company.as_deref(), Some("Acme Corp"));
        assert_eq!(fields.location.as_deref(), Some("Berlin, Germany"));
        assert_eq!(fields.description.as_deref(), Some("Build the platform."));
    }

    #[test]
    fn test_board_miss_falls_through_to_generic() {
        let doc = Html::parse_document(
            r#"<html><head>
                <meta property="og:title" content="Data Analyst">
                <meta property="og:site_name" content="Globex">
            </head><body><div class="redesigned">nothing known</div></body></html>"#,
        );
        let fields = extract(BoardKind::LinkedIn, &doc);
        assert_eq!(fields.title.as_deref(), Some("Data Analyst"));
        assert_eq!(fields.company.as_deref(), Some("Globex"));
    }

    #[test]
    fn test_company_only_board_result_keeps_company() {
        let doc = Html::parse_document(
            r#"<html><head>
                <meta property="og:title" content="Data Analyst">
                <meta property="og:site_name" content="LinkedIn">
            </head><body>
                <a class="topcard__org-name-link">Initech</a>
            </body></html>"#,
        );
        let fields = extract(BoardKind::LinkedIn, &doc);
        assert_eq!(fields.title.as_deref(), Some("Data Analyst"));
        assert_eq!(fields.company.as_deref(), Some("Initech"));
    }

    #[test]
    fn test_set_fields_and_fill_gaps() {
        let a = RawFields {
            title: Some("A".into()),
            ..Default::default()
        };
        let b = RawFields {
            title: Some("B".into()),
            company: Some("C".into()),
            ..Default::default()
        };
        let merged = a.fill_gaps(b);
        assert_eq!(merged.title.as_deref(), Some("A"));
        assert_eq!(merged.set_fields(), vec!["title", "company"]);
        assert!(RawFields::default().is_empty());
    }
}
