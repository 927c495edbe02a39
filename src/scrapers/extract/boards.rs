//! Dedicated extractors for known job boards.
//!
//! Each board is a table of CSS selectors per field, tried in order. Boards
//! reshuffle their markup regularly, so every field lists the current
//! selector first and older layouts after it.

use scraper::Html;

use super::dom::select_text;
use super::{Extractor, RawFields};
use crate::models::BoardKind;

/// Ordered selectors per field for one board.
#[derive(Debug)]
pub struct BoardSelectors {
    pub name: &'static str,
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    pub description: &'static [&'static str],
    pub salary: &'static [&'static str],
    pub employment_type: &'static [&'static str],
}

pub static LINKEDIN: BoardSelectors = BoardSelectors {
    name: "linkedin",
    title: &[
        "h1.top-card-layout__title",
        "h1.topcard__title",
        ".job-details-jobs-unified-top-card__job-title h1",
    ],
    company: &[
        "a.topcard__org-name-link",
        ".topcard__org-name-link",
        ".top-card-layout__second-subline .topcard__flavor a",
        ".job-details-jobs-unified-top-card__company-name a",
    ],
    location: &[
        "span.topcard__flavor--bullet",
        ".job-details-jobs-unified-top-card__bullet",
    ],
    description: &[
        ".show-more-less-html__markup",
        ".description__text",
        "#job-details",
    ],
    salary: &[".salary.compensation__salary", ".compensation__salary"],
    // Guest pages list seniority first, then employment type.
    employment_type: &[
        ".description__job-criteria-list li:nth-child(2) .description__job-criteria-text",
    ],
};

pub static INDEED: BoardSelectors = BoardSelectors {
    name: "indeed",
    title: &[
        "h1.jobsearch-JobInfoHeader-title",
        "[data-testid=\"jobsearch-JobInfoHeader-title\"]",
        "h1[data-testid=\"simpler-jobTitle\"]",
    ],
    company: &[
        "[data-testid=\"inlineHeader-companyName\"]",
        "[data-company-name=\"true\"]",
        ".jobsearch-InlineCompanyRating > div:first-child",
    ],
    location: &[
        "[data-testid=\"inlineHeader-companyLocation\"]",
        "[data-testid=\"job-location\"]",
        ".jobsearch-JobInfoHeader-subtitle > div:last-child",
    ],
    description: &["#jobDescriptionText"],
    salary: &[
        "#salaryInfoAndJobType",
        "[data-testid=\"jobsearch-OtherJobDetailsContainer\"]",
    ],
    employment_type: &["#salaryInfoAndJobType", "[data-testid=\"jobType\"]"],
};

pub static GLASSDOOR: BoardSelectors = BoardSelectors {
    name: "glassdoor",
    title: &["[data-test=\"job-title\"]", "[data-test=\"jobTitle\"]"],
    company: &["[data-test=\"employer-name\"]", "[data-test=\"employerName\"]"],
    location: &["[data-test=\"location\"]", "[data-test=\"emp-location\"]"],
    description: &[
        "[data-test=\"jobDescriptionContent\"]",
        ".jobDescriptionContent",
    ],
    salary: &["[data-test=\"detailSalary\"]"],
    employment_type: &[],
};

/// Runs one board's selector table.
#[derive(Debug, Clone, Copy)]
pub struct SelectorExtractor {
    selectors: &'static BoardSelectors,
}

impl SelectorExtractor {
    pub fn new(selectors: &'static BoardSelectors) -> Self {
        Self { selectors }
    }
}

impl Extractor for SelectorExtractor {
    fn name(&self) -> &'static str {
        self.selectors.name
    }

    fn extract(&self, document: &Html) -> RawFields {
        let s = self.selectors;
        RawFields {
            title: select_text(document, s.title),
            company: select_text(document, s.company),
            location: select_text(document, s.location),
            description: select_text(document, s.description),
            salary_text: select_text(document, s.salary),
            salary: None,
            employment_type: select_text(document, s.employment_type),
        }
    }
}

/// Dedicated extractor for a board, if it has one.
pub fn board_extractor(board: BoardKind) -> Option<SelectorExtractor> {
    let selectors = match board {
        BoardKind::LinkedIn => &LINKEDIN,
        BoardKind::Indeed => &INDEED,
        BoardKind::Glassdoor => &GLASSDOOR,
        BoardKind::Generic => return None,
    };
    Some(SelectorExtractor::new(selectors))
}
