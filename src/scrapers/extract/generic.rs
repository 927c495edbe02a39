//! Structure-agnostic extraction for arbitrary careers pages.

use scraper::Html;
use tracing::debug;

use super::dom::{meta_content, select_text};
use super::{Extractor, JsonLdExtractor, RawFields};

/// Open Graph and standard meta tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGraphExtractor;

impl Extractor for OpenGraphExtractor {
    fn name(&self) -> &'static str {
        "open-graph"
    }

    fn extract(&self, document: &Html) -> RawFields {
        RawFields {
            title: meta_content(document, "og:title"),
            company: meta_content(document, "og:site_name"),
            description: meta_content(document, "og:description")
                .or_else(|| meta_content(document, "description")),
            ..Default::default()
        }
    }
}

/// Last resort: first `<h1>` and the main content block.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl Extractor for HeuristicExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn extract(&self, document: &Html) -> RawFields {
        RawFields {
            title: select_text(document, &["h1"]),
            description: select_text(document, &["article"])
                .or_else(|| select_text(document, &["main"])),
            ..Default::default()
        }
    }
}

/// JSON-LD, then Open Graph, then heuristics; stops at the first title.
///
/// Fields found by earlier strategies fill gaps in the winning one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericExtractor;

impl GenericExtractor {
    fn strategies() -> [&'static dyn Extractor; 3] {
        [&JsonLdExtractor, &OpenGraphExtractor, &HeuristicExtractor]
    }
}

impl Extractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn extract(&self, document: &Html) -> RawFields {
        let mut leftovers = RawFields::default();

        for strategy in Self::strategies() {
            let fields = strategy.extract(document);
            debug!(
                "{} strategy set [{}]",
                strategy.name(),
                fields.set_fields().join(", ")
            );
            if fields.has_title() {
                return fields.fill_gaps(leftovers);
            }
            leftovers = leftovers.fill_gaps(fields);
        }

        debug!("No generic strategy found a title");
        leftovers
    }
}
