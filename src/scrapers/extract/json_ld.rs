//! schema.org `JobPosting` extraction from JSON-LD blocks.

use scraper::Html;
use serde_json::Value;
use tracing::debug;

use super::dom::{json_ld_blocks, strip_html};
use super::{Extractor, RawFields, StructuredSalary};
use crate::services::normalize::clean_text;

/// Extracts fields from the first `JobPosting` object on the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdExtractor;

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json-ld"
    }

    fn extract(&self, document: &Html) -> RawFields {
        match find_job_posting(document) {
            Some(posting) => fields_from_posting(&posting),
            None => RawFields::default(),
        }
    }
}

/// First `JobPosting` across all JSON-LD blocks.
///
/// Blocks may hold a bare object, an array of objects, or an object with a
/// `@graph` array. Blocks that fail to parse are skipped.
pub fn find_job_posting(document: &Html) -> Option<Value> {
    for block in json_ld_blocks(document) {
        let value: Value = match serde_json::from_str(block.trim()) {
            Ok(value) => value,
            Err(e) => {
                debug!("Skipping unparseable JSON-LD block: {}", e);
                continue;
            }
        };

        let mut objects = Vec::new();
        flatten(value, &mut objects);
        if let Some(posting) = objects.into_iter().find(is_job_posting) {
            return Some(posting);
        }
    }
    None
}

fn flatten(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten(graph, out);
            }
            out.push(Value::Object(map));
        }
        _ => {}
    }
}

fn is_job_posting(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => is_job_posting_type(t),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(is_job_posting_type),
        _ => false,
    }
}

fn is_job_posting_type(t: &str) -> bool {
    t.rsplit('/').next().is_some_and(|t| t == "JobPosting")
}

fn fields_from_posting(posting: &Value) -> RawFields {
    RawFields {
        title: string_field(posting.get("title")),
        company: organization_name(posting.get("hiringOrganization")),
        location: location(posting),
        description: posting
            .get("description")
            .and_then(Value::as_str)
            .map(strip_html)
            .filter(|s| !s.is_empty()),
        salary_text: None,
        salary: base_salary(posting.get("baseSalary")),
        employment_type: employment_type(posting.get("employmentType")),
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(|s| clean_text(Some(s)))
        .filter(|s| !s.is_empty())
}

fn organization_name(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(_) => string_field(value),
        Value::Object(_) => string_field(value?.get("name")),
        Value::Array(items) => items.iter().find_map(|item| organization_name(Some(item))),
        _ => None,
    }
}

fn employment_type(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Array(items) => items.iter().find_map(|item| string_field(Some(item))),
        other => string_field(Some(other)),
    }
}

fn location(posting: &Value) -> Option<String> {
    let from_address = match posting.get("jobLocation") {
        Some(Value::Array(places)) => places.iter().find_map(place_text),
        Some(place) => place_text(place),
        None => None,
    };

    from_address.or_else(|| is_telecommute(posting).then(|| "Remote".to_string()))
}

fn place_text(place: &Value) -> Option<String> {
    let address = place.get("address").unwrap_or(place);
    if let Value::String(_) = address {
        return string_field(Some(address));
    }

    let country = match address.get("addressCountry") {
        Some(Value::Object(_)) => string_field(address.get("addressCountry")?.get("name")),
        other => string_field(other),
    };

    let parts: Vec<String> = [
        string_field(address.get("addressLocality")),
        string_field(address.get("addressRegion")),
        country,
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn is_telecommute(posting: &Value) -> bool {
    let matches = |v: &Value| v.as_str().is_some_and(|s| s.eq_ignore_ascii_case("TELECOMMUTE"));
    match posting.get("jobLocationType") {
        Some(Value::Array(items)) => items.iter().any(matches),
        Some(v) => matches(v),
        None => false,
    }
}

fn base_salary(value: Option<&Value>) -> Option<StructuredSalary> {
    let salary = value?;
    let currency = string_field(salary.get("currency"));

    let (min, max) = match salary.get("value") {
        Some(Value::Object(_)) => {
            let inner = salary.get("value")?;
            match number(inner.get("value")) {
                Some(exact) => (Some(exact), Some(exact)),
                None => (number(inner.get("minValue")), number(inner.get("maxValue"))),
            }
        }
        Some(exact) => {
            let exact = number(Some(exact));
            (exact, exact)
        }
        None => (number(salary.get("minValue")), number(salary.get("maxValue"))),
    };

    let salary = StructuredSalary { min, max, currency };
    (!salary.is_empty()).then_some(salary)
}

/// A JSON number or a numeric string such as `"120000"` or `"120,000.00"`.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><head><script type="application/ld+json">{}</script></head><body></body></html>"#,
            json
        ))
    }

    const POSTING: &str = r#"{
        "@context": "https://schema.org",
        "@type": "JobPosting",
        "title": "Platform Engineer",
        "description": "<p>Run the <strong>platform</strong>.</p>",
        "hiringOrganization": {"@type": "Organization", "name": "Acme"},
        "employmentType": ["FULL_TIME", "CONTRACTOR"],
        "jobLocation": {"@type": "Place", "address": {
            "addressLocality": "Denver", "addressRegion": "CO", "addressCountry": "US"}},
        "baseSalary": {"@type": "MonetaryAmount", "currency": "USD",
            "value": {"@type": "QuantitativeValue", "minValue": 120000, "maxValue": "150000"}}
    }"#;

    fn assert_posting(fields: &RawFields) {
        assert_eq!(fields.title.as_deref(), Some("Platform Engineer"));
        assert_eq!(fields.company.as_deref(), Some("Acme"));
        assert_eq!(fields.description.as_deref(), Some("Run the platform."));
        assert_eq!(fields.employment_type.as_deref(), Some("FULL_TIME"));
        assert_eq!(fields.location.as_deref(), Some("Denver, CO, US"));
        assert_eq!(
            fields.salary,
            Some(StructuredSalary {
                min: Some(120000.0),
                max: Some(150000.0),
                currency: Some("USD".to_string()),
            })
        );
    }

    #[test]
    fn test_bare_object() {
        assert_posting(&JsonLdExtractor.extract(&page(POSTING)));
    }

    #[test]
    fn test_array_of_objects() {
        let json = format!(r#"[{{"@type": "BreadcrumbList"}}, {}]"#, POSTING);
        assert_posting(&JsonLdExtractor.extract(&page(&json)));
    }

    #[test]
    fn test_graph_wrapped() {
        let json = format!(
            r#"{{"@context": "https://schema.org", "@graph": [{{"@type": "WebPage"}}, {}]}}"#,
            POSTING
        );
        assert_posting(&JsonLdExtractor.extract(&page(&json)));
    }

    #[test]
    fn test_type_array_and_string_organization() {
        let fields = JsonLdExtractor.extract(&page(
            r#"{"@type": ["Thing", "JobPosting"], "title": "Nurse",
                "hiringOrganization": "General Hospital",
                "jobLocationType": "TELECOMMUTE",
                "baseSalary": {"currency": "EUR", "value": 50000}}"#,
        ));
        assert_eq!(fields.title.as_deref(), Some("Nurse"));
        assert_eq!(fields.company.as_deref(), Some("General Hospital"));
        assert_eq!(fields.location.as_deref(), Some("Remote"));
        let salary = fields.salary.unwrap();
        assert_eq!(salary.min, Some(50000.0));
        assert_eq!(salary.max, Some(50000.0));
        assert_eq!(salary.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_invalid_block_is_skipped() {
        let doc = Html::parse_document(
            r#"<html><head>
                <script type="application/ld+json">{not json</script>
                <script type="application/ld+json">{"@type": "JobPosting", "title": "Chef"}</script>
            </head></html>"#,
        );
        assert_eq!(JsonLdExtractor.extract(&doc).title.as_deref(), Some("Chef"));
    }

    #[test]
    fn test_no_job_posting() {
        let fields = JsonLdExtractor.extract(&page(r#"{"@type": "Organization", "name": "Acme"}"#));
        assert!(fields.is_empty());
    }
}
