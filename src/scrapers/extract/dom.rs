//! Small DOM helpers shared by the extractors.

use scraper::{ElementRef, Html, Node, Selector};

use crate::services::normalize::clean_text;

/// Elements that break words apart when their text is flattened.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "ol", "p", "section", "table", "td",
    "th", "tr", "ul",
];

/// Visible text of an element with whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if BLOCK_TAGS.contains(&el.name()) => raw.push(' '),
            _ => {}
        }
    }
    clean_text(Some(&raw))
}

/// Text of the first element matching any selector, tried in order.
///
/// Selectors that fail to parse and matches with empty text are skipped.
pub fn select_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

/// Attribute of the first element matching `css` that carries it.
pub fn select_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(String::from)
}

/// `content` of a `<meta>` tag keyed by `name` or `property`.
pub fn meta_content(document: &Html, key: &str) -> Option<String> {
    select_attr(document, &format!("meta[property=\"{}\"]", key), "content")
        .or_else(|| select_attr(document, &format!("meta[name=\"{}\"]", key), "content"))
        .map(|v| clean_text(Some(&v)))
        .filter(|v| !v.is_empty())
}

/// Raw contents of every `<script type="application/ld+json">` block.
pub fn json_ld_blocks(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("script[type='application/ld+json']") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Text content of an HTML fragment.
///
/// Runs a second pass when the first one reveals entity-escaped markup
/// (`&lt;p&gt;...`), which some sites embed in JSON-LD descriptions.
pub fn strip_html(fragment: &str) -> String {
    let mut text = fragment_text(fragment);
    if text.contains('<') && text.contains('>') {
        text = fragment_text(&text);
    }
    text
}

fn fragment_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    element_text(parsed.root_element())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_text_falls_through_selectors() {
        let doc = Html::parse_document(
            r#"<html><body><h2 class="a">  </h2><h2 class="b">Hello
                <em>world</em></h2></body></html>"#,
        );
        assert_eq!(
            select_text(&doc, &["h1", "h2.a", "h2.b"]),
            Some("Hello world".to_string())
        );
        assert_eq!(select_text(&doc, &["h1", "[[bad"]), None);
    }

    #[test]
    fn test_meta_content_by_property_or_name() {
        let doc = Html::parse_document(
            r#"<html><head>
                <meta property="og:title" content=" Senior Engineer ">
                <meta name="description" content="Build things">
            </head></html>"#,
        );
        assert_eq!(
            meta_content(&doc, "og:title"),
            Some("Senior Engineer".to_string())
        );
        assert_eq!(
            meta_content(&doc, "description"),
            Some("Build things".to_string())
        );
        assert_eq!(meta_content(&doc, "og:site_name"), None);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Build <b>great</b> things.</p><ul><li>Rust</li></ul>"),
            "Build great things. Rust"
        );
        assert_eq!(
            strip_html("&lt;p&gt;Escaped &amp;amp; nested&lt;/p&gt;"),
            "Escaped & nested"
        );
        assert_eq!(strip_html("plain text"), "plain text");
    }
}
