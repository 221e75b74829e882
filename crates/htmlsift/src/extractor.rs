// ABOUTME: The Extractor: evaluates named CSS selector rules against one HTML document.
// ABOUTME: Handles removal preprocessing, attribute vs. content extraction, and single/multi shaping.

//! Selector-driven extraction.
//!
//! Key behaviors:
//! - Rules are validated and every selector compiled before any parsing happens.
//! - Removal selectors run once, as one combined query, before the first rule.
//! - Each rule collects one value per contributing element in document order.
//!   With an attribute, elements lacking it (or with an empty value) are skipped.
//! - `single_item` collapses the values to the first one, or `""` when none.
//! - `total_elements` counts contributing elements before that collapse.

use std::collections::BTreeMap;

use dom_query::Selection;
use serde::{Deserialize, Serialize};

use crate::document::{compile, compile_removal, ParsedDocument};
use crate::error::{ExtractError, Result};
use crate::options::{ContentMode, ExtractorBuilder, Options};
use crate::rules::{validate_rules, ExtractionRule, RemovalSpec};

/// The shaped value of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Single(String),
    Multiple(Vec<String>),
}

/// The result of running a rule set over one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    /// One entry per rule, keyed by rule name.
    pub results: BTreeMap<String, RuleValue>,
    /// Number of matched elements that contributed a value, across all rules.
    pub total_elements: usize,
    /// Number of rules evaluated.
    pub selectors: usize,
}

impl ExtractionOutcome {
    pub fn get(&self, name: &str) -> Option<&RuleValue> {
        self.results.get(name)
    }
}

/// Evaluates extraction rules against HTML documents.
///
/// Holds only configuration; every call parses its own document and drops it
/// before returning, so one extractor can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    opts: Options,
}

impl Extractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    pub(crate) fn with_options(opts: Options) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Runs `rules` over `html` after removing elements matching `remove_elements`.
    ///
    /// `remove_elements` is a comma-separated selector list; blank means no removal.
    pub fn extract(
        &self,
        html: &str,
        rules: &[ExtractionRule],
        remove_elements: &str,
    ) -> Result<ExtractionOutcome> {
        log::trace!(
            "enter: extract({} bytes, {} rule(s), {:?})",
            html.len(),
            rules.len(),
            remove_elements
        );

        validate_rules(rules)?;

        if let Some(limit) = self.opts.max_input_bytes {
            if html.len() > limit {
                return Err(ExtractError::validation(format!(
                    "html input is {} bytes, limit is {}",
                    html.len(),
                    limit
                )));
            }
        }

        let compiled = rules
            .iter()
            .map(|rule| compile(&rule.selector).map_err(|e| e.for_rule(&rule.name)))
            .collect::<Result<Vec<_>>>()?;

        let removal = RemovalSpec::parse(remove_elements);
        let removal_matcher = compile_removal(&removal)?;

        let doc = ParsedDocument::parse(html)?;
        if let Some(matcher) = &removal_matcher {
            let removed = doc.remove(matcher);
            log::debug!("removed {} element(s) matching {:?}", removed, removal.selectors());
        }

        let mut outcome = ExtractionOutcome {
            selectors: rules.len(),
            ..Default::default()
        };

        for (rule, matcher) in rules.iter().zip(&compiled) {
            let values = self.collect_values(doc.select(matcher), rule.attribute_name());
            log::debug!(
                "rule {:?} ({}) contributed {} value(s)",
                rule.name,
                rule.selector,
                values.len()
            );
            outcome.total_elements += values.len();
            outcome.results.insert(rule.name.clone(), shape(values, rule.single_item));
        }

        log::trace!(
            "exit: extract -> {} element(s) over {} rule(s)",
            outcome.total_elements,
            outcome.selectors
        );
        Ok(outcome)
    }

    /// Collects one value per contributing element, in document order.
    fn collect_values(&self, matched: Selection<'_>, attribute: Option<&str>) -> Vec<String> {
        matched
            .iter()
            .filter_map(|el| match attribute {
                Some(attr) => el
                    .attr(attr)
                    .map(|v| v.to_string())
                    .filter(|v| !v.is_empty()),
                None => Some(self.render(&el)),
            })
            .collect()
    }

    fn render(&self, el: &Selection<'_>) -> String {
        match self.opts.content_mode {
            ContentMode::Text => {
                let text = el.text();
                if self.opts.trim_text {
                    text.trim().to_string()
                } else {
                    text.to_string()
                }
            }
            ContentMode::Html => el.html().to_string(),
        }
    }
}

fn shape(values: Vec<String>, single_item: bool) -> RuleValue {
    if single_item {
        RuleValue::Single(values.into_iter().next().unwrap_or_default())
    } else {
        RuleValue::Multiple(values)
    }
}

/// Runs `rules` over `html` with a default [`Extractor`].
pub fn extract(
    html: &str,
    rules: &[ExtractionRule],
    remove_elements: &str,
) -> Result<ExtractionOutcome> {
    Extractor::new().extract(html, rules, remove_elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_HTML: &str = r#"
        <html>
        <head><title>Test Page</title></head>
        <body>
            <div class="container">
                <h1 class="title">Main Title</h1>
                <div class="content">
                    <p>First paragraph</p>
                    <p>Second paragraph</p>
                </div>
                <ul class="links">
                    <li><a href="/one">One</a></li>
                    <li><a href="">Empty</a></li>
                    <li><a>Missing</a></li>
                    <li><a href="/four">Four</a></li>
                </ul>
            </div>
        </body>
        </html>
    "#;

    fn single(s: &str) -> RuleValue {
        RuleValue::Single(s.to_string())
    }

    fn multiple(items: &[&str]) -> RuleValue {
        RuleValue::Multiple(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_mixed_rules_count_contributors() {
        let rules = vec![
            ExtractionRule::new("title", "h1.title").single(),
            ExtractionRule::new("paragraphs", "p"),
        ];
        let outcome = extract(SAMPLE_HTML, &rules, "").unwrap();
        assert_eq!(outcome.get("title"), Some(&single("Main Title")));
        assert_eq!(
            outcome.get("paragraphs"),
            Some(&multiple(&["First paragraph", "Second paragraph"]))
        );
        assert_eq!(outcome.total_elements, 3);
        assert_eq!(outcome.selectors, 2);
    }

    #[test]
    fn test_attribute_skips_missing_and_empty() {
        let rules = vec![ExtractionRule::new("hrefs", "ul.links a").with_attribute("href")];
        let outcome = extract(SAMPLE_HTML, &rules, "").unwrap();
        assert_eq!(outcome.get("hrefs"), Some(&multiple(&["/one", "/four"])));
        assert_eq!(outcome.total_elements, 2);
    }

    #[test]
    fn test_single_item_counts_all_contributors() {
        let rules = vec![ExtractionRule::new("first", "ul.links a")
            .with_attribute("href")
            .single()];
        let outcome = extract(SAMPLE_HTML, &rules, "").unwrap();
        assert_eq!(outcome.get("first"), Some(&single("/one")));
        assert_eq!(outcome.total_elements, 2);
    }

    #[test]
    fn test_no_match_shapes() {
        let rules = vec![
            ExtractionRule::new("one", ".does-not-exist").single(),
            ExtractionRule::new("many", ".does-not-exist"),
        ];
        let outcome = extract(SAMPLE_HTML, &rules, "").unwrap();
        assert_eq!(outcome.get("one"), Some(&single("")));
        assert_eq!(outcome.get("many"), Some(&multiple(&[])));
        assert_eq!(outcome.total_elements, 0);
        assert_eq!(outcome.selectors, 2);
    }

    #[test]
    fn test_text_mode_is_verbatim_by_default() {
        let rules = vec![ExtractionRule::new("content", "div.content").single()];
        let outcome = extract(SAMPLE_HTML, &rules, "").unwrap();
        let Some(RuleValue::Single(text)) = outcome.get("content") else {
            panic!("expected a single value");
        };
        assert!(text.starts_with('\n'));
        assert!(text.contains("First paragraph"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn test_trim_text_option() {
        let extractor = Extractor::builder().trim_text(true).build();
        let rules = vec![ExtractionRule::new("content", "div.content p").single()];
        let html = "<div class='content'><p>\n   padded  \n</p></div>";
        let outcome = extractor.extract(html, &rules, "").unwrap();
        assert_eq!(outcome.get("content"), Some(&single("padded")));
    }

    #[test]
    fn test_html_mode_returns_outer_markup() {
        let extractor = Extractor::builder().content_mode(ContentMode::Html).build();
        let rules = vec![ExtractionRule::new("title", "h1").single()];
        let outcome = extractor.extract(SAMPLE_HTML, &rules, "").unwrap();
        assert_eq!(
            outcome.get("title"),
            Some(&single(r#"<h1 class="title">Main Title</h1>"#))
        );
    }

    #[test]
    fn test_html_mode_does_not_affect_attributes() {
        let extractor = Extractor::builder().content_mode(ContentMode::Html).build();
        let rules = vec![ExtractionRule::new("cls", "h1").with_attribute("class").single()];
        let outcome = extractor.extract(SAMPLE_HTML, &rules, "").unwrap();
        assert_eq!(outcome.get("cls"), Some(&single("title")));
    }

    #[test]
    fn test_invalid_rule_selector_is_attributed() {
        let rules = vec![
            ExtractionRule::new("ok", "h1"),
            ExtractionRule::new("broken", "[[[invalid"),
        ];
        let err = extract(SAMPLE_HTML, &rules, "").unwrap_err();
        assert!(err.is_selector());
        assert_eq!(err.rule.as_deref(), Some("broken"));
    }

    #[test]
    fn test_input_limit() {
        let extractor = Extractor::builder().max_input_bytes(10).build();
        let rules = vec![ExtractionRule::new("title", "h1")];
        let err = extractor.extract(SAMPLE_HTML, &rules, "").unwrap_err();
        assert!(err.is_validation());

        let outcome = extractor.extract("<h1>ok</h1>", &rules, "").unwrap();
        assert_eq!(outcome.total_elements, 1);
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let rules = vec![
            ExtractionRule::new("title", "h1").single(),
            ExtractionRule::new("paragraphs", "p"),
        ];
        let outcome = extract(SAMPLE_HTML, &rules, "").unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "results": {
                    "title": "Main Title",
                    "paragraphs": ["First paragraph", "Second paragraph"]
                },
                "totalElements": 3,
                "selectors": 2
            })
        );
    }
}
