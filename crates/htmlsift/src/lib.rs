// ABOUTME: Main library entry point for htmlsift, a selector-driven HTML extractor.
// ABOUTME: Re-exports the public API: Extractor, ExtractionRule, ExtractionOutcome, ExtractError, Options.

//! htmlsift - extract structured data from HTML with named CSS selector rules.
//!
//! Elements matching an optional list of removal selectors are deleted first;
//! then each rule collects text, markup, or an attribute from its matches.
//!
//! # Example
//!
//! ```
//! use htmlsift::{ExtractionRule, Extractor, RuleValue};
//!
//! let html = r#"<h1 class="title">Main Title</h1><script>track()</script>"#;
//! let rules = vec![
//!     ExtractionRule::new("title", "h1").single(),
//!     ExtractionRule::new("classes", "h1").with_attribute("class"),
//! ];
//!
//! let outcome = Extractor::new().extract(html, &rules, "script").unwrap();
//! assert_eq!(outcome.get("title"), Some(&RuleValue::Single("Main Title".into())));
//! assert_eq!(outcome.total_elements, 2);
//! ```

pub mod document;
pub mod error;
pub mod extractor;
pub mod options;
pub mod records;
pub mod rules;

pub use crate::error::{ErrorCode, ExtractError, Result};
pub use crate::extractor::{extract, ExtractionOutcome, Extractor, RuleValue};
pub use crate::options::{ContentMode, ExtractorBuilder, Options};
pub use crate::records::{parse_records, run_records, FailurePolicy, InputRecord, OutputRecord};
pub use crate::rules::{validate_rules, ExtractionRule, RemovalSpec};
