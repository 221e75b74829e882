// ABOUTME: Extraction rule and removal spec data models with boundary validation.
// ABOUTME: Rules are immutable value structs deserialized from caller configuration.

//! Rule definitions for selector-driven extraction.
//!
//! An [`ExtractionRule`] names a CSS selector, an optional attribute to read,
//! and whether only the first contributing value is kept. A [`RemovalSpec`]
//! is the normalized form of a comma-separated list of selectors whose
//! elements are deleted before any rule runs.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// A named selector describing what to extract and how to shape the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRule {
    /// Key under which the rule's value appears in the outcome.
    pub name: String,
    /// CSS selector matched against the document.
    pub selector: String,
    /// Attribute to read instead of the element's rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Keep only the first contributing value.
    #[serde(default)]
    pub single_item: bool,
}

impl ExtractionRule {
    /// Creates a multi-value rule without an attribute.
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            attribute: None,
            single_item: false,
        }
    }

    /// Reads `attribute` from each match instead of its rendering.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Collapses the result to the first contributing value.
    pub fn single(mut self) -> Self {
        self.single_item = true;
        self
    }

    /// The attribute to read, if one is set and non-empty.
    ///
    /// The name is used verbatim; a padded or whitespace-only name matches
    /// no real attribute, so every element is skipped.
    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute.as_deref().filter(|a| !a.is_empty())
    }
}

/// Parses the ad-hoc `NAME=SELECTOR[@ATTRIBUTE]` form.
///
/// The attribute suffix is only recognized when it looks like an attribute
/// name, so selectors such as `a[href^="mailto:x@y"]` are left intact.
impl FromStr for ExtractionRule {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, rest) = s.split_once('=').ok_or_else(|| {
            ExtractError::validation(format!(
                "rule {:?} must have the form NAME=SELECTOR[@ATTRIBUTE]",
                s
            ))
        })?;

        let rule = match rest.rsplit_once('@') {
            Some((selector, attr)) if is_attribute_name(attr) => {
                ExtractionRule::new(name.trim(), selector.trim()).with_attribute(attr)
            }
            _ => ExtractionRule::new(name.trim(), rest.trim()),
        };
        Ok(rule)
    }
}

fn is_attribute_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

/// Validates a rule list at the boundary.
///
/// Fails when the list is empty, when a rule has a blank name or selector,
/// or when two rules share a name.
pub fn validate_rules(rules: &[ExtractionRule]) -> Result<()> {
    if rules.is_empty() {
        return Err(ExtractError::validation("at least one selector is required"));
    }

    let mut seen = HashSet::with_capacity(rules.len());
    for (idx, rule) in rules.iter().enumerate() {
        if rule.name.trim().is_empty() {
            return Err(ExtractError::validation(format!(
                "selector #{} has an empty name",
                idx + 1
            )));
        }
        if rule.selector.trim().is_empty() {
            return Err(ExtractError::validation("CSS selector is required").for_rule(&rule.name));
        }
        if !seen.insert(rule.name.as_str()) {
            return Err(ExtractError::validation("duplicate selector name").for_rule(&rule.name));
        }
    }
    Ok(())
}

/// Normalized list of selectors whose elements are removed before extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemovalSpec {
    selectors: Vec<String>,
}

impl RemovalSpec {
    /// Splits a comma-separated selector list, trimming and dropping blanks.
    pub fn parse(raw: &str) -> Self {
        let selectors = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { selectors }
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// The union of all selectors as one CSS selector list, or `None` when empty.
    pub fn combined(&self) -> Option<String> {
        if self.selectors.is_empty() {
            None
        } else {
            Some(self.selectors.join(", "))
        }
    }
}
