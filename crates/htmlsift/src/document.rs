// ABOUTME: Per-invocation HTML document wrapper around dom_query with fallible construction.
// ABOUTME: Handles byte decoding, selector compilation, and destructive element removal.

//! Document construction and preprocessing.
//!
//! Parsing goes through html5ever's error-recovering tree builder, so
//! malformed markup never fails. The only parse failure is the backend
//! giving up entirely, which is caught and reported as a Parse error.

use std::panic::{self, AssertUnwindSafe};

use dom_query::{Document, Matcher, Selection};

use crate::error::{ExtractError, Result};
use crate::rules::RemovalSpec;

/// An HTML document owned by a single extraction run.
pub struct ParsedDocument {
    doc: Document,
}

impl ParsedDocument {
    /// Builds a document from an HTML string.
    pub fn parse(html: &str) -> Result<Self> {
        let doc = panic::catch_unwind(AssertUnwindSafe(|| Document::from(html))).map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown backend failure".to_string());
            ExtractError::parse("could not build document", Some(anyhow::anyhow!(reason)))
        })?;
        Ok(Self { doc })
    }

    /// Removes every element matching a compiled removal selector.
    ///
    /// Runs a single query. Returns the number of elements removed.
    pub fn remove(&self, matcher: &Matcher) -> usize {
        let matched = self.doc.select_matcher(matcher);
        let count = matched.length();
        matched.remove();
        count
    }

    /// Selects all elements matching a compiled selector, in document order.
    pub fn select(&self, matcher: &Matcher) -> Selection<'_> {
        self.doc.select_matcher(matcher)
    }

    #[cfg(test)]
    fn html(&self) -> String {
        self.doc.html().to_string()
    }
}

/// Compiles a CSS selector for the query backend.
pub fn compile(css: &str) -> Result<Matcher> {
    Matcher::new(css).map_err(|e| {
        ExtractError::selector(
            format!("invalid CSS selector {:?}", css),
            Some(anyhow::anyhow!("{:?}", e)),
        )
    })
}

/// Compiles the union of a removal spec's selectors into one matcher.
///
/// Returns `None` when the spec is empty.
pub fn compile_removal(spec: &RemovalSpec) -> Result<Option<Matcher>> {
    let Some(combined) = spec.combined() else {
        return Ok(None);
    };
    let matcher = Matcher::new(&combined).map_err(|e| {
        ExtractError::selector(
            format!("invalid remove elements selector {:?}", combined),
            Some(anyhow::anyhow!("{:?}", e)),
        )
    })?;
    Ok(Some(matcher))
}

/// Decodes raw document bytes to a String.
///
/// A byte order mark wins; otherwise the encoding is guessed with chardetng.
pub fn decode_html(bytes: &[u8]) -> String {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    // decode() sniffs the BOM before falling back to the guessed encoding
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}
