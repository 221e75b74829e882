// ABOUTME: Configuration options for htmlsift including ContentMode, Options, and ExtractorBuilder.
// ABOUTME: ExtractorBuilder provides a fluent API for constructing Extractor instances with custom settings.

use std::fmt;

use crate::extractor::Extractor;

/// How an element is rendered when a rule requests no attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Descendant text nodes concatenated, tags stripped.
    #[default]
    Text,
    /// Serialized outer HTML, including the element's own tag.
    Html,
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentMode::Text => "text",
            ContentMode::Html => "html",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for ContentMode {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "html" | "markup" => ContentMode::Html,
            _ => ContentMode::Text,
        }
    }
}

/// Configuration options for the extractor.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub content_mode: ContentMode,
    /// Trim surrounding whitespace from text-mode values.
    pub trim_text: bool,
    /// Reject html inputs larger than this many bytes.
    pub max_input_bytes: Option<usize>,
}

/// Builder for constructing Extractor instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ExtractorBuilder {
    opts: Options,
}

impl ExtractorBuilder {
    /// Create a new ExtractorBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the rendering used for rules without an attribute.
    pub fn content_mode(mut self, mode: ContentMode) -> Self {
        self.opts.content_mode = mode;
        self
    }

    /// Trim text-mode values.
    pub fn trim_text(mut self, trim: bool) -> Self {
        self.opts.trim_text = trim;
        self
    }

    /// Limit the size of accepted html inputs.
    pub fn max_input_bytes(mut self, limit: usize) -> Self {
        self.opts.max_input_bytes = Some(limit);
        self
    }

    /// Build the Extractor with the configured options.
    pub fn build(self) -> Extractor {
        Extractor::with_options(self.opts)
    }
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_mode_from_str() {
        assert_eq!(ContentMode::from("html"), ContentMode::Html);
        assert_eq!(ContentMode::from("Markup"), ContentMode::Html);
        assert_eq!(ContentMode::from("txt"), ContentMode::Text);
        assert_eq!(ContentMode::from("anything"), ContentMode::Text);
    }

    #[test]
    fn test_builder_sets_options() {
        let extractor = ExtractorBuilder::new()
            .content_mode(ContentMode::Html)
            .trim_text(true)
            .max_input_bytes(1024)
            .build();
        let opts = extractor.options();
        assert_eq!(opts.content_mode, ContentMode::Html);
        assert!(opts.trim_text);
        assert_eq!(opts.max_input_bytes, Some(1024));
    }

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert_eq!(opts.content_mode, ContentMode::Text);
        assert!(!opts.trim_text);
        assert!(opts.max_input_bytes.is_none());
    }
}
