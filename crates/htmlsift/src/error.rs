// ABOUTME: Error types for htmlsift including the ErrorCode enum and ExtractError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Validation,
    Parse,
    Selector,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Validation => "validation error",
            ErrorCode::Parse => "parse error",
            ErrorCode::Selector => "selector error",
        };
        write!(f, "{}", s)
    }
}

/// The error type for extraction operations.
///
/// Every failure is reported with the `HTML parsing failed:` prefix so callers
/// substituting an error record get a message that names the underlying cause.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    /// Name of the rule the failure is attributed to, if any.
    pub rule: Option<String>,
    pub message: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTML parsing failed: {}", self.message)?;
        if let Some(ref rule) = self.rule {
            write!(f, " (rule \"{}\")", rule)?;
        }
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    /// Create a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Validation,
            rule: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a Parse error wrapping the backend failure.
    pub fn parse(message: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Parse,
            rule: None,
            message: message.into(),
            source,
        }
    }

    /// Create a Selector error.
    pub fn selector(message: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Selector,
            rule: None,
            message: message.into(),
            source,
        }
    }

    /// Attribute this error to a named rule.
    pub fn for_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Returns true if this is a Validation error.
    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::Validation
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is a Selector error.
    pub fn is_selector(&self) -> bool {
        self.code == ErrorCode::Selector
    }
}

/// Result alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
