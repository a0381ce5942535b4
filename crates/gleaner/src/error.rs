// ABOUTME: Error types for the gleaner pipeline including ErrorCode enum and Error struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of extraction failures.
///
/// Absence of a match or attribute is never an error; those operations
/// return `Option::None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Timeout,
    Parse,
    Selector,
    Pattern,
    NoTable,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Parse => "parse error",
            ErrorCode::Selector => "invalid selector",
            ErrorCode::Pattern => "invalid pattern",
            ErrorCode::NoTable => "no table found",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for loader and extraction operations.
///
/// `subject` describes what the operation was acting on: a URL for fetch
/// failures, a selector or pattern string for compile failures, empty for
/// tree-local failures like `NoTable`.
#[derive(Debug, thiserror::Error)]
pub struct Error {
    pub code: ErrorCode,
    pub subject: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gleaner: {} {}: {}", self.op, self.subject, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            subject: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Fetch,
            subject: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Timeout,
            subject: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Parse error.
    pub fn parse(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Parse,
            subject: subject.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Selector error.
    pub fn selector(
        css: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Selector,
            subject: css.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Pattern error.
    pub fn pattern(
        pattern: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Pattern,
            subject: pattern.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a NoTable error.
    pub fn no_table(op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NoTable,
            subject: String::new(),
            op: op.into(),
            source: None,
        }
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is a Selector error.
    pub fn is_selector(&self) -> bool {
        self.code == ErrorCode::Selector
    }

    /// Returns true if this is a Pattern error.
    pub fn is_pattern(&self) -> bool {
        self.code == ErrorCode::Pattern
    }

    /// Returns true if this is a NoTable error.
    pub fn is_no_table(&self) -> bool {
        self.code == ErrorCode::NoTable
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_subject_and_code() {
        let err = Error::fetch(
            "https://example.com/a",
            "Load",
            Some(anyhow::anyhow!("connection refused")),
        );
        let s = err.to_string();
        assert!(s.contains("Load"));
        assert!(s.contains("https://example.com/a"));
        assert!(s.contains("fetch error"));
        assert!(s.contains("connection refused"));
    }

    #[test]
    fn predicates_match_codes() {
        assert!(Error::no_table("Table").is_no_table());
        assert!(Error::timeout("u", "Load", None).is_timeout());
        assert!(Error::selector("[[[", "Parse", None).is_selector());
        assert!(!Error::parse("x", "Parse", None).is_fetch());
    }
}
