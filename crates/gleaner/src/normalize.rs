// ABOUTME: Rule-pipeline text normalizer producing display-ready strings from raw extracted text.
// ABOUTME: Default rules strip newlines, footnote carets, and quotes, then collapse and trim whitespace.

//! Text normalization.
//!
//! Extraction returns raw text verbatim; this module is the separate,
//! explicit cleanup pass. A rule set is an ordered sequence of
//! pattern/replacement pairs applied front to back, each rule operating on
//! the output of the previous one. Callers may supply their own rules;
//! [`default_rules`] covers the common display case.
//!
//! Rules only ever target ASCII punctuation and whitespace. Multi-byte
//! characters pass through unaltered.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// One normalization rule: a regex pattern and its replacement.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    /// Compile a rule from a regex pattern and replacement string.
    ///
    /// Fails with a `Pattern` error when the regex does not compile.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            Error::pattern(pattern, "RuleNew", Some(anyhow::anyhow!("{}", e)))
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
        })
    }

    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(input, self.replacement.as_str())
    }
}

// ASCII whitespace only; `\s` would also swallow non-ASCII spaces like U+00A0.
const ASCII_WS: &str = r"[ \t\r\n\x0B\x0C]";

/// The default rule set, applied in this fixed order:
/// 1. newline -> space
/// 2. `^` (footnote-marker artifact) -> space
/// 3. `"` -> space
/// 4. collapse runs of ASCII whitespace -> single space
/// 5. trim leading/trailing ASCII whitespace
pub static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(r"\n", " ").unwrap(),
        Rule::new(r"\^", " ").unwrap(),
        Rule::new("\"", " ").unwrap(),
        Rule::new(&format!("{}+", ASCII_WS), " ").unwrap(),
        Rule::new(&format!("^{0}+|{0}+$", ASCII_WS), "").unwrap(),
    ]
});

/// The default rule set.
pub fn default_rules() -> &'static [Rule] {
    &DEFAULT_RULES
}

/// Normalize raw text with the default rule set.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, default_rules())
}

/// Normalize raw text with a caller-supplied ordered rule set.
///
/// Later rules operate on the output of earlier ones; order matters.
pub fn normalize_with(raw: &str, rules: &[Rule]) -> String {
    let mut text = Cow::Borrowed(raw);
    for rule in rules {
        text = Cow::Owned(rule.apply(&text).into_owned());
    }
    text.into_owned()
}
