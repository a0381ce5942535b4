// ABOUTME: Selector type wrapping a compiled CSS selector with a process-wide compile cache.
// ABOUTME: Invalid selector syntax fails at construction instead of silently matching nothing.

//! CSS selector compilation and caching.
//!
//! Selector parsing is expensive relative to the actual DOM matching, so
//! compiled selectors are cached process-wide and reused. A `Selector` is
//! stateless and reusable across any number of documents.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};

/// Thread-safe cache of compiled CSS selectors.
///
/// Uses a RwLock for read-heavy workloads: most accesses are cache hits
/// (reads), with occasional cache misses requiring writes. Invalid selectors
/// are cached as `None` so repeated failures stay cheap.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<scraper::Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
fn get_or_compile(css: &str) -> Option<scraper::Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = scraper::Selector::parse(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    // Double-check after acquiring the write lock (another thread may have inserted).
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// A compiled CSS selector expression.
///
/// Supports the CSS selector syntax of the underlying `scraper` engine:
/// tag names, `#id`, `.class`, combinators, `:nth-child()`, attribute
/// selectors, and so on.
#[derive(Debug, Clone)]
pub struct Selector {
    css: String,
    inner: scraper::Selector,
}

impl Selector {
    /// Compile a CSS selector string.
    ///
    /// Returns a `Selector` error when the expression is not valid CSS
    /// selector syntax. Compilation results are cached, so reparsing the
    /// same string is cheap.
    pub fn parse(css: &str) -> Result<Self> {
        match get_or_compile(css) {
            Some(inner) => Ok(Self {
                css: css.to_string(),
                inner,
            }),
            None => Err(Error::selector(
                css,
                "SelectorParse",
                Some(anyhow::anyhow!("invalid CSS selector syntax")),
            )),
        }
    }

    /// The original selector expression.
    pub fn as_str(&self) -> &str {
        &self.css
    }

    pub(crate) fn inner(&self) -> &scraper::Selector {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_selector() {
        let sel = Selector::parse("div.card > a[href]").expect("valid selector");
        assert_eq!(sel.as_str(), "div.card > a[href]");
    }

    #[test]
    fn parse_invalid_selector_errors() {
        let err = Selector::parse("[[[invalid").expect_err("should fail");
        assert!(err.is_selector());
    }

    #[test]
    fn parse_invalid_selector_errors_on_repeat_lookup() {
        // Cached-as-invalid entries must still surface the error.
        assert!(Selector::parse("<<<").is_err());
        assert!(Selector::parse("<<<").is_err());
    }

    #[test]
    fn cache_returns_equivalent_selector() {
        let a = Selector::parse("p.intro").unwrap();
        let b = Selector::parse("p.intro").unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }
}
