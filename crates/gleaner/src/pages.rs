// ABOUTME: Finite lazy sequence of documents produced by following next-page links.
// ABOUTME: End of pagination is a normal Ok(None), never a caught error.

//! Pagination as an explicit lazy sequence.
//!
//! A [`Pages`] walk starts at one URL and follows next-page links one fetch
//! at a time. "No more pages" is the normal end-of-sequence signal
//! (`Ok(None)`); fetch or parse failures on a page propagate as errors for
//! that call without poisoning the walk state. A visited-URL set and the
//! loader's `max_pages` bound make every walk finite even on pages whose
//! next links cycle.

use std::collections::HashSet;

use crate::document::Document;
use crate::error::Result;
use crate::loader::Loader;
use crate::selector::Selector;

/// Next-link selector/attribute pairs, in priority order.
const NEXT_PAGE_SELECTORS: &[(&str, &str)] = &[
    ("link[rel='next']", "href"),
    (".next a[href]", "href"),
    (".pagination a[rel='next'][href]", "href"),
];

/// Find the next-page URL in a document, resolved against the document's own
/// URL when the link is relative.
pub fn next_page_url(doc: &Document) -> Option<String> {
    for (css, attr) in NEXT_PAGE_SELECTORS {
        if let Ok(sel) = Selector::parse(css) {
            if let Some(node) = doc.select_first(&sel) {
                if let Some(raw) = node.attribute(attr) {
                    let raw = raw.trim();
                    if raw.is_empty() {
                        continue;
                    }
                    return Some(resolve(doc.url(), raw));
                }
            }
        }
    }
    None
}

/// Resolve `link` against `base` when possible, else return it verbatim.
fn resolve(base: Option<&str>, link: &str) -> String {
    if let Some(base) = base {
        if let Ok(base_url) = url::Url::parse(base) {
            if let Ok(joined) = base_url.join(link) {
                return joined.to_string();
            }
        }
    }
    link.to_string()
}

/// A restartable, finite lazy sequence of documents.
pub struct Pages<'a> {
    loader: &'a Loader,
    next: Option<String>,
    seen: HashSet<String>,
    remaining: usize,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(loader: &'a Loader, start_url: &str, max_pages: usize) -> Self {
        Self {
            loader,
            next: Some(start_url.to_string()),
            seen: HashSet::new(),
            remaining: max_pages,
        }
    }

    /// Fetch and yield the next document, or `Ok(None)` when the sequence
    /// has ended.
    ///
    /// The sequence ends when the current page carries no next link, when
    /// the next link points at an already-visited URL, or when the
    /// `max_pages` bound is exhausted. A failed load leaves the sequence
    /// positioned at the same URL, so the call may be retried.
    pub async fn try_next(&mut self) -> Result<Option<Document>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let url = match self.next.take() {
            Some(url) => url,
            None => return Ok(None),
        };

        let doc = match self.loader.load(&url).await {
            Ok(doc) => doc,
            Err(e) => {
                self.next = Some(url);
                return Err(e);
            }
        };
        self.remaining -= 1;
        self.seen.insert(url);
        if let Some(final_url) = doc.url() {
            self.seen.insert(final_url.to_string());
        }

        self.next = next_page_url(&doc).filter(|candidate| !self.seen.contains(candidate));

        Ok(Some(doc))
    }
}
