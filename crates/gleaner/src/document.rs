// ABOUTME: Document and Node handles over a parsed HTML tree with scoped CSS selection.
// ABOUTME: select_all/select_first return document-order matches; zero matches is never an error.

//! Parsed document handles.
//!
//! A [`Document`] owns the parsed HTML tree for one resource. A [`Node`] is a
//! cheap borrowed handle into that tree, valid for the document's lifetime.
//! Nodes are never mutated; every operation derives a new value.
//!
//! `select_first` returns `Option<Node>` rather than erroring on zero
//! matches, so batch extraction over repeated sibling structures with
//! inconsistent shapes stays aligned: a missing sub-field in one record is
//! `None` for that record, not a failure of the whole batch.

use scraper::{ElementRef, Html};

use crate::error::{Error, Result};
use crate::selector::Selector;

/// Returns true when the input contains at least one tag-like construct:
/// `<` followed by an ASCII letter, `/`, or `!`.
///
/// html5ever recovers from arbitrarily malformed markup, so "unparseable"
/// has to be judged up front: input with no tag at all (plain prose, JSON,
/// binary junk) is not HTML.
fn looks_like_html(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.windows(2).any(|w| {
        w[0] == b'<' && (w[1].is_ascii_alphabetic() || w[1] == b'/' || w[1] == b'!')
    })
}

/// An immutable parsed representation of one HTML resource.
#[derive(Debug)]
pub struct Document {
    html: Html,
    url: Option<String>,
}

impl Document {
    /// Parse raw markup into a Document.
    ///
    /// Malformed HTML still parses; the underlying parser recovers rather
    /// than rejecting. Fails with a `Parse` error only for input that is
    /// fundamentally not HTML (empty, or containing no tag-like construct).
    pub fn parse(markup: &str) -> Result<Self> {
        if !looks_like_html(markup) {
            return Err(Error::parse(
                preview(markup),
                "DocumentParse",
                Some(anyhow::anyhow!("input contains no HTML tags")),
            ));
        }
        Ok(Self {
            html: Html::parse_document(markup),
            url: None,
        })
    }

    /// Parse raw markup, recording the URL it came from.
    ///
    /// Used when markup was obtained out of band (a saved file, a cached
    /// body) so that relative links still resolve against the original
    /// location.
    pub fn parse_with_url(markup: &str, url: &str) -> Result<Self> {
        let mut doc = Self::parse(markup)?;
        doc.url = Some(url.to_string());
        Ok(doc)
    }

    /// The URL this document came from, when fetched by the loader or
    /// supplied via [`Document::parse_with_url`].
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The root `<html>` element.
    pub fn root(&self) -> Node<'_> {
        Node {
            el: self.html.root_element(),
        }
    }

    /// Every element matching `selector`, in document order.
    ///
    /// An empty result is a valid, non-error outcome.
    pub fn select_all(&self, selector: &Selector) -> Vec<Node<'_>> {
        self.html
            .select(selector.inner())
            .map(|el| Node { el })
            .collect()
    }

    /// The first element matching `selector`, or `None` when nothing matches.
    pub fn select_first(&self, selector: &Selector) -> Option<Node<'_>> {
        self.html
            .select(selector.inner())
            .next()
            .map(|el| Node { el })
    }
}

/// Truncated copy of the input used as the subject of parse errors.
fn preview(input: &str) -> String {
    const MAX: usize = 40;
    let trimmed = input.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}

/// A borrowed handle to one element within a [`Document`]'s tree.
#[derive(Debug, Clone, Copy)]
pub struct Node<'doc> {
    el: ElementRef<'doc>,
}

impl<'doc> Node<'doc> {
    /// Every descendant element matching `selector`, in document order.
    ///
    /// Scoped strictly to descendants of this node, so a repeated structural
    /// pattern (one card/record per sibling) can be iterated while
    /// independently selecting a possibly-absent sub-field per record.
    pub fn select_within(&self, selector: &Selector) -> Vec<Node<'doc>> {
        self.el
            .select(selector.inner())
            .map(|el| Node { el })
            .collect()
    }

    /// The first descendant matching `selector`, or `None` when nothing matches.
    pub fn select_first(&self, selector: &Selector) -> Option<Node<'doc>> {
        self.el.select(selector.inner()).next().map(|el| Node { el })
    }

    /// Concatenation of all descendant text content, preserving document
    /// order and the raw newline characters the parser emits.
    ///
    /// No whitespace cleanup happens here; normalization is a separate,
    /// explicit pass (see [`crate::normalize`]).
    pub fn text(&self) -> String {
        self.el.text().collect()
    }

    /// The value of a single named attribute, or `None` when absent.
    pub fn attribute(&self, name: &str) -> Option<&'doc str> {
        self.el.value().attr(name)
    }

    /// All attributes as name/value pairs in source document order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.el
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    /// The lowercase tag name of this element.
    pub fn tag_name(&self) -> &'doc str {
        self.el.value().name()
    }
}
