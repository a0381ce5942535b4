// ABOUTME: Main library entry point for the gleaner HTML content-extraction pipeline.
// ABOUTME: Re-exports the public API: Loader, Document, Node, Selector, extraction, normalization, Pages.

//! gleaner - a generic HTML content-extraction pipeline.
//!
//! Four composable stages, each a pure transformation over an in-memory
//! parsed document: load (fetch or accept raw markup), select (CSS queries
//! in document order), extract (text, attributes, tables), and normalize
//! (an explicit rule-pipeline cleanup pass).
//!
//! # Example
//!
//! ```no_run
//! use gleaner::{Loader, Selector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gleaner::Error> {
//!     let loader = Loader::builder().build();
//!     let doc = loader.load("https://example.com/listing").await?;
//!
//!     let card = Selector::parse("div.card")?;
//!     let price = Selector::parse(".price")?;
//!     for record in doc.select_all(&card) {
//!         // Absent sub-fields are None, so records stay aligned.
//!         let value = record.select_first(&price).map(|n| gleaner::normalize(&n.text()));
//!         println!("{:?}", value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod loader;
pub mod normalize;
pub mod options;
pub mod pages;
pub mod selector;

pub use crate::document::{Document, Node};
pub use crate::error::{Error, ErrorCode, Result};
pub use crate::extract::{table, Extraction, Table};
pub use crate::loader::Loader;
pub use crate::normalize::{default_rules, normalize, normalize_with, Rule};
pub use crate::options::{LoaderBuilder, Options};
pub use crate::pages::{next_page_url, Pages};
pub use crate::selector::Selector;
