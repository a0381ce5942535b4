// ABOUTME: Table extraction and the tagged Extraction result over the four extraction kinds.
// ABOUTME: table() fails with NoTable when a scope has no table descendant, never an empty grid.

//! Structured extraction results.
//!
//! Text, attribute, and attribute-map extraction live on [`crate::Node`];
//! this module adds table extraction and the [`Extraction`] enum that tags
//! all four kinds for callers (like the CLI) that handle them uniformly.

use serde::Serialize;

use crate::document::Node;
use crate::error::{Error, Result};
use crate::selector::Selector;

/// A table parsed into rows of cell strings.
///
/// The header row, when present, is the distinguished first row rather than
/// a separately typed value; callers slice by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One extracted value, tagged by extraction kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Extraction {
    Text(String),
    Attribute(Option<String>),
    Attributes(Vec<(String, String)>),
    Table(Table),
}

/// Collapse runs of whitespace inside a table cell into single spaces.
fn collapse_cell(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the first `<table>` under `node` as a row/column grid.
///
/// The node itself counts when it is a table; otherwise the first table
/// descendant in document order is used. Rows come from `tr` elements and
/// cells from `th`/`td`, in document order, with per-cell whitespace
/// collapsed. Fails with `NoTable` when the scope has no table at all.
///
/// Pages with several tables should pass a scoped node around the intended
/// one rather than the whole document.
pub fn table(node: &Node<'_>) -> Result<Table> {
    let table_sel = Selector::parse("table")?;
    let row_sel = Selector::parse("tr")?;
    let cell_sel = Selector::parse("th, td")?;

    let target = if node.tag_name() == "table" {
        *node
    } else {
        node.select_first(&table_sel)
            .ok_or_else(|| Error::no_table("Table"))?
    };

    let rows = target
        .select_within(&row_sel)
        .iter()
        .map(|tr| {
            tr.select_within(&cell_sel)
                .iter()
                .map(|cell| collapse_cell(&cell.text()))
                .collect()
        })
        .collect();

    Ok(Table { rows })
}
