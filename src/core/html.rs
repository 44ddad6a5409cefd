// src/core/html.rs
//! Parsed-document layer.
//!
//! Page specs never touch the HTML backend directly; they go through
//! [`Document`], [`Table`] and [`Row`], plus the [`LabelLookup`] trait for
//! "label → value" fields. Swapping `scraper` for another parser only touches
//! this file.
//!
//! Table location is heuristic on purpose: the registry's column set and order
//! drift, so a table is accepted when its header text *contains* every
//! required token, and columns are found by substring rather than position.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use super::sanitize::normalize_ws;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static TR: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static TH: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static TD: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("th, td"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

/// Visible text of an element, whitespace-collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}

/// "Find the text node that reads `label`, return the value next to it."
pub trait LabelLookup {
    fn label_value(&self, label: &str) -> Option<String>;
}

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(src: &str) -> Self {
        Self { html: Html::parse_document(src) }
    }

    /// All tables, in document order.
    pub fn tables(&self) -> impl Iterator<Item = Table<'_>> {
        self.html.select(&TABLE).map(|el| Table { el })
    }

    pub fn first_table(&self) -> Option<Table<'_>> {
        self.tables().next()
    }

    /// First table whose header row mentions every token (case-insensitive).
    pub fn find_table(&self, tokens: &[&str]) -> Option<Table<'_>> {
        self.tables().find(|t| t.matches(tokens))
    }
}

impl LabelLookup for Document {
    /// Case-insensitive exact match on a trimmed text node; the value is the
    /// text of the next element in document order.
    fn label_value(&self, label: &str) -> Option<String> {
        let mut nodes = self.html.tree.root().descendants();
        let found = nodes.by_ref().any(|n| match n.value() {
            Node::Text(t) => t.trim().eq_ignore_ascii_case(label),
            _ => false,
        });
        if !found {
            return None;
        }
        nodes.find_map(ElementRef::wrap).map(element_text)
    }
}

#[derive(Clone, Copy)]
pub struct Table<'a> {
    el: ElementRef<'a>,
}

impl<'a> Table<'a> {
    /// Lower-cased texts of the first row that carries a `<th>`.
    /// Empty when the table has no header row.
    pub fn headers(&self) -> Vec<String> {
        self.el
            .select(&TR)
            .find(|tr| tr.select(&TH).next().is_some())
            .map(|tr| {
                tr.select(&HEADER_CELL)
                    .map(|c| element_text(c).to_lowercase())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn matches(&self, tokens: &[&str]) -> bool {
        let headers = self.headers();
        if headers.is_empty() {
            return false;
        }
        let joined = headers.join(" ");
        tokens.iter().all(|tok| joined.contains(&tok.to_lowercase()))
    }

    /// Every row after the first one. The first row is taken to be the header.
    pub fn data_rows(self) -> impl Iterator<Item = Row<'a>> {
        self.el.select(&TR).skip(1).map(|tr| Row {
            cells: tr.select(&TD).collect(),
        })
    }
}

/// The `<td>` cells of one table row.
pub struct Row<'a> {
    cells: Vec<ElementRef<'a>>,
}

impl<'a> Row<'a> {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn text(&self, i: usize) -> Option<String> {
        self.cells.get(i).map(|c| element_text(*c))
    }

    /// Text of cell `i`, empty when the column is missing or out of range.
    pub fn text_or_empty(&self, i: Option<usize>) -> String {
        i.and_then(|i| self.text(i)).unwrap_or_default()
    }

    /// Raw `href` of the first anchor inside cell `i`.
    pub fn link(&self, i: usize) -> Option<&'a str> {
        self.cells
            .get(i)?
            .select(&ANCHOR)
            .next()
            .and_then(|a| a.value().attr("href"))
            .filter(|h| !h.trim().is_empty())
    }
}

/// Index of the first header containing any candidate name.
pub fn column_index(headers: &[String], candidates: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.to_lowercase();
        candidates.iter().any(|c| h.contains(c))
    })
}

/// Absolute form of `href` relative to `base`; `None` if either is unusable.
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href.trim()).ok().map(String::from)
}
