// src/specs/list.rs
//! Registry listing page → [`FirmStub`]s.
//!
//! Columns roughly read:
//! `Row | Name | (prev RO/Rep/Total) | (curr RO/Rep/Total) | … | Licence start | Licence end`.
//! Only the name cell (second) and the last two cells are used.

use tracing::{debug, warn};

use crate::core::Document;
use crate::core::dates::parse_date;
use crate::core::html::resolve_url;
use crate::data::FirmStub;

pub const LIST_TOKENS: [&str; 5] = ["name", "licence", "ro", "rep", "total"];

/// Extract firm stubs in row order. `base_url` resolves relative detail links.
pub fn parse_list(html: &str, base_url: &str) -> Vec<FirmStub> {
    let doc = Document::parse(html);

    let table = match doc.find_table(&LIST_TOKENS) {
        Some(t) => t,
        None => match doc.first_table() {
            Some(t) => {
                warn!("listing table not found by headers; falling back to first table");
                t
            }
            None => {
                warn!("listing page has no tables");
                return Vec::new();
            }
        },
    };

    let mut stubs = Vec::new();
    for row in table.data_rows() {
        let n = row.len();
        if n < 3 {
            continue;
        }
        let firm_name = row.text(1).unwrap_or_default();
        let firm_url = row
            .link(1)
            .and_then(|href| resolve_url(base_url, href))
            .unwrap_or_default();

        if firm_name.is_empty() || firm_url.is_empty() {
            debug!(firm_name = %firm_name, "listing row without name or link; skipped");
            continue;
        }

        stubs.push(FirmStub {
            firm_name,
            firm_url,
            licence_start_list: parse_date(&row.text(n - 2).unwrap_or_default()),
            licence_end_list: parse_date(&row.text(n - 1).unwrap_or_default()),
        });
    }
    stubs
}
