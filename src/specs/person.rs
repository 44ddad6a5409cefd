// src/specs/person.rs
//! Person page → licence history.
//!
//! Headers: `Organisation | Role | Activity | From | Until`. Each column is
//! resolved on its own; a column that cannot be found reads as empty strings
//! rather than dropping the row.

use tracing::debug;

use crate::core::dates::parse_date;
use crate::core::html::column_index;
use crate::core::{Document, Fetch};
use crate::data::HistoryEntry;

pub const HISTORY_TOKENS: [&str; 5] = ["organisation", "role", "activity", "from", "until"];

pub struct PersonHistoryParser<'a, F: Fetch + ?Sized> {
    fetcher: &'a F,
}

impl<'a, F: Fetch + ?Sized> PersonHistoryParser<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Empty on fetch failure; the fetcher has already logged why.
    pub fn extract(&self, person_url: &str) -> Vec<HistoryEntry> {
        match self.fetcher.fetch(person_url) {
            Ok(html) => parse_history(&html),
            Err(_) => Vec::new(),
        }
    }
}

pub fn parse_history(html: &str) -> Vec<HistoryEntry> {
    let doc = Document::parse(html);
    let Some(table) = doc.find_table(&HISTORY_TOKENS) else {
        debug!("no licence history table on person page");
        return Vec::new();
    };

    let headers = table.headers();
    let i_org = column_index(&headers, &["organisation", "organization"]);
    let i_role = column_index(&headers, &["role"]);
    let i_act = column_index(&headers, &["activity"]);
    let i_from = column_index(&headers, &["from"]);
    let i_until = column_index(&headers, &["until"]);

    table
        .data_rows()
        .filter(|row| !row.is_empty())
        .map(|row| HistoryEntry {
            organisation: row.text_or_empty(i_org),
            role: row.text_or_empty(i_role),
            activity: row.text_or_empty(i_act),
            from: parse_date(&row.text_or_empty(i_from)),
            until: parse_date(&row.text_or_empty(i_until)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_history_rows() {
        let html = r#"<table>
            <tr><th>Organisation</th><th>Role</th><th>Activity</th><th>From</th><th>Until</th></tr>
            <tr><td>Acme Capital</td><td>RO</td><td>9</td><td>01-Jan-2019</td><td>2020/06/30</td></tr>
            <tr><td>Beta Securities</td><td>Rep</td><td>1</td><td>2020-07-01</td><td></td></tr>
            <tr></tr>
        </table>"#;
        let hist = parse_history(html);
        assert_eq!(hist.len(), 2);
        assert_eq!(
            hist[0],
            HistoryEntry {
                organisation: s!("Acme Capital"),
                role: s!("RO"),
                activity: s!("9"),
                from: s!("2019-01-01"),
                until: s!("2020-06-30"),
            }
        );
        assert_eq!(hist[1].until, "");
    }

    #[test]
    fn short_rows_yield_empty_fields_not_skips() {
        let html = r#"<table>
            <tr><th>Until</th><th>From</th><th>Activity</th><th>Role</th><th>Organisation</th></tr>
            <tr><td>2021-01-01</td><td>2019-01-01</td></tr>
        </table>"#;
        let hist = parse_history(html);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist[0].until, "2021-01-01");
        assert_eq!(hist[0].from, "2019-01-01");
        assert_eq!(hist[0].organisation, "");
        assert_eq!(hist[0].role, "");
    }

    #[test]
    fn missing_table_is_empty() {
        assert!(parse_history("<table><tr><th>Name</th></tr></table>").is_empty());
    }
}
