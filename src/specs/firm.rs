// src/specs/firm.rs
//! Firm detail page → [`FirmRecord`].
//!
//! Licensee headers look like
//! `Name | (Age …) | (⚥) | SFC ID | Role | From | Until`; only Name, Role,
//! From and Until are required. Status is derived from Until against the run
//! date. Firm-level licence dates come from labelled fields on the page and
//! fall back to the listing-page values.

use chrono::NaiveDate;
use tracing::debug;

use super::person::PersonHistoryParser;
use crate::config::Config;
use crate::config::consts::DATE_FMT;
use crate::core::dates::{is_active, parse_date};
use crate::core::html::{column_index, resolve_url};
use crate::core::{Document, Fetch, LabelLookup, Table};
use crate::data::{FirmRecord, FirmStub, LicenceStatus, Licensee};

pub const LICENSEE_TOKENS: [&str; 5] = ["name", "sfc id", "role", "from", "until"];

const LABEL_START: &str = "Licence start";
const LABEL_END: &str = "Licence end";

pub struct FirmDetailParser<'a, F: Fetch + ?Sized> {
    fetcher: &'a F,
    fetch_history: bool,
    run_date: NaiveDate,
}

impl<'a, F: Fetch + ?Sized> FirmDetailParser<'a, F> {
    pub fn new(fetcher: &'a F, cfg: &Config) -> Self {
        Self {
            fetcher,
            fetch_history: cfg.scrape.fetch_history,
            run_date: cfg.run_date,
        }
    }

    /// Fetch and parse one firm. `None` only when the detail page can't be
    /// fetched.
    pub fn extract(&self, stub: &FirmStub) -> Option<FirmRecord> {
        let html = self.fetcher.fetch(&stub.firm_url).ok()?;
        Some(self.parse(stub, &html))
    }

    pub fn parse(&self, stub: &FirmStub, html: &str) -> FirmRecord {
        let doc = Document::parse(html);

        let licensees = match doc.find_table(&LICENSEE_TOKENS) {
            Some(table) => self.licensees(table, &stub.firm_url),
            None => {
                debug!(firm = %stub.firm_name, "no licensees table");
                Vec::new()
            }
        };

        let labelled = |label: &str| parse_date(&doc.label_value(label).unwrap_or_default());
        let licence_start = Some(labelled(LABEL_START))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| stub.licence_start_list.clone());
        let licence_end = Some(labelled(LABEL_END))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| stub.licence_end_list.clone());

        FirmRecord {
            firm_id: s!(),
            firm_name: stub.firm_name.clone(),
            firm_url: stub.firm_url.clone(),
            licence_start,
            licence_end,
            last_updated: self.run_date.format(DATE_FMT).to_string(),
            current_licensees_count: licensees.len(),
            licensees,
        }
    }

    fn licensees(&self, table: Table<'_>, firm_url: &str) -> Vec<Licensee> {
        let headers = table.headers();
        let i_sfc = column_index(&headers, &["sfc id", "sfcid", "id"]);
        let (Some(i_name), Some(i_role), Some(i_from), Some(i_until)) = (
            column_index(&headers, &["name"]),
            column_index(&headers, &["role"]),
            column_index(&headers, &["from"]),
            column_index(&headers, &["until"]),
        ) else {
            debug!(?headers, "licensees table lacks a required column");
            return Vec::new();
        };

        let person_pages = PersonHistoryParser::new(self.fetcher);

        table
            .data_rows()
            .filter(|row| !row.is_empty())
            .map(|row| {
                let person_url = row
                    .link(i_name)
                    .and_then(|href| resolve_url(firm_url, href))
                    .unwrap_or_default();
                let licence_end = parse_date(&row.text_or_empty(Some(i_until)));
                let status = LicenceStatus::from_active(is_active(&licence_end, self.run_date));

                let history = if self.fetch_history && !person_url.is_empty() {
                    person_pages.extract(&person_url)
                } else {
                    Vec::new()
                };

                Licensee {
                    licensee_id: row.text_or_empty(i_sfc),
                    name: row.text_or_empty(Some(i_name)),
                    role: row.text_or_empty(Some(i_role)),
                    status,
                    licence_start: parse_date(&row.text_or_empty(Some(i_from))),
                    licence_end,
                    history,
                    person_url,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::FetchError;

    struct Pages(HashMap<&'static str, &'static str>);

    impl Fetch for Pages {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0
                .get(url)
                .map(|s| s.to_string())
                .ok_or_else(|| FetchError::Status { url: s!(url), status: 404 })
        }
    }

    const FIRM_URL: &str = "https://webb-site.com/dbpub/SFClicensees.asp?p=11";

    const DETAIL: &str = r#"<html><body>
        <table><tr><td>Licence start</td><td>15-Mar-2018</td></tr></table>
        <table>
          <tr><th>Name</th><th>Age</th><th>SFC ID</th><th>Role</th><th>From</th><th>Until</th></tr>
          <tr><td><a href="natperson.asp?p=1">Jane Doe</a></td><td>40</td><td>AAA111</td>
              <td>Responsible Officer</td><td>2018-03-15</td><td></td></tr>
          <tr><td>John Roe</td><td>50</td><td>BBB222</td>
              <td>Representative</td><td>01/02/2015</td><td>2019-12-31</td></tr>
        </table></body></html>"#;

    const PERSON: &str = r#"<table>
        <tr><th>Organisation</th><th>Role</th><th>Activity</th><th>From</th><th>Until</th></tr>
        <tr><td>Old Firm</td><td>Rep</td><td>1</td><td>2010-01-01</td><td>2018-03-14</td></tr>
    </table>"#;

    fn stub() -> FirmStub {
        FirmStub {
            firm_name: s!("Acme Capital"),
            firm_url: s!(FIRM_URL),
            licence_start_list: s!("2017-01-01"),
            licence_end_list: s!("2030-01-01"),
        }
    }

    fn config(fetch_history: bool) -> Config {
        let mut cfg = Config::default();
        cfg.run_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        cfg.scrape.fetch_history = fetch_history;
        cfg
    }

    #[test]
    fn parses_licensees_and_labels() {
        let pages = Pages(HashMap::new());
        let cfg = config(false);
        let rec = FirmDetailParser::new(&pages, &cfg).parse(&stub(), DETAIL);

        assert_eq!(rec.firm_id, "");
        assert_eq!(rec.last_updated, "2024-06-01");
        assert_eq!(rec.licence_start, "2018-03-15", "label wins over listing");
        assert_eq!(rec.licence_end, "2030-01-01", "listing value as fallback");
        assert_eq!(rec.current_licensees_count, 2);

        let jane = &rec.licensees[0];
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.licensee_id, "AAA111");
        assert_eq!(jane.status, LicenceStatus::Active);
        assert_eq!(jane.person_url, "https://webb-site.com/dbpub/natperson.asp?p=1");
        assert!(jane.history.is_empty(), "history not followed when disabled");

        let john = &rec.licensees[1];
        assert_eq!(john.licence_start, "2015-02-01");
        assert_eq!(john.status, LicenceStatus::Inactive);
        assert_eq!(john.person_url, "");
    }

    #[test]
    fn follows_history_when_enabled() {
        let pages = Pages(HashMap::from([
            (FIRM_URL, DETAIL),
            ("https://webb-site.com/dbpub/natperson.asp?p=1", PERSON),
        ]));
        let cfg = config(true);
        let rec = FirmDetailParser::new(&pages, &cfg).extract(&stub()).unwrap();
        assert_eq!(rec.licensees[0].history.len(), 1);
        assert_eq!(rec.licensees[0].history[0].organisation, "Old Firm");
        assert!(rec.licensees[1].history.is_empty());
    }

    #[test]
    fn missing_table_still_yields_record() {
        let pages = Pages(HashMap::new());
        let cfg = config(false);
        let rec = FirmDetailParser::new(&pages, &cfg).parse(&stub(), "<p>no tables</p>");
        assert!(rec.licensees.is_empty());
        assert_eq!(rec.current_licensees_count, 0);
        assert_eq!(rec.licence_start, "2017-01-01");
    }

    #[test]
    fn tolerates_header_drift_and_cell_less_rows() {
        let html = r#"<table>
            <tr><th>Until (or blank)</th><th>Role</th><th>Name</th><th>From</th><th>SFC ID</th></tr>
            <tr><th colspan="5">Current</th></tr>
            <tr><td>2020-01-01</td><td>RO</td><td>A. Person</td><td>2019-01-01</td><td>Z9</td></tr>
        </table>"#;
        let pages = Pages(HashMap::new());
        let cfg = config(false);
        let rec = FirmDetailParser::new(&pages, &cfg).parse(&stub(), html);
        assert_eq!(rec.licensees.len(), 1);
        let l = &rec.licensees[0];
        assert_eq!(l.name, "A. Person");
        assert_eq!(l.licensee_id, "Z9");
        assert_eq!(l.licence_end, "2020-01-01");
        assert_eq!(l.status, LicenceStatus::Inactive);
    }

    #[test]
    fn fetch_failure_is_none() {
        let pages = Pages(HashMap::new());
        let cfg = config(false);
        assert!(FirmDetailParser::new(&pages, &cfg).extract(&stub()).is_none());
    }
}
