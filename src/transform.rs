// src/transform.rs
// Raw → canonical records: trimmed strings, canonical dates, title-cased
// roles and statuses, defaulted `last_updated`.

use chrono::NaiveDate;

use crate::config::consts::DATE_FMT;
use crate::core::dates::parse_date;
use crate::core::sanitize::title_case;
use crate::data::{FirmRecord, HistoryEntry, Licensee, NormalizedFirmRecord};

pub struct Transformer {
    run_date: String,
}

impl Transformer {
    /// `run_date` fills `last_updated` when the raw value is missing or unreadable.
    pub fn new(run_date: NaiveDate) -> Self {
        Self { run_date: run_date.format(DATE_FMT).to_string() }
    }

    /// Order-preserving, one-to-one, infallible.
    pub fn normalize(&self, records: &[FirmRecord]) -> Vec<NormalizedFirmRecord> {
        records.iter().map(|r| self.normalize_one(r)).collect()
    }

    pub fn normalize_one(&self, r: &FirmRecord) -> NormalizedFirmRecord {
        let licensees: Vec<Licensee> = r.licensees.iter().map(normalize_licensee).collect();
        let last_updated = Some(parse_date(&r.last_updated))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| self.run_date.clone());

        NormalizedFirmRecord::new(FirmRecord {
            firm_id: r.firm_id.trim().to_string(),
            firm_name: r.firm_name.trim().to_string(),
            firm_url: r.firm_url.trim().to_string(),
            licence_start: parse_date(&r.licence_start),
            licence_end: parse_date(&r.licence_end),
            last_updated,
            // recomputed, a count carried in from outside is not trusted
            current_licensees_count: licensees.len(),
            licensees,
        })
    }
}

fn normalize_licensee(l: &Licensee) -> Licensee {
    Licensee {
        licensee_id: l.licensee_id.trim().to_string(),
        name: l.name.trim().to_string(),
        role: title_case(l.role.trim()),
        status: l.status,
        licence_start: parse_date(&l.licence_start),
        licence_end: parse_date(&l.licence_end),
        history: l.history.iter().map(normalize_history).collect(),
        person_url: l.person_url.trim().to_string(),
    }
}

fn normalize_history(h: &HistoryEntry) -> HistoryEntry {
    HistoryEntry {
        organisation: h.organisation.trim().to_string(),
        role: h.role.trim().to_string(),
        activity: h.activity.trim().to_string(),
        from: parse_date(&h.from),
        until: parse_date(&h.until),
    }
}
