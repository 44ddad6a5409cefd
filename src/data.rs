// src/data.rs
//
// Record shapes flowing through the pipeline:
//
//   FirmStub ──(detail page)──▶ FirmRecord ──(normalize)──▶ NormalizedFirmRecord
//
// Dates are held as strings in their on-disk form: `YYYY-MM-DD` or empty.
// Each stage builds new values; nothing is mutated after construction.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Minimal identity of a firm, read off the registry listing page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmStub {
    pub firm_name: String,
    pub firm_url: String,
    pub licence_start_list: String,
    pub licence_end_list: String,
}

/// Derived from the licence end date, never scraped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum LicenceStatus {
    #[default]
    Active,
    Inactive,
}

impl LicenceStatus {
    pub fn from_active(active: bool) -> Self {
        if active { LicenceStatus::Active } else { LicenceStatus::Inactive }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenceStatus::Active => "Active",
            LicenceStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for LicenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Hand-edited dumps may carry any casing.
impl From<String> for LicenceStatus {
    fn from(s: String) -> Self {
        Self::from_active(s.trim().eq_ignore_ascii_case("active"))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub organisation: String,
    pub role: String,
    pub activity: String,
    pub from: String,
    pub until: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Licensee {
    pub licensee_id: String,
    pub name: String,
    pub role: String,
    pub status: LicenceStatus,
    pub licence_start: String,
    pub licence_end: String,
    pub history: Vec<HistoryEntry>,
    pub person_url: String,
}

/// One firm as scraped. `current_licensees_count == licensees.len()` when
/// built by the detail extractor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmRecord {
    pub firm_id: String,
    pub firm_name: String,
    pub firm_url: String,
    pub licence_start: String,
    pub licence_end: String,
    pub last_updated: String,
    pub current_licensees_count: usize,
    pub licensees: Vec<Licensee>,
}

/// A [`FirmRecord`] that went through `transform::normalize`. Only the
/// normalizer constructs these; serializes exactly like the inner record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedFirmRecord(FirmRecord);

impl NormalizedFirmRecord {
    pub(crate) fn new(rec: FirmRecord) -> Self {
        Self(rec)
    }

    pub fn into_inner(self) -> FirmRecord {
        self.0
    }
}

impl Deref for NormalizedFirmRecord {
    type Target = FirmRecord;
    fn deref(&self) -> &FirmRecord {
        &self.0
    }
}
