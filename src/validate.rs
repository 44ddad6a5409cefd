// src/validate.rs
// Read-only reporting pass over normalized records: missing-field issues and
// a one-row metrics summary.

use serde::Serialize;

use crate::data::NormalizedFirmRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Firm,
    Licensee,
}

/// One row of the validation table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub row: usize,
    pub level: Level,
    /// Licensee position within the firm; empty for firm-level issues.
    pub index: Option<usize>,
    pub field: &'static str,
    pub issue: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total_firms: usize,
    pub firms_missing_licence_start: usize,
    pub firms_missing_licence_end: usize,
    pub firms_with_no_licensees: usize,
}

const MISSING: &str = "missing";

pub fn validate(records: &[NormalizedFirmRecord]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (row, rec) in records.iter().enumerate() {
        let firm_fields = [
            ("firm_name", rec.firm_name.is_empty()),
            ("firm_url", rec.firm_url.is_empty()),
            ("last_updated", rec.last_updated.is_empty()),
            ("licensees", rec.licensees.is_empty()),
        ];
        for (field, missing) in firm_fields {
            if missing {
                issues.push(Issue { row, level: Level::Firm, index: None, field, issue: MISSING });
            }
        }

        for (j, lic) in rec.licensees.iter().enumerate() {
            let fields = [
                ("name", lic.name.is_empty()),
                ("role", lic.role.is_empty()),
                ("licence_start", lic.licence_start.is_empty()),
            ];
            for (field, missing) in fields {
                if missing {
                    issues.push(Issue {
                        row,
                        level: Level::Licensee,
                        index: Some(j),
                        field,
                        issue: MISSING,
                    });
                }
            }
        }
    }
    issues
}

pub fn metrics(records: &[NormalizedFirmRecord]) -> Metrics {
    Metrics {
        total_firms: records.len(),
        firms_missing_licence_start: records.iter().filter(|r| r.licence_start.is_empty()).count(),
        firms_missing_licence_end: records.iter().filter(|r| r.licence_end.is_empty()).count(),
        firms_with_no_licensees: records.iter().filter(|r| r.licensees.is_empty()).count(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::{FirmRecord, Licensee};
    use crate::transform::Transformer;

    fn normalized(records: Vec<FirmRecord>) -> Vec<NormalizedFirmRecord> {
        Transformer::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).normalize(&records)
    }

    #[test]
    fn flags_missing_fields() {
        let records = normalized(vec![
            FirmRecord {
                firm_name: s!("Acme"),
                firm_url: s!("https://x/a"),
                licence_start: s!("2020-01-01"),
                licensees: vec![
                    Licensee { name: s!("Jane"), role: s!("RO"), licence_start: s!("2020-01-01"), ..Licensee::default() },
                    Licensee { name: s!("John"), ..Licensee::default() },
                ],
                ..FirmRecord::default()
            },
            FirmRecord { firm_url: s!("https://x/b"), ..FirmRecord::default() },
        ]);

        let issues = validate(&records);
        let summary: Vec<(usize, Level, Option<usize>, &str)> =
            issues.iter().map(|i| (i.row, i.level, i.index, i.field)).collect();
        assert_eq!(
            summary,
            vec![
                (0, Level::Licensee, Some(1), "role"),
                (0, Level::Licensee, Some(1), "licence_start"),
                (1, Level::Firm, None, "firm_name"),
                (1, Level::Firm, None, "licensees"),
            ]
        );
    }

    #[test]
    fn metrics_counts() {
        let records = normalized(vec![
            FirmRecord { licence_start: s!("2020-01-01"), ..FirmRecord::default() },
            FirmRecord {
                licence_end: s!("2025-01-01"),
                licensees: vec![Licensee::default()],
                ..FirmRecord::default()
            },
        ]);
        assert_eq!(
            metrics(&records),
            Metrics {
                total_firms: 2,
                firms_missing_licence_start: 1,
                firms_missing_licence_end: 1,
                firms_with_no_licensees: 1,
            }
        );
    }
}
