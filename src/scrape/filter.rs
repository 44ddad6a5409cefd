// src/scrape/filter.rs
use chrono::{Duration, NaiveDate};

use crate::core::dates::parse_naive;
use crate::data::FirmStub;

/// Keep stubs whose listing-page licence start falls within the trailing
/// `window_days`. Empty or unreadable dates are kept; the detail page decides.
pub fn filter_recent(stubs: Vec<FirmStub>, window_days: i64, today: NaiveDate) -> Vec<FirmStub> {
    // A window reaching past the calendar's range means no cutoff.
    let Some(cutoff) = Duration::try_days(window_days).and_then(|d| today.checked_sub_signed(d))
    else {
        return stubs;
    };
    stubs
        .into_iter()
        .filter(|stub| match parse_naive(&stub.licence_start_list) {
            Some(start) => start >= cutoff,
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(name: &str, start: &str) -> FirmStub {
        FirmStub {
            firm_name: s!(name),
            firm_url: join!("https://x/", name),
            licence_start_list: s!(start),
            licence_end_list: s!(),
        }
    }

    #[test]
    fn year_window() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let fmt = |d: NaiveDate| d.format("%Y-%m-%d").to_string();

        let stubs = vec![
            stub("today", &fmt(today)),
            stub("edge", &fmt(today - Duration::days(365))),
            stub("old", &fmt(today - Duration::days(366))),
            stub("ancient", "2001-01-01"),
            stub("blank", ""),
            stub("junk", "TBC"),
        ];
        let kept: Vec<_> = filter_recent(stubs, 365, today)
            .into_iter()
            .map(|s| s.firm_name)
            .collect();
        assert_eq!(kept, vec!["today", "edge", "blank", "junk"]);
    }

    #[test]
    fn huge_window_keeps_everything() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let stubs = vec![stub("a", "2024-01-01"), stub("b", "1901-01-01")];
        assert_eq!(filter_recent(stubs.clone(), 100_000_000, today), stubs);
        assert_eq!(filter_recent(stubs.clone(), i64::MAX, today), stubs);
    }

    #[test]
    fn two_digit_year_is_kept_as_unreadable() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let kept = filter_recent(vec![stub("short", "12-Mar-24")], 365, today);
        assert_eq!(kept.len(), 1);
    }
}
