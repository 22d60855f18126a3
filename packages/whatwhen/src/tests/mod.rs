macro_rules! date {
    ($year:literal, $month:literal, $day:literal) => {
        NaiveDate::from_ymd_opt($year, $month, $day).unwrap()
    };
}

mod conditions;
mod rules;

pub use super::*;
pub use crate::error::ParseError;
pub use chrono::NaiveDate;

/// Parses the given events file relative to `start`, and gets the dates of all occurrences
/// between `start` and `end`.
pub fn dates_between(raw: &str, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    Calendar::from_str(raw, start)
        .unwrap()
        .occurrences(start, end, None)
        .into_iter()
        .map(|occ| occ.date)
        .collect()
}

/// Parses a file that should contain exactly one event.
pub fn single_event(raw: &str, start: NaiveDate) -> Event {
    let calendar = Calendar::from_str(raw, start).unwrap();
    assert_eq!(calendar.len(), 1, "expected exactly one event in {raw:?}");
    let event = calendar.events().next().unwrap().clone();
    event
}
