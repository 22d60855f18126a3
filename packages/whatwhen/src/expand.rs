//! Expansion of an [`Event`] into the concrete dates it occurs on within a window.

use crate::dates::{easter_sunday, first_of_month, nth_weekday_of_month};
use crate::event::{marked_word_spans, Event};
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// One concrete occurrence of an event, with any placeholders in its text filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occurrence {
    pub date: NaiveDate,
    pub text: String,
}
// Sorted by date, then by text without regard to case
impl Ord for Occurrence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.text.to_lowercase().cmp(&other.text.to_lowercase()))
            .then_with(|| self.text.cmp(&other.text))
    }
}
impl PartialOrd for Occurrence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Event {
    /// Gets every occurrence of this event between `start` and `end` (both inclusive), sorted.
    ///
    /// If `tags` is given and non-empty, an event that carries none of those (lower-cased,
    /// `@`-prefixed) tag words has no occurrences at all.
    pub fn get_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        tags: Option<&BTreeSet<String>>,
    ) -> Vec<Occurrence> {
        if let Some(tags) = tags {
            if !tags.is_empty() && tags.is_disjoint(self.tag_words()) {
                return Vec::new();
            }
        }

        let (mut start, mut end) = (start, end);
        if let Some(from) = self.repeat_from() {
            if from > end {
                return Vec::new();
            }
            start = start.max(from);
        }
        if let Some(until) = self.repeat_until() {
            if until < start {
                return Vec::new();
            }
            end = end.min(until);
        }
        if start > end {
            return Vec::new();
        }

        let anchor = self.date();
        let recurrence = self.recurrence();
        let in_range = |date: NaiveDate| start <= date && date <= end;
        let mut dates = BTreeSet::new();

        if in_range(anchor) {
            dates.insert(anchor);
        }

        if recurrence.yearly {
            match recurrence.easter_offset {
                Some(offset) => {
                    // A big enough offset can move a year's date into the year before
                    let reach = (offset.unsigned_abs() / 365) as i32 + 1;
                    let first_year = (anchor.year() + 1).max(start.year() - reach);
                    for year in first_year..=end.year() + reach {
                        let Some(date) = easter_sunday(year)
                            .zip(Duration::try_days(offset))
                            .and_then(|(easter, span)| easter.checked_add_signed(span))
                        else {
                            continue;
                        };
                        if date > end {
                            break;
                        }
                        if in_range(date) {
                            dates.insert(date);
                        }
                    }
                }
                None => {
                    for year in start.year().max(anchor.year())..=end.year() {
                        // Feb 29 simply doesn't happen in most years
                        if let Some(date) = anchor.with_year(year) {
                            if date > anchor && in_range(date) {
                                dates.insert(date);
                            }
                        }
                    }
                }
            }
        }

        let mut strides = recurrence.every_n_days.clone();
        // Bounded but otherwise unrepeating events happen every day up to their bound
        if self.repeat_until().is_some() && !recurrence.repeats() {
            strides.insert(1);
        }
        for n in strides {
            let n = n as i64;
            let steps = if start > anchor {
                ((start - anchor).num_days() + n - 1) / n
            } else {
                1
            };
            let mut next =
                Duration::try_days(steps * n).and_then(|span| anchor.checked_add_signed(span));
            while let Some(date) = next.filter(|date| *date <= end) {
                dates.insert(date);
                next = date.checked_add_signed(Duration::days(n));
            }
        }

        for day in &recurrence.every_nth_of_month {
            for month in months_between(anchor.max(start), end) {
                if let Some(date) = month.with_day(*day) {
                    if date > anchor && in_range(date) {
                        dates.insert(date);
                    }
                }
            }
        }

        for ow in &recurrence.ordinal_weekdays {
            for month in months_between(anchor.max(start), end) {
                if let Some(date) = nth_weekday_of_month(month, ow.ordinal, ow.weekday) {
                    if date >= anchor && in_range(date) {
                        dates.insert(date);
                    }
                }
            }
        }

        for exclusion in self.excluded() {
            dates.remove(&exclusion.date);
        }

        tracing::trace!(
            "{} occurrence(s) of {:?} between {start} and {end}",
            dates.len(),
            self.text()
        );

        let has_age = self.placeholder_words().contains(":age");
        let text = if self.placeholder_words().contains(":year") {
            substitute(self.text(), ":year", &anchor.year().to_string())
        } else {
            self.text().to_string()
        };
        let mut occurrences = dates
            .into_iter()
            .map(|date| Occurrence {
                date,
                text: if has_age {
                    substitute(&text, ":age", &(date.year() - anchor.year()).to_string())
                } else {
                    text.clone()
                },
            })
            .collect::<Vec<_>>();
        occurrences.sort();

        occurrences
    }
}

/// Gets the first day of every month from the one containing `from` to the one containing
/// `to`, inclusive.
fn months_between(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let last = first_of_month(to);
    std::iter::successors(Some(first_of_month(from)), |month| {
        month.checked_add_months(Months::new(1))
    })
    .take_while(move |month| *month <= last)
}

/// Replaces every whole `placeholder` colon-word in `text` (case ignored) with `value`.
fn substitute(text: &str, placeholder: &str, value: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in marked_word_spans(text, ':') {
        if text[start..end].eq_ignore_ascii_case(placeholder) {
            result.push_str(&text[last..start]);
            result.push_str(value);
            last = end;
        }
    }
    result.push_str(&text[last..]);

    result
}
