//! Plain-text rendering of reports.

use crate::Window;
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use whatwhen::dates::{day_name, month_name};
use whatwhen::Occurrence;

/// Width of the date part of a report line, which separator lines are indented past.
const DATE_WIDTH: usize = 3 + 1 + 2 + 1 + 3 + 1 + 4 + 1;
const LINE_WIDTH: usize = 80;

/// Renders a single occurrence, e.g. `*Thu  3 Oct 2013, Lesson`. The leading `*` marks today.
pub fn report_line(occurrence: &Occurrence, today: NaiveDate) -> String {
    let date = occurrence.date;
    format!(
        "{}{} {:2} {} {}, {}",
        if date == today { '*' } else { ' ' },
        day_name(date.weekday()),
        date.day(),
        month_name(date.month()),
        date.year(),
        occurrence.text
    )
}

/// Renders sorted occurrences, one per line, with a separator wherever a new week starts.
pub fn report_lines(occurrences: &[Occurrence], today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    let mut prev = None;
    for occurrence in occurrences {
        let weekday = occurrence.date.weekday().num_days_from_monday();
        if prev.is_some_and(|prev| weekday < prev) {
            lines.push(format!(
                " {}{}",
                " ".repeat(DATE_WIDTH),
                "-".repeat(LINE_WIDTH - DATE_WIDTH)
            ));
        }
        lines.push(report_line(occurrence, today));
        prev = Some(weekday);
    }

    lines
}

/// The closing line of a report, describing its window.
pub fn summary_line(window: &Window) -> String {
    format!(
        "start {} .. yesterday {} .. today {} .. end {}",
        window.start, window.yesterday, window.today, window.end
    )
}

/// Lists how many events use each tag word, with the counts aligned.
pub fn tags_report(counts: &BTreeMap<String, usize>, filename: &str) -> Vec<String> {
    let width = counts.keys().map(|word| word.len()).max().unwrap_or(0);
    let mut lines = vec![format!("The following @<words> are used in {filename}:")];
    for (word, times) in counts {
        if *times == 1 {
            lines.push(format!("  {word:width$}     once"));
        } else {
            lines.push(format!("  {word:width$} {times:3} times"));
        }
    }

    lines
}

/// Lists how many days in the window each of the given tag words occurs on.
pub fn count_report(counts: &IndexMap<String, usize>, window: &Window) -> Vec<String> {
    let width = counts.keys().map(|word| word.len()).max().unwrap_or(0);
    counts
        .iter()
        .map(|(word, days)| {
            format!(
                "{word:width$} occurs on {days} day{} within {} .. {}",
                if *days == 1 { "" } else { "s" },
                window.start,
                window.end
            )
        })
        .collect()
}

/// Describes today's date in full.
pub fn today_line(today: NaiveDate) -> String {
    format!(
        "Today is {} {} {} {}, {}",
        day_name(today.weekday()),
        today.day(),
        month_name(today.month()),
        today.year(),
        today
    )
}
