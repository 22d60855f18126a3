//! The [`Event`] type, the one thing an events file describes, and the builder used to put
//! one together while its record is being parsed.

use crate::dates::{day_name, format_date, Ordinal};
use chrono::{Datelike, NaiveDate, Weekday};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A weekday at a particular position within a month, e.g. the first Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrdinalWeekday {
    pub ordinal: Ordinal,
    pub weekday: Weekday,
}
// `Weekday` has no ordering of its own
impl Ord for OrdinalWeekday {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal.cmp(&other.ordinal).then(
            self.weekday
                .num_days_from_monday()
                .cmp(&other.weekday.num_days_from_monday()),
        )
    }
}
impl PartialOrd for OrdinalWeekday {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The ways in which an event repeats after its anchor date. These are all independent, and an
/// event occurs on the union of the dates they produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recurrence {
    /// Repeat every year. Normally on the anchor's month and day, but see `easter_offset`.
    pub yearly: bool,
    /// If set (and the event is yearly), each year's date is this many days from that year's
    /// Easter Sunday instead of a fixed month and day.
    pub easter_offset: Option<i64>,
    /// Repeat every N days from the anchor, for each N.
    pub every_n_days: BTreeSet<u32>,
    /// Repeat on these days of every month. Months without that day are skipped.
    pub every_nth_of_month: BTreeSet<u32>,
    /// Repeat on these weekdays of every month.
    pub ordinal_weekdays: BTreeSet<OrdinalWeekday>,
}
impl Recurrence {
    /// Whether any repetition at all has been asked for.
    pub fn repeats(&self) -> bool {
        self.yearly
            || !self.every_n_days.is_empty()
            || !self.every_nth_of_month.is_empty()
            || !self.ordinal_weekdays.is_empty()
    }
    /// Removes everything in `implied` from this, leaving what was added on top of it.
    fn without(&self, implied: &Recurrence) -> Recurrence {
        Recurrence {
            yearly: self.yearly && !implied.yearly,
            easter_offset: self.easter_offset.filter(|_| implied.easter_offset.is_none()),
            every_n_days: &self.every_n_days - &implied.every_n_days,
            every_nth_of_month: &self.every_nth_of_month - &implied.every_nth_of_month,
            ordinal_weekdays: &self.ordinal_weekdays - &implied.ordinal_weekdays,
        }
    }
}

/// Where an event's anchor date came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorSource {
    /// A literal `<year> <month> <day>` date.
    Literal,
    /// A rule like `:every Thu`, recorded in the normalised form it was written in so it can be
    /// written back out.
    Rule(String),
}

/// A date on which an event will not occur, with an optional reason (which may be empty).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exclusion {
    pub date: NaiveDate,
    pub reason: String,
}

/// A single event from an events file.
///
/// Events are put together by the parser and never change after that. Two events are equal if
/// they have the same anchor date and the same canonical form (their [`fmt::Display`]
/// rendering), and they are ordered by anchor date, then by that canonical form.
#[derive(Debug, Clone)]
pub struct Event {
    date: NaiveDate,
    text: String,
    source: AnchorSource,
    recurrence: Recurrence,
    /// The part of `recurrence` that the anchoring rule gives us for free (and which therefore
    /// doesn't need to be written back out).
    implied: Recurrence,
    repeat_from: Option<NaiveDate>,
    repeat_until: Option<NaiveDate>,
    excluded: BTreeSet<Exclusion>,
    tag_words: BTreeSet<String>,
    placeholder_words: BTreeSet<String>,
    canonical: String,
}
impl Event {
    /// The anchor date: the first occurrence, from which all the others are derived.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
    /// The free text of the event, before any placeholder substitution.
    pub fn text(&self) -> &str {
        &self.text
    }
    /// Whether the anchor date was written literally or computed from a rule.
    pub fn source(&self) -> &AnchorSource {
        &self.source
    }
    pub fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }
    pub fn repeat_from(&self) -> Option<NaiveDate> {
        self.repeat_from
    }
    pub fn repeat_until(&self) -> Option<NaiveDate> {
        self.repeat_until
    }
    pub fn excluded(&self) -> &BTreeSet<Exclusion> {
        &self.excluded
    }
    /// The `@word`s in the text, lower-cased and including the `@`.
    pub fn tag_words(&self) -> &BTreeSet<String> {
        &self.tag_words
    }
    /// The `:word`s in the text, lower-cased and including the `:`.
    pub fn placeholder_words(&self) -> &BTreeSet<String> {
        &self.placeholder_words
    }
    /// Renders this event with its anchor always written as a literal date, every recurrence
    /// attribute spelled out (including those implied by a rule), and the tag and placeholder
    /// words found in its text. This is meant for checking how a file was understood, and is
    /// *not* guaranteed to parse again.
    pub fn annotated(&self) -> String {
        let mut parts = vec![format!("{}, {}", format_date(self.date), self.text)];
        if let AnchorSource::Rule(rule) = self.source() {
            parts.push(format!("  <rule> {rule}"));
        }
        let rec = &self.recurrence;
        if rec.yearly {
            parts.push("  :yearly".to_string());
        }
        if let Some(offset) = rec.easter_offset {
            parts.push(format!("  <easter-offset> {offset}"));
        }
        for n in &rec.every_n_days {
            if *n == 7 {
                parts.push(format!("  :every {}", day_name(self.date.weekday())));
            } else {
                parts.push(format!("  :every {n} days"));
            }
        }
        for n in &rec.every_nth_of_month {
            parts.push(format!("  :every day {n}"));
        }
        for ow in &rec.ordinal_weekdays {
            parts.push(format!("  :{} {}", ow.ordinal.keyword(), day_name(ow.weekday)));
        }
        parts.extend(self.bound_and_exclusion_lines());
        if !self.tag_words.is_empty() {
            parts.push(format!(
                "  <at-words> {}",
                self.tag_words.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
        if !self.placeholder_words.is_empty() {
            parts.push(format!(
                "  <colon-words> {}",
                self.placeholder_words.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }

        parts.join("\n")
    }

    /// Produces the canonical form, which will parse back into an identical event given the
    /// same reference date.
    fn render(&self) -> String {
        let mut parts = vec![match &self.source {
            AnchorSource::Literal => format!("{}, {}", format_date(self.date), self.text),
            AnchorSource::Rule(rule) => format!("{rule}, {}", self.text),
        }];

        let extra = self.recurrence.without(&self.implied);
        if extra.yearly {
            parts.push("  :yearly".to_string());
        }
        for n in &extra.every_n_days {
            parts.push(match n {
                7 => "  :weekly".to_string(),
                14 => "  :fortnightly".to_string(),
                n => format!("  :every {n} days"),
            });
        }
        // Only `:monthly` can add to this outside of a rule, and it always uses the anchor's day
        if !extra.every_nth_of_month.is_empty() {
            parts.push("  :monthly".to_string());
        }
        parts.extend(self.bound_and_exclusion_lines());

        parts.join("\n")
    }

    fn bound_and_exclusion_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(from) = self.repeat_from {
            lines.push(format!("  :from {}", format_date(from)));
        }
        if let Some(until) = self.repeat_until {
            lines.push(format!("  :until {}", format_date(until)));
        }
        for exclusion in &self.excluded {
            if exclusion.reason.is_empty() {
                lines.push(format!("  :except {}", format_date(exclusion.date)));
            } else {
                lines.push(format!(
                    "  :except {}, {}",
                    format_date(exclusion.date),
                    exclusion.reason
                ));
            }
        }
        lines
    }
}
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.canonical == other.canonical
    }
}
impl Eq for Event {}
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.canonical.cmp(&other.canonical))
    }
}
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The mutable staging form of an [`Event`], which exists only while a single record is being
/// parsed. Conditions on continuation lines update this, and [`Self::build`] freezes it.
#[derive(Debug, Clone)]
pub(crate) struct EventBuilder {
    pub(crate) date: NaiveDate,
    pub(crate) source: AnchorSource,
    pub(crate) recurrence: Recurrence,
    implied: Recurrence,
    pub(crate) repeat_from: Option<NaiveDate>,
    pub(crate) repeat_until: Option<NaiveDate>,
    pub(crate) excluded: BTreeSet<Exclusion>,
}
impl EventBuilder {
    /// Starts an event anchored on a literal date.
    pub(crate) fn literal(date: NaiveDate, yearly: bool) -> Self {
        Self {
            date,
            source: AnchorSource::Literal,
            recurrence: Recurrence {
                yearly,
                ..Recurrence::default()
            },
            implied: Recurrence::default(),
            repeat_from: None,
            repeat_until: None,
            excluded: BTreeSet::new(),
        }
    }
    /// Starts an event anchored by a rule, which may bring some recurrence with it.
    pub(crate) fn from_rule(date: NaiveDate, rule: String, recurrence: Recurrence) -> Self {
        Self {
            date,
            source: AnchorSource::Rule(rule),
            implied: recurrence.clone(),
            recurrence,
            repeat_from: None,
            repeat_until: None,
            excluded: BTreeSet::new(),
        }
    }
    /// Narrows the end of the repetition. The earliest bound ever given wins.
    pub(crate) fn narrow_until(&mut self, until: NaiveDate) {
        self.repeat_until = Some(self.repeat_until.map_or(until, |curr| curr.min(until)));
    }
    /// Narrows the start of the repetition. The latest bound ever given wins.
    pub(crate) fn narrow_from(&mut self, from: NaiveDate) {
        self.repeat_from = Some(self.repeat_from.map_or(from, |curr| curr.max(from)));
    }
    pub(crate) fn exclude(&mut self, date: NaiveDate, reason: String) {
        self.excluded.insert(Exclusion { date, reason });
    }
    /// Freezes this into an event with the given text.
    pub(crate) fn build(self, text: String) -> Event {
        let mut event = Event {
            tag_words: marked_words(&text, '@'),
            placeholder_words: marked_words(&text, ':'),
            date: self.date,
            text,
            source: self.source,
            recurrence: self.recurrence,
            implied: self.implied,
            repeat_from: self.repeat_from,
            repeat_until: self.repeat_until,
            excluded: self.excluded,
            canonical: String::new(),
        };
        event.canonical = event.render();
        event
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Finds the byte ranges of the words in `text` introduced by `marker` (e.g. `@work` or
/// `:age`). A marker only counts at the start of the text or after a non-word character, so
/// `10:00` contains no `:word`. Each range includes the marker.
pub(crate) fn marked_word_spans(text: &str, marker: char) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        let at_boundary = prev.map_or(true, |p| !is_word_char(p));
        if c == marker && at_boundary {
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next_c)) = chars.peek() {
                if !is_word_char(next_c) {
                    break;
                }
                end = next_idx + next_c.len_utf8();
                chars.next();
            }
            if end > idx + c.len_utf8() {
                spans.push((idx, end));
                prev = text[..end].chars().next_back();
                continue;
            }
        }
        prev = Some(c);
    }

    spans
}

/// Gets the distinct lower-cased `marker`-words in `text`.
fn marked_words(text: &str, marker: char) -> BTreeSet<String> {
    marked_word_spans(text, marker)
        .into_iter()
        .map(|(start, end)| text[start..end].to_lowercase())
        .collect()
}
