//! The core parsing logic that turns an events file into a [`Calendar`].

use super::{Calendar, Event, ParseError};
use crate::condition::Condition;
use crate::records::{Record, Records};
use crate::rule::parse_date;
use chrono::NaiveDate;
use std::collections::BTreeSet;

impl Calendar {
    /// Parses an events file from its string representation. Any rules (like `:every Thu`) are
    /// resolved relative to `start`, which should be the start of whatever window the events
    /// will be reported over.
    ///
    /// Parsing is all-or-nothing: the first error stops everything.
    pub fn from_str(raw_contents: &str, start: NaiveDate) -> Result<Self, ParseError> {
        Self::from_lines(raw_contents.lines(), start)
    }
    /// Parses an events file from some lines (without their line endings).
    pub fn from_lines<'a>(
        lines: impl Iterator<Item = &'a str>,
        start: NaiveDate,
    ) -> Result<Self, ParseError> {
        let mut events = BTreeSet::new();
        for record in Records::new(lines) {
            if let Some(event) = parse_record(&record?, start)? {
                tracing::debug!("parsed event: {event}");
                events.insert(event);
            }
        }

        Ok(Self { events })
    }
}

/// Parses a single record into an event. This is `None` when the record is valid, but its
/// anchoring rule has no date (e.g. `:fifth Fri` in a month with four).
pub(crate) fn parse_record(record: &Record, start: NaiveDate) -> Result<Option<Event>, ParseError> {
    let (lineno, line) = (record.lineno, record.first);
    let (date_text, text) = line.split_once(',').ok_or_else(|| ParseError::MissingComma {
        lineno,
        line: line.to_string(),
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::MissingText {
            lineno,
            line: line.to_string(),
        });
    }

    let mut builder = parse_date(date_text, start, None).map_err(|err| err.at_line(lineno, line))?;
    if builder.is_none() {
        tracing::debug!("line {lineno} has no date relative to {start}, skipping it");
    }
    for (idx, continuation) in record.continuations.iter().enumerate() {
        let lineno = lineno + 1 + idx;
        let condition =
            Condition::from_str(continuation).map_err(|err| err.at_line(lineno, continuation))?;
        // Without an event, conditions are only checked, not applied
        if let Some(builder) = builder.as_mut() {
            condition
                .apply(builder, start)
                .map_err(|err| err.at_line(lineno, continuation))?;
        }
    }

    Ok(builder.map(|builder| builder.build(text.to_string())))
}
