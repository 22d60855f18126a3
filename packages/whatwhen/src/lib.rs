//! A parser and expansion engine for plain-text files of recurring events. Each event is a line
//! of the form `<date>, <text>`, where the date is either a literal (`2013 Oct 3 Thu`, or
//! `1980* Oct 9` for something that happens every year) or a rule (`:every Thu`,
//! `:last Fri`, `:easter Sun`, `:weekday after 2013 Dec 25`), optionally followed by indented
//! conditions that repeat, bound, or exclude dates (`:fortnightly`, `:until ...`,
//! `:except ...`, `:for 10 weekdays`).
//!
//! A file is parsed into a [`Calendar`] relative to some start date (which is what rules are
//! resolved against), and that can then be asked for all the [`Occurrence`]s in a window.
//! Event text can carry `@tag` words for filtering, and `:age`/`:year` placeholders, which are
//! filled in per occurrence.
//!
//! ```text
//! 1980* Oct 9, Birthday: is :age, born in :year @family
//! :every Thu, Lesson
//!     :except 2013 Oct 3, conflict
//! 2013 Nov 25 Mon, Task
//!     :for 10 weekdays
//! ```

/// Errors to do with parsing events files.
pub mod error;
pub mod dates;
mod condition;
mod event;
mod expand;
pub mod literal;
mod parser;
pub mod records;
mod rule;
mod select;

// Using this structure for ease of storing utility functions
#[cfg(test)]
pub mod tests;

pub use event::{AnchorSource, Event, Exclusion, OrdinalWeekday, Recurrence};
pub use expand::Occurrence;

use error::ParseError;
use std::collections::BTreeSet;

/// A whole events file, parsed. Events are held in order (by anchor date, then canonical form),
/// and two records that describe exactly the same event collapse into one.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    events: BTreeSet<Event>,
}
impl Calendar {
    /// Gets all the events, in order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
    pub fn len(&self) -> usize {
        self.events.len()
    }
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
    /// Renders every event in its canonical form, which will parse back into the same calendar
    /// (given the same start date). Comments and blank-line layout are not preserved.
    pub fn into_string(self) -> String {
        self.events
            .iter()
            .map(|event| event.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
