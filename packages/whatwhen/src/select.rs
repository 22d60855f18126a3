//! Queries over a whole [`Calendar`]: merged occurrence lists and tag usage.

use super::Calendar;
use crate::expand::Occurrence;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

impl Calendar {
    /// Gets the occurrences of every event between `start` and `end` (inclusive), sorted by date
    /// and then text. If `tags` is given and non-empty, only events carrying at least one of
    /// those tag words (lower-cased, with their `@`) are included.
    pub fn occurrences(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        tags: Option<&BTreeSet<String>>,
    ) -> Vec<Occurrence> {
        let mut occurrences = self
            .events
            .iter()
            .flat_map(|event| event.get_dates(start, end, tags))
            .collect::<Vec<_>>();
        occurrences.sort();

        occurrences
    }
    /// Counts how many events use each tag word. This doesn't depend on any dates.
    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for word in self.events.iter().flat_map(|event| event.tag_words()) {
            *counts.entry(word.clone()).or_insert(0) += 1;
        }

        counts
    }
    /// For each of the given tag words, counts the occurrences between `start` and `end` of
    /// events carrying it. The counts come back in the order the tags were given (tags are
    /// lower-cased, and repeats are counted once).
    pub fn tag_day_counts(
        &self,
        tags: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> IndexMap<String, usize> {
        let mut counts = tags
            .iter()
            .map(|tag| (tag.to_lowercase(), 0))
            .collect::<IndexMap<_, _>>();
        let filter = counts.keys().cloned().collect::<BTreeSet<_>>();

        for event in &self.events {
            let hits = event.get_dates(start, end, Some(&filter)).len();
            if hits == 0 {
                continue;
            }
            for (tag, count) in counts.iter_mut() {
                if event.tag_words().contains(tag) {
                    *count += hits;
                }
            }
        }

        counts
    }
}
