//! Conditions: the indented `:colon-word` lines after a date line, which bound, repeat or
//! exclude dates from the event that line started.

use crate::error::ParseError;
use crate::event::{AnchorSource, EventBuilder};
use crate::dates::format_date;
use crate::rule::{resolve_reference, rule_text};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

const EVERY_FORM: &str = ":every <n> days";
const FOR_FORMS: &str = "one of:\n  :for <n> days\n  :for <n> weekdays";
const DATE_FORM: &str = "a <date> after the keyword";

/// The keywords that can start a continuation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConditionKeyword {
    Except,
    Until,
    From,
    Weekly,
    Fortnightly,
    Monthly,
    Yearly,
    Every,
    For,
}
impl ConditionKeyword {
    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            ":except" => Some(Self::Except),
            ":until" => Some(Self::Until),
            ":from" => Some(Self::From),
            ":weekly" => Some(Self::Weekly),
            ":fortnightly" => Some(Self::Fortnightly),
            ":monthly" => Some(Self::Monthly),
            ":yearly" => Some(Self::Yearly),
            ":every" => Some(Self::Every),
            ":for" => Some(Self::For),
            _ => None,
        }
    }
    fn keyword(self) -> &'static str {
        match self {
            Self::Except => ":except",
            Self::Until => ":until",
            Self::From => ":from",
            Self::Weekly => ":weekly",
            Self::Fortnightly => ":fortnightly",
            Self::Monthly => ":monthly",
            Self::Yearly => ":yearly",
            Self::Every => ":every",
            Self::For => ":for",
        }
    }
}

/// A parsed (but not yet applied) condition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Condition<'a> {
    pub(crate) keyword: ConditionKeyword,
    pub(crate) args: Vec<&'a str>,
    /// The normalised condition text, for error messages.
    pub(crate) text: String,
}
impl<'a> Condition<'a> {
    /// Splits a continuation line (already stripped of surrounding whitespace) into its keyword
    /// and arguments. Only the keyword is checked here.
    pub(crate) fn from_str(line: &'a str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let first = words.next().unwrap_or_default();
        if !first.starts_with(':') {
            return Err(ParseError::NotACondition);
        }
        let keyword = ConditionKeyword::from_word(first).ok_or_else(|| {
            ParseError::UnknownCondition {
                word: first.to_lowercase(),
            }
        })?;
        let args = words.collect::<Vec<_>>();
        let text = rule_text(first, &args);

        Ok(Self {
            keyword,
            args,
            text,
        })
    }

    /// Applies this condition to the event being built. Any dates in the condition are resolved
    /// relative to `start`, just like the event's own anchor.
    pub(crate) fn apply(&self, event: &mut EventBuilder, start: NaiveDate) -> Result<(), ParseError> {
        match self.keyword {
            ConditionKeyword::Except => self.except(event, start),
            ConditionKeyword::Until => {
                let until = self.date_arg(start)?;
                if until < event.date && event.source == AnchorSource::Literal {
                    return Err(ParseError::UntilBeforeAnchor {
                        rule: self.text.clone(),
                        anchor: format_date(event.date),
                    });
                }
                if let Some(from) = event.repeat_from.filter(|from| *from > until) {
                    return Err(ParseError::UntilBeforeFrom {
                        rule: self.text.clone(),
                        from: format_date(from),
                    });
                }
                event.narrow_until(until);
                Ok(())
            }
            ConditionKeyword::From => {
                let from = self.date_arg(start)?;
                if let Some(until) = event.repeat_until.filter(|until| *until < from) {
                    return Err(ParseError::FromAfterUntil {
                        rule: self.text.clone(),
                        until: format_date(until),
                    });
                }
                event.narrow_from(from);
                Ok(())
            }
            ConditionKeyword::Weekly => {
                self.no_args()?;
                event.recurrence.every_n_days.insert(7);
                Ok(())
            }
            ConditionKeyword::Fortnightly => {
                self.no_args()?;
                event.recurrence.every_n_days.insert(14);
                Ok(())
            }
            ConditionKeyword::Monthly => {
                self.no_args()?;
                let day = event.date.day();
                event.recurrence.every_nth_of_month.insert(day);
                Ok(())
            }
            ConditionKeyword::Yearly => {
                self.no_args()?;
                event.recurrence.yearly = true;
                Ok(())
            }
            ConditionKeyword::Every => {
                let n = match self.args[..] {
                    [n, unit] if unit.eq_ignore_ascii_case("days") => self.count(n, EVERY_FORM)?,
                    _ => return Err(self.bad_args(EVERY_FORM)),
                };
                event.recurrence.every_n_days.insert(n);
                Ok(())
            }
            ConditionKeyword::For => match self.args[..] {
                [n, unit] if unit.eq_ignore_ascii_case("days") => {
                    let n = self.count(n, FOR_FORMS)?;
                    let until = self.days_from(event.date, n as i64 - 1)?;
                    event.recurrence.every_n_days.insert(1);
                    event.narrow_until(until);
                    Ok(())
                }
                [n, unit] if unit.eq_ignore_ascii_case("weekdays") => {
                    let n = self.count(n, FOR_FORMS)?;
                    // Every run of five weekdays fits in a week
                    self.days_from(event.date, (n as i64 / 5 + 1) * 7)?;
                    for_weekdays(event, n);
                    Ok(())
                }
                _ => Err(self.bad_args(FOR_FORMS)),
            },
        }
    }

    /// `:except <date>[, <reason>]`
    fn except(&self, event: &mut EventBuilder, start: NaiveDate) -> Result<(), ParseError> {
        let rest = self.args.join(" ");
        let (date_text, reason) = match rest.split_once(',') {
            Some((date_text, reason)) => (date_text, reason.trim()),
            None => (rest.as_str(), ""),
        };
        if date_text.trim().is_empty() {
            return Err(self.bad_args(DATE_FORM));
        }
        let date = resolve_reference(date_text, start, &self.text)?;
        event.exclude(date, reason.to_string());
        Ok(())
    }

    fn date_arg(&self, start: NaiveDate) -> Result<NaiveDate, ParseError> {
        if self.args.is_empty() {
            return Err(self.bad_args(DATE_FORM));
        }
        resolve_reference(&self.args.join(" "), start, &self.text)
    }

    fn no_args(&self) -> Result<(), ParseError> {
        if self.args.is_empty() {
            Ok(())
        } else {
            Err(ParseError::UnexpectedArguments {
                keyword: self.keyword.keyword(),
                rule: self.text.clone(),
            })
        }
    }

    fn count(&self, word: &str, expected: &'static str) -> Result<u32, ParseError> {
        let n = word.parse::<u32>().map_err(|_| self.bad_args(expected))?;
        if n == 0 {
            return Err(ParseError::ZeroCount {
                rule: self.text.clone(),
            });
        }
        Ok(n)
    }

    /// The date `days` after `date`, if it can be represented at all.
    fn days_from(&self, date: NaiveDate, days: i64) -> Result<NaiveDate, ParseError> {
        Duration::try_days(days)
            .and_then(|span| date.checked_add_signed(span))
            .ok_or_else(|| ParseError::CountTooLarge {
                rule: self.text.clone(),
            })
    }

    fn bad_args(&self, expected: &'static str) -> ParseError {
        ParseError::ConditionArguments {
            rule: self.text.clone(),
            expected,
        }
    }
}

/// `:for <n> weekdays`: repeats daily from the anchor over the next `n` weekdays, excluding the
/// weekends in between.
fn for_weekdays(event: &mut EventBuilder, n: u32) {
    let mut day = event.date;
    let mut last = event.date;
    let mut counted = 0;
    while counted < n {
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            event.exclude(day, String::new());
        } else {
            counted += 1;
            last = day;
        }
        day = day + Duration::days(1);
    }
    event.recurrence.every_n_days.insert(1);
    event.narrow_until(last);
}
