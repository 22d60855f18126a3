//! Rules: the `:colon-words` that can stand in place of a literal date and compute one relative
//! to a reference date (e.g. `:every Thu`, `:last Fri`, `:weekday after 2013 Dec 25`).

use crate::dates::{
    day_after_date, day_before_date, easter_sunday, first_of_month, nth_weekday_of_month,
    parse_day_name, parse_month_name, Ordinal,
};
use crate::error::ParseError;
use crate::event::{EventBuilder, OrdinalWeekday, Recurrence};
use crate::literal::DateLiteral;
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

const EVERY_FORMS: &str = "one of:\n  :every <day-name>\n  :every <month-name> <day>\n  :every day <day>";
const EVERY_DAY_FORM: &str = ":every day <day>";
const EVERY_MONTH_DAY_FORM: &str = ":every <month-name> <day>";
const ORDINAL_FORM: &str = "a single day name, as in :first Mon";
const EASTER_FORMS: &str = "one of:\n  :easter Fri|Sat|Sun|Mon [<year>]\n  :easter <offset> [<year>]";
const RELATIVE_FORMS: &str = "one of:\n  :<something> [on-or-]before <date>\n  :<something> [on-or-]after <date>\nwhere <something> is Mon..Sun or weekday or weekend";

/// The rule keywords that can compute an anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RuleKeyword {
    Every,
    Ordinal(Ordinal),
    Easter,
    Relative(DaySpecifier),
}
impl RuleKeyword {
    /// Identifies the rule keyword from its word (including the colon, case ignored).
    pub(crate) fn from_word(word: &str) -> Option<Self> {
        let name = word.strip_prefix(':')?;
        if name.eq_ignore_ascii_case("every") {
            Some(Self::Every)
        } else if name.eq_ignore_ascii_case("easter") {
            Some(Self::Easter)
        } else if let Some(ordinal) = Ordinal::from_keyword(name) {
            Some(Self::Ordinal(ordinal))
        } else {
            DaySpecifier::from_word(name).map(Self::Relative)
        }
    }
}

/// What kind of day a relative rule (e.g. `:weekend after ...`) is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DaySpecifier {
    Named(Weekday),
    /// The nearest Saturday or Sunday in the given direction.
    Weekend,
    /// The nearest Monday to Friday in the given direction.
    Weekday,
}
impl DaySpecifier {
    fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("weekend") {
            Some(Self::Weekend)
        } else if word.eq_ignore_ascii_case("weekday") {
            Some(Self::Weekday)
        } else {
            parse_day_name(word).map(Self::Named)
        }
    }
}

/// Which way from the reference date a relative rule looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Before,
    After,
    OnOrBefore,
    OnOrAfter,
}
impl Direction {
    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "on-or-before" => Some(Self::OnOrBefore),
            "on-or-after" => Some(Self::OnOrAfter),
            _ => None,
        }
    }
    fn same_day_ok(self) -> bool {
        matches!(self, Self::OnOrBefore | Self::OnOrAfter)
    }
}

/// Re-joins a rule and its arguments, for reporting and for writing it back out. The keyword is
/// lower-cased, the arguments are left as they were.
pub(crate) fn rule_text(keyword: &str, words: &[&str]) -> String {
    if words.is_empty() {
        keyword.to_lowercase()
    } else {
        format!("{} {}", keyword.to_lowercase(), words.join(" "))
    }
}

/// Parses anything that can stand for a date: either a literal date or a rule, the latter being
/// resolved relative to `start`.
///
/// If `context` is given, this date is inside some other construct (e.g. an `:except`), and the
/// `*` yearly marker isn't allowed; `context` describes that construct for error messages.
///
/// This will return `Ok(None)` if the rule is valid, but doesn't produce a date (this happens
/// only for `:fifth` in months without five of that weekday).
pub(crate) fn parse_date(
    text: &str,
    start: NaiveDate,
    context: Option<&str>,
) -> Result<Option<EventBuilder>, ParseError> {
    let words = text.split_whitespace().collect::<Vec<_>>();
    let Some(first) = words.first() else {
        return Err(ParseError::DateShape {
            text: text.trim().to_string(),
        });
    };

    if first.starts_with(':') {
        let keyword = RuleKeyword::from_word(first).ok_or_else(|| ParseError::UnknownRule {
            word: first.to_lowercase(),
        })?;
        parse_rule(keyword, first, &words[1..], start)
    } else {
        let literal = DateLiteral::from_str(text)?;
        if literal.yearly {
            if let Some(context) = context {
                return Err(ParseError::YearlyNotAllowed {
                    text: text.trim().to_string(),
                    context: context.to_string(),
                });
            }
        }
        Ok(Some(EventBuilder::literal(literal.date, literal.yearly)))
    }
}

/// Resolves something that must produce a date, inside the construct described by `context`.
pub(crate) fn resolve_reference(
    text: &str,
    start: NaiveDate,
    context: &str,
) -> Result<NaiveDate, ParseError> {
    parse_date(text, start, Some(context))?
        .map(|builder| builder.date)
        .ok_or_else(|| ParseError::NoSuchDate {
            rule: text.trim().to_string(),
            context: context.to_string(),
        })
}

fn parse_rule(
    keyword: RuleKeyword,
    word: &str,
    args: &[&str],
    start: NaiveDate,
) -> Result<Option<EventBuilder>, ParseError> {
    let rule = rule_text(word, args);
    match keyword {
        RuleKeyword::Every => every(rule, args, start).map(Some),
        RuleKeyword::Ordinal(ordinal) => ordinal_weekday(rule, ordinal, args, start),
        RuleKeyword::Easter => easter(rule, args, start).map(Some),
        RuleKeyword::Relative(spec) => relative(rule, spec, args, start).map(Some),
    }
}

/// `:every <day-name>`, `:every day <day>` and `:every <month-name> <day>`.
fn every(rule: String, args: &[&str], start: NaiveDate) -> Result<EventBuilder, ParseError> {
    let mut recurrence = Recurrence::default();
    let date = match *args {
        [day_name] => {
            let weekday = parse_day_name(day_name).ok_or_else(|| ParseError::NotADayName {
                word: day_name.to_string(),
                rule: rule.clone(),
            })?;
            recurrence.every_n_days.insert(7);
            // Same day counts, we want the first one in the reporting window
            day_after_date(start, weekday, true)
        }
        [word, day] if word.eq_ignore_ascii_case("day") => {
            let day = day.parse::<u32>().map_err(|_| ParseError::RuleArguments {
                rule: rule.clone(),
                expected: EVERY_DAY_FORM,
            })?;
            // A day late in the month might not exist in this one, but then it will in the next
            // (unless it doesn't exist anywhere)
            let date = start.with_day(day).or_else(|| {
                first_of_month(start)
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.with_day(day))
            });
            recurrence.every_nth_of_month.insert(day);
            date.ok_or(ParseError::DayNotInMonth {
                day,
                rule: rule.clone(),
            })?
        }
        [month, day] => {
            let month = parse_month_name(month).ok_or_else(|| ParseError::RuleArguments {
                rule: rule.clone(),
                expected: EVERY_FORMS,
            })?;
            let day = day.parse::<u32>().map_err(|_| ParseError::RuleArguments {
                rule: rule.clone(),
                expected: EVERY_MONTH_DAY_FORM,
            })?;
            recurrence.yearly = true;
            // Feb 29 may well have to be next year (and if not then, it's not a date at all)
            NaiveDate::from_ymd_opt(start.year(), month, day)
                .or_else(|| NaiveDate::from_ymd_opt(start.year() + 1, month, day))
                .ok_or_else(|| ParseError::DayNotInYear { rule: rule.clone() })?
        }
        _ => {
            return Err(ParseError::RuleArguments {
                rule,
                expected: EVERY_FORMS,
            })
        }
    };

    Ok(EventBuilder::from_rule(date, rule, recurrence))
}

/// `:first <day-name>` through `:fifth`, `:last` and `:lastbutone`.
fn ordinal_weekday(
    rule: String,
    ordinal: Ordinal,
    args: &[&str],
    start: NaiveDate,
) -> Result<Option<EventBuilder>, ParseError> {
    let [day_name] = *args else {
        return Err(ParseError::RuleArguments {
            rule,
            expected: ORDINAL_FORM,
        });
    };
    let weekday = parse_day_name(day_name).ok_or_else(|| ParseError::NotADayName {
        word: day_name.to_string(),
        rule: rule.clone(),
    })?;

    let Some(date) = nth_weekday_of_month(start, ordinal, weekday) else {
        tracing::debug!("{rule:?} has no date in the month of {start}");
        return Ok(None);
    };
    let mut recurrence = Recurrence::default();
    recurrence
        .ordinal_weekdays
        .insert(OrdinalWeekday { ordinal, weekday });

    Ok(Some(EventBuilder::from_rule(date, rule, recurrence)))
}

/// `:easter <which> [<year>]`, where `<which>` is Fri/Sat/Sun/Mon or a day offset from Easter
/// Sunday. Without a year, this repeats every year relative to that year's Easter.
fn easter(rule: String, args: &[&str], start: NaiveDate) -> Result<EventBuilder, ParseError> {
    let bad_args = || ParseError::RuleArguments {
        rule: rule.clone(),
        expected: EASTER_FORMS,
    };
    let (which, year) = match *args {
        [which] => (which, None),
        [which, year] => (which, Some(year.parse::<i32>().map_err(|_| bad_args())?)),
        _ => return Err(bad_args()),
    };
    let offset = match parse_day_name(which) {
        Some(Weekday::Fri) => -2,
        Some(Weekday::Sat) => -1,
        Some(Weekday::Sun) => 0,
        Some(Weekday::Mon) => 1,
        _ => which.parse::<i64>().map_err(|_| bad_args())?,
    };

    let recurrence = Recurrence {
        yearly: year.is_none(),
        easter_offset: Some(offset),
        ..Recurrence::default()
    };
    let date = easter_sunday(year.unwrap_or(start.year()))
        .zip(Duration::try_days(offset))
        .and_then(|(easter, span)| easter.checked_add_signed(span))
        .ok_or_else(bad_args)?;

    Ok(EventBuilder::from_rule(date, rule, recurrence))
}

/// `:<day-specifier> <direction> <date>`, e.g. `:weekend on-or-after 2013 Sep 28`.
fn relative(
    rule: String,
    spec: DaySpecifier,
    args: &[&str],
    start: NaiveDate,
) -> Result<EventBuilder, ParseError> {
    let [when, reference @ ..] = args else {
        return Err(ParseError::RuleArguments {
            rule,
            expected: RELATIVE_FORMS,
        });
    };
    let direction = Direction::from_word(when).ok_or_else(|| ParseError::RuleArguments {
        rule: rule.clone(),
        expected: RELATIVE_FORMS,
    })?;
    if reference.is_empty() {
        return Err(ParseError::RuleArguments {
            rule,
            expected: RELATIVE_FORMS,
        });
    }

    let reference = resolve_reference(&reference.join(" "), start, &rule)?;
    let date = resolve_relative(spec, direction, reference);

    Ok(EventBuilder::from_rule(date, rule, Recurrence::default()))
}

/// Works out the date a relative rule refers to. Weekends and weekdays are resolved into a
/// specific day name using the reference date's own weekday, and then that day is found in the
/// given direction.
pub(crate) fn resolve_relative(
    spec: DaySpecifier,
    direction: Direction,
    reference: NaiveDate,
) -> NaiveDate {
    use Weekday::*;

    let today = reference.weekday();
    let target = match spec {
        DaySpecifier::Named(weekday) => weekday,
        DaySpecifier::Weekend => match (direction, today) {
            (Direction::After, Sat) => Sun,
            (Direction::After, _) => Sat,
            (Direction::OnOrAfter, Sun) => Sun,
            (Direction::OnOrAfter, _) => Sat,
            (Direction::Before, Sun) => Sat,
            (Direction::Before, _) => Sun,
            (Direction::OnOrBefore, Sat) => Sat,
            (Direction::OnOrBefore, _) => Sun,
        },
        DaySpecifier::Weekday => match (direction, today) {
            (Direction::After, Fri | Sat | Sun) => Mon,
            (Direction::After, day) => day.succ(),
            (Direction::OnOrAfter, Sat | Sun) => Mon,
            (Direction::OnOrAfter, day) => day,
            (Direction::Before, Sat | Sun | Mon) => Fri,
            (Direction::Before, day) => day.pred(),
            (Direction::OnOrBefore, Sat | Sun) => Fri,
            (Direction::OnOrBefore, day) => day,
        },
    };

    match direction {
        Direction::After | Direction::OnOrAfter => {
            day_after_date(reference, target, direction.same_day_ok())
        }
        Direction::Before | Direction::OnOrBefore => {
            day_before_date(reference, target, direction.same_day_ok())
        }
    }
}
