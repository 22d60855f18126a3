//! Parsing of literal dates of the form `<year>[*] <month-name> <day> [<day-name>]`.

use crate::dates::{date_from_ymd, day_name, month_name, parse_day_name, parse_month_name};
use crate::error::ParseError;
use chrono::{Datelike, NaiveDate};

/// A date written out literally in an events file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLiteral {
    pub date: NaiveDate,
    /// Whether the year was followed by `*`, meaning the date repeats every year.
    pub yearly: bool,
}
impl DateLiteral {
    /// Parses a literal date from the given text. This must be three words
    /// (`<year>[*] <month-name> <day>`) or four (the same, followed by a day name). If a day
    /// name is given, it must be the actual day of the week of that date.
    pub fn from_str(text: &str) -> Result<Self, ParseError> {
        let words = text.split_whitespace().collect::<Vec<_>>();
        let (year, month, day, given_day_name) = match words[..] {
            [year, month, day] => (year, month, day, None),
            [year, month, day, day_name] => (year, month, day, Some(day_name)),
            _ => {
                return Err(ParseError::DateShape {
                    text: words.join(" "),
                })
            }
        };

        let (year, yearly) = match year.strip_suffix('*') {
            Some(year) => (year, true),
            None => (year, false),
        };
        let year = year.parse::<i32>().map_err(|_| ParseError::YearNotInteger {
            year: year.to_string(),
        })?;
        let month = parse_month_name(month).ok_or_else(|| ParseError::UnknownMonth {
            month: month.to_string(),
        })?;
        let day = day.parse::<u32>().map_err(|_| ParseError::DayNotInteger {
            day: day.to_string(),
        })?;
        let weekday = given_day_name
            .map(|name| {
                parse_day_name(name).ok_or_else(|| ParseError::UnknownDayName {
                    name: name.to_string(),
                })
            })
            .transpose()?;

        let date = date_from_ymd(year, month, day).map_err(|reason| ParseError::InvalidDate {
            text: words.join(" "),
            reason,
        })?;

        if let (Some(weekday), Some(given)) = (weekday, given_day_name) {
            if date.weekday() != weekday {
                return Err(ParseError::WrongDayName {
                    date: format!("{} {} {}", date.year(), month_name(date.month()), date.day()),
                    actual: day_name(date.weekday()),
                    given: given.to_string(),
                });
            }
        }

        Ok(Self { date, yearly })
    }
}
