use chrono::{Datelike, Duration, Months, NaiveDate};
use thiserror::Error;
use whatwhen::dates::parse_month_name;

/// Errors in dates given on the command line, and in the report window they make up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateArgError {
    #[error("expected a day or date (<day>[-<month>[-<year>]]), not {text:?}")]
    Shape { text: String },
    #[error("day {day:?} is not an integer")]
    Day { day: String },
    #[error("month {month:?} is not a 3-letter month name or an integer")]
    Month { month: String },
    #[error("year {year:?} is not an integer")]
    Year { year: String },
    #[error("{text:?} is not a valid date")]
    Invalid { text: String },

    #[error("start date {start} is after \"today\" {today}")]
    StartAfterToday { start: NaiveDate, today: NaiveDate },
    #[error("end date {end} is before \"today\" {today}")]
    EndBeforeToday { end: NaiveDate, today: NaiveDate },
}

/// Parses a date from the command line, relative to `today`. This may be `<day>` (in this
/// month), `<day>-<month>` (in this year) or `<day>-<month>-<year>`, where the month is a number
/// or a three-letter name.
pub fn parse_cmdline_date(text: &str, today: NaiveDate) -> Result<NaiveDate, DateArgError> {
    let parts = text.split('-').collect::<Vec<_>>();
    let (day, month, year) = match parts[..] {
        [day] => (day, None, None),
        [day, month] => (day, Some(month), None),
        [day, month, year] => (day, Some(month), Some(year)),
        _ => {
            return Err(DateArgError::Shape {
                text: text.to_string(),
            })
        }
    };

    let day = day.parse::<u32>().map_err(|_| DateArgError::Day {
        day: day.to_string(),
    })?;
    let month = match month {
        Some(month) => parse_month_name(month)
            .or_else(|| month.parse::<u32>().ok())
            .ok_or_else(|| DateArgError::Month {
                month: month.to_string(),
            })?,
        None => today.month(),
    };
    let year = match year {
        Some(year) => year.parse::<i32>().map_err(|_| DateArgError::Year {
            year: year.to_string(),
        })?,
        None => today.year(),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateArgError::Invalid {
        text: text.to_string(),
    })
}

/// Shorthands for the end of the report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Week,
    Month,
    Year,
}
impl Span {
    /// Gets the end of a window of this length starting from `today`. Month arithmetic clamps
    /// to the end of shorter months.
    pub fn end_from(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Week => today + Duration::days(7),
            Self::Month => today
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
            Self::Year => today
                .checked_add_months(Months::new(12))
                .unwrap_or(NaiveDate::MAX),
        }
    }
}

/// The dates a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub yesterday: NaiveDate,
    pub today: NaiveDate,
    pub end: NaiveDate,
}
impl Window {
    /// Works out the report window from whatever bounds were given, filling in the rest from
    /// `days_before` and `days_after` around `today`. The result always has
    /// `start <= today <= end`.
    pub fn determine(
        start: Option<NaiveDate>,
        today: NaiveDate,
        end: Option<NaiveDate>,
        days_before: u32,
        days_after: u32,
    ) -> Result<Self, DateArgError> {
        let yesterday = today - Duration::days(1);
        let start = start.unwrap_or(today - Duration::days(days_before as i64));
        let end = end.unwrap_or(today + Duration::days(days_after as i64));

        if start > today {
            return Err(DateArgError::StartAfterToday { start, today });
        }
        if end < today {
            return Err(DateArgError::EndBeforeToday { end, today });
        }

        Ok(Self {
            start,
            yesterday,
            today,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! date {
        ($year:literal, $month:literal, $day:literal) => {
            NaiveDate::from_ymd_opt($year, $month, $day).unwrap()
        };
    }

    macro_rules! test_cmdline_date {
        ($name:ident, $input:literal => $expected:expr) => {
            #[test]
            fn $name() {
                let today = date!(2013, 10, 3);
                assert_eq!(parse_cmdline_date($input, today), $expected);
            }
        };
    }

    test_cmdline_date!(day_only_should_use_this_month, "17" => Ok(date!(2013, 10, 17)));
    test_cmdline_date!(day_and_month_number_should_work, "17-11" => Ok(date!(2013, 11, 17)));
    test_cmdline_date!(day_and_month_name_should_work, "17-nov" => Ok(date!(2013, 11, 17)));
    test_cmdline_date!(full_date_should_work, "1-Jan-2014" => Ok(date!(2014, 1, 1)));
    test_cmdline_date!(
        word_day_should_fail,
        "first" => Err(DateArgError::Day { day: "first".to_string() })
    );
    test_cmdline_date!(
        bad_month_should_fail,
        "1-Movember" => Err(DateArgError::Month { month: "Movember".to_string() })
    );
    test_cmdline_date!(
        bad_year_should_fail,
        "1-1-next" => Err(DateArgError::Year { year: "next".to_string() })
    );
    test_cmdline_date!(
        impossible_date_should_fail,
        "31-Nov" => Err(DateArgError::Invalid { text: "31-Nov".to_string() })
    );
    test_cmdline_date!(
        too_many_parts_should_fail,
        "1-1-2014-1" => Err(DateArgError::Shape { text: "1-1-2014-1".to_string() })
    );

    #[test]
    fn default_window_should_surround_today() {
        let window = Window::determine(None, date!(2013, 10, 3), None, 1, 28).unwrap();
        assert_eq!(window.start, date!(2013, 10, 2));
        assert_eq!(window.yesterday, date!(2013, 10, 2));
        assert_eq!(window.end, date!(2013, 10, 31));
    }

    #[test]
    fn window_should_contain_today() {
        let today = date!(2013, 10, 3);
        assert!(matches!(
            Window::determine(Some(date!(2013, 10, 4)), today, None, 1, 28),
            Err(DateArgError::StartAfterToday { .. })
        ));
        assert!(matches!(
            Window::determine(None, today, Some(date!(2013, 10, 2)), 1, 28),
            Err(DateArgError::EndBeforeToday { .. })
        ));
    }

    #[test]
    fn spans_should_end_after_today() {
        let today = date!(2013, 1, 31);
        assert_eq!(Span::Week.end_from(today), date!(2013, 2, 7));
        assert_eq!(Span::Month.end_from(today), date!(2013, 2, 28));
        assert_eq!(Span::Year.end_from(today), date!(2014, 1, 31));
    }
}
