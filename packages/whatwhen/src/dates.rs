//! Pure date arithmetic: finding named weekdays around a date, the nth weekday of a month, and
//! Easter Sunday. Everything here works on [`NaiveDate`], there are no time zones involved in
//! an events file.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Three-letter English month abbreviations, indexed by `month0`.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter English day abbreviations, Monday first.
pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Parses a three-letter month abbreviation (case ignored) into a month number (1-12).
pub fn parse_month_name(word: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(word))
        .map(|idx| idx as u32 + 1)
}

/// Parses a three-letter day abbreviation (case ignored) into a weekday. Full day names are not
/// accepted.
pub fn parse_day_name(word: &str) -> Option<Weekday> {
    DAY_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(word))
        .map(|idx| WEEKDAYS[idx])
}

/// The three-letter name of the given weekday.
pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// The three-letter name of the given month (1-12).
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize - 1) % 12]
}

/// Writes a date in the events file's own literal form, e.g. `2013 Oct  3 Thu`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {:2} {}",
        date.year(),
        month_name(date.month()),
        date.day(),
        day_name(date.weekday())
    )
}

/// Gets the date of the given weekday *after* `date`. If `same_day_ok` is set and `date` is
/// already on that weekday, `date` itself is returned, otherwise we always move at least one
/// day forward (and at most seven).
pub fn day_after_date(date: NaiveDate, weekday: Weekday, same_day_ok: bool) -> NaiveDate {
    let mut offset =
        weekday.number_from_monday() as i64 - date.weekday().number_from_monday() as i64;
    if offset == 0 && same_day_ok {
        return date;
    }
    if offset <= 0 {
        offset += 7;
    }
    date + Duration::days(offset)
}

/// Gets the date of the given weekday *before* `date`. This mirrors [`day_after_date`]: the
/// result is in `[date - 7, date)`, or `date` itself if `same_day_ok` and it already matches.
pub fn day_before_date(date: NaiveDate, weekday: Weekday, same_day_ok: bool) -> NaiveDate {
    let mut offset =
        weekday.number_from_monday() as i64 - date.weekday().number_from_monday() as i64;
    if offset == 0 && same_day_ok {
        return date;
    }
    if offset >= 0 {
        offset -= 7;
    }
    date + Duration::days(offset)
}

/// Computes Western Easter Sunday for the given (Gregorian) year using Butcher's algorithm.
/// This is pure integer arithmetic and valid from 1583 onward. The result is only `None` for
/// years chrono can't represent.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = (19 * a + b - b / 4 - ((b - (b + 8) / 25 + 1) / 3) + 15).rem_euclid(30);
    let e = (32 + 2 * (b % 4) + 2 * (c / 4) - d - (c % 4)).rem_euclid(7);
    let f = d + e - 7 * ((a + 11 * d + 22 * e) / 451) + 114;
    let month = f / 31;
    let day = f % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Which occurrence of a weekday within a month is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ordinal {
    First,
    Second,
    Third,
    Fourth,
    /// Only some months have a fifth of any given weekday.
    Fifth,
    Last,
    LastButOne,
}
impl Ordinal {
    /// Gets the ordinal for the given rule keyword (without its colon, case ignored).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "first" => Some(Self::First),
            "second" => Some(Self::Second),
            "third" => Some(Self::Third),
            "fourth" => Some(Self::Fourth),
            "fifth" => Some(Self::Fifth),
            "last" => Some(Self::Last),
            "lastbutone" => Some(Self::LastButOne),
            _ => None,
        }
    }
    /// The rule keyword for this ordinal, without its colon.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Fifth => "fifth",
            Self::Last => "last",
            Self::LastButOne => "lastbutone",
        }
    }
    /// The signed index of this ordinal: 1 to 5 from the start of the month, and -1/-2 counting
    /// back from its end.
    pub fn index(self) -> i8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Fifth => 5,
            Self::Last => -1,
            Self::LastButOne => -2,
        }
    }
}

/// The first day of the month `date` is in.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// The last day of the month `date` is in.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    // Only fails at the very end of chrono's range
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Gets the `ordinal`th `weekday` of the month containing `date` (any day of that month works
/// as the anchor). This is `None` only when a fifth such weekday doesn't exist in that month.
pub fn nth_weekday_of_month(date: NaiveDate, ordinal: Ordinal, weekday: Weekday) -> Option<NaiveDate> {
    let first = first_of_month(date);
    match ordinal {
        Ordinal::First | Ordinal::Second | Ordinal::Third | Ordinal::Fourth | Ordinal::Fifth => {
            let weeks_in = ordinal.index() as i64 - 1;
            let found = day_after_date(first + Duration::weeks(weeks_in), weekday, true);
            // Only the fifth can spill over into the next month
            if found.month() == first.month() {
                Some(found)
            } else {
                None
            }
        }
        Ordinal::Last => Some(day_before_date(last_of_month(date), weekday, true)),
        Ordinal::LastButOne => Some(day_before_date(
            last_of_month(date) - Duration::days(7),
            weekday,
            true,
        )),
    }
}

/// Constructs a date from its components, explaining what was wrong if that isn't possible.
pub(crate) fn date_from_ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, &'static str> {
    if !(1..=12).contains(&month) {
        return Err("month must be in 1..12");
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or("year is out of range")?;
    if day == 0 || day > last_of_month(first).day() {
        return Err("day is out of range for month");
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or("day is out of range for month")
}
