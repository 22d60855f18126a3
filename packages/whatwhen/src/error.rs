use thiserror::Error;

/// Errors that can occur while parsing an events file. Every failure, whether structural
/// (a missing comma, a stray indented line) or semantic (a day name that doesn't match its
/// date), is one of these, and parsing stops at the first one.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("error in line {lineno}\n{source}\n{lineno}: {line:?}")]
    AtLine {
        lineno: usize,
        line: String,
        #[source]
        source: Box<ParseError>,
    },

    // Record structure
    #[error("line {lineno} is indented, but follows {follows}")]
    IndentedWithoutRecord { lineno: usize, follows: &'static str },
    #[error("missing comma in line {lineno}\nunindented lines should be of the form <date>, <text>\n{lineno}: {line:?}")]
    MissingComma { lineno: usize, line: String },
    #[error("no text after comma in line {lineno}\nunindented lines should be of the form <date>, <text>\n{lineno}: {line:?}")]
    MissingText { lineno: usize, line: String },
    #[error("indented line should be a <condition>, starting with a colon")]
    NotACondition,

    // Date literals
    #[error("date must be <year>[*] <month-name> <day>\n          or <year>[*] <month-name> <day> <day-name>\nnot {text:?}")]
    DateShape { text: String },
    #[error("year {year:?} is not an integer")]
    YearNotInteger { year: String },
    #[error("month {month:?} is not one of Jan..Dec")]
    UnknownMonth { month: String },
    #[error("day {day:?} is not an integer")]
    DayNotInteger { day: String },
    #[error("day name {name:?} is not one of Mon..Sun")]
    UnknownDayName { name: String },
    #[error("{date} is {actual}, not {given}")]
    WrongDayName {
        date: String,
        actual: &'static str,
        given: String,
    },
    #[error("date {text:?} is not a valid date: {reason}")]
    InvalidDate { text: String, reason: &'static str },
    #[error("the \"yearly\" asterisk is not allowed in {text}\nit does not make sense inside {context}")]
    YearlyNotAllowed { text: String, context: String },

    // Rules that compute an anchor date
    #[error("unexpected \":\" word as <date>, {word:?}")]
    UnknownRule { word: String },
    #[error("expected {expected}\nnot {rule:?}")]
    RuleArguments { rule: String, expected: &'static str },
    #[error("expected a day name (Mon..Sun), not {word:?}, in {rule:?}")]
    NotADayName { word: String, rule: String },
    #[error("day {day} does not occur in this month or the next, in {rule:?}")]
    DayNotInMonth { day: u32, rule: String },
    #[error("{rule:?} does not give a date in this year or the next")]
    DayNotInYear { rule: String },
    #[error("{rule:?} does not resolve to a date, so it does not make sense inside {context}")]
    NoSuchDate { rule: String, context: String },

    // Conditions on continuation lines
    #[error("unexpected \":\" word as <condition>, {word:?}")]
    UnknownCondition { word: String },
    #[error("not expecting text after {keyword}, in {rule:?}")]
    UnexpectedArguments { keyword: &'static str, rule: String },
    #[error("expected {expected}\nnot {rule:?}")]
    ConditionArguments { rule: String, expected: &'static str },
    #[error("the count in {rule:?} must be at least 1")]
    ZeroCount { rule: String },
    #[error("the count in {rule:?} goes past the last supported date")]
    CountTooLarge { rule: String },
    #[error("date in {rule:?} is before main date {anchor}")]
    UntilBeforeAnchor { rule: String, anchor: String },
    #[error("date in {rule:?} is before the :from date {from}")]
    UntilBeforeFrom { rule: String, from: String },
    #[error("date in {rule:?} is after the :until date {until}")]
    FromAfterUntil { rule: String, until: String },
}

impl ParseError {
    /// Attaches the line this error was found on, unless it already has one.
    pub(crate) fn at_line(self, lineno: usize, line: &str) -> Self {
        match self {
            // These already quote their own line
            Self::AtLine { .. }
            | Self::IndentedWithoutRecord { .. }
            | Self::MissingComma { .. }
            | Self::MissingText { .. } => self,
            other => Self::AtLine {
                lineno,
                line: line.to_string(),
                source: Box::new(other),
            },
        }
    }
}
