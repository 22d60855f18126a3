//! Grouping of raw lines into logical records: a date line followed by any indented
//! continuation lines.

use crate::error::ParseError;

/// One logical record from an events file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    /// The (1-based) line number of the date line.
    pub lineno: usize,
    /// The date line, with trailing whitespace removed.
    pub first: &'a str,
    /// The continuation lines that followed it, with all surrounding whitespace removed. The
    /// line number of each is `lineno + 1 + index`.
    pub continuations: Vec<&'a str>,
}

/// What the last significant thing we saw was, used to explain stray indented lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preceding {
    StartOfFile,
    Comment,
    EmptyLine,
    DateLine,
    Continuation,
}
impl Preceding {
    fn describe(self) -> &'static str {
        match self {
            Self::StartOfFile => "the start of file",
            Self::Comment => "a comment",
            Self::EmptyLine => "an empty line",
            Self::DateLine => "a date line",
            Self::Continuation => "an indented line",
        }
    }
}

/// A lazy iterator over the records in some lines of text. This can only be restarted by
/// creating a new one over the same input.
///
/// Comments are whole lines whose first non-whitespace character is `#`; a `#` anywhere else
/// is just text. Both comments and empty lines end the current record.
pub struct Records<'a, L: Iterator<Item = &'a str>> {
    lines: L,
    lineno: usize,
    preceding: Preceding,
    pending: Option<Record<'a>>,
    failed: bool,
}
impl<'a, L: Iterator<Item = &'a str>> Records<'a, L> {
    /// Creates a new record iterator over the given lines.
    pub fn new(lines: L) -> Self {
        Self {
            lines,
            lineno: 0,
            preceding: Preceding::StartOfFile,
            pending: None,
            failed: false,
        }
    }
}
impl<'a> Records<'a, std::str::Lines<'a>> {
    /// Creates a record iterator over the lines of the given text.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.lines())
    }
}
impl<'a, L: Iterator<Item = &'a str>> Iterator for Records<'a, L> {
    type Item = Result<Record<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Once we've given an error, there's nothing sensible left to produce
        if self.failed {
            return None;
        }

        for raw in self.lines.by_ref() {
            self.lineno += 1;
            // Leading whitespace is meaningful, trailing isn't
            let line = raw.trim_end();

            if line.is_empty() {
                self.preceding = Preceding::EmptyLine;
                if let Some(record) = self.pending.take() {
                    return Some(Ok(record));
                }
                continue;
            }

            let content = line.trim_start();
            let indented = content.len() != line.len();

            if content.starts_with('#') {
                self.preceding = Preceding::Comment;
                if let Some(record) = self.pending.take() {
                    return Some(Ok(record));
                }
                continue;
            }

            if indented {
                match &mut self.pending {
                    Some(record) => {
                        record.continuations.push(content);
                        self.preceding = Preceding::Continuation;
                    }
                    None => {
                        self.failed = true;
                        return Some(Err(ParseError::IndentedWithoutRecord {
                            lineno: self.lineno,
                            follows: self.preceding.describe(),
                        }));
                    }
                }
            } else {
                self.preceding = Preceding::DateLine;
                let new_record = Record {
                    lineno: self.lineno,
                    first: line,
                    continuations: Vec::new(),
                };
                if let Some(record) = self.pending.replace(new_record) {
                    return Some(Ok(record));
                }
            }
        }

        // We've run out of lines, flush whatever we were working on
        self.pending.take().map(Ok)
    }
}
