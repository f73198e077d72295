//! Date and date-time format constraint.
//!
//! Patterns use the `yyyy-MM-dd HH:mm:ss` letter syntax. A pattern is
//! translated once into a chrono format string; a value is valid when it
//! parses against that format and formats back to exactly the same text.
//! The round trip rejects unpadded fields, out-of-range calendar values and
//! trailing input uniformly.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Default date pattern.
pub const DATE_FORMAT: &str = "yyyy-MM-dd";

/// Default date-time pattern.
pub const DATE_TIME_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

/// Errors raised while compiling a date pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatePatternError {
    /// A run of pattern letters has no chrono equivalent.
    #[error("unsupported pattern letters `{run}`")]
    UnsupportedLetters {
        /// The offending letter run.
        run: String,
    },
    /// A quoted literal was never closed.
    #[error("unterminated quoted literal")]
    UnterminatedQuote,
    /// The pattern names neither a full date nor a full time of day.
    #[error("pattern `{pattern}` does not describe a complete date or time")]
    Incomplete {
        /// The pattern as declared.
        pattern: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    Date,
    DateTime,
    Time,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default)]
struct Fields {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    hour12: bool,
    minute: bool,
    second: bool,
    fraction: bool,
    meridiem: bool,
}

impl Fields {
    const fn kind(&self) -> Option<PatternKind> {
        let date = self.year && self.month && self.day;
        let any_time = self.hour || self.hour12 || self.minute || self.second || self.fraction;
        let time = (self.hour || (self.hour12 && self.meridiem)) && self.minute;
        match (date, any_time, time) {
            (true, false, _) => Some(PatternKind::Date),
            (true, true, true) => Some(PatternKind::DateTime),
            (false, true, true) if !self.year && !self.month && !self.day => {
                Some(PatternKind::Time)
            }
            _ => None,
        }
    }
}

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    chrono: String,
    kind: PatternKind,
}

impl DatePattern {
    /// Translate a letter pattern into a chrono format.
    pub fn compile(pattern: &str) -> Result<Self, DatePatternError> {
        let mut chrono = String::with_capacity(pattern.len() * 2);
        let mut fields = Fields::default();
        let mut chars = pattern.chars().peekable();

        while let Some(current) = chars.next() {
            if current == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    chrono.push('\'');
                    continue;
                }
                loop {
                    match chars.next() {
                        None => return Err(DatePatternError::UnterminatedQuote),
                        Some('\'') if chars.peek() == Some(&'\'') => {
                            chars.next();
                            chrono.push('\'');
                        }
                        Some('\'') => break,
                        Some(literal) => push_literal(&mut chrono, literal),
                    }
                }
                continue;
            }

            if !current.is_ascii_alphabetic() {
                push_literal(&mut chrono, current);
                continue;
            }

            let mut count = 1;
            while chars.peek() == Some(&current) {
                chars.next();
                count += 1;
            }
            let specifier = letter_specifier(current, count, &mut fields).ok_or_else(|| {
                DatePatternError::UnsupportedLetters {
                    run: current.to_string().repeat(count),
                }
            })?;
            chrono.push_str(specifier);
        }

        let kind = fields.kind().ok_or_else(|| DatePatternError::Incomplete {
            pattern: pattern.to_owned(),
        })?;
        Ok(Self { chrono, kind })
    }

    /// The translated chrono format string.
    #[must_use]
    pub fn chrono_format(&self) -> &str {
        &self.chrono
    }

    /// Returns true when `value` parses and round-trips exactly.
    pub fn matches(&self, value: &str) -> bool {
        let mut formatted = String::with_capacity(value.len());
        let written = match self.kind {
            PatternKind::Date => NaiveDate::parse_from_str(value, &self.chrono)
                .ok()
                .map(|date| write!(formatted, "{}", date.format(&self.chrono))),
            PatternKind::DateTime => NaiveDateTime::parse_from_str(value, &self.chrono)
                .ok()
                .map(|date_time| write!(formatted, "{}", date_time.format(&self.chrono))),
            PatternKind::Time => NaiveTime::parse_from_str(value, &self.chrono)
                .ok()
                .map(|time| write!(formatted, "{}", time.format(&self.chrono))),
        };
        matches!(written, Some(Ok(()))) && formatted == value
    }
}

fn push_literal(chrono: &mut String, literal: char) {
    if literal == '%' {
        chrono.push_str("%%");
    } else {
        chrono.push(literal);
    }
}

fn letter_specifier(letter: char, count: usize, fields: &mut Fields) -> Option<&'static str> {
    let specifier = match (letter, count) {
        ('y' | 'u', 4) => "%Y",
        ('y' | 'u', 2) => "%y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', 4) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('S', 3) => "%3f",
        ('a', 1) => "%p",
        _ => return None,
    };
    match letter {
        'y' | 'u' => fields.year = true,
        'M' => fields.month = true,
        'd' => fields.day = true,
        'H' => fields.hour = true,
        'h' => fields.hour12 = true,
        'm' => fields.minute = true,
        's' => fields.second = true,
        'S' => fields.fraction = true,
        _ => fields.meridiem = true,
    }
    Some(specifier)
}

/// A date pattern compiled on first use.
///
/// A pattern that cannot be compiled rejects every non-blank value.
#[derive(Debug)]
pub struct DateFormatRule {
    pattern: &'static str,
    compiled: OnceLock<Option<DatePattern>>,
}

impl DateFormatRule {
    /// Declare a rule for `pattern`.
    #[must_use]
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            compiled: OnceLock::new(),
        }
    }

    /// Pattern as declared.
    #[must_use]
    pub const fn pattern(&self) -> &'static str {
        self.pattern
    }

    fn compiled(&self) -> Option<&DatePattern> {
        self.compiled
            .get_or_init(|| DatePattern::compile(self.pattern).ok())
            .as_ref()
    }

    /// Absent and blank values pass; anything else must match exactly.
    pub fn accepts<S: AsRef<str> + ?Sized>(&self, value: Option<&S>) -> bool {
        value.map(AsRef::as_ref).is_none_or(|value| {
            value.trim().is_empty() || self.compiled().is_some_and(|pattern| pattern.matches(value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_default_patterns() -> Result<(), DatePatternError> {
        assert_eq!(DatePattern::compile(DATE_FORMAT)?.chrono_format(), "%Y-%m-%d");
        assert_eq!(
            DatePattern::compile(DATE_TIME_FORMAT)?.chrono_format(),
            "%Y-%m-%d %H:%M:%S"
        );
        assert_eq!(
            DatePattern::compile("yyyy-MM-dd'T'HH:mm:ss.SSS")?.chrono_format(),
            "%Y-%m-%dT%H:%M:%S.%3f"
        );
        assert_eq!(DatePattern::compile("HH:mm '100%'")?.chrono_format(), "%H:%M 100%%");
        Ok(())
    }

    #[test]
    fn rejects_unusable_patterns() {
        assert!(matches!(
            DatePattern::compile("yyyy-QQ-dd"),
            Err(DatePatternError::UnsupportedLetters { .. })
        ));
        assert_eq!(
            DatePattern::compile("yyyy-MM-dd 'T"),
            Err(DatePatternError::UnterminatedQuote)
        );
        assert!(matches!(
            DatePattern::compile("yyyy-MM"),
            Err(DatePatternError::Incomplete { .. })
        ));
        assert!(matches!(
            DatePattern::compile("yyyy-MM-dd HH"),
            Err(DatePatternError::Incomplete { .. })
        ));
    }

    #[test]
    fn date_values() {
        let rule = DateFormatRule::new(DATE_FORMAT);
        assert!(rule.accepts(Some("2000-01-01")));
        assert!(rule.accepts(Some("2024-02-29")));
        assert!(!rule.accepts(Some("2023-02-29")));
        assert!(!rule.accepts(Some("2000-1-1")));
        assert!(!rule.accepts(Some("2000/01/01")));
        assert!(!rule.accepts(Some("2000-01-01 00:00:00")));
        assert!(!rule.accepts(Some("2000-13-01")));
    }

    #[test]
    fn blank_and_absent_values_pass() {
        let rule = DateFormatRule::new(DATE_FORMAT);
        assert!(rule.accepts::<str>(None));
        assert!(rule.accepts(Some("")));
        assert!(rule.accepts(Some("   ")));
    }

    #[test]
    fn date_time_values() {
        let rule = DateFormatRule::new(DATE_TIME_FORMAT);
        assert!(rule.accepts(Some("2020-09-04 12:10:22")));
        assert!(!rule.accepts(Some("2020-09-04 24:10:22")));
        assert!(!rule.accepts(Some("2020-09-04T12:10:22")));
        assert!(!rule.accepts(Some("2020-09-04 12:10")));
    }

    #[test]
    fn unusable_pattern_rejects_every_value() {
        let rule = DateFormatRule::new("yyyy-QQ");
        assert!(!rule.accepts(Some("2020-01")));
        assert_eq!(rule.pattern(), "yyyy-QQ");
    }

    #[test]
    fn time_only_and_twelve_hour_patterns() {
        let time = DateFormatRule::new("HH:mm");
        assert!(time.accepts(Some("09:30")));
        assert!(!time.accepts(Some("9:30")));

        let twelve = DateFormatRule::new("yyyy-MM-dd hh:mm a");
        assert!(twelve.accepts(Some("2020-09-04 09:30 PM")));
        assert!(!twelve.accepts(Some("2020-09-04 13:30 PM")));
    }
}
