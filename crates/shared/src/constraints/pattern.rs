//! Regular-expression constraint.

use regex::Regex;
use std::sync::OnceLock;

/// Mainland phone numbers: 8 to 11 ASCII digits.
pub const PHONE_NO_REGEXP: &str = r"^[0-9]{8,11}$";

/// 18-character national ID numbers (region, birth date, sequence, checksum).
pub const ID_NO_REGEXP: &str =
    r"^[1-9][0-9]{5}(18|19|20|(3[0-9]))[0-9]{2}((0[1-9])|(1[0-2]))(([0-2][1-9])|10|20|30|31)[0-9]{3}[0-9Xx]$";

/// A regular expression compiled on first use and matched against whole
/// values.
///
/// Declared as a `static` per rule site; compilation happens at most once.
/// An expression that fails to compile rejects every non-empty value.
/// `\d` follows the `regex` crate and matches any Unicode digit; write
/// `[0-9]` for ASCII-only digits.
#[derive(Debug)]
pub struct PatternRule {
    source: &'static str,
    compiled: OnceLock<Option<Regex>>,
}

impl PatternRule {
    /// Declare a rule for `source`.
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    /// Expression as declared.
    #[must_use]
    pub const fn source(&self) -> &'static str {
        self.source
    }

    fn regex(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| Regex::new(&format!("^(?:{})$", self.source)).ok())
            .as_ref()
    }

    /// Returns true when the whole of `value` matches.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex().is_some_and(|regex| regex.is_match(value))
    }

    /// Absent and empty values pass; anything else must match.
    pub fn accepts<S: AsRef<str> + ?Sized>(&self, value: Option<&S>) -> bool {
        value
            .map(AsRef::as_ref)
            .is_none_or(|value| value.is_empty() || self.is_match(value))
    }
}
