//! Constraint evaluators.
//!
//! Every evaluator is a pure function of an optional value. Absent values are
//! valid for every rule except the presence rules ([`required`],
//! [`not_blank`], [`not_empty`]); requiredness is always declared separately.

mod date_format;
mod pattern;

pub use date_format::{DATE_FORMAT, DATE_TIME_FORMAT, DateFormatRule, DatePattern, DatePatternError};
pub use pattern::{ID_NO_REGEXP, PHONE_NO_REGEXP, PatternRule};

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Default violation messages.
pub mod messages {
    /// `required`
    pub const REQUIRED: &str = "must not be null";
    /// `not_blank`
    pub const NOT_BLANK: &str = "must not be blank";
    /// `not_empty`
    pub const NOT_EMPTY: &str = "must not be empty";
    /// `positive`
    pub const POSITIVE: &str = "must be greater than 0";
    /// `email`
    pub const EMAIL: &str = "must be a well-formed email address";
    /// `past`
    pub const PAST: &str = "must be a past date";
    /// `past_or_present`
    pub const PAST_OR_PRESENT: &str = "must be a date in the past or in the present";
    /// `phone_no`: "phone number format is incorrect".
    pub const PHONE_NO: &str = "电话号码格式不正确";
    /// `id_no`: "ID number format is incorrect".
    pub const ID_NO: &str = "身份证号码格式不正确";
    /// `date_format`: "date format is incorrect".
    pub const DATE_FORMAT: &str = "日期格式不正确";
    /// `date_time_format`: "date-time format is incorrect".
    pub const DATE_TIME_FORMAT: &str = "日期时间格式不正确";

    /// Message for a lower bound check.
    pub fn min(bound: impl std::fmt::Display) -> String {
        format!("must be greater than or equal to {bound}")
    }
}

static PHONE_NO: PatternRule = PatternRule::new(PHONE_NO_REGEXP);
static ID_NO: PatternRule = PatternRule::new(ID_NO_REGEXP);
static DATE: DateFormatRule = DateFormatRule::new(DATE_FORMAT);
static DATE_TIME: DateFormatRule = DateFormatRule::new(DATE_TIME_FORMAT);

static EMAIL_LOCAL: PatternRule = PatternRule::new(
    r"(?i)[a-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{FFFF}-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{FFFF}-]+)*",
);
static EMAIL_DOMAIN: PatternRule = PatternRule::new(
    r"(?i)(?:[a-z0-9\x{80}-\x{FFFF}](?:[a-z0-9\x{80}-\x{FFFF}-]{0,61}[a-z0-9\x{80}-\x{FFFF}])?(?:\.[a-z0-9\x{80}-\x{FFFF}](?:[a-z0-9\x{80}-\x{FFFF}-]{0,61}[a-z0-9\x{80}-\x{FFFF}])?)*|\[[0-9]{1,3}(?:\.[0-9]{1,3}){3}\])",
);

const MAX_EMAIL_LOCAL_LENGTH: usize = 64;
const MAX_EMAIL_DOMAIN_LENGTH: usize = 255;

/// Values with a measurable size: UTF-16 code units for strings, element
/// count for collections.
///
/// Characters outside the Basic Multilingual Plane count twice, so
/// `length(max = 32)` admits 16 emoji.
pub trait HasLength {
    /// Size used by `length` and `not_empty`.
    fn length(&self) -> usize;
}

impl HasLength for str {
    fn length(&self) -> usize {
        self.encode_utf16().count()
    }
}

impl HasLength for String {
    fn length(&self) -> usize {
        self.as_str().length()
    }
}

impl<T> HasLength for [T] {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> HasLength for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

/// Numbers with a zero value.
pub trait Numeric: PartialOrd + Copy {
    /// Additive identity.
    const ZERO: Self;
}

macro_rules! impl_numeric {
    ($zero:literal => $($ty:ty),+) => {
        $(impl Numeric for $ty {
            const ZERO: Self = $zero;
        })+
    };
}

impl_numeric!(0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_numeric!(0.0 => f32, f64);

/// Date and time values comparable with the current local instant.
pub trait Temporal: PartialOrd + Sized {
    /// Current value in the local time zone.
    fn now() -> Self;
}

impl Temporal for NaiveDate {
    fn now() -> Self {
        Local::now().date_naive()
    }
}

impl Temporal for NaiveDateTime {
    fn now() -> Self {
        Local::now().naive_local()
    }
}

/// Value must be present.
pub const fn required<T: ?Sized>(value: Option<&T>) -> bool {
    value.is_some()
}

/// Value must be present and contain a non-whitespace character.
pub fn not_blank<S: AsRef<str> + ?Sized>(value: Option<&S>) -> bool {
    value.is_some_and(|value| !value.as_ref().trim().is_empty())
}

/// Value must be present and non-empty.
pub fn not_empty<T: HasLength + ?Sized>(value: Option<&T>) -> bool {
    value.is_some_and(|value| value.length() > 0)
}

/// Size must lie within `min..=max`.
pub fn length<T: HasLength + ?Sized>(value: Option<&T>, min: usize, max: usize) -> bool {
    value.is_none_or(|value| (min..=max).contains(&value.length()))
}

/// Value must lie within `min..=max`.
pub fn range<N: PartialOrd>(value: Option<&N>, min: N, max: N) -> bool {
    value.is_none_or(|value| *value >= min && *value <= max)
}

/// Value must be at least `bound`.
pub fn min<N: PartialOrd>(value: Option<&N>, bound: N) -> bool {
    value.is_none_or(|value| *value >= bound)
}

/// Value must be strictly greater than zero.
pub fn positive<N: Numeric>(value: Option<&N>) -> bool {
    value.is_none_or(|value| *value > N::ZERO)
}

/// Value must be a well-formed email address.
pub fn email<S: AsRef<str> + ?Sized>(value: Option<&S>) -> bool {
    value.map(AsRef::as_ref).is_none_or(|value| {
        if value.is_empty() {
            return true;
        }
        let Some((local, domain)) = value.rsplit_once('@') else {
            return false;
        };
        local.len() <= MAX_EMAIL_LOCAL_LENGTH
            && domain.len() <= MAX_EMAIL_DOMAIN_LENGTH
            && EMAIL_LOCAL.is_match(local)
            && EMAIL_DOMAIN.is_match(domain)
    })
}

/// Value must be strictly before now.
pub fn past<T: Temporal>(value: Option<&T>) -> bool {
    value.is_none_or(|value| *value < T::now())
}

/// Value must not be after now.
pub fn past_or_present<T: Temporal>(value: Option<&T>) -> bool {
    value.is_none_or(|value| *value <= T::now())
}

/// Value must be a phone number (8 to 11 digits).
pub fn phone_no<S: AsRef<str> + ?Sized>(value: Option<&S>) -> bool {
    PHONE_NO.accepts(value)
}

/// Value must be an 18-character national ID number.
pub fn id_no<S: AsRef<str> + ?Sized>(value: Option<&S>) -> bool {
    ID_NO.accepts(value)
}

/// Value must be a `yyyy-MM-dd` date.
pub fn date_format<S: AsRef<str> + ?Sized>(value: Option<&S>) -> bool {
    DATE.accepts(value)
}

/// Value must be a `yyyy-MM-dd HH:mm:ss` date-time.
pub fn date_time_format<S: AsRef<str> + ?Sized>(value: Option<&S>) -> bool {
    DATE_TIME.accepts(value)
}
