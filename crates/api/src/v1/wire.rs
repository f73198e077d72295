//! Serde adapters for the request wire formats.
//!
//! JSON and form bodies share the same DTOs. Form values always arrive as
//! text, so numeric and temporal fields accept either their native JSON
//! representation or a string; blank strings read as absent.

/// Date wire format (`yyyy-MM-dd`).
pub const DATE_PATTERN: &str = "%Y-%m-%d";

/// Date-time wire format (`yyyy-MM-dd HH:mm:ss`).
pub const DATE_TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Optional number given as a JSON number or numeric string.
pub mod option_number {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Number(T),
        Text(String),
    }

    /// Serialize in the wire format.
    #[allow(clippy::ref_option)]
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        value.serialize(serializer)
    }

    /// Deserialize from the wire format.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        match Option::<Lenient<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Lenient::Number(number)) => Ok(Some(number)),
            Some(Lenient::Text(text)) => super::non_blank(&text)
                .map(|text| text.parse().map_err(D::Error::custom))
                .transpose(),
        }
    }
}

/// Optional `yyyy-MM-dd` date.
pub mod option_date {
    use super::DATE_PATTERN;
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize in the wire format.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.collect_str(&date.format(DATE_PATTERN)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from the wire format.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .as_deref()
            .and_then(super::non_blank)
            .map(|text| NaiveDate::parse_from_str(text, DATE_PATTERN).map_err(D::Error::custom))
            .transpose()
    }
}

/// `yyyy-MM-dd HH:mm:ss` date-time.
pub mod date_time {
    use super::DATE_TIME_PATTERN;
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize in the wire format.
    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATE_TIME_PATTERN))
    }

    /// Deserialize from the wire format.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATE_TIME_PATTERN).map_err(D::Error::custom)
    }
}

/// Optional `yyyy-MM-dd HH:mm:ss` date-time.
pub mod option_date_time {
    use super::DATE_TIME_PATTERN;
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize in the wire format.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date_time) => serializer.collect_str(&date_time.format(DATE_TIME_PATTERN)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from the wire format.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .as_deref()
            .and_then(super::non_blank)
            .map(|text| NaiveDateTime::parse_from_str(text, DATE_TIME_PATTERN).map_err(D::Error::custom))
            .transpose()
    }
}
