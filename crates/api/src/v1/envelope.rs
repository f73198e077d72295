//! Uniform response envelope.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Response code carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum RespCode {
    /// Request handled.
    Success,
    /// Request parameters failed validation.
    ParamInvalid,
    /// Any other failure.
    Failed,
}

impl RespCode {
    /// Numeric wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 100,
            Self::ParamInvalid => 101,
            Self::Failed => 200,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ParamInvalid => "parameter invalid",
            Self::Failed => "system error",
        }
    }

    /// Look up a code by its numeric value.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            100 => Some(Self::Success),
            101 => Some(Self::ParamInvalid),
            200 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns true when `code` is this code's numeric value.
    #[must_use]
    pub const fn equals_code(self, code: i32) -> bool {
        self.code() == code
    }
}

impl fmt::Display for RespCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} ({})", self.code(), self.description())
    }
}

/// A numeric code outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown response code {0}")]
pub struct UnknownRespCode(pub i32);

impl From<RespCode> for i32 {
    fn from(code: RespCode) -> Self {
        code.code()
    }
}

impl TryFrom<i32> for RespCode {
    type Error = UnknownRespCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownRespCode(code))
    }
}

/// Response envelope: `{respCode, data, rows, msg, total}`.
///
/// Absent members serialize as `null`; all five keys are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonResult<T> {
    /// Outcome code.
    pub resp_code: RespCode,
    /// Single payload.
    pub data: Option<T>,
    /// List payload.
    pub rows: Option<Vec<T>>,
    /// Message for the caller.
    pub msg: Option<String>,
    /// Total count accompanying `rows`.
    pub total: Option<u64>,
}

impl<T> CommonResult<T> {
    /// Envelope with `resp_code` and nothing else.
    #[must_use]
    pub const fn respond_with(resp_code: RespCode) -> Self {
        Self {
            resp_code,
            data: None,
            rows: None,
            msg: None,
            total: None,
        }
    }

    /// Envelope with `resp_code` and an optional message.
    #[must_use]
    pub fn respond_with_message(resp_code: RespCode, msg: Option<String>) -> Self {
        Self {
            msg,
            ..Self::respond_with(resp_code)
        }
    }

    /// Bare success.
    #[must_use]
    pub const fn success() -> Self {
        Self::respond_with(RespCode::Success)
    }

    /// Success carrying a message.
    #[must_use]
    pub fn success_with_message(msg: impl Into<String>) -> Self {
        Self::respond_with_message(RespCode::Success, Some(msg.into()))
    }

    /// Success carrying a single payload.
    #[must_use]
    pub fn success_with_data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::success()
        }
    }

    /// Success carrying a page of rows and the overall total.
    #[must_use]
    pub fn success_with_rows(rows: Vec<T>, total: u64) -> Self {
        Self {
            rows: Some(rows),
            total: Some(total),
            ..Self::success()
        }
    }

    /// Bare failure.
    #[must_use]
    pub const fn failed() -> Self {
        Self::respond_with(RespCode::Failed)
    }

    /// Failure carrying a message.
    #[must_use]
    pub fn failed_with_message(msg: impl Into<String>) -> Self {
        Self::respond_with_message(RespCode::Failed, Some(msg.into()))
    }
}
