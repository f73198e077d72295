//! Request failure taxonomy consumed by the error translator.

use std::fmt;
use validation_demo_shared::{ErrorEnvelope, Violations};

/// Violations raised at one of the three validation trigger points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// A JSON request body failed validation.
    Body(Violations),
    /// A form-encoded request body failed validation.
    Form(Violations),
    /// Inline handler parameters failed validation.
    ///
    /// Paths are qualified with the handler name (`getUser.id`).
    Parameter(Violations),
}

impl ValidationFailure {
    /// Violations regardless of trigger point.
    #[must_use]
    pub const fn violations(&self) -> &Violations {
        match self {
            Self::Body(violations) | Self::Form(violations) | Self::Parameter(violations) => {
                violations
            },
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn trigger(&self) -> &'static str {
        match self {
            Self::Body(_) => "body",
            Self::Form(_) => "form",
            Self::Parameter(_) => "parameter",
        }
    }
}

/// Anything that can stop a request before the handler produces a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// Validation found violations.
    Validation(ValidationFailure),
    /// Any other failure: unreadable input, handler errors, panics.
    Unexpected(ErrorEnvelope),
}

impl From<ValidationFailure> for RequestFailure {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}

impl From<ErrorEnvelope> for RequestFailure {
    fn from(error: ErrorEnvelope) -> Self {
        Self::Unexpected(error)
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(failure) => write!(
                formatter,
                "{} validation failed: {}",
                failure.trigger(),
                failure.violations()
            ),
            Self::Unexpected(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for RequestFailure {}
