//! Maps request failures onto response envelopes.

use crate::v1::{CommonResult, RequestFailure, RespCode, ValidationFailure};
use validation_demo_shared::Violations;

const SEPARATOR_COLON: &str = ": ";
const SEPARATOR_COMMA: &str = ", ";

/// Translates failures into envelopes.
///
/// Validation failures become `PARAM_INVALID` with a `field: message` list
/// (or no message when messages are disabled); everything else becomes a
/// bare `FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTranslator {
    message_enabled: bool,
}

impl ErrorTranslator {
    /// Create a translator.
    #[must_use]
    pub const fn new(message_enabled: bool) -> Self {
        Self { message_enabled }
    }

    /// Whether violation messages reach the caller.
    #[must_use]
    pub const fn message_enabled(&self) -> bool {
        self.message_enabled
    }

    /// Envelope for `failure`.
    #[must_use]
    pub fn translate(&self, failure: &RequestFailure) -> CommonResult<()> {
        match failure {
            RequestFailure::Validation(
                ValidationFailure::Body(violations) | ValidationFailure::Form(violations),
            ) => {
                CommonResult::respond_with_message(
                    RespCode::ParamInvalid,
                    self.format_violations(violations, false),
                )
            },
            RequestFailure::Validation(ValidationFailure::Parameter(violations)) => {
                CommonResult::respond_with_message(
                    RespCode::ParamInvalid,
                    self.format_violations(violations, true),
                )
            },
            RequestFailure::Unexpected(_) => CommonResult::failed(),
        }
    }

    /// `field: message` segments joined by `", "`.
    ///
    /// `None` when messages are disabled or there is nothing to report.
    /// `leaf_only` keeps only the segment after the last `.` of each path.
    #[must_use]
    pub fn format_violations(&self, violations: &Violations, leaf_only: bool) -> Option<String> {
        if !self.message_enabled || violations.is_empty() {
            return None;
        }
        let mut message = String::new();
        for violation in violations {
            if !message.is_empty() {
                message.push_str(SEPARATOR_COMMA);
            }
            let path = violation.path();
            let label = if leaf_only {
                path.rsplit_once('.').map_or(path, |(_, leaf)| leaf)
            } else {
                path
            };
            message.push_str(label);
            message.push_str(SEPARATOR_COLON);
            message.push_str(violation.message());
        }
        Some(message)
    }
}

impl Default for ErrorTranslator {
    fn default() -> Self {
        Self::new(true)
    }
}
