//! # validation-demo-shared
//!
//! Foundational types shared by every crate in the validation-demo workspace.
//!
//! - Result and error envelope types
//! - Validation traits, scenarios and violation sets
//! - Constraint evaluators (phone number, ID number, date formats, ...)
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Pure evaluators** - Constraint checks never fail, they only answer valid/invalid

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod constraints;
pub mod errors;
pub mod result;
pub mod validation;

pub use constraints::{DatePattern, DatePatternError, DateFormatRule, PatternRule};
pub use errors::{ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use result::Result;
pub use validation::{
    Group, ParameterCheck, Scenario, Validate, ValidationContext, Violation, Violations,
};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
