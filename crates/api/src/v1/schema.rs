//! JSON Schema exports for API v1 request DTOs.

use crate::v1::UserParam;
use schemars::{Schema, schema_for};

/// JSON Schema for `UserParam`.
#[must_use]
pub fn user_param_schema() -> Schema {
    schema_for!(UserParam)
}
