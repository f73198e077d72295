//! API v1 DTOs and helpers.

mod envelope;
mod failure;
mod schema;
mod translator;
mod types;
pub mod wire;

pub use envelope::{CommonResult, RespCode, UnknownRespCode};
pub use failure::{RequestFailure, ValidationFailure};
pub use schema::user_param_schema;
pub use translator::ErrorTranslator;
pub use types::*;
