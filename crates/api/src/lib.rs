//! # validation-demo-api
//!
//! Request DTOs, the `CommonResult` response envelope and the translator
//! that turns request failures into envelopes.
//! This crate depends only on `shared`.

/// API v1 DTOs.
pub mod v1;

/// Returns the api crate version.
#[must_use]
pub const fn api_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation_demo_shared::shared_crate_version;

    #[test]
    fn api_can_use_shared() {
        assert!(!api_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
