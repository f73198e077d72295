//! # validation-demo-http
//!
//! axum router for the `/user` endpoints. Request bodies and parameters are
//! validated on the way in; every failure is translated into the response
//! envelope by one middleware, so handlers only see valid input.

mod extract;
mod failure;
mod fixtures;
/// Nested form-key binding.
pub mod form;
mod handlers;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use validation_demo_api::v1::ErrorTranslator;

pub use extract::{OnCreate, OnUpdate, ScenarioMarker, ValidatedForm, ValidatedJson};
pub use failure::Rejection;

/// Read-only state shared by all requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppState {
    translator: ErrorTranslator,
}

impl AppState {
    /// State backed by `translator`.
    #[must_use]
    pub const fn new(translator: ErrorTranslator) -> Self {
        Self { translator }
    }

    /// Translator applied to request failures.
    #[must_use]
    pub const fn translator(&self) -> &ErrorTranslator {
        &self.translator
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);
    Router::new()
        .route("/user/detail", get(handlers::detail))
        .route("/user/add", post(handlers::add))
        .route("/user/addForm", post(handlers::add_form))
        .route("/user/update", post(handlers::update))
        .layer(CatchPanicLayer::custom(failure::panic_failure))
        .layer(middleware::from_fn_with_state(
            state,
            failure::translate_failures,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Returns the http crate version.
#[must_use]
pub const fn http_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
