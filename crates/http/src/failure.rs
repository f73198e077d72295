//! Failure propagation from extractors and handlers to the translator.
//!
//! Extractors and handlers never build envelopes themselves. They return a
//! [`Rejection`], which parks the [`RequestFailure`] in the response
//! extensions; [`translate_failures`] turns it into the envelope body.

use crate::AppState;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use std::sync::Arc;
use tracing::warn;
use validation_demo_api::v1::{RequestFailure, ValidationFailure};
use validation_demo_shared::{ErrorCode, ErrorEnvelope};

/// Request failure raised before a handler produced a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection(pub RequestFailure);

impl From<ValidationFailure> for Rejection {
    fn from(failure: ValidationFailure) -> Self {
        Self(RequestFailure::Validation(failure))
    }
}

impl From<ErrorEnvelope> for Rejection {
    fn from(error: ErrorEnvelope) -> Self {
        Self(RequestFailure::Unexpected(error))
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let mut response = StatusCode::OK.into_response();
        response.extensions_mut().insert(self.0);
        response
    }
}

/// Unreadable body or query string (`source` is `body`, `form` or `query`).
pub(crate) fn unreadable(source: &'static str, detail: impl Into<String>) -> Rejection {
    ErrorEnvelope::expected(ErrorCode::invalid_input(), detail)
        .with_metadata("source", source)
        .into()
}

/// Replace a parked [`RequestFailure`] with its translated envelope.
pub(crate) async fn translate_failures(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;
    let Some(failure) = response.extensions_mut().remove::<RequestFailure>() else {
        return response;
    };

    warn!(path = %path, failure = %failure, "request failed");
    Json(state.translator().translate(&failure)).into_response()
}

/// Panic hook for `CatchPanicLayer`: a panicking handler is an unexpected
/// failure like any other.
pub(crate) fn panic_failure(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|text| (*text).to_owned()))
        .unwrap_or_else(|| "unknown panic payload".to_owned());

    Rejection::from(ErrorEnvelope::unexpected(
        ErrorCode::internal(),
        format!("handler panicked: {detail}"),
    ))
    .into_response()
}
