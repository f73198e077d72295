//! Extractors that deserialize and validate request bodies.

use crate::failure::{Rejection, unreadable};
use crate::form::pairs_to_json;
use axum::async_trait;
use axum::extract::{Form, FromRequest, Json, Query, Request};
use axum::http::{HeaderMap, header};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use validation_demo_api::v1::ValidationFailure;
use validation_demo_shared::{ErrorEnvelope, Scenario, Validate, Violation, Violations};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Type-level scenario selector for the validating extractors.
pub trait ScenarioMarker {
    /// Scenario the body is validated under.
    const SCENARIO: Scenario;
}

/// Validate with default-group rules only.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnCreate;

impl ScenarioMarker for OnCreate {
    const SCENARIO: Scenario = Scenario::Create;
}

/// Validate with default-group and update-group rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnUpdate;

impl ScenarioMarker for OnUpdate {
    const SCENARIO: Scenario = Scenario::Update;
}

/// JSON body validated under the scenario `M`.
///
/// ```ignore
/// async fn update(ValidatedJson(param, _): ValidatedJson<UserParam, OnUpdate>) { .. }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T, M = OnCreate>(pub T, pub PhantomData<M>);

#[async_trait]
impl<S, T, M> FromRequest<S> for ValidatedJson<T, M>
where
    T: DeserializeOwned + Validate + Send,
    M: ScenarioMarker + Send,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| unreadable("body", rejection.body_text()))?;

        value
            .validate(M::SCENARIO)
            .map_err(ValidationFailure::Body)?;
        Ok(Self(value, PhantomData))
    }
}

/// Form parameters validated under the scenario `M`.
///
/// Parameters come from the query string and, for form-encoded requests,
/// the body; a body value replaces a query value with the same key. Keys may
/// address nested fields (`orgs[0].orgName`). A value that does not convert
/// to its field's type is reported as a violation on that key.
#[derive(Debug, Clone)]
pub struct ValidatedForm<T, M = OnCreate>(pub T, pub PhantomData<M>);

#[async_trait]
impl<S, T, M> FromRequest<S> for ValidatedForm<T, M>
where
    T: DeserializeOwned + Validate + Send,
    M: ScenarioMarker + Send,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut pairs = match req.uri().query() {
            Some(_) => {
                Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                    .map_err(|rejection| unreadable("query", rejection.body_text()))?
                    .0
            },
            None => Vec::new(),
        };
        if is_form_encoded(req.headers()) {
            let Form(body) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rejection| unreadable("form", rejection.body_text()))?;
            pairs.extend(body);
        }

        let (value, mismatches) = bind_form::<T>(&pairs)?;
        let checked = value.validate(M::SCENARIO).err().unwrap_or_default();
        let bound = |violation: &&Violation| {
            mismatches
                .iter()
                .all(|mismatch| mismatch.path() != violation.path())
        };
        let violations: Violations = mismatches
            .iter()
            .chain(checked.iter().filter(bound))
            .cloned()
            .collect();

        violations.into_result().map_err(ValidationFailure::Form)?;
        Ok(Self(value, PhantomData))
    }
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE))
}

/// Bind pairs onto `T`, one key at a time once the whole set fails.
///
/// A pair whose value breaks deserialization is left unbound and returned
/// as a violation; rules on the same field are not reported again.
fn bind_form<T: DeserializeOwned>(
    pairs: &[(String, String)],
) -> Result<(T, Vec<Violation>), Rejection> {
    let tree = pairs_to_json(pairs).map_err(ErrorEnvelope::from)?;
    if let Ok(value) = serde_json::from_value(tree) {
        return Ok((value, Vec::new()));
    }

    let mut bound: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    let mut mismatches = Vec::new();
    for (key, raw) in pairs {
        bound.push((key.clone(), raw.clone()));
        if !binds::<T>(&bound) {
            bound.pop();
            mismatches.push(Violation::new(
                key.clone(),
                format!("failed to convert value \"{raw}\""),
            ));
        }
    }

    let tree = pairs_to_json(&bound).map_err(ErrorEnvelope::from)?;
    let value = serde_json::from_value(tree)
        .map_err(|error| unreadable("form", format!("failed to bind form: {error}")))?;
    Ok((value, mismatches))
}

fn binds<T: DeserializeOwned>(pairs: &[(String, String)]) -> bool {
    pairs_to_json(pairs).is_ok_and(|tree| serde_json::from_value::<T>(tree).is_ok())
}
