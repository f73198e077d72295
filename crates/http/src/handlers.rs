//! `/user` endpoints.

use crate::extract::{OnUpdate, ValidatedForm, ValidatedJson};
use crate::failure::{Rejection, unreadable};
use crate::fixtures;
use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use serde::Deserialize;
use tracing::info;
use validation_demo_api::v1::{CommonResult, UserParam, UserResult, ValidationFailure};
use validation_demo_shared::ParameterCheck;
use validation_demo_shared::constraints::{self, messages};

type UserResponse = Json<CommonResult<UserResult>>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DetailQuery {
    #[serde(with = "validation_demo_api::v1::wire::option_number")]
    id: Option<i64>,
}

/// `GET /user/detail?id=..`
pub(crate) async fn detail(
    query: Result<Query<DetailQuery>, QueryRejection>,
) -> Result<UserResponse, Rejection> {
    let Query(DetailQuery { id }) =
        query.map_err(|rejection| unreadable("query", rejection.body_text()))?;
    info!(id = ?id, "get user");

    ParameterCheck::new("getUser")
        .check("id", constraints::required(id.as_ref()), messages::REQUIRED)
        .check("id", constraints::min(id.as_ref(), 1), messages::min(1))
        .finish()
        .map_err(ValidationFailure::Parameter)?;

    let user = id.map(fixtures::user_detail).transpose()?;
    info!(user = ?user, "get user result");
    Ok(Json(user.map_or_else(
        CommonResult::success,
        CommonResult::success_with_data,
    )))
}

/// `POST /user/add`
pub(crate) async fn add(ValidatedJson(param, _): ValidatedJson<UserParam>) -> UserResponse {
    info!(param = ?param, "add user from json");
    Json(CommonResult::success())
}

/// `POST /user/addForm`
pub(crate) async fn add_form(ValidatedForm(param, _): ValidatedForm<UserParam>) -> UserResponse {
    info!(param = ?param, "add user from form");
    Json(CommonResult::success())
}

/// `POST /user/update`
pub(crate) async fn update(
    ValidatedJson(param, _): ValidatedJson<UserParam, OnUpdate>,
) -> UserResponse {
    info!(param = ?param, "update user from json");
    Json(CommonResult::success())
}
