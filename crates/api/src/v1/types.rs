//! API v1 DTO types.

use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validation_demo_validate_derive::Validate;

/// User payload accepted by the add, addForm and update endpoints.
///
/// Every field is optional on the wire so that a missing value surfaces as a
/// violation rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UserParam {
    /// Identifier; required when updating.
    #[serde(with = "crate::v1::wire::option_number")]
    #[schemars(with = "Option<i64>")]
    #[constraint(required(groups(update)), positive)]
    pub id: Option<i64>,
    /// Display name, at most 32 characters.
    #[constraint(not_blank, length(max = 32))]
    pub name: Option<String>,
    /// 1 = male, 2 = female.
    #[serde(with = "crate::v1::wire::option_number")]
    #[schemars(with = "Option<i32>")]
    #[constraint(required, range(min = 1, max = 2))]
    pub sex: Option<i32>,
    /// Phone number.
    #[constraint(not_blank, phone_no)]
    pub phone: Option<String>,
    /// Email address.
    #[constraint(required, email)]
    pub mail: Option<String>,
    /// National ID number.
    #[constraint(field = "idNo", not_blank, id_no)]
    pub id_no: Option<String>,
    /// Birth date as free text, checked against `yyyy-MM-dd`.
    #[constraint(field = "birthDateStr", required, date_format)]
    pub birth_date_str: Option<String>,
    /// Birth date (`yyyy-MM-dd`).
    #[serde(with = "crate::v1::wire::option_date")]
    #[schemars(with = "Option<NaiveDate>")]
    #[constraint(field = "birthLocalDate", required, past_or_present)]
    pub birth_local_date: Option<NaiveDate>,
    /// Registration time (`yyyy-MM-dd HH:mm:ss`).
    #[serde(with = "crate::v1::wire::option_date_time")]
    #[schemars(with = "Option<String>")]
    #[constraint(field = "registerLocalDatetime", required, past)]
    pub register_local_datetime: Option<NaiveDateTime>,
    /// Organizations the user belongs to.
    #[constraint(not_empty, nested)]
    pub orgs: Option<Vec<OrgParam>>,
}

/// Organization entry nested in [`UserParam`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgParam {
    /// Organization identifier.
    #[serde(with = "crate::v1::wire::option_number")]
    #[schemars(with = "Option<i64>")]
    #[constraint(field = "orgId", required, positive)]
    pub org_id: Option<i64>,
    /// Organization name, 1 to 32 characters.
    #[constraint(field = "orgName", not_blank, length(min = 1, max = 32))]
    pub org_name: Option<String>,
}

/// User returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResult {
    /// Identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// 1 = male, 2 = female.
    pub sex: i32,
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub mail: String,
    /// National ID number, not part of the detail view.
    pub id_no: Option<String>,
    /// Birth date as text.
    pub birth_date_str: String,
    /// Birth date.
    pub birth_local_date: NaiveDate,
    /// Registration time.
    #[serde(with = "crate::v1::wire::date_time")]
    pub register_local_datetime: NaiveDateTime,
    /// Organizations the user belongs to.
    pub orgs: Vec<OrgResult>,
}

/// Organization entry nested in [`UserResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgResult {
    /// Organization identifier.
    pub org_id: i64,
    /// Organization name.
    pub org_name: String,
}
