//! Canned user returned by the detail endpoint.

use chrono::NaiveDate;
use validation_demo_api::v1::{OrgResult, UserResult};
use validation_demo_shared::{ErrorCode, ErrorEnvelope};

fn fixture_error() -> ErrorEnvelope {
    ErrorEnvelope::unexpected(ErrorCode::internal(), "fixture date out of range")
}

/// User `id` as stored by the demo.
pub(crate) fn user_detail(id: i64) -> Result<UserResult, ErrorEnvelope> {
    let birth = NaiveDate::from_ymd_opt(2000, 1, 1).ok_or_else(fixture_error)?;
    let registered = NaiveDate::from_ymd_opt(2020, 9, 4)
        .and_then(|date| date.and_hms_opt(12, 10, 22))
        .ok_or_else(fixture_error)?;

    Ok(UserResult {
        id,
        name: format!("Tom-{id}"),
        sex: 1,
        phone: "18888888888".to_owned(),
        mail: "tom@meixing.com".to_owned(),
        id_no: None,
        birth_date_str: "2000-01-01".to_owned(),
        birth_local_date: birth,
        register_local_datetime: registered,
        orgs: (1..=2)
            .map(|org_id| OrgResult {
                org_id,
                org_name: format!("Org-{org_id}"),
            })
            .collect(),
    })
}
