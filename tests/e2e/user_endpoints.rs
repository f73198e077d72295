//! End-to-end tests for the `/user` endpoints.
//!
//! Drives the full router (extractors, handlers, translation middleware)
//! in-process with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use std::error::Error;
use tower::ServiceExt as _;
use validation_demo_api::v1::ErrorTranslator;
use validation_demo_http::{AppState, router};

const BODY_LIMIT: usize = 64 * 1024;

fn app(message_enabled: bool) -> Router {
    router(AppState::new(ErrorTranslator::new(message_enabled)))
}

fn valid_user() -> Value {
    json!({
        "name": "Tom",
        "sex": 1,
        "phone": "18888888888",
        "mail": "tom@meixing.com",
        "idNo": "11010519491231002X",
        "birthDateStr": "2000-01-01",
        "birthLocalDate": "2000-01-01",
        "registerLocalDatetime": "2020-09-04 12:10:22",
        "orgs": [{ "orgId": 1, "orgName": "Org-1" }],
    })
}

async fn send(app: Router, request: Request<Body>) -> Result<Value, Box<dyn Error>> {
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn post_json(uri: &str, body: &Value) -> Result<Request<Body>, Box<dyn Error>> {
    Ok(Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

fn post_form(uri: &str, body: &'static str) -> Result<Request<Body>, Box<dyn Error>> {
    Ok(Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))?)
}

fn get(uri: &str) -> Result<Request<Body>, Box<dyn Error>> {
    Ok(Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())?)
}

#[tokio::test]
async fn add_accepts_a_valid_user() -> Result<(), Box<dyn Error>> {
    let body = send(app(true), post_json("/user/add", &valid_user())?).await?;
    assert_eq!(
        body,
        json!({ "respCode": 100, "data": null, "rows": null, "msg": null, "total": null })
    );
    Ok(())
}

#[tokio::test]
async fn add_reports_every_violation_in_declaration_order() -> Result<(), Box<dyn Error>> {
    let mut user = valid_user();
    user["phone"] = json!("123");
    user["mail"] = json!("not-an-email");

    let body = send(app(true), post_json("/user/add", &user)?).await?;
    assert_eq!(body["respCode"], json!(101));
    assert_eq!(
        body["msg"],
        json!("phone: 电话号码格式不正确, mail: must be a well-formed email address")
    );
    assert_eq!(body["data"], json!(null));
    Ok(())
}

#[tokio::test]
async fn nested_org_violations_carry_indexed_paths() -> Result<(), Box<dyn Error>> {
    let mut user = valid_user();
    user["orgs"] = json!([{ "orgId": 1, "orgName": "Org-1" }, { "orgId": 0 }]);

    let body = send(app(true), post_json("/user/add", &user)?).await?;
    assert_eq!(body["respCode"], json!(101));
    assert_eq!(
        body["msg"],
        json!("orgs[1].orgId: must be greater than 0, orgs[1].orgName: must not be blank")
    );
    Ok(())
}

#[tokio::test]
async fn update_requires_an_id_but_add_does_not() -> Result<(), Box<dyn Error>> {
    let body = send(app(true), post_json("/user/update", &valid_user())?).await?;
    assert_eq!(body["respCode"], json!(101));
    assert_eq!(body["msg"], json!("id: must not be null"));

    let mut user = valid_user();
    user["id"] = json!(5);
    let body = send(app(true), post_json("/user/update", &user)?).await?;
    assert_eq!(body["respCode"], json!(100));
    Ok(())
}

#[tokio::test]
async fn disabled_messages_keep_the_code_and_drop_the_text() -> Result<(), Box<dyn Error>> {
    let mut user = valid_user();
    user["mail"] = json!("not-an-email");

    let body = send(app(false), post_json("/user/add", &user)?).await?;
    assert_eq!(
        body,
        json!({ "respCode": 101, "data": null, "rows": null, "msg": null, "total": null })
    );
    Ok(())
}

#[tokio::test]
async fn detail_returns_the_fixture_user() -> Result<(), Box<dyn Error>> {
    let body = send(app(true), get("/user/detail?id=3")?).await?;
    assert_eq!(body["respCode"], json!(100));
    assert_eq!(
        body["data"],
        json!({
            "id": 3,
            "name": "Tom-3",
            "sex": 1,
            "phone": "18888888888",
            "mail": "tom@meixing.com",
            "idNo": null,
            "birthDateStr": "2000-01-01",
            "birthLocalDate": "2000-01-01",
            "registerLocalDatetime": "2020-09-04 12:10:22",
            "orgs": [
                { "orgId": 1, "orgName": "Org-1" },
                { "orgId": 2, "orgName": "Org-2" }
            ]
        })
    );
    Ok(())
}

#[tokio::test]
async fn detail_validates_the_id_parameter() -> Result<(), Box<dyn Error>> {
    let body = send(app(true), get("/user/detail?id=0")?).await?;
    assert_eq!(body["respCode"], json!(101));
    assert_eq!(body["msg"], json!("id: must be greater than or equal to 1"));

    let body = send(app(true), get("/user/detail")?).await?;
    assert_eq!(body["respCode"], json!(101));
    assert_eq!(body["msg"], json!("id: must not be null"));
    Ok(())
}

#[tokio::test]
async fn unparsable_id_is_a_system_error() -> Result<(), Box<dyn Error>> {
    let body = send(app(true), get("/user/detail?id=abc")?).await?;
    assert_eq!(
        body,
        json!({ "respCode": 200, "data": null, "rows": null, "msg": null, "total": null })
    );
    Ok(())
}

#[tokio::test]
async fn form_bodies_bind_nested_keys() -> Result<(), Box<dyn Error>> {
    let valid = "name=Tom&sex=1&phone=18888888888&mail=tom%40meixing.com\
        &idNo=11010519491231002X&birthDateStr=2000-01-01&birthLocalDate=2000-01-01\
        &registerLocalDatetime=2020-09-04+12%3A10%3A22\
        &orgs%5B0%5D.orgId=1&orgs%5B0%5D.orgName=Org-1";
    let body = send(app(true), post_form("/user/addForm", valid)?).await?;
    assert_eq!(body["respCode"], json!(100));

    let invalid = "name=Tom&sex=3&phone=18888888888&mail=tom%40meixing.com\
        &idNo=11010519491231002X&birthDateStr=2000-13-01&birthLocalDate=2000-01-01\
        &registerLocalDatetime=2020-09-04+12%3A10%3A22&orgs%5B0%5D.orgId=1";
    let body = send(app(true), post_form("/user/addForm", invalid)?).await?;
    assert_eq!(body["respCode"], json!(101));
    assert_eq!(
        body["msg"],
        json!(
            "sex: must be between 1 and 2, birthDateStr: 日期格式不正确, \
             orgs[0].orgName: must not be blank"
        )
    );
    Ok(())
}

#[tokio::test]
async fn unconvertible_form_values_are_param_invalid() -> Result<(), Box<dyn Error>> {
    let body = "name=Tom&sex=abc&phone=18888888888&mail=tom%40meixing.com\
        &idNo=11010519491231002X&birthDateStr=2000-01-01&birthLocalDate=2000-01-01\
        &registerLocalDatetime=2020-09-04+12%3A10%3A22\
        &orgs%5B0%5D.orgId=1&orgs%5B0%5D.orgName=Org-1";
    let body = send(app(true), post_form("/user/addForm", body)?).await?;
    assert_eq!(body["respCode"], json!(101));
    assert_eq!(body["msg"], json!("sex: failed to convert value \"abc\""));
    Ok(())
}

#[tokio::test]
async fn form_endpoint_reads_query_parameters() -> Result<(), Box<dyn Error>> {
    let uri = "/user/addForm?name=Tom&sex=1&phone=18888888888&mail=tom%40meixing.com\
        &idNo=11010519491231002X&birthDateStr=2000-01-01&birthLocalDate=2000-01-01\
        &registerLocalDatetime=2020-09-04+12%3A10%3A22\
        &orgs%5B0%5D.orgId=1&orgs%5B0%5D.orgName=Org-1";
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())?;
    let body = send(app(true), request).await?;
    assert_eq!(body["respCode"], json!(100));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/addForm?name=Tom&sex=5")
        .body(Body::empty())?;
    let body = send(app(true), request).await?;
    assert_eq!(body["respCode"], json!(101));
    assert!(
        body["msg"]
            .as_str()
            .is_some_and(|msg| msg.starts_with("sex: must be between 1 and 2, phone: must not be blank")),
        "unexpected message: {}",
        body["msg"]
    );
    Ok(())
}

#[tokio::test]
async fn form_body_values_replace_query_values() -> Result<(), Box<dyn Error>> {
    let body = "name=Tom&sex=1&phone=18888888888&mail=tom%40meixing.com\
        &idNo=11010519491231002X&birthDateStr=2000-01-01&birthLocalDate=2000-01-01\
        &registerLocalDatetime=2020-09-04+12%3A10%3A22\
        &orgs%5B0%5D.orgId=1&orgs%5B0%5D.orgName=Org-1";
    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/addForm?sex=9")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))?;
    let body = send(app(true), request).await?;
    assert_eq!(body["respCode"], json!(100));
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_system_error() -> Result<(), Box<dyn Error>> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/add")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))?;

    let body = send(app(true), request).await?;
    assert_eq!(body["respCode"], json!(200));
    assert_eq!(body["msg"], json!(null));
    Ok(())
}
