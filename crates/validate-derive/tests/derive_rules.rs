//! Behavior of the generated `Validate` implementations.

use chrono::{Duration, Local, NaiveDate};
use validation_demo_shared::{Scenario, Validate, Violation, Violations};
use validation_demo_validate_derive::Validate;

#[derive(Debug, Default, Validate)]
struct Item {
    #[constraint(field = "itemId", required, positive)]
    item_id: Option<i64>,
    #[constraint(field = "label", not_blank, length(min = 1, max = 4))]
    label: Option<String>,
}

#[derive(Debug, Default, Validate)]
struct Order {
    #[constraint(required(groups(update)), positive)]
    id: Option<i64>,
    #[constraint(phone_no, phone_no(regexp = r"^1\d+$", message = "must start with 1"))]
    phone: Option<String>,
    #[constraint(range(min = 1, max = 2))]
    kind: Option<i32>,
    #[constraint(date_format(format = "yyyy/MM/dd"))]
    day: Option<String>,
    #[constraint(field = "shipped", past_or_present)]
    shipped_on: Option<NaiveDate>,
    #[constraint(nested, not_empty)]
    items: Option<Vec<Item>>,
    #[constraint(nested)]
    primary: Option<Item>,
}

#[derive(Debug, Validate)]
struct Plain {
    #[constraint(not_blank(message = "name please"), pattern(regexp = "[a-z]+"))]
    name: String,
    #[constraint(email)]
    mail: String,
}

fn valid_item() -> Item {
    Item {
        item_id: Some(1),
        label: Some("ok".to_owned()),
    }
}

fn valid_order() -> Order {
    Order {
        id: None,
        phone: Some("18888888888".to_owned()),
        kind: Some(1),
        day: Some("2000/01/01".to_owned()),
        shipped_on: Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()),
        items: Some(vec![valid_item()]),
        primary: None,
    }
}

fn pairs(violations: &Violations) -> Vec<(String, String)> {
    violations
        .iter()
        .map(|violation: &Violation| (violation.path().to_owned(), violation.message().to_owned()))
        .collect()
}

#[test]
fn valid_order_passes_create() {
    assert_eq!(valid_order().validate(Scenario::Create), Ok(()));
}

#[test]
fn update_group_rules_only_apply_under_update() {
    let order = valid_order();
    let Err(violations) = order.validate(Scenario::Update) else {
        panic!("update without id must fail");
    };
    assert_eq!(
        pairs(&violations),
        vec![("id".to_owned(), "must not be null".to_owned())]
    );

    let order = Order {
        id: Some(7),
        ..valid_order()
    };
    assert_eq!(order.validate(Scenario::Update), Ok(()));
}

#[test]
fn default_rules_still_apply_under_update() {
    let order = Order {
        id: Some(0),
        ..valid_order()
    };
    let Err(violations) = order.validate(Scenario::Update) else {
        panic!("non-positive id must fail");
    };
    assert_eq!(
        pairs(&violations),
        vec![("id".to_owned(), "must be greater than 0".to_owned())]
    );
}

#[test]
fn violations_follow_declaration_order() {
    let order = Order {
        phone: Some("0123".to_owned()),
        kind: Some(3),
        day: Some("2000-01-01".to_owned()),
        shipped_on: Some(Local::now().date_naive() + Duration::days(2)),
        items: Some(Vec::new()),
        ..valid_order()
    };
    let Err(violations) = order.validate(Scenario::Create) else {
        panic!("invalid order must fail");
    };
    assert_eq!(
        pairs(&violations),
        vec![
            ("phone".to_owned(), "电话号码格式不正确".to_owned()),
            ("phone".to_owned(), "must start with 1".to_owned()),
            ("kind".to_owned(), "must be between 1 and 2".to_owned()),
            ("day".to_owned(), "日期格式不正确".to_owned()),
            (
                "shipped".to_owned(),
                "must be a date in the past or in the present".to_owned()
            ),
            ("items".to_owned(), "must not be empty".to_owned()),
        ]
    );
}

#[test]
fn nested_items_report_indexed_paths() {
    let order = Order {
        items: Some(vec![
            valid_item(),
            Item {
                item_id: None,
                label: Some("toolong".to_owned()),
            },
        ]),
        primary: Some(Item {
            item_id: Some(-1),
            label: Some("  ".to_owned()),
        }),
        ..valid_order()
    };
    let Err(violations) = order.validate(Scenario::Create) else {
        panic!("invalid nested items must fail");
    };
    assert_eq!(
        pairs(&violations),
        vec![
            ("items[1].itemId".to_owned(), "must not be null".to_owned()),
            (
                "items[1].label".to_owned(),
                "size must be between 1 and 4".to_owned()
            ),
            ("primary.itemId".to_owned(), "must be greater than 0".to_owned()),
            ("primary.label".to_owned(), "must not be blank".to_owned()),
        ]
    );
}

#[test]
fn absent_values_only_fail_presence_rules() {
    let order = Order::default();
    let Err(violations) = order.validate(Scenario::Create) else {
        panic!("missing items must fail");
    };
    assert_eq!(
        pairs(&violations),
        vec![("items".to_owned(), "must not be empty".to_owned())]
    );
}

#[test]
fn non_option_fields_and_message_overrides() {
    let plain = Plain {
        name: " ".to_owned(),
        mail: "nope".to_owned(),
    };
    let Err(violations) = plain.validate(Scenario::Create) else {
        panic!("blank name must fail");
    };
    assert_eq!(
        pairs(&violations),
        vec![
            ("name".to_owned(), "name please".to_owned()),
            ("name".to_owned(), "must match \"[a-z]+\"".to_owned()),
            (
                "mail".to_owned(),
                "must be a well-formed email address".to_owned()
            ),
        ]
    );

    let plain = Plain {
        name: "tom".to_owned(),
        mail: "tom@meixing.com".to_owned(),
    };
    assert!(plain.validate(Scenario::Create).is_ok());
}
