//! Property tests for the constraint evaluators.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use validation_demo_shared::constraints::{date_format, date_time_format, id_no, phone_no};

const VALID_ID: &str = "110105194912310021";

/// Decimal digits outside ASCII: Arabic-Indic, Devanagari and fullwidth.
const FOREIGN_DIGITS: &str = "[\u{0660}-\u{0669}\u{0966}-\u{096F}\u{FF10}-\u{FF19}]";

fn replace_at(text: &str, position: usize, replacement: char) -> String {
    text.chars()
        .enumerate()
        .map(|(index, current)| if index == position { replacement } else { current })
        .collect()
}

fn calendar_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3_000_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1000, 1, 1).unwrap_or_default() + Duration::days(offset)
    })
}

proptest! {
    #[test]
    fn every_calendar_date_is_accepted(date in calendar_date()) {
        let text = date.format("%Y-%m-%d").to_string();
        prop_assert!(date_format(Some(text.as_str())));
    }

    #[test]
    fn every_formatted_date_time_is_accepted(
        date in calendar_date(),
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let text = format!("{} {hour:02}:{minute:02}:{second:02}", date.format("%Y-%m-%d"));
        prop_assert!(date_time_format(Some(text.as_str())));
    }

    #[test]
    fn trailing_input_is_rejected(date in calendar_date(), suffix in "[0-9a-z ]{1,3}") {
        let text = format!("{}{suffix}", date.format("%Y-%m-%d"));
        prop_assert!(!date_format(Some(text.as_str())));
    }

    #[test]
    fn out_of_range_months_are_rejected(year in 1000u32..9999, month in 13u32..100, day in 1u32..29) {
        let text = format!("{year:04}-{month:02}-{day:02}");
        prop_assert!(!date_format(Some(text.as_str())));
    }

    #[test]
    fn phone_numbers_of_eight_to_eleven_digits_pass(digits in "[0-9]{8,11}") {
        prop_assert!(phone_no(Some(digits.as_str())));
    }

    #[test]
    fn phone_numbers_of_other_lengths_fail(digits in "[0-9]{1,7}|[0-9]{12,20}") {
        prop_assert!(!phone_no(Some(digits.as_str())));
    }

    #[test]
    fn phone_numbers_with_non_digits_fail(head in "[0-9]{4}", tail in "[0-9]{4}", junk in "[a-zA-Z+ -]") {
        let text = format!("{head}{junk}{tail}");
        prop_assert!(!phone_no(Some(text.as_str())));
    }

    #[test]
    fn phone_numbers_with_non_ascii_digits_fail(
        head in "[0-9]{0,5}",
        foreign in FOREIGN_DIGITS,
        tail in "[0-9]{2,5}",
    ) {
        let text = format!("{head}{foreign}{tail}");
        prop_assert!(!phone_no(Some(text.as_str())));
    }

    #[test]
    fn id_number_with_one_character_outside_its_class_fails(
        position in 0usize..18,
        replacement in prop_oneof!["[a-wyzA-WYZ#*/ .-]", FOREIGN_DIGITS],
    ) {
        prop_assert!(id_no(Some(VALID_ID)));
        let Some(replacement) = replacement.chars().next() else {
            return Err(TestCaseError::reject("empty replacement"));
        };
        let text = replace_at(VALID_ID, position, replacement);
        prop_assert!(!id_no(Some(text.as_str())), "accepted {}", text);
    }

    #[test]
    fn id_number_region_cannot_start_with_zero(rest in "[0-9]{5}") {
        let tail: String = VALID_ID.chars().skip(6).collect();
        let text = format!("0{rest}{tail}");
        prop_assert!(!id_no(Some(text.as_str())));
    }

    #[test]
    fn id_numbers_follow_layout(
        region in "[1-9][0-9]{5}",
        year in prop_oneof![1800u32..2100, 3000u32..4000],
        month in 1u32..=12,
        day in 1u32..=28,
        sequence in "[0-9]{3}",
        check in "[0-9Xx]",
    ) {
        let text = format!("{region}{year:04}{month:02}{day:02}{sequence}{check}");
        prop_assert!(id_no(Some(text.as_str())));
    }

    #[test]
    fn evaluation_is_repeatable(text in ".{0,24}") {
        prop_assert_eq!(phone_no(Some(text.as_str())), phone_no(Some(text.as_str())));
        prop_assert_eq!(date_format(Some(text.as_str())), date_format(Some(text.as_str())));
    }
}
