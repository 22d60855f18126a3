use super::*;
use std::collections::BTreeSet;

fn start() -> NaiveDate {
    date!(2013, 10, 1)
}

/// Asserts that parsing fails on the given line with an error matching the given pattern.
macro_rules! test_condition_error {
    ($name:ident, $input:literal, $lineno:literal, $pattern:pat) => {
        #[test]
        fn $name() {
            let res = Calendar::from_str($input, start());
            match res {
                Err(ParseError::AtLine {
                    lineno: $lineno,
                    source,
                    ..
                }) => assert!(matches!(*source, $pattern), "unexpected error {source:?}"),
                other => panic!("unexpected result {other:?}"),
            }
        }
    };
}

test_condition_error!(
    until_before_literal_anchor_should_fail,
    "2013 Oct 3, A\n  :until 2013 Oct 1",
    2,
    ParseError::UntilBeforeAnchor { .. }
);
test_condition_error!(
    until_before_from_should_fail,
    "2013 Oct 3, A\n  :weekly\n  :from 2013 Nov 1\n  :until 2013 Oct 20",
    4,
    ParseError::UntilBeforeFrom { .. }
);
test_condition_error!(
    from_after_until_should_fail,
    "2013 Oct 3, A\n  :weekly\n  :until 2013 Oct 20\n  :from 2013 Nov 1",
    4,
    ParseError::FromAfterUntil { .. }
);
test_condition_error!(
    weekly_with_arguments_should_fail,
    "2013 Oct 3, A\n  :weekly on Thursdays",
    2,
    ParseError::UnexpectedArguments { keyword: ":weekly", .. }
);
test_condition_error!(
    zero_day_stride_should_fail,
    "2013 Oct 3, A\n  :every 0 days",
    2,
    ParseError::ZeroCount { .. }
);
test_condition_error!(
    stride_in_weeks_should_fail,
    "2013 Oct 3, A\n  :every 3 weeks",
    2,
    ParseError::ConditionArguments { .. }
);
test_condition_error!(
    zero_length_for_should_fail,
    "2013 Oct 3, A\n  :for 0 days",
    2,
    ParseError::ZeroCount { .. }
);
test_condition_error!(
    for_days_past_last_date_should_fail,
    "2013 Oct 3, A\n  :for 100000000 days",
    2,
    ParseError::CountTooLarge { .. }
);
test_condition_error!(
    for_weekdays_past_last_date_should_fail,
    "2013 Oct 3, A\n  :for 100000000 weekdays",
    2,
    ParseError::CountTooLarge { .. }
);
test_condition_error!(
    easter_offset_past_last_date_should_fail,
    ":easter 100000000, A",
    1,
    ParseError::RuleArguments { .. }
);
test_condition_error!(
    for_in_months_should_fail,
    "2013 Oct 3, A\n  :for 2 months",
    2,
    ParseError::ConditionArguments { .. }
);
test_condition_error!(
    nested_yearly_exception_should_fail,
    "2013 Oct 3, A\n  :weekly\n  :except 2013* Oct 10",
    3,
    ParseError::YearlyNotAllowed { .. }
);
test_condition_error!(
    exception_without_date_should_fail,
    "2013 Oct 3, A\n  :weekly\n  :except , because",
    3,
    ParseError::ConditionArguments { .. }
);
test_condition_error!(
    unknown_condition_should_fail,
    "2013 Oct 3, A\n  :sometimes",
    2,
    ParseError::UnknownCondition { .. }
);
test_condition_error!(
    condition_without_colon_should_fail,
    "2013 Oct 3, A\n  weekly",
    2,
    ParseError::NotACondition
);
test_condition_error!(
    conditions_should_be_checked_without_event,
    ":fifth Fri, A\n  :bogus",
    2,
    ParseError::UnknownCondition { .. }
);
test_condition_error!(
    bad_date_line_should_fail,
    "2013 Oct 3 Fri, A",
    1,
    ParseError::WrongDayName { .. }
);

#[test]
fn until_before_rule_anchor_should_work() {
    let event = single_event(":every Thu, A\n  :until 2013 Sep 1", start());
    assert_eq!(event.repeat_until(), Some(date!(2013, 9, 1)));
}

#[test]
fn bounds_should_only_ever_narrow() {
    let event = single_event(
        "2013 Oct 3, A\n  :weekly\n  :until 2013 Dec 1\n  :until 2013 Nov 1\n  :until 2013 Nov 20\n  :from 2013 Oct 10\n  :from 2013 Oct 5",
        start(),
    );
    assert_eq!(event.repeat_until(), Some(date!(2013, 11, 1)));
    assert_eq!(event.repeat_from(), Some(date!(2013, 10, 10)));
}

#[test]
fn repetition_conditions_should_accumulate() {
    let event = single_event(
        "2013 Oct 3, A\n  :weekly\n  :fortnightly\n  :every 3 days\n  :monthly\n  :yearly",
        start(),
    );
    let recurrence = event.recurrence();
    assert_eq!(recurrence.every_n_days, BTreeSet::from([3, 7, 14]));
    assert_eq!(recurrence.every_nth_of_month, BTreeSet::from([3]));
    assert!(recurrence.yearly);
}

#[test]
fn exceptions_should_keep_their_reasons() {
    let event = single_event(
        ":every Thu, A\n  :except 2013 Oct 10,  half term \n  :except :last Thu",
        start(),
    );
    let excluded = event
        .excluded()
        .iter()
        .map(|ex| (ex.date, ex.reason.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        excluded,
        vec![(date!(2013, 10, 10), "half term"), (date!(2013, 10, 31), "")]
    );
}

#[test]
fn for_days_should_bound_daily_repetition() {
    let event = single_event("2013 Oct 3, A\n  :for 3 days", start());
    assert_eq!(event.recurrence().every_n_days, BTreeSet::from([1]));
    assert_eq!(event.repeat_until(), Some(date!(2013, 10, 5)));
}

#[test]
fn for_weekdays_should_exclude_weekends() {
    let event = single_event("2013 Nov 25 Mon, Task\n  :for 10 weekdays", start());
    assert_eq!(event.repeat_until(), Some(date!(2013, 12, 6)));
    let excluded = event
        .excluded()
        .iter()
        .map(|ex| ex.date)
        .collect::<Vec<_>>();
    assert_eq!(excluded, vec![date!(2013, 11, 30), date!(2013, 12, 1)]);
}

#[test]
fn for_weekdays_from_weekend_should_start_monday() {
    // 2013 Oct 5 is a Saturday
    let event = single_event("2013 Oct 5, A\n  :for 1 weekdays", start());
    assert_eq!(event.repeat_until(), Some(date!(2013, 10, 7)));
    assert_eq!(event.excluded().len(), 2);
}

#[test]
fn fifth_without_date_should_drop_record() {
    let calendar = Calendar::from_str(":fifth Fri, A\n  :weekly\n2013 Oct 3, B", start()).unwrap();
    assert_eq!(calendar.len(), 1);
}

#[test]
fn missing_comma_should_fail() {
    let err = Calendar::from_str("# events\n2013 Oct 3 A", start()).unwrap_err();
    assert!(matches!(err, ParseError::MissingComma { lineno: 2, .. }));
    assert!(err.to_string().starts_with("missing comma in line 2"));
}

#[test]
fn missing_text_should_fail() {
    let err = Calendar::from_str("2013 Oct 3,   ", start()).unwrap_err();
    assert!(matches!(err, ParseError::MissingText { lineno: 1, .. }));
}

#[test]
fn errors_should_quote_their_line() {
    let err = Calendar::from_str("2013 Oct 3 Fri, A", start()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "error in line 1\n2013 Oct 3 is Thu, not Fri\n1: \"2013 Oct 3 Fri, A\""
    );
}
