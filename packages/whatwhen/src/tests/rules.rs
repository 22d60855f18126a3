use super::*;
use crate::dates::Ordinal;
use crate::rule::parse_date;
use chrono::Weekday;
use std::collections::BTreeSet;

macro_rules! test_anchor {
    ($name:ident, $input:literal, $start:expr => $expected:expr) => {
        #[test]
        fn $name() {
            let builder = parse_date($input, $start, None).unwrap().unwrap();
            assert_eq!(builder.date, $expected);
        }
    };
}

test_anchor!(every_weekday_should_find_next, ":every Thu", date!(2013, 10, 1) => date!(2013, 10, 3));
test_anchor!(every_weekday_should_allow_start, ":every Tue", date!(2013, 10, 1) => date!(2013, 10, 1));
test_anchor!(every_day_should_use_this_month, ":every day 15", date!(2013, 12, 20) => date!(2013, 12, 15));
test_anchor!(every_day_should_skip_short_months, ":every day 31", date!(2013, 11, 5) => date!(2013, 12, 31));
test_anchor!(every_day_should_skip_february, ":every day 31", date!(2013, 2, 5) => date!(2013, 3, 31));
test_anchor!(every_month_day_should_use_this_year, ":every Oct 9", date!(2013, 12, 1) => date!(2013, 10, 9));
test_anchor!(every_leap_day_should_use_next_year, ":every Feb 29", date!(2015, 6, 1) => date!(2016, 2, 29));
test_anchor!(first_should_use_start_month, ":first Sat", date!(2013, 10, 28) => date!(2013, 10, 5));
test_anchor!(last_should_use_start_month, ":last Fri", date!(2024, 2, 10) => date!(2024, 2, 23));
test_anchor!(ordinal_should_ignore_case, ":LastButOne fri", date!(2024, 2, 10) => date!(2024, 2, 16));
test_anchor!(easter_friday_with_year, ":easter Fri 2013", date!(2000, 1, 1) => date!(2013, 3, 29));
test_anchor!(easter_offset_with_year, ":easter 49 2013", date!(2000, 1, 1) => date!(2013, 5, 19));
test_anchor!(easter_negative_offset, ":easter -46 2013", date!(2000, 1, 1) => date!(2013, 2, 13));
test_anchor!(easter_without_year, ":easter Sun", date!(2024, 1, 1) => date!(2024, 3, 31));

// Relative rules, using the weekday of their reference date
test_anchor!(weekend_after_saturday, ":weekend after 2013 Sep 28", date!(2013, 1, 1) => date!(2013, 9, 29));
test_anchor!(weekend_after_sunday, ":weekend after 2013 Sep 29", date!(2013, 1, 1) => date!(2013, 10, 5));
test_anchor!(weekend_after_tuesday, ":weekend after 2013 Oct 1", date!(2013, 1, 1) => date!(2013, 10, 5));
test_anchor!(weekend_on_or_after_saturday, ":weekend on-or-after 2013 Sep 28", date!(2013, 1, 1) => date!(2013, 9, 28));
test_anchor!(weekend_before_saturday, ":weekend before 2013 Sep 28", date!(2013, 1, 1) => date!(2013, 9, 22));
test_anchor!(weekend_on_or_before_tuesday, ":weekend on-or-before 2013 Oct 1", date!(2013, 1, 1) => date!(2013, 9, 29));
test_anchor!(weekday_after_friday, ":weekday after 2013 Dec 27", date!(2013, 1, 1) => date!(2013, 12, 30));
test_anchor!(weekday_after_wednesday, ":weekday after 2013 Dec 25", date!(2013, 1, 1) => date!(2013, 12, 26));
test_anchor!(weekday_on_or_after_saturday, ":weekday on-or-after 2013 Sep 28", date!(2013, 1, 1) => date!(2013, 9, 30));
test_anchor!(weekday_before_monday, ":weekday before 2013 Sep 30", date!(2013, 1, 1) => date!(2013, 9, 27));
test_anchor!(weekday_on_or_before_sunday, ":weekday on-or-before 2013 Sep 29", date!(2013, 1, 1) => date!(2013, 9, 27));
test_anchor!(named_day_before, ":Mon before 2013 Dec 25", date!(2013, 1, 1) => date!(2013, 12, 23));
test_anchor!(named_day_before_same_day, ":wed before 2013 Dec 25", date!(2013, 1, 1) => date!(2013, 12, 18));
test_anchor!(named_day_on_or_before_same_day, ":wed on-or-before 2013 Dec 25", date!(2013, 1, 1) => date!(2013, 12, 25));
test_anchor!(relative_to_rule, ":sat after :easter Sun 2013", date!(2013, 1, 1) => date!(2013, 4, 6));

#[test]
fn fifth_without_date_should_be_none() {
    assert!(parse_date(":fifth Fri", date!(2013, 10, 1), None)
        .unwrap()
        .is_none());
}

#[test]
fn rules_should_carry_their_recurrence() {
    let every = parse_date(":every Thu", date!(2013, 10, 1), None).unwrap().unwrap();
    assert_eq!(every.recurrence.every_n_days, BTreeSet::from([7]));

    let monthly = parse_date(":every day 31", date!(2013, 10, 1), None).unwrap().unwrap();
    assert_eq!(monthly.recurrence.every_nth_of_month, BTreeSet::from([31]));

    let yearly = parse_date(":every Oct 9", date!(2013, 10, 1), None).unwrap().unwrap();
    assert!(yearly.recurrence.yearly);

    let ordinal = parse_date(":first Sat", date!(2013, 10, 1), None).unwrap().unwrap();
    assert_eq!(
        ordinal.recurrence.ordinal_weekdays,
        BTreeSet::from([OrdinalWeekday {
            ordinal: Ordinal::First,
            weekday: Weekday::Sat
        }])
    );

    let easter = parse_date(":easter Mon", date!(2013, 1, 1), None).unwrap().unwrap();
    assert!(easter.recurrence.yearly);
    assert_eq!(easter.recurrence.easter_offset, Some(1));

    let one_shot = parse_date(":easter Mon 2013", date!(2000, 1, 1), None).unwrap().unwrap();
    assert!(!one_shot.recurrence.yearly);
    assert_eq!(one_shot.recurrence.easter_offset, Some(1));

    let relative = parse_date(":weekday after 2013 Dec 25", date!(2013, 1, 1), None)
        .unwrap()
        .unwrap();
    assert!(!relative.recurrence.repeats());
}

#[test]
fn rule_text_should_be_normalised() {
    let builder = parse_date("  :EVERY   Thu ", date!(2013, 10, 1), None).unwrap().unwrap();
    assert_eq!(builder.source, AnchorSource::Rule(":every Thu".to_string()));
}

macro_rules! test_rule_error {
    ($name:ident, $input:literal, $pattern:pat) => {
        #[test]
        fn $name() {
            let res = parse_date($input, date!(2013, 10, 1), None);
            assert!(matches!(res, Err($pattern)), "unexpected result {res:?}");
        }
    };
}

test_rule_error!(unknown_rule_should_fail, ":whenever Thu", ParseError::UnknownRule { .. });
test_rule_error!(bare_every_should_fail, ":every", ParseError::RuleArguments { .. });
test_rule_error!(every_long_day_name_should_fail, ":every Thursday", ParseError::NotADayName { .. });
test_rule_error!(every_day_word_should_fail, ":every day first", ParseError::RuleArguments { .. });
test_rule_error!(every_day_too_big_should_fail, ":every day 32", ParseError::DayNotInMonth { day: 32, .. });
test_rule_error!(every_day_zero_should_fail, ":every day 0", ParseError::DayNotInMonth { day: 0, .. });
test_rule_error!(every_impossible_date_should_fail, ":every Feb 30", ParseError::DayNotInYear { .. });
test_rule_error!(ordinal_without_day_should_fail, ":first", ParseError::RuleArguments { .. });
test_rule_error!(ordinal_bad_day_should_fail, ":first Saturday", ParseError::NotADayName { .. });
test_rule_error!(easter_bad_offset_should_fail, ":easter Tue", ParseError::RuleArguments { .. });
test_rule_error!(easter_bad_year_should_fail, ":easter Sun next", ParseError::RuleArguments { .. });
test_rule_error!(relative_bad_direction_should_fail, ":Mon around 2013 Dec 25", ParseError::RuleArguments { .. });
test_rule_error!(relative_without_date_should_fail, ":weekday after", ParseError::RuleArguments { .. });
test_rule_error!(
    nested_yearly_should_fail,
    ":Mon before 2013* Dec 25",
    ParseError::YearlyNotAllowed { .. }
);
test_rule_error!(
    nested_missing_date_should_fail,
    ":Mon before :fifth Fri",
    ParseError::NoSuchDate { .. }
);
test_rule_error!(empty_date_should_fail, "   ", ParseError::DateShape { .. });
