use mdrt_types::{Datatype, TypedValue};
use mdrt_validators::{
    NotNullValidator, NumberRangeValidator, RegExValidator, StringRangeValidator,
    TemporalRangeValidator, Validator, ValidatorError, validate_all,
};

fn text(s: &str) -> TypedValue {
    TypedValue::from_string(Datatype::String, s).unwrap()
}

fn int(i: i64) -> TypedValue {
    TypedValue::from_number(Datatype::Integer, i as f64).unwrap()
}

// ── RegExValidator ───────────────────────────────────────────────

#[test]
fn regex_matches_whole_text() {
    let v = RegExValidator::new(r"\d+", None).unwrap();
    assert!(v.is_valid(&text("42")));
    assert!(!v.is_valid(&text("42a")));
    assert!(!v.is_valid(&text("a42")));
}

#[test]
fn regex_alternation_is_anchored_as_a_group() {
    let v = RegExValidator::new("yes|no", None).unwrap();
    assert!(v.is_valid(&text("no")));
    assert!(!v.is_valid(&text("yesno")));
    assert!(!v.is_valid(&text("nope")));
}

#[test]
fn regex_applies_to_text_form_of_any_datatype() {
    let v = RegExValidator::new(r"\d{2}:00:00", None).unwrap();
    let t = TypedValue::from_string(Datatype::Time, "2024-01-01T10:00:00").unwrap();
    assert!(v.is_valid(&t));
    assert!(!v.is_valid(&TypedValue::from_string(Datatype::Time, "10:30").unwrap()));
}

#[test]
fn regex_accepts_unset_and_empty() {
    let v = RegExValidator::new("[a-z]+", None).unwrap();
    assert!(v.is_valid(&TypedValue::unset(Datatype::Integer)));
    assert!(v.is_valid(&text("")));
}

#[test]
fn regex_messages() {
    let default = RegExValidator::new("x", None).unwrap();
    assert_eq!(default.message(), "The input format is invalid!");
    assert_eq!(default.kind(), "RegExValidator");
    let custom = RegExValidator::new("x", Some("only x")).unwrap();
    assert_eq!(custom.message(), "only x");
}

#[test]
fn regex_invalid_pattern() {
    assert!(matches!(
        RegExValidator::new("(", None),
        Err(ValidatorError::InvalidPattern(_))
    ));
}

// ── NotNullValidator ─────────────────────────────────────────────

#[test]
fn not_null_rejects_unset_and_empty() {
    let v = NotNullValidator::default();
    assert!(!v.is_valid(&TypedValue::unset(Datatype::Date)));
    assert!(!v.is_valid(&text("")));
    assert!(v.is_valid(&text("x")));
    assert!(v.is_valid(&TypedValue::from_bool(Datatype::Boolean, false).unwrap()));
}

// ── NumberRangeValidator ─────────────────────────────────────────

#[test]
fn number_range_inclusive() {
    let v = NumberRangeValidator::new(Some(1.0), Some(10.0), None);
    assert!(v.is_valid(&int(1)));
    assert!(v.is_valid(&int(10)));
    assert!(!v.is_valid(&int(0)));
    assert!(!v.is_valid(&int(11)));
    assert!(v.is_valid(&TypedValue::from_number(Datatype::Float, 9.5).unwrap()));
    assert_eq!(v.message(), "The number must be between 1 and 10!");
}

#[test]
fn number_range_open_ended() {
    let v = NumberRangeValidator::new(None, Some(0.0), None);
    assert!(v.is_valid(&int(-100)));
    assert!(!v.is_valid(&int(1)));
}

#[test]
fn number_range_rejects_non_numeric() {
    let v = NumberRangeValidator::new(None, None, None);
    assert!(!v.is_valid(&text("5")));
    assert!(v.is_valid(&TypedValue::unset(Datatype::String)));
}

// ── StringRangeValidator ─────────────────────────────────────────

#[test]
fn string_range_counts_characters() {
    let v = StringRangeValidator::new(Some(2), Some(3), None);
    assert!(v.is_valid(&text("äö")));
    assert!(!v.is_valid(&text("a")));
    assert!(!v.is_valid(&text("abcd")));
    assert!(v.is_valid(&int(123)));
}

// ── TemporalRangeValidator ───────────────────────────────────────

#[test]
fn date_range() {
    let v = TemporalRangeValidator::date(Some("2024-01-01"), Some("2024-12-31"), None).unwrap();
    let inside = TypedValue::from_string(Datatype::Date, "2024-06-15").unwrap();
    let before = TypedValue::from_string(Datatype::Date, "2023-12-31").unwrap();
    assert!(v.is_valid(&inside));
    assert!(!v.is_valid(&before));
    assert_eq!(v.kind(), "DateRangeValidator");
    assert_eq!(v.message(), "The date must be between 2024-01-01 and 2024-12-31!");
}

#[test]
fn time_range_lower_bound_only() {
    let v = TemporalRangeValidator::time(Some("08:00"), None, None).unwrap();
    assert!(v.is_valid(&TypedValue::from_string(Datatype::Time, "08:00:00").unwrap()));
    assert!(!v.is_valid(&TypedValue::from_string(Datatype::Time, "07:59:59").unwrap()));
}

#[test]
fn temporal_range_rejects_other_datatypes() {
    let v = TemporalRangeValidator::datetime(None, Some("2030-01-01T00:00:00"), None).unwrap();
    assert!(!v.is_valid(&TypedValue::from_string(Datatype::Date, "2020-01-01").unwrap()));
    let unbounded = TemporalRangeValidator::date(None, None, None).unwrap();
    assert!(!unbounded.is_valid(&int(1)));
}

#[test]
fn temporal_range_bad_bound() {
    assert!(matches!(
        TemporalRangeValidator::date(Some("tomorrow"), None, None),
        Err(ValidatorError::InvalidBound(_))
    ));
}

// ── validate_all ─────────────────────────────────────────────────

#[test]
fn validate_all_collects_failures_in_order() {
    let validators: Vec<Box<dyn Validator>> = vec![
        Box::new(RegExValidator::new(r"\d+", Some("digits only")).unwrap()),
        Box::new(StringRangeValidator::new(None, Some(2), Some("too long"))),
        Box::new(NotNullValidator::default()),
    ];
    assert_eq!(validate_all(&validators, &text("12")), Ok(()));
    assert_eq!(
        validate_all(&validators, &text("abc")),
        Err(vec!["digits only".to_string(), "too long".to_string()])
    );
    assert_eq!(
        validate_all(&validators, &TypedValue::unset(Datatype::String)),
        Err(vec!["This field is mandatory!".to_string()])
    );
}
