use stockroom::attribute::{is_basic_regex, wildcard_to_regex, Attribute};
use stockroom::datatype::{Kind, Value};

fn setup() -> Attribute {
    let mut at = Attribute::new();
    at.set_type(Kind::Integer);
    at.set_value(Some("32".into()));
    at.set_multiple_allowed(true);
    at
}

#[test]
fn wildcard_detection() {
    assert!(!is_basic_regex("30"));
    assert!(!is_basic_regex("!@#$%^&()_+{}|:<>?';/.,=-0987654321`~\""));
    assert!(is_basic_regex("*3*"));
    assert!(is_basic_regex("3*"));
    assert!(is_basic_regex("*3"));
    assert!(is_basic_regex("*"));
}

#[test]
fn wildcard_patterns_are_anchored_and_literal() {
    let re = wildcard_to_regex("3*").expect("pattern");
    assert!(re.is_match("300"));
    assert!(!re.is_match("0300"));

    let literal = "!@#$%^&()_+{}|:<>?';/.,=-0987654321`~\"";
    let re = wildcard_to_regex(literal).expect("pattern");
    assert!(re.is_match(literal));

    let re = wildcard_to_regex("*3*").expect("pattern");
    assert!(re.is_match("hello my name is foobar\n 3 \nwhat is your name"));

    let re = wildcard_to_regex(".?").expect("pattern");
    assert!(re.is_match(".?"));
    assert!(!re.is_match("3"));
    assert!(!re.is_match(""));
}

#[test]
fn defaults() {
    let at = Attribute::new();
    assert!(!at.multiple_allowed());
    assert!(at.required());
    assert_eq!(at.kind(), Kind::String);
    assert!(at.as_string().is_none());
    assert!(at.as_native().is_none());
}

#[test]
fn set_and_retype() {
    let mut at = Attribute::new();
    assert!(at.set_value(Some("s".into())));
    assert_eq!(at.as_native(), Some(&Value::Text("s".into())));
    assert!(at.set_value(Some(3i64.into())));
    assert_eq!(at.as_string().as_deref(), Some("3"));

    at.set_type(Kind::Integer);
    assert_eq!(at.kind(), Kind::Integer);
    assert_eq!(at.as_native(), Some(&Value::Integer(3)));

    assert!(!at.set_value(Some("hello".into())));
    assert!(at.as_native().is_none(), "failed set must clear the value");

    assert!(at.set_value(Some("32".into())));
    assert_eq!(at.as_native(), Some(&Value::Integer(32)));

    assert!(at.set_value(None));
    assert!(at.is_null());
}

#[test]
fn retype_clears_values_that_do_not_fit() {
    let mut at = Attribute::new();
    at.set_value(Some("3.5".into()));
    at.set_type(Kind::Float);
    assert_eq!(at.as_native(), Some(&Value::Float(3.5)));
    at.set_type(Kind::Integer);
    assert!(at.is_null());
}

#[test]
fn floats_keep_their_fraction() {
    let mut at = Attribute::of(Kind::Float);
    assert!(at.set_value(Some(32i64.into())));
    assert_eq!(at.as_native(), Some(&Value::Float(32.0)));
    assert_eq!(at.as_string().as_deref(), Some("32.0"));
    assert!(!at.set_value(Some("".into())));
    assert!(at.is_null());
}

#[test]
fn blank_attributes() {
    assert!(Attribute::new().matches_criteria(None));
    assert!(!Attribute::new().matches_criteria(Some("")));
}

#[test]
fn integer_criteria() {
    let at = setup();
    for hit in ["32", "*2", "*", "3*", " 32 "] {
        assert!(at.matches_criteria(Some(hit)), "{hit} should match 32");
    }
    for miss in ["2*", "hello", "*3", ".3", "[0-9]?3", ""] {
        assert!(!at.matches_criteria(Some(miss)), "{miss} should not match 32");
    }
    assert!(at.matches_criteria(None));
}

#[test]
fn raw_criteria_ignore_wildcards() {
    let mut at = Attribute::new();
    at.set_value(Some("a*".into()));
    assert!(at.matches_criteria_with(Some("a*"), true));
    assert!(!at.matches_criteria_with(Some("a*c"), true));
    assert!(!at.matches_criteria(Some("a*c")));
    assert!(at.matches_criteria(Some("a*")));
}

#[test]
fn equality() {
    let a = setup();
    let mut b = setup();
    assert_eq!(a, b);
    b.set_multiple_allowed(false);
    assert_ne!(a, b);

    let mut c = setup();
    c.set_value(None);
    assert_ne!(a, c);

    let mut d = setup();
    d.set_required(false);
    assert_ne!(a, d);

    let mut e = Attribute::new();
    e.set_required(false);
    assert_eq!(Attribute::new(), e, "null attributes ignore required");
    assert_ne!(Attribute::new(), Attribute::of(Kind::Integer));
}
