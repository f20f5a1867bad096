//! Integration tests for schema validation behavior

use formcheck_core::schema::{
    email, forward, min_length, non_empty, number, object, partial_check, pipe, string, trim,
};
use formcheck_core::{validate, ConfigOverrides, Kind, Node};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn passwords_match(value: &Value) -> bool {
    value.get("password") == value.get("confirmPassword")
}

fn credentials() -> Node {
    pipe([
        object([
            ("email", pipe([string(), non_empty(), email()])),
            ("password", pipe([string(), non_empty(), min_length(8)])),
            ("confirmPassword", pipe([string(), non_empty()])),
        ]),
        forward(
            partial_check([["password"], ["confirmPassword"]], passwords_match)
                .with_message("Passwords do not match."),
            ["confirmPassword"],
        ),
    ])
}

#[test]
fn test_revalidating_output_is_clean() {
    let schema = object([("name", pipe([string(), trim(), min_length(2)])), ("age", number())]);
    let input = json!({"name": "  bo  ", "age": 4, "x": 1});
    let first = validate(&schema, input, ConfigOverrides::new());
    assert!(first.success);
    assert_eq!(first.output, json!({"name": "bo", "age": 4}));

    let second = validate(&schema, first.output.clone(), ConfigOverrides::new());
    assert!(second.success);
    assert_eq!(second.output, first.output);
}

#[test]
fn test_unknown_keys_are_stripped() {
    let schema = object([("a", number())]);
    let output = validate(&schema, json!({"a": 1, "b": 2}), ConfigOverrides::new());
    assert!(output.success);
    assert_eq!(output.output, json!({"a": 1}));
}

#[test]
fn test_missing_key_reports_key_issue() {
    let schema = object([("a", string())]);
    let output = validate(&schema, json!({}), ConfigOverrides::new());
    let issues = output.issues.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].label, "key");
    assert_eq!(issues[0].kind, Kind::Schema);
    assert_eq!(issues[0].expected.as_deref(), Some("\"a\""));
    assert_eq!(issues[0].dotted_path().as_deref(), Some("a"));
}

#[test]
fn test_password_mismatch_lands_on_confirmation() {
    let input = json!({
        "email": "jane@example.com",
        "password": "correct horse",
        "confirmPassword": "battery staple",
    });
    let output = validate(&credentials(), input, ConfigOverrides::new());
    let issues = output.issues.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Passwords do not match.");
    assert_eq!(issues[0].dotted_path().as_deref(), Some("confirmPassword"));
}

#[test]
fn test_type_failure_stops_pipe() {
    let output = validate(&pipe([string(), non_empty()]), json!(42), ConfigOverrides::new());
    assert!(!output.typed);
    let issues = output.issues.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].label, "type");
}

#[test]
fn test_min_length_boundary() {
    let schema = pipe([string(), min_length(8)]);
    let short = validate(&schema, json!("1234567"), ConfigOverrides::new());
    assert_eq!(short.issues.unwrap()[0].received, "7");
    assert!(validate(&schema, json!("12345678"), ConfigOverrides::new()).success);
}

#[test]
fn test_email_acceptance() {
    let schema = pipe([string(), email()]);
    assert!(validate(&schema, json!("a@b.co"), ConfigOverrides::new()).success);
    assert!(!validate(&schema, json!("a@b"), ConfigOverrides::new()).success);
    assert!(!validate(&schema, json!("a b@c.co"), ConfigOverrides::new()).success);
}

#[test]
fn test_abort_early_reports_one_issue() {
    let input = json!({"email": "", "password": "", "confirmPassword": ""});
    let output = validate(&credentials(), input, ConfigOverrides::new().abort_early(true));
    assert_eq!(output.issues.unwrap().len(), 1);
}

#[test]
fn test_issue_carries_run_config() {
    let output = validate(
        &pipe([string(), min_length(3)]),
        json!("ab"),
        ConfigOverrides::new().lang("id").abort_pipe_early(true),
    );
    let issue = &output.issues.unwrap()[0];
    assert_eq!(issue.lang.as_deref(), Some("id"));
    assert!(issue.abort_pipe_early);
    assert!(!issue.abort_early);
}

#[tokio::test]
async fn test_async_entry_point_matches_sync() {
    let input = json!({"email": "bad", "password": "x", "confirmPassword": "y"});
    let sync = validate(&credentials(), input.clone(), ConfigOverrides::new());
    let async_output =
        formcheck_core::validate_async(&credentials(), input, ConfigOverrides::new()).await;
    assert_eq!(sync, async_output);
}

proptest! {
    #[test]
    fn prop_min_length_matches_char_count(s in "\\PC{0,16}", n in 0usize..12) {
        let schema = pipe([string(), min_length(n)]);
        let output = validate(&schema, json!(s.clone()), ConfigOverrides::new());
        prop_assert_eq!(output.success, s.chars().count() >= n);
    }

    #[test]
    fn prop_valid_output_revalidates(name in "[a-z]{3,10}", extra in "x_[a-z]{1,5}") {
        let schema = object([("name", pipe([string(), non_empty(), min_length(3)]))]);
        let mut input = serde_json::Map::new();
        input.insert("name".to_string(), json!(name));
        input.insert(extra, json!(1));
        let first = validate(&schema, Value::Object(input), ConfigOverrides::new());
        prop_assert!(first.success);
        let second = validate(&schema, first.output.clone(), ConfigOverrides::new());
        prop_assert!(second.success);
        prop_assert_eq!(second.output, first.output);
    }
}
