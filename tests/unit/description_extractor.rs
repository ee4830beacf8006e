use listing_harvester::extract::{extract_description, OverviewPayload};
use serde_json::{json, Value};

fn extract(value: Value) -> String {
    extract_description(&OverviewPayload::from(value))
}

#[test]
fn preferred_keys_win_in_order() {
    assert_eq!(extract(json!({"description": "  Hello  "})), "Hello");
    assert_eq!(
        extract(json!({
            "full_description": "third",
            "job_description": "second",
            "description": "first"
        })),
        "first"
    );
    assert_eq!(
        extract(json!({"full_description": "third", "job_description": "second"})),
        "second"
    );
}

#[test]
fn blank_preferred_key_falls_through() {
    let long = "We are hiring a data engineer to build our lakehouse platform.";
    assert_eq!(
        extract(json!({"description": "   ", "summary": long})),
        long
    );
}

#[test]
fn long_freeform_value_is_used() {
    let long = "x".repeat(45);
    assert_eq!(
        extract(json!({"title": "Short", "body": long.clone()})),
        long
    );
}

#[test]
fn first_long_freeform_value_wins() {
    let first = "First long enough value for the freeform rule.";
    let second = "Second long enough value for the freeform rule.";
    assert_eq!(extract(json!({"a": first, "b": second})), first);
}

#[test]
fn nested_preferred_key_is_last_resort() {
    assert_eq!(
        extract(json!({"title": "Short", "details": {"description": " Nested "}})),
        "Nested"
    );
    // A flat long value beats a nested preferred key
    let long = "y".repeat(50);
    assert_eq!(
        extract(json!({"details": {"description": "Nested"}, "body": long.clone()})),
        long
    );
}

#[test]
fn nesting_is_one_level_only() {
    assert_eq!(
        extract(json!({"outer": {"inner": {"description": "too deep"}}})),
        ""
    );
}

#[test]
fn sequence_uses_first_object() {
    let long = "z".repeat(45);
    assert_eq!(extract(json!([{"body": long.clone()}, {"description": "ignored"}])), long);
    assert_eq!(extract(json!(["noise", {"description": "object"}])), "object");
}

#[test]
fn unusable_payloads_give_empty_string() {
    for value in [
        json!(null),
        json!({}),
        json!([]),
        json!([1, "x"]),
        json!("a bare string that is long enough to be a description"),
        json!({"title": "Short", "count": 3}),
    ] {
        assert_eq!(extract(value.clone()), "", "payload {value}");
    }
    assert_eq!(extract_description(&OverviewPayload::from(None)), "");
}

#[test]
fn extraction_is_idempotent() {
    let payload = OverviewPayload::from(json!({"job_description": "\n\tStable text\n"}));
    let first = extract_description(&payload);
    let second = extract_description(&payload);
    assert_eq!(first, "Stable text");
    assert_eq!(first, second);
}
