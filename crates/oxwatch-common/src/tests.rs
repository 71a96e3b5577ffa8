use crate::annotation::{HorizontalAnnotation, Shading};
use crate::error::MonitoringError;
use crate::naming::{NameResolutionInput, NamedConstruct, NamingStrategy, UserProvidedNames};
use crate::strings::*;

struct Table(&'static str);

impl NamedConstruct for Table {
    fn construct_id(&self) -> &str {
        self.0
    }
}

fn names(human: Option<&str>, friendly: Option<&str>) -> UserProvidedNames {
    UserProvidedNames {
        human_readable_name: human.map(str::to_string),
        alarm_friendly_name: friendly.map(str::to_string),
        local_alarm_name_prefix_override: None,
    }
}

// ---- strings ----

#[test]
fn capitalize_helpers() {
    assert_eq!(capitalize_first_letter(""), "");
    assert_eq!(capitalize_first_letter("aa"), "Aa");
    assert_eq!(capitalize_first_letter("AA"), "AA");
    assert_eq!(capitalize_first_letter_only("AA"), "Aa");
    assert_eq!(capitalize_first_letter_only("a"), "A");
}

#[test]
fn dynamic_label_groups_are_removed() {
    assert_eq!(remove_brackets_with_dynamic_labels(""), "");
    assert_eq!(remove_brackets_with_dynamic_labels("abc"), "abc");
    assert_eq!(remove_brackets_with_dynamic_labels("a (b) c"), "a (b) c");
    assert_eq!(remove_brackets_with_dynamic_labels("a (b: ${c}) d"), "a d");
    assert_eq!(
        remove_brackets_with_dynamic_labels("a (b: ${c}) (d: ${e}) f"),
        "a f"
    );
    assert_eq!(
        remove_brackets_with_dynamic_labels("TPS (min: ${MIN}, max: ${MAX})"),
        "TPS"
    );
}

#[test]
fn short_hash_is_stable() {
    assert_eq!(hash_for_expression_id(""), "f56f10af2d6c9");
    assert_eq!(hash_for_expression_id("Hello world!"), "ff4e5fadf3425");
    assert_eq!(short_hash("DummyMetric"), "a70d44a662b54");
    assert_eq!(short_hash("DummyMetric_Warning"), "999f40bc3b7ed");
}

#[test]
fn expression_id_rules() {
    assert!(is_valid_expression_id("m1"));
    assert!(is_valid_expression_id("anomaly_a70d44a662b54"));
    assert!(!is_valid_expression_id("M1"));
    assert!(!is_valid_expression_id("1m"));
    assert!(!is_valid_expression_id("m-1"));
    assert!(!is_valid_expression_id(""));
    assert_eq!(sanitize_expression_id_suffix("Get /orders-v2"), "Getordersv2");
}

#[test]
fn alarm_name_sanitizing() {
    assert_eq!(sanitize_alarm_friendly_name("Orders API (prod)"), "Orders-API-prod");
    assert_eq!(sanitize_alarm_friendly_name("a--b"), "a--b");
    assert_eq!(sanitize_alarm_friendly_name("  "), "");
    assert_eq!(sanitize_alarm_name("Test-Api-Latency-p99.9 Warning"), "Test-Api-Latency-p99.9-Warning");
    assert!(is_alarm_friendly("DummyApi_1"));
    assert!(!is_alarm_friendly("Dummy Api"));
}

// ---- naming ----

#[test]
fn explicit_names_win() {
    let input = NameResolutionInput::new(names(Some("Orders API"), Some("OrdersApi")))
        .with_construct(&Table("OrdersConstruct"))
        .with_fallback_name("orders-fallback");
    let naming = NamingStrategy::new(input);

    assert_eq!(naming.resolve_human_readable_name().unwrap(), "Orders API");
    assert_eq!(naming.resolve_alarm_friendly_name().unwrap(), "OrdersApi");
}

#[test]
fn construct_name_precedes_fallback() {
    let input = NameResolutionInput::new(names(None, None))
        .with_construct(&Table("OrdersTable"))
        .with_fallback_name("orders-fallback");
    let naming = NamingStrategy::new(input);

    assert_eq!(naming.resolve_human_readable_name().unwrap(), "OrdersTable");
    assert_eq!(naming.resolve_alarm_friendly_name().unwrap(), "OrdersTable");
}

#[test]
fn friendly_name_skips_candidates_that_sanitize_to_nothing() {
    let input = NameResolutionInput::new(names(None, Some("%%%"))).with_fallback_name("Orders");
    let naming = NamingStrategy::new(input);

    assert_eq!(naming.resolve_alarm_friendly_name().unwrap(), "Orders");
}

#[test]
fn title_falls_back_to_friendly_name() {
    let naming = NamingStrategy::new(NameResolutionInput::new(names(None, Some("OrdersApi"))));
    assert_eq!(naming.resolve_human_readable_name().unwrap(), "OrdersApi");
}

#[test]
fn missing_name_is_an_error_for_alarms_but_not_for_widgets() {
    let naming = NamingStrategy::new(NameResolutionInput::default());

    assert!(naming.try_human_readable_name().is_none());
    assert!(matches!(
        naming.resolve_alarm_friendly_name(),
        Err(MonitoringError::MissingName(_))
    ));
    assert!(naming.resolve_human_readable_name().is_err());
}

#[test]
fn local_prefix_override() {
    let mut user = names(None, Some("OrdersApi"));
    user.local_alarm_name_prefix_override = Some("Orders".to_string());
    let naming = NamingStrategy::new(NameResolutionInput::new(user));

    assert_eq!(naming.resolve_local_alarm_name_prefix().unwrap(), "Orders");
    assert_eq!(naming.resolve_alarm_friendly_name().unwrap(), "OrdersApi");
}

// ---- annotation ----

#[test]
fn annotation_serializes_without_empty_fields() {
    let annotation = HorizontalAnnotation::new(330.0)
        .with_label("Warning")
        .with_fill(Shading::Above);
    let json = serde_json::to_value(&annotation).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"value": 330.0, "label": "Warning", "fill": "above"})
    );
}
