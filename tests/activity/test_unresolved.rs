use serde_json::json;
use std::collections::HashSet;
use tessera::core::activity::builtins::Sequence;
use tessera::core::activity::{
    ActivityRegistry, ActivitySerializer, NotFoundActivity, SerializerOptions,
};
use tessera::core::types::ErrorCategory;

fn serializer() -> ActivitySerializer {
    ActivitySerializer::new(ActivityRegistry::with_builtins())
}

#[test]
fn test_unknown_type_becomes_placeholder_with_original_id() {
    let options = SerializerOptions::default();
    let activity = serializer()
        .read_value(
            &json!({"typeName": "Vendor.DoesNotExist", "id": "abc123"}),
            &options,
        )
        .expect("unknown types must not fail the read");

    assert!(activity.is_unresolved());
    let placeholder = activity.downcast_ref::<NotFoundActivity>().unwrap();
    assert_eq!(placeholder.id, "abc123");
    assert_eq!(placeholder.original_type_name, "Vendor.DoesNotExist");
    assert_eq!(activity.type_name(), "Vendor.DoesNotExist");
}

#[test]
fn test_placeholder_writes_only_identity() {
    let options = SerializerOptions::default();
    let serializer = serializer();
    let activity = serializer
        .read_value(
            &json!({
                "typeName": "Vendor.SendEmail",
                "id": "mail-1",
                "to": {"typeName": "String", "expression": {"type": "Literal", "value": "ops@example.com"}}
            }),
            &options,
        )
        .unwrap();

    let written = serializer.write_value(activity.as_ref(), &options).unwrap();
    assert_eq!(written, json!({"typeName": "Vendor.SendEmail", "id": "mail-1"}));
}

#[test]
fn test_missing_id_generates_distinct_ids() {
    let options = SerializerOptions::default();
    let serializer = serializer();
    let document = json!({"typeName": "Vendor.DoesNotExist"});

    let ids: HashSet<String> = (0..16)
        .map(|_| {
            serializer
                .read_value(&document, &options)
                .unwrap()
                .id()
                .to_string()
        })
        .collect();

    assert_eq!(ids.len(), 16);
    for id in &ids {
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn test_empty_or_non_string_id_is_replaced() {
    let options = SerializerOptions::default();
    let serializer = serializer();
    for document in [
        json!({"typeName": "Vendor.DoesNotExist", "id": ""}),
        json!({"typeName": "Vendor.DoesNotExist", "id": 42}),
        json!({"typeName": "Vendor.DoesNotExist", "id": null}),
    ] {
        let activity = serializer.read_value(&document, &options).unwrap();
        assert_eq!(activity.id().len(), 32);
    }
}

#[test]
fn test_missing_type_name_is_malformed() {
    let err = serializer()
        .read_value(&json!({"id": "x"}), &SerializerOptions::default())
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::MalformedDocument);
    assert_eq!(err.code, "ACT-READ-002");
}

#[test]
fn test_blank_type_name_is_malformed() {
    let err = serializer()
        .read_value(
            &json!({"typeName": "   ", "id": "x"}),
            &SerializerOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::MalformedDocument);
}

#[test]
fn test_unknown_child_does_not_fail_container() {
    let options = SerializerOptions::default();
    let serializer = serializer();
    let activity = serializer
        .read_value(
            &json!({
                "typeName": "Tessera.Sequence",
                "id": "root",
                "activities": [
                    {"typeName": "Vendor.Missing", "id": "gap"},
                    {"typeName": "Tessera.ReadLine", "id": "read"}
                ]
            }),
            &options,
        )
        .unwrap();

    let sequence = activity.downcast_ref::<Sequence>().unwrap();
    assert!(sequence.activities[0].is_unresolved());
    assert!(!sequence.activities[1].is_unresolved());

    let written = serializer.write_value(activity.as_ref(), &options).unwrap();
    assert_eq!(
        written["activities"][0],
        json!({"typeName": "Vendor.Missing", "id": "gap"})
    );
}

#[test]
fn test_constructor_failure_is_not_downgraded() {
    let err = serializer()
        .read_value(
            &json!({
                "typeName": "Tessera.WriteLine",
                "id": "w1",
                "text": {"typeName": "String", "expression": {"type": "Literal", "value": 42}}
            }),
            &SerializerOptions::default(),
        )
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::ConstructionFailure);
    assert_eq!(err.code, "ACT-BIND-003");
    assert_eq!(err.context.get("field").map(String::as_str), Some("text"));
    assert_eq!(
        err.context.get("type_name").map(String::as_str),
        Some("Tessera.WriteLine")
    );
}

#[test]
fn test_missing_required_field_names_the_field() {
    let err = serializer()
        .read_value(
            &json!({"typeName": "Tessera.WriteLine", "id": "w1"}),
            &SerializerOptions::default(),
        )
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::ConstructionFailure);
    assert_eq!(err.context.get("field").map(String::as_str), Some("text"));
}

#[test]
fn test_nested_constructor_failure_fails_whole_document() {
    let err = serializer()
        .read_value(
            &json!({
                "typeName": "Tessera.Sequence",
                "activities": [
                    {"typeName": "Tessera.SetVariable", "id": "s1", "variable": {"id": ""},
                     "value": {"typeName": "Object", "expression": {"type": "Literal", "value": 1}}}
                ]
            }),
            &SerializerOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConstructionFailure);
}

#[test]
fn test_failed_read_leaves_options_untouched() {
    let options = SerializerOptions::default();
    let before = options.clone();
    let serializer = serializer();
    let registry_size = serializer.registry().len();

    let _ = serializer.read_value(&json!({"id": "x"}), &options);
    let _ = serializer.read_value(
        &json!({"typeName": "Tessera.WriteLine", "id": "w1"}),
        &options,
    );

    assert_eq!(options, before);
    assert_eq!(serializer.registry().len(), registry_size);
}
