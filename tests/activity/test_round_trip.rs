use serde_json::{json, Value};
use tessera::core::activity::builtins::{If, ReadLine, Sequence, SetVariable, WriteLine};
use tessera::core::activity::{
    ActivityBox, ActivityRegistry, ActivitySerializer, Input, MemoryReference, Output,
    SerializerOptions, Variable,
};

fn serializer() -> ActivitySerializer {
    ActivitySerializer::new(ActivityRegistry::with_builtins())
}

fn read(document: &Value) -> ActivityBox {
    serializer()
        .read_value(document, &SerializerOptions::default())
        .expect("document should read")
}

fn write(activity: &ActivityBox) -> Value {
    serializer()
        .write_value(activity.as_ref(), &SerializerOptions::default())
        .expect("activity should write")
}

fn assert_wire_round_trip(document: Value) {
    let activity = read(&document);
    assert_eq!(write(&activity), document);
}

#[test]
fn test_write_line_round_trip() {
    let document = json!({
        "typeName": "Tessera.WriteLine",
        "id": "w1",
        "text": {"typeName": "String", "expression": {"type": "Literal", "value": "Hello"}}
    });
    let activity = read(&document);

    let write_line = activity.downcast_ref::<WriteLine>().expect("WriteLine");
    assert_eq!(write_line.id, "w1");
    assert_eq!(write_line.text, Input::literal("Hello".to_string()));
    assert_eq!(write(&activity), document);
}

#[test]
fn test_write_line_expression_round_trip() {
    assert_wire_round_trip(json!({
        "typeName": "Tessera.WriteLine",
        "id": "w2",
        "text": {"typeName": "String", "expression": {"type": "JavaScript", "value": "`Hi ${name}`"}}
    }));
}

#[test]
fn test_read_line_round_trip() {
    let document = json!({
        "typeName": "Tessera.ReadLine",
        "id": "r1",
        "result": {"typeName": "String", "memoryReference": {"id": "v-answer"}}
    });
    let activity = read(&document);

    let read_line = activity.downcast_ref::<ReadLine>().expect("ReadLine");
    let result = read_line.result.as_ref().expect("output");
    assert_eq!(result.memory_reference().id, "v-answer");
    assert_eq!(write(&activity), document);
}

#[test]
fn test_read_line_without_output() {
    assert_wire_round_trip(json!({"typeName": "Tessera.ReadLine", "id": "r2"}));
}

#[test]
fn test_set_variable_round_trip() {
    assert_wire_round_trip(json!({
        "typeName": "Tessera.SetVariable",
        "id": "s1",
        "variable": {"id": "v-count"},
        "value": {"typeName": "Object", "expression": {"type": "Literal", "value": {"count": 3, "tags": ["a", "b"]}}}
    }));
}

#[test]
fn test_if_round_trip_with_both_branches() {
    let document = json!({
        "typeName": "Tessera.If",
        "id": "if1",
        "condition": {"typeName": "Boolean", "expression": {"type": "Rhai", "value": "answer == \"yes\""}},
        "then": {
            "typeName": "Tessera.WriteLine",
            "id": "w-yes",
            "text": {"typeName": "String", "expression": {"type": "Literal", "value": "yes"}}
        },
        "else": {
            "typeName": "Tessera.WriteLine",
            "id": "w-no",
            "text": {"typeName": "String", "expression": {"type": "Literal", "value": "no"}}
        }
    });
    let activity = read(&document);

    let branch = activity.downcast_ref::<If>().expect("If");
    assert_eq!(branch.then.as_ref().map(|a| a.id()), Some("w-yes"));
    assert_eq!(branch.otherwise.as_ref().map(|a| a.id()), Some("w-no"));
    assert_eq!(activity.children().len(), 2);
    assert_eq!(write(&activity), document);
}

#[test]
fn test_nested_sequence_round_trip() {
    assert_wire_round_trip(json!({
        "typeName": "Tessera.Sequence",
        "id": "root",
        "variables": [
            {"id": "v-answer", "name": "answer", "typeName": "String"},
            {"id": "v-count", "name": "count", "typeName": "Int32", "value": 0}
        ],
        "activities": [
            {
                "typeName": "Tessera.WriteLine",
                "id": "ask",
                "text": {"typeName": "String", "expression": {"type": "Literal", "value": "Continue?"}}
            },
            {
                "typeName": "Tessera.ReadLine",
                "id": "read",
                "result": {"typeName": "String", "memoryReference": {"id": "v-answer"}}
            },
            {
                "typeName": "Tessera.Sequence",
                "id": "inner",
                "variables": [],
                "activities": [
                    {
                        "typeName": "Tessera.SetVariable",
                        "id": "bump",
                        "variable": {"id": "v-count"},
                        "value": {"typeName": "Object", "expression": {"type": "Rhai", "value": "count + 1"}}
                    }
                ]
            }
        ]
    }));
}

#[test]
fn test_code_built_graph_survives_write_then_read() {
    let answer = Variable::<String>::new("answer").with_id("v-answer");
    let root = Sequence::new()
        .with_id("root")
        .with_variable(answer.clone().erase().unwrap())
        .with_activity(ReadLine::new().with_id("read").capture(Output::to(&answer)))
        .with_activity(
            If::new(Input::expression("JavaScript", "answer === 'y'"))
                .with_id("branch")
                .with_then(WriteLine::new("accepted").with_id("ok"))
                .with_otherwise(
                    SetVariable::new(MemoryReference::new("v-answer"), Input::literal(json!("n")))
                        .with_id("reset"),
                ),
        );
    let root: ActivityBox = Box::new(root);

    let first = write(&root);
    let reread = read(&first);
    assert_eq!(write(&reread), first);

    let sequence = reread.downcast_ref::<Sequence>().expect("Sequence");
    assert_eq!(sequence.variables.len(), 1);
    assert_eq!(sequence.variables[0].typed::<String>().unwrap(), answer);
    let ids: Vec<_> = sequence.activities.iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec!["read", "branch"]);
}

#[test]
fn test_missing_optional_fields_written_as_null_when_configured() {
    let options = SerializerOptions {
        skip_null_values: false,
        ..SerializerOptions::default()
    };
    let activity: ActivityBox = Box::new(
        If::new(Input::literal(true)).with_id("if-bare"),
    );
    let written = serializer()
        .write_value(activity.as_ref(), &options)
        .unwrap();

    assert_eq!(written["then"], Value::Null);
    assert_eq!(written["else"], Value::Null);
    assert!(written.as_object().unwrap().contains_key("then"));

    let default_written = write(&activity);
    assert!(!default_written.as_object().unwrap().contains_key("then"));
}

#[test]
fn test_null_fields_read_as_absent() {
    let activity = read(&json!({
        "typeName": "Tessera.If",
        "id": "if-null",
        "condition": {"typeName": "Boolean", "expression": {"type": "Literal", "value": false}},
        "then": null,
        "else": null
    }));
    let branch = activity.downcast_ref::<If>().unwrap();
    assert!(branch.then.is_none());
    assert!(branch.otherwise.is_none());
}

#[test]
fn test_text_round_trip_through_reader_and_string() {
    let text = r#"{"typeName":"Tessera.WriteLine","id":"w9","text":{"typeName":"String","expression":{"type":"Literal","value":"x"}}}"#;
    let serializer = serializer();
    let options = SerializerOptions::default();

    let from_reader = serializer.read_reader(text.as_bytes(), &options).unwrap();
    let from_slice = serializer.read_slice(text.as_bytes(), &options).unwrap();
    let rendered = serializer
        .write_string(from_reader.as_ref(), &options, false)
        .unwrap();

    let reparsed: Value = serde_json::from_str(&rendered).unwrap();
    let original: Value = serde_json::from_str(text).unwrap();
    assert_eq!(reparsed, original);
    assert_eq!(from_slice.id(), "w9");
}

#[test]
fn test_missing_id_is_generated_on_resolved_nodes() {
    let activity = read(&json!({"typeName": "Tessera.ReadLine"}));
    assert_eq!(activity.id().len(), 32);
    assert!(activity.id().chars().all(|c| c.is_ascii_hexdigit()));

    let written = write(&activity);
    assert_eq!(written["id"], json!(activity.id()));
}

#[test]
fn test_blank_references_are_refused_on_write() {
    let options = SerializerOptions::default();
    let serializer = serializer();

    let read_line: ActivityBox = Box::new(
        ReadLine::new()
            .with_id("read")
            .capture(Output::new(MemoryReference::new(""))),
    );
    let err = serializer
        .write_value(read_line.as_ref(), &options)
        .unwrap_err();
    assert_eq!(err.code, "ACT-WRITE-007");
    assert_eq!(err.context.get("field").map(String::as_str), Some("result"));

    let assign: ActivityBox = Box::new(
        SetVariable::new(MemoryReference::new(""), Input::literal(json!(1))).with_id("assign"),
    );
    let err = serializer.write_value(assign.as_ref(), &options).unwrap_err();
    assert_eq!(err.code, "ACT-WRITE-007");
    assert_eq!(err.context.get("field").map(String::as_str), Some("variable"));
}

#[test]
fn test_blank_node_id_is_refused_on_write() {
    let options = SerializerOptions::default();
    let serializer = serializer();

    let bare: ActivityBox = Box::new(WriteLine::new("x").with_id(""));
    let err = serializer.write_value(bare.as_ref(), &options).unwrap_err();
    assert_eq!(err.code, "ACT-WRITE-008");
    assert_eq!(
        err.context.get("type_name").map(String::as_str),
        Some("Tessera.WriteLine")
    );

    let nested: ActivityBox = Box::new(
        Sequence::new()
            .with_id("root")
            .with_activity(WriteLine::new("x").with_id("  ")),
    );
    let err = serializer.write_value(nested.as_ref(), &options).unwrap_err();
    assert_eq!(err.code, "ACT-WRITE-008");
}
