use super::common::SAMPLE_SCHEMA;
use connect_wizard::error::ParseErrorKind;
use connect_wizard::parse::parse;
use connect_wizard::types::*;

#[test]
fn sample_schema_parses() {
    let schema = parse(SAMPLE_SCHEMA).unwrap();
    assert_eq!(schema.modes.len(), 3);
    assert_eq!(schema.fields.len(), 8);
    assert!(schema.key_order.is_none());
    assert!(matches!(schema.steps, StepTree::Branch(_)));
}

#[test]
fn option_shapes_are_distinguished() {
    let schema = parse(SAMPLE_SCHEMA).unwrap();
    assert!(matches!(
        schema.field("framework").unwrap().options,
        Some(FieldOptions::Static(_))
    ));
    assert!(matches!(
        &schema.field("library").unwrap().options,
        Some(FieldOptions::Source { source }) if source == "libraries"
    ));
    assert!(matches!(
        schema.field("frameworkVariant").unwrap().options,
        Some(FieldOptions::Conditional(ConditionalValue::Branch(_)))
    ));
    assert!(schema.field("frameworkUi").unwrap().options.is_none());
}

#[test]
fn default_values_keep_their_type() {
    let schema = parse(SAMPLE_SCHEMA).unwrap();
    assert_eq!(
        schema.field("frameworkUi").unwrap().default_value,
        Some(StateValue::Bool(false))
    );
    assert_eq!(
        schema.field("orm").unwrap().default_value,
        Some(StateValue::Text("prisma".to_string()))
    );
}

#[test]
fn json_input_is_accepted() {
    let schema = parse(r#"{"modes": [{"id": "direct", "fields": []}], "steps": []}"#).unwrap();
    assert_eq!(schema.modes[0].id, "direct");
}

#[test]
fn null_content_is_a_leaf() {
    let schema = parse(
        r#"
modes: [{ id: m, fields: [] }]
steps:
  - id: a
    title: A
    content: null
"#,
    )
    .unwrap();
    let StepTree::Steps(steps) = &schema.steps else {
        panic!("expected a terminal step list");
    };
    assert_eq!(steps[0].content, ConditionalValue::Leaf(None));
}

#[test]
fn empty_input_is_rejected() {
    let err = parse("  \n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Syntax);
}

#[test]
fn non_mapping_root_is_rejected() {
    let err = parse("- a\n- b\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TypeMismatch);
}

#[test]
fn unknown_top_level_key_is_rejected() {
    let err = parse("modes: []\nwizard: true\n").unwrap_err();
    assert_eq!(err.path.as_deref(), Some("wizard"));
    assert!(err.to_string().contains("wizard"));
}

#[test]
fn missing_modes_is_rejected() {
    let err = parse("fields: {}\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TypeMismatch);
}

#[test]
fn multi_document_is_rejected() {
    let err = parse("---\nmodes: []\n---\nmodes: []\n").unwrap_err();
    assert!(err.message.contains("multi-document"));
}

#[test]
fn unknown_field_type_is_an_unknown_variant() {
    let err = parse(
        r#"
modes: []
fields:
  x: { id: x, label: X, type: checkbox }
"#,
    )
    .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownVariant);
}

#[test]
fn malformed_step_tree_is_rejected() {
    assert!(parse("modes: []\nsteps: 42\n").is_err());
}
