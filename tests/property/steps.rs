use connect_wizard::steps::{flatten_steps, resolve_steps};
use connect_wizard::types::{Schema, State, StepTree};
use proptest::prelude::*;
use serde_json::json;

fn schema_with(steps: serde_json::Value) -> Schema {
    let mut schema = connect_wizard::parse("modes: [{ id: m, fields: [] }]\n").unwrap();
    schema.steps = StepTree::from_value(steps).unwrap();
    schema
}

fn arb_content() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(json!(null)),
        Just(json!("")),
        "[a-z/]{1,10}".prop_map(|s| json!(s)),
        ("[a-z/]{0,6}", "[a-z/]{0,6}").prop_map(|(a, b)| json!({"prisma": a, "DEFAULT": b})),
        "[a-z/]{0,6}".prop_map(|a| json!({"drizzle": a})),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Resolved content is never empty, and resolved steps are a subsequence
    // of the flattened ones.
    #[test]
    fn resolved_steps_are_non_empty_subsequence(
        contents in prop::collection::vec(arb_content(), 0..8),
        orm in prop::sample::select(vec!["prisma", "drizzle", "typeorm"]),
    ) {
        let steps: Vec<_> = contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| json!({"id": format!("s{}", i), "title": "t", "content": content}))
            .collect();
        let schema = schema_with(json!({"orm": {"DEFAULT": steps}}));
        let state = State::new().with("orm", orm);

        let flat: Vec<&str> = flatten_steps(&schema.steps, &state)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        let resolved = resolve_steps(&schema, &state);

        let mut cursor = flat.iter();
        for step in &resolved {
            prop_assert!(!step.content.is_empty());
            prop_assert!(cursor.any(|id| *id == step.id));
        }
    }
}
