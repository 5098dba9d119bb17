use connect_wizard::lifecycle::{Session, reset_dependent_fields};
use connect_wizard::primitives::dependencies_satisfied;
use connect_wizard::types::{Schema, State, StateValue};
use proptest::prelude::*;
use std::sync::LazyLock;

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    connect_wizard::parse(
        r#"
modes:
  - id: framework
    fields: [framework, frameworkVariant, frameworkUi]
  - id: direct
    fields: [connectionMethod, useSharedPooler]
fields:
  framework:
    id: framework
    label: Framework
    type: select
    options:
      - { value: nextjs, label: Next.js }
      - { value: react, label: React }
      - { value: remix, label: Remix }
    defaultValue: nextjs
  frameworkVariant:
    id: frameworkVariant
    label: Variant
    type: select
    dependsOn: { framework: [nextjs, react] }
    options:
      nextjs: [{ value: app, label: App }, { value: pages, label: Pages }]
      react: [{ value: vite, label: Vite }]
  frameworkUi:
    id: frameworkUi
    label: UI
    type: switch
    dependsOn: { framework: [nextjs] }
    defaultValue: false
  connectionMethod:
    id: connectionMethod
    label: Method
    type: radio-list
    options:
      - { value: direct, label: Direct }
      - { value: transaction, label: Transaction }
    defaultValue: direct
  useSharedPooler:
    id: useSharedPooler
    label: Pooler
    type: switch
    dependsOn: { connectionMethod: [transaction] }
steps:
  mode:
    framework:
      frameworkUi:
        "true": [{ id: ui, title: UI, content: steps/ui }]
      framework:
        DEFAULT: [{ id: install, title: Install, content: { remix: "", DEFAULT: steps/install } }]
    direct:
      - { id: connection, title: Connection, content: steps/connection }
      - { id: pooler, title: Pooler, content: { "true": steps/pooler, DEFAULT: null } }
"#,
    )
    .unwrap()
});

const KEYS: &[&str] = &[
    "mode",
    "framework",
    "frameworkVariant",
    "frameworkUi",
    "connectionMethod",
    "useSharedPooler",
];

fn arb_value() -> impl Strategy<Value = StateValue> {
    prop_oneof![
        prop::sample::select(vec![
            "framework", "direct", "nextjs", "react", "remix", "app", "vite", "transaction",
        ])
        .prop_map(StateValue::from),
        any::<bool>().prop_map(StateValue::Bool),
    ]
}

fn arb_state() -> impl Strategy<Value = State> {
    prop::collection::btree_map(prop::sample::select(KEYS.to_vec()), arb_value(), 0..7)
        .prop_map(|map| map.into_iter().collect())
}

#[derive(Clone, Debug)]
enum Op {
    SetMode(&'static str),
    Update(&'static str, StateValue),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::sample::select(vec!["framework", "direct", "unknown"]).prop_map(Op::SetMode),
        (prop::sample::select(KEYS.to_vec()), arb_value()).prop_map(|(k, v)| Op::Update(k, v)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // reset(reset(s, f), f) == reset(s, f)
    #[test]
    fn reset_is_idempotent(state in arb_state(), changed in prop::sample::select(KEYS.to_vec())) {
        let once = reset_dependent_fields(&state, changed, &SCHEMA, None);
        let twice = reset_dependent_fields(&once, changed, &SCHEMA, None);
        prop_assert_eq!(once, twice);
    }

    // Reset only removes keys, and never a dependent whose predicate still holds.
    #[test]
    fn reset_only_removes_invalidated_fields(
        state in arb_state(),
        changed in prop::sample::select(KEYS[1..].to_vec()),
    ) {
        let next = reset_dependent_fields(&state, changed, &SCHEMA, None);
        for (key, value) in next.iter() {
            prop_assert_eq!(state.get(key), Some(value));
        }
        for (id, field) in &SCHEMA.fields {
            if state.contains(id) && dependencies_satisfied(field, &state) {
                prop_assert!(next.contains(id), "{} was removed", id);
            }
        }
    }

    // Any sequence of transitions keeps the session in a declared mode,
    // shows only satisfied fields, and never renders empty content.
    #[test]
    fn session_invariants_hold(ops in prop::collection::vec(arb_op(), 0..20)) {
        let mut session = Session::new(&SCHEMA);
        for op in ops {
            match op {
                Op::SetMode(mode) => session.set_mode(mode),
                Op::Update(key, value) => session.update_field(key, value),
            }
            let state = session.state();
            prop_assert!(state.mode().is_some_and(|m| SCHEMA.mode(m).is_some()));
            for field in session.active_fields() {
                prop_assert!(dependencies_satisfied(&field.field, state));
            }
            for step in session.resolved_steps() {
                prop_assert!(!step.content.is_empty());
            }
        }
    }
}
