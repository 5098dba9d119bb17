#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use connect_wizard::Session;
use connect_wizard::builtin::connect_schema;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    SetMode(String),
    Text(u8, String),
    Switch(u8, bool),
}

fuzz_target!(|data: &[u8]| {
    let schema = connect_schema();
    let field_ids: Vec<&String> = schema.fields.keys().collect();
    let mut session = Session::new(schema);

    let mut u = Unstructured::new(data);
    while let Ok(op) = Op::arbitrary(&mut u) {
        match op {
            Op::SetMode(mode) => session.set_mode(&mode),
            Op::Text(i, value) => {
                let id = field_ids[i as usize % field_ids.len()];
                session.update_field(id, value);
            }
            Op::Switch(i, value) => {
                let id = field_ids[i as usize % field_ids.len()];
                session.update_field(id, value);
            }
        }

        let mode = session.state().mode();
        assert!(
            mode.is_some_and(|m| schema.mode(m).is_some()),
            "session left the declared modes: {:?}",
            mode
        );
        for step in session.resolved_steps() {
            assert!(!step.content.is_empty());
        }
    }
});
