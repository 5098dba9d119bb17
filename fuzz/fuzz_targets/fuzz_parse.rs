#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    // Any schema that parses must be resolvable without panicking.
    if let Ok(schema) = connect_wizard::parse(&s) {
        let _ = connect_wizard::validate(&schema);
        let state = connect_wizard::get_default_state(&schema);
        let _ = connect_wizard::get_active_fields(&schema, &state);
        let _ = connect_wizard::resolve_steps(&schema, &state);
    }
});
