#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let schema = match connect_wizard::parse(&s) {
        Ok(schema) => schema,
        Err(_) => return,
    };

    let yaml = match connect_wizard::serialize(&schema) {
        Ok(y) => y,
        Err(_) => return,
    };

    // If we can serialize a schema, we must be able to parse it back.
    if connect_wizard::parse(&yaml).is_err() {
        panic!(
            "Roundtrip failure: serialize produced YAML that cannot be re-parsed.\n\
             Input (lossy): {:?}\n\
             Serialized YAML:\n{}",
            s.get(..200).unwrap_or(&s),
            yaml.get(..500).unwrap_or(&yaml),
        );
    }
});
