#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use connect_wizard::conditional::{CANONICAL_KEY_ORDER, resolve_conditional};
use connect_wizard::types::{ConditionalValue, State, StateValue};
use libfuzzer_sys::fuzz_target;

/// Build a state over the canonical keys from fuzzer bytes.
fn arbitrary_state(u: &mut Unstructured<'_>) -> arbitrary::Result<State> {
    let mut state = State::new();
    for key in CANONICAL_KEY_ORDER {
        let value = match u.int_in_range(0..=3)? {
            0 => continue,
            1 => StateValue::Bool(bool::arbitrary(u)?),
            2 => StateValue::Text(String::arbitrary(u)?),
            _ => StateValue::List(Vec::<String>::arbitrary(u)?),
        };
        state.set(*key, value);
    }
    Ok(state)
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // The first byte splits the input between the state and the JSON value.
    let split = data[0] as usize % data.len().max(1);
    let (state_bytes, value_bytes) = data.split_at(split.min(data.len()));

    let Ok(state) = arbitrary_state(&mut Unstructured::new(state_bytes)) else {
        return;
    };
    let Ok(json) = serde_json::from_slice::<serde_json::Value>(value_bytes) else {
        return;
    };
    let Ok(value) = ConditionalValue::<String>::from_value(json) else {
        return;
    };

    let first = resolve_conditional(&value, &state, CANONICAL_KEY_ORDER);
    let second = resolve_conditional(&value, &state, CANONICAL_KEY_ORDER);
    assert_eq!(first, second, "resolution must be deterministic");
});
