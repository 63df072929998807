#![no_main]

use envcell::{Descriptor, MaskPolicy, PasswordRules, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let policy = MaskPolicy::default();

    // === Every variant's pipeline must never panic on arbitrary text ===
    let descriptors = [
        Descriptor::string(),
        Descriptor::integer(),
        Descriptor::integer().allow_boolean(),
        Descriptor::positive_integer(),
        Descriptor::negative_integer(),
        Descriptor::float(),
        Descriptor::float().allow_infinite(),
        Descriptor::boolean(),
        Descriptor::list(),
        Descriptor::dict(),
        Descriptor::any(),
        Descriptor::secret(),
        Descriptor::strong_password(PasswordRules::default()),
        Descriptor::email(),
    ];

    for descriptor in descriptors {
        match descriptor.set_value(data, &policy) {
            Ok(value) => {
                // Canonical outputs must render and re-validate cleanly.
                let _ = value.to_string();
                let _ = format!("{value:?}");
                let again = descriptor
                    .set_value(value.clone(), &policy)
                    .expect("pipeline must be idempotent on canonical outputs");
                // NaN never compares equal to itself.
                let is_nan = matches!(value.reveal(), Value::Float(f) if f.is_nan());
                if !is_nan {
                    assert_eq!(value, again);
                }
            }
            Err(e) => {
                // Errors must render without panicking.
                let _ = e.to_string();
            }
        }
    }
});
