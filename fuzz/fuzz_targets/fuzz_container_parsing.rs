#![no_main]

use envcell::{Descriptor, MaskPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let policy = MaskPolicy::default();

    // === JSON-literal conversion must never panic ===
    for descriptor in [Descriptor::list(), Descriptor::dict()] {
        if let Ok(value) = descriptor.set_value(data, &policy) {
            // Parsed containers must survive a render round trip.
            let rendered = value.to_string();
            let _ = rendered.len();
            let _ = value.len();
            let _ = value.to_json();
        }
    }
});
