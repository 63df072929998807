#![no_main]

use envcell::{Descriptor, MaskPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let policy = MaskPolicy::default();

    // === The email check must never panic on arbitrary text ===
    match Descriptor::email().set_value(data, &policy) {
        Ok(value) => {
            // Anything accepted must at least look like local@domain.tld.
            let text = value.as_str().expect("email values are strings");
            assert_eq!(text.matches('@').count(), 1);
            let (_, domain) = text.split_once('@').expect("one @");
            assert!(domain.contains('.'));
        }
        Err(e) => {
            let _ = e.to_string();
        }
    }
});
