#![no_main]

use envcell::{CompareOp, MaskPolicy, Masked, Value, REDACTED};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (i64, i64, String, bool)| {
    let (a, b, text, mutable) = data;
    let policy = MaskPolicy::new(false, mutable);

    let proxy = Masked::wrap(Value::from(a), &policy);

    // CRITICAL: display must never leak the original
    assert_eq!(proxy.to_string(), REDACTED);
    assert_eq!(proxy.reveal(), &Value::Integer(a));

    // Arithmetic either succeeds or reports a structured error; never panics.
    for rhs in [Value::from(b), Value::from(text.as_str())] {
        let _ = proxy.try_add(&rhs).map(|v| v.to_string());
        let _ = proxy.try_sub(&rhs).map(|v| v.to_string());
        let _ = proxy.try_mul(&rhs).map(|v| v.to_string());
        let _ = proxy.try_div(&rhs).map(|v| v.to_string());
        let _ = proxy.try_compare(&rhs, CompareOp::Lt);
        let _ = proxy.loose_eq(&rhs);
    }

    // String secrets: length is answered for the original, unwrapped.
    let text_proxy = Masked::wrap(Value::from(text.as_str()), &policy);
    if text_proxy.is_secret() {
        assert_eq!(text_proxy.len(), Some(text.chars().count()));
        assert_eq!(text_proxy.to_string(), REDACTED);
    }
});
