//! Example: caller-supplied checks as the integration point for policy.
//!
//! The user-check stage runs last, with the final canonical value, and its
//! error propagates to the caller unchanged. Here the `validator` crate
//! supplies the URL policy.
//!
//! Run with:
//!   cargo run --package envcell --example user_checks
#![allow(unused, dead_code)]

use std::fmt;

use envcell::{Descriptor, MaskPolicy, Value};
use validator::ValidateUrl;

#[derive(Debug)]
struct PolicyError(String);

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for PolicyError {}

fn main() -> envcell::Result<()> {
    let policy = MaskPolicy::default();

    let webhook = Descriptor::string().with_check(|value: &Value| {
        let url = value.as_str().unwrap_or_default();
        if url.validate_url() {
            Ok(())
        } else {
            Err(PolicyError(format!("'{url}' is not a valid URL")))
        }
    });

    let ok = webhook.set_value("https://example.com/hook", &policy)?;
    println!("accepted: {ok}");

    match webhook.set_value("not-a-url", &policy) {
        Err(e) => eprintln!("rejected: {e}"),
        Ok(_) => unreachable!("the URL policy rejects this"),
    }

    // A port-range check on top of the positive-integer semantics.
    let port = Descriptor::positive_integer().with_check(|value: &Value| {
        if value.as_i64().is_some_and(|n| n <= 65_535) {
            Ok(())
        } else {
            Err(PolicyError("port must fit in 16 bits".to_string()))
        }
    });

    println!("port: {}", port.set_value("8080", &policy)?);
    match port.set_value("70000", &policy) {
        Err(e) => eprintln!("rejected: {e}"),
        Ok(_) => unreachable!("out of range"),
    }

    Ok(())
}
