//! Example: moving masked values in and out of `secrecy` types.
//!
//! Run with:
//!   cargo run --package envcell --example secrecy_interop --features secrecy
#![allow(unused, dead_code)]

use envcell::secrecy::ExposeSecret;
use envcell::{Descriptor, MaskPolicy, Value};

fn main() -> envcell::Result<()> {
    let policy = MaskPolicy::default();

    // A SecretString input stays masked regardless of policy.
    let input = envcell::secrecy::SecretString::from("s3cr3t-token".to_string());
    let value = Descriptor::secret().set_value(Value::from(input), &policy)?;
    assert!(value.is_secret());
    println!("stored:  {value}");

    // And a masked string can be handed onward as a SecretString.
    let Value::Secret(masked) = value else {
        unreachable!("wrapped above")
    };
    let exported = masked.expose_secret_string().expect("string original");
    println!("exposed: {}", exported.expose_secret());

    Ok(())
}
