//! Example: validating raw values through typed descriptors.
//!
//! Run with:
//!   cargo run --package envcell --example basic
#![allow(unused, dead_code)]

use envcell::{ConfigCell, ConfigMap, Descriptor, MaskPolicy, PasswordRules, Value};

fn main() -> envcell::Result<()> {
    let policy = MaskPolicy::default();

    let mut config = ConfigMap::new();
    config.insert(
        "HOST",
        ConfigCell::new(Descriptor::string(), "localhost", &policy)?,
    )?;
    config.insert(
        "PORT",
        ConfigCell::new(Descriptor::positive_integer(), "8080", &policy)?,
    )?;
    config.insert(
        "DEBUG",
        ConfigCell::new(Descriptor::boolean(), "yes", &policy)?,
    )?;
    config.insert(
        "ADMIN_EMAIL",
        ConfigCell::new(Descriptor::email(), "admin@example.com", &policy)?,
    )?;
    config.insert(
        "DB_PASSWORD",
        ConfigCell::new(
            Descriptor::strong_password(PasswordRules::default()),
            "Sup3r$ecure",
            &policy,
        )?,
    )?;
    config.finalize();

    // Secrets render redacted; everything else renders canonically.
    println!("loaded: {config}");

    let port = config.get("PORT").and_then(Value::as_i64);
    println!("PORT        = {port:?}");

    let password = config.get("DB_PASSWORD").expect("declared");
    println!("DB_PASSWORD = {password}");
    println!("revealed    = {}", password.reveal());

    // The collection is sealed now: this fails with an immutability error.
    let extra = ConfigCell::new(Descriptor::string(), "late", &policy)?;
    match config.insert("LATE", extra) {
        Err(e) => eprintln!("rejected as expected: {e}"),
        Ok(()) => unreachable!("finalized maps reject inserts"),
    }

    Ok(())
}
