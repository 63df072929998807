//! Performance benchmarks for the validation pipeline and masking proxy.
//!
//! Run with: `cargo bench -p envcell`

#![allow(unused, dead_code)]

use envcell::{ConfigCell, ConfigMap, Descriptor, MaskPolicy, PasswordRules, Value};

fn main() {
    divan::main();
}

const POLICY: MaskPolicy = MaskPolicy::new(false, true);

// ============================================================================
// Conversion stages
// ============================================================================

#[divan::bench]
fn integer_from_text() -> Value {
    Descriptor::integer().set_value("8080", &POLICY).unwrap()
}

#[divan::bench]
fn float_from_text() -> Value {
    Descriptor::float().set_value("3.5", &POLICY).unwrap()
}

#[divan::bench]
fn boolean_from_literal() -> Value {
    Descriptor::boolean().set_value(" YES ", &POLICY).unwrap()
}

#[divan::bench]
fn list_from_json_literal() -> Value {
    Descriptor::list()
        .set_value(r#"[1, 2, 3, "four", 5.0]"#, &POLICY)
        .unwrap()
}

// ============================================================================
// Semantic checks
// ============================================================================

#[divan::bench]
fn strong_password_check() -> Value {
    Descriptor::strong_password(PasswordRules::default())
        .set_value("Sup3r$ecure", &POLICY)
        .unwrap()
}

#[divan::bench]
fn email_check() -> Value {
    Descriptor::email()
        .set_value("user@example.com", &POLICY)
        .unwrap()
}

// ============================================================================
// Masking proxy
// ============================================================================

#[divan::bench]
fn secret_wrap() -> Value {
    Descriptor::secret().set_value("api-key", &POLICY).unwrap()
}

#[divan::bench]
fn masked_arithmetic_chain() -> Value {
    let proxy = envcell::Masked::wrap(Value::from(5), &POLICY);
    proxy
        .try_add(&Value::from(3))
        .unwrap()
        .try_mul(&Value::from(2))
        .unwrap()
}

// ============================================================================
// Collection build
// ============================================================================

#[divan::bench]
fn build_small_config_map() -> ConfigMap {
    let mut config = ConfigMap::new();
    config
        .insert(
            "HOST",
            ConfigCell::new(Descriptor::string(), "localhost", &POLICY).unwrap(),
        )
        .unwrap();
    config
        .insert(
            "PORT",
            ConfigCell::new(Descriptor::positive_integer(), "8080", &POLICY).unwrap(),
        )
        .unwrap();
    config
        .insert(
            "DEBUG",
            ConfigCell::new(Descriptor::boolean(), "false", &POLICY).unwrap(),
        )
        .unwrap();
    config.finalize();
    config
}

// ============================================================================
// Baseline: raw parsing
// ============================================================================

#[divan::bench]
fn baseline_str_parse() -> i64 {
    "8080".parse().unwrap()
}
