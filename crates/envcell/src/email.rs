//! Email address semantic check.
//!
//! Deliberately coarse: the address must match `local@domain.tld` (one `@`,
//! at least one `.` after it), the domain must stay within `[a-zA-Z0-9.-]`,
//! and the final label must be a known TLD (see [`crate::tld`]). No network
//! lookups are performed.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::tld;
use crate::value::Value;

static GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email grammar pattern is valid"));

static DOMAIN_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.-]+$").expect("domain charset pattern is valid"));

/// Validates an email address value.
pub(crate) fn check(value: &Value) -> Result<(), ConfigError> {
    let Some(address) = value.as_str() else {
        return Err(ConfigError::semantic(format!(
            "value {value} must be a string to be an email address"
        )));
    };

    if !GRAMMAR.is_match(address) || !address.split_once('@').is_some_and(|(_, d)| is_valid(d)) {
        return Err(ConfigError::semantic(format!(
            "value '{address}' is not a valid email address"
        )));
    }

    Ok(())
}

/// Validates the domain portion: charset, non-empty labels, known TLD.
fn is_valid(domain: &str) -> bool {
    if !DOMAIN_CHARSET.is_match(domain) {
        return false;
    }

    if domain.split('.').any(str::is_empty) {
        return false;
    }

    domain.rsplit('.').next().is_some_and(tld::is_known)
}
