//! Error types for value validation and environment loading.
//!
//! This module contains the [`ConfigError`] enum covering every failure mode
//! of the validation pipeline, the masking proxy, and the environment loader,
//! with rich diagnostics via [`miette`].
//!
//! # Error Variants
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`ConfigError::EmptyValue`] | A descriptor was used before any value was assigned |
//! | [`ConfigError::TypeMismatch`] | Post-conversion native type disagrees with the descriptor |
//! | [`ConfigError::Conversion`] | Text/number coercion failed |
//! | [`ConfigError::Semantic`] | A variant-specific rule was violated |
//! | [`ConfigError::UserCheck`] | A caller-supplied check failed |
//! | [`ConfigError::Immutable`] | Mutation attempted on a finalized collection |
//! | [`ConfigError::UnsupportedOperation`] | An ordering comparison between incompatible types |
//! | [`ConfigError::Overflow`] | Integer arithmetic overflowed |
//! | [`ConfigError::DivisionByZero`] | Numeric division by zero |
//! | [`ConfigError::Entry`] | A pipeline error, annotated with the offending key |
//! | [`ConfigError::UnknownKey`] | An override targeted a key that was never declared |
//! | [`ConfigError::UnknownEnvironment`] | A selected environment name is not registered |
//! | [`ConfigError::NoEnvironment`] | No environment was selected and no default exists |
//! | [`ConfigError::Dotenv`] | A `.env` override file could not be read |
//!
//! # Propagation Policy
//!
//! Every pipeline stage fails fast: the first failing stage's error is what the
//! caller observes, and no partial or default value is ever substituted. The
//! caller decides whether to abort or log-and-continue; this crate never
//! swallows an error itself.
//!
//! # Secret Masking
//!
//! Error messages produced for descriptors that mask their output never embed
//! the raw value; the redaction marker is rendered in its place.

use std::error::Error as StdError;

use miette::Diagnostic;
use thiserror::Error as ThisError;

use crate::value::Value;

/// Errors produced by the validation pipeline, the masking proxy, and the
/// environment loader.
///
/// Integrates with [`miette`] for diagnostic output with error codes and help
/// text. Each variant has a unique diagnostic code under the `envcell::`
/// namespace.
///
/// # Example
///
/// ```rust,ignore
/// match descriptor.set_value("not-a-number", &policy) {
///     Ok(value) => { /* canonical value */ }
///     Err(ConfigError::Conversion { expected, .. }) => {
///         eprintln!("value must be a valid {expected}");
///     }
///     Err(e) => eprintln!("{:?}", miette::Report::from(e)),
/// }
/// ```
#[derive(Debug, ThisError, Diagnostic)]
pub enum ConfigError {
    /// No value has ever been assigned to the descriptor.
    #[error("no value has been assigned")]
    #[diagnostic(
        code(envcell::empty_value),
        help("assign a value directly or supply one through an override source")
    )]
    EmptyValue,

    /// The post-conversion value's native type does not match the descriptor's
    /// expected type.
    #[error("expected {expected}, got {found} value {value}")]
    #[diagnostic(code(envcell::type_mismatch))]
    TypeMismatch {
        /// The type the descriptor expects (e.g. `"integer"`).
        expected: &'static str,

        /// The native type of the offending value.
        found: &'static str,

        /// Rendering of the offending value (redacted for masked descriptors).
        value: String,
    },

    /// Text or number coercion failed during the conversion stage.
    #[error("{message}")]
    #[diagnostic(code(envcell::conversion))]
    Conversion {
        /// The type the conversion was targeting.
        expected: &'static str,

        /// Rendering of the offending value (redacted for masked descriptors).
        value: String,

        /// Human-readable description of the failure.
        message: String,

        /// The underlying parse error, when one exists.
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// A variant-specific semantic rule was violated (positivity, negativity,
    /// password rule, email rule).
    #[error("{message}")]
    #[diagnostic(code(envcell::semantic))]
    Semantic {
        /// Human-readable description of the violated rule.
        message: String,
    },

    /// A caller-supplied check rejected the final value.
    ///
    /// The original error is surfaced unchanged as both the message and the
    /// error source; it is not rephrased by this crate.
    #[error("{source}")]
    #[diagnostic(code(envcell::user_check))]
    UserCheck {
        /// The error raised by the caller's check.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A mutation was attempted on a finalized configuration collection.
    #[error("{message}")]
    #[diagnostic(
        code(envcell::immutable),
        help("all keys and values must be in place before the collection is finalized")
    )]
    Immutable {
        /// Description of the rejected mutation.
        message: String,
    },

    /// An ordering comparison was attempted between incompatible types.
    #[error("'{symbol}' not supported between values of type '{lhs}' and '{rhs}'")]
    #[diagnostic(code(envcell::unsupported_operation))]
    UnsupportedOperation {
        /// The symbolic operator (e.g. `"<"`).
        symbol: &'static str,

        /// Native type of the left operand.
        lhs: &'static str,

        /// Native type of the right operand.
        rhs: &'static str,
    },

    /// Integer arithmetic overflowed the 64-bit range.
    #[error("integer overflow evaluating '{symbol}'")]
    #[diagnostic(code(envcell::overflow))]
    Overflow {
        /// The symbolic operator that overflowed.
        symbol: &'static str,
    },

    /// Numeric division by zero.
    #[error("division by zero")]
    #[diagnostic(code(envcell::division_by_zero))]
    DivisionByZero,

    /// A pipeline error annotated with the key it occurred for.
    #[error("error setting value for {key}: {source}")]
    #[diagnostic(code(envcell::entry))]
    Entry {
        /// The configuration key whose value was rejected.
        key: String,

        /// The underlying pipeline error.
        #[source]
        source: Box<ConfigError>,
    },

    /// An override targeted a key that was never declared.
    #[error("key '{key}' is not declared in this environment")]
    #[diagnostic(
        code(envcell::unknown_key),
        help("declare the key with a descriptor before overriding its value")
    )]
    UnknownKey {
        /// The undeclared key.
        key: String,
    },

    /// The selected environment name is not registered with the loader.
    #[error("environment '{name}' is not defined")]
    #[diagnostic(code(envcell::unknown_environment))]
    UnknownEnvironment {
        /// The environment name that failed to resolve.
        name: String,

        /// The names of all registered environments.
        available: Vec<String>,

        /// Dynamic help text listing the registered environments.
        #[help]
        help: String,
    },

    /// No environment was selected and the loader has no default.
    #[error("no environment selected")]
    #[diagnostic(
        code(envcell::no_environment),
        help("select an environment explicitly, set the ENV variable, or configure a default")
    )]
    NoEnvironment,

    /// A `.env` override file could not be read or parsed.
    #[cfg(feature = "dotenv")]
    #[error("failed to read dotenv file {}", .path.display())]
    #[diagnostic(
        code(envcell::dotenv),
        help("check that the file exists and every line is a KEY=VALUE pair")
    )]
    Dotenv {
        /// The path that failed to load.
        path: std::path::PathBuf,

        /// The underlying dotenv error.
        #[source]
        source: dotenvy::Error,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Constructor helpers for ergonomic error creation
// ─────────────────────────────────────────────────────────────────────────────

impl ConfigError {
    /// Creates a `TypeMismatch` error for a value, redacting its rendering
    /// when `masked` is set.
    pub(crate) fn type_mismatch(expected: &'static str, value: &Value, masked: bool) -> Self {
        ConfigError::TypeMismatch {
            expected,
            found: value.type_name(),
            value: render(value, masked),
        }
    }

    /// Creates a `Conversion` error without an underlying parse failure.
    pub(crate) fn conversion(
        expected: &'static str,
        value: &Value,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::Conversion {
            expected,
            value: value.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `Conversion` error carrying the underlying parse failure.
    pub(crate) fn conversion_with_source(
        expected: &'static str,
        value: &Value,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        ConfigError::Conversion {
            expected,
            value: value.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a `Semantic` error from a rule-violation message.
    pub(crate) fn semantic(message: impl Into<String>) -> Self {
        ConfigError::Semantic {
            message: message.into(),
        }
    }

    /// Creates an `Immutable` error from a rejected-mutation message.
    pub(crate) fn immutable(message: impl Into<String>) -> Self {
        ConfigError::Immutable {
            message: message.into(),
        }
    }

    /// Annotates an error with the configuration key it occurred for.
    #[must_use]
    pub fn for_key(self, key: impl Into<String>) -> Self {
        ConfigError::Entry {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// Creates an `UnknownEnvironment` error listing the registered names.
    pub(crate) fn unknown_environment(name: impl Into<String>, available: Vec<String>) -> Self {
        let help = if available.is_empty() {
            "no environments are registered".to_string()
        } else {
            format!("available environments are: {}", available.join(", "))
        };
        ConfigError::UnknownEnvironment {
            name: name.into(),
            available,
            help,
        }
    }
}

/// Renders a value for inclusion in an error message, substituting the
/// redaction marker when the failing descriptor masks its output.
fn render(value: &Value, masked: bool) -> String {
    if masked {
        crate::mask::REDACTED.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_names_expected_and_value() {
        let err = ConfigError::type_mismatch("integer", &Value::String("abc".into()), false);
        let display = err.to_string();
        assert!(display.contains("integer"));
        assert!(display.contains("abc"));
    }

    #[test]
    fn test_type_mismatch_redacts_masked_values() {
        let err = ConfigError::type_mismatch("integer", &Value::String("hunter2".into()), true);
        let display = err.to_string();
        assert!(display.contains("******"));
        assert!(!display.contains("hunter2"));
    }

    #[test]
    fn test_entry_names_the_key() {
        let err = ConfigError::semantic("value 0 must be a positive integer").for_key("PORT");
        let display = err.to_string();
        assert!(display.contains("PORT"));
        assert!(display.contains("positive integer"));
    }

    #[test]
    fn test_unknown_environment_lists_available() {
        let err = ConfigError::unknown_environment(
            "staging",
            vec!["dev".to_string(), "prod".to_string()],
        );
        if let ConfigError::UnknownEnvironment { help, .. } = &err {
            assert!(help.contains("dev"));
            assert!(help.contains("prod"));
        } else {
            panic!("expected UnknownEnvironment variant");
        }
    }

    #[test]
    fn test_user_check_surfaces_original_message() {
        let original = std::io::Error::other("port 99999 is out of range");
        let err = ConfigError::UserCheck {
            source: Box::new(original),
        };
        assert_eq!(err.to_string(), "port 99999 is out of range");
    }
}
