//! Type descriptors and the five-stage validation pipeline.
//!
//! A [`Descriptor`] pairs a closed [`Kind`] (one of twelve variants) with an
//! optional caller-supplied check. [`Descriptor::set_value`] runs the whole
//! pipeline on a raw value:
//!
//! 1. **precheck** — fails with [`ConfigError::EmptyValue`] when no value has
//!    ever been assigned;
//! 2. **convert** — coerces text and numeric input to the canonical native
//!    type (skippable per descriptor); `Secret` and `StrongPassword` wrap the
//!    value through the masking proxy here, before any further checks;
//! 3. **type-check** — the post-conversion native type must match the
//!    descriptor's expected type exactly;
//! 4. **semantic-check** — variant-specific rules (positivity, negativity,
//!    password policy, email grammar);
//! 5. **user-check** — the caller's check, whose error is surfaced unchanged.
//!
//! Each stage fails fast: the first failing stage's error is what the caller
//! observes, and later stages never run. Re-invoking `set_value` (e.g. when
//! an environment override arrives) re-runs the whole pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use envcell::{Descriptor, MaskPolicy, Value};
//!
//! let policy = MaskPolicy::default();
//! let port = Descriptor::positive_integer().set_value("8080", &policy)?;
//! assert_eq!(port, Value::Integer(8080));
//! ```

use std::error::Error as StdError;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use num_traits::ToPrimitive;

use crate::email;
use crate::error::ConfigError;
use crate::mask::{MaskPolicy, Masked};
use crate::password::PasswordRules;
use crate::value::Value;

/// Text literals accepted as `true` (case-insensitive, trimmed).
const TRUE_LITERALS: &[&str] = &["true", "1", "yes", "y"];

/// Text literals accepted as `false` (case-insensitive, trimmed).
const FALSE_LITERALS: &[&str] = &["false", "0", "no", "n"];

/// A caller-supplied check over the final canonical value.
type UserCheck = Arc<dyn Fn(&Value) -> Result<(), Box<dyn StdError + Send + Sync>> + Send + Sync>;

// ============================================================================
// Kind
// ============================================================================

/// The closed set of value-type variants.
///
/// Structural options (`convert`, `support_boolean`, `support_infinite`) are
/// fixed when the descriptor is constructed; only the value changes across
/// `set_value` calls.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// A text value. No conversion stage.
    String,

    /// A signed integer, converted from integer-looking text or integral
    /// floats.
    Integer {
        /// Whether the conversion stage runs.
        convert: bool,

        /// Whether boolean input is accepted as `0`/`1`.
        support_boolean: bool,
    },

    /// An integer that must be strictly greater than zero.
    PositiveInteger {
        /// Whether the conversion stage runs.
        convert: bool,
    },

    /// An integer that must be strictly less than zero.
    NegativeInteger {
        /// Whether the conversion stage runs.
        convert: bool,
    },

    /// A floating-point value.
    Float {
        /// Whether the conversion stage runs.
        convert: bool,

        /// Whether the textual forms `inf`/`-inf` are accepted.
        support_infinite: bool,

        /// Whether boolean input is accepted as `0.0`/`1.0`.
        support_boolean: bool,
    },

    /// A boolean, converted from the documented literal sets or from the
    /// small integers `0`/`1`.
    Boolean {
        /// Whether the conversion stage runs.
        convert: bool,
    },

    /// A list, parsed from a JSON array literal when given text.
    List {
        /// Whether the conversion stage runs.
        convert: bool,
    },

    /// A dictionary, parsed from a JSON object literal when given text.
    Dict {
        /// Whether the conversion stage runs.
        convert: bool,
    },

    /// Accepts any value unchanged. The default when no descriptor is
    /// supplied for a key.
    Any,

    /// Accepts any value and wraps it through the masking proxy.
    Secret,

    /// A masked password validated against a [`PasswordRules`] policy.
    StrongPassword(PasswordRules),

    /// A text value validated as an email address.
    Email,
}

impl Kind {
    /// Returns the expected native type name used in diagnostics.
    #[must_use]
    pub const fn expected_type(&self) -> &'static str {
        match self {
            Kind::String | Kind::Email => "string",
            Kind::Integer { .. } | Kind::PositiveInteger { .. } | Kind::NegativeInteger { .. } => {
                "integer"
            }
            Kind::Float { .. } => "float",
            Kind::Boolean { .. } => "boolean",
            Kind::List { .. } => "list",
            Kind::Dict { .. } => "dictionary",
            Kind::Any | Kind::Secret | Kind::StrongPassword(_) => "any",
        }
    }

    /// Returns whether this variant wraps its value through the masking
    /// proxy.
    #[must_use]
    pub const fn masks_output(&self) -> bool {
        matches!(self, Kind::Secret | Kind::StrongPassword(_))
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// A value-type descriptor: one of the twelve [`Kind`] variants plus an
/// optional caller-supplied check.
///
/// # Example
///
/// ```rust,ignore
/// use envcell::{Descriptor, Value};
///
/// let workers = Descriptor::positive_integer();
/// let timeout = Descriptor::float().allow_infinite();
/// let host = Descriptor::string().with_check(|value: &Value| {
///     // caller policy; the error propagates unchanged
///     validate_hostname(value)
/// });
/// ```
#[derive(Clone)]
pub struct Descriptor {
    kind: Kind,
    user_check: Option<UserCheck>,
}

impl Descriptor {
    const fn from_kind(kind: Kind) -> Self {
        Self {
            kind,
            user_check: None,
        }
    }

    /// A text descriptor.
    #[must_use]
    pub const fn string() -> Self {
        Self::from_kind(Kind::String)
    }

    /// An integer descriptor with conversion enabled.
    #[must_use]
    pub const fn integer() -> Self {
        Self::from_kind(Kind::Integer {
            convert: true,
            support_boolean: false,
        })
    }

    /// An integer descriptor requiring values strictly greater than zero.
    #[must_use]
    pub const fn positive_integer() -> Self {
        Self::from_kind(Kind::PositiveInteger { convert: true })
    }

    /// An integer descriptor requiring values strictly less than zero.
    #[must_use]
    pub const fn negative_integer() -> Self {
        Self::from_kind(Kind::NegativeInteger { convert: true })
    }

    /// A float descriptor with conversion enabled and infinities rejected.
    #[must_use]
    pub const fn float() -> Self {
        Self::from_kind(Kind::Float {
            convert: true,
            support_infinite: false,
            support_boolean: false,
        })
    }

    /// A boolean descriptor with conversion enabled.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::from_kind(Kind::Boolean { convert: true })
    }

    /// A list descriptor with JSON-literal conversion enabled.
    #[must_use]
    pub const fn list() -> Self {
        Self::from_kind(Kind::List { convert: true })
    }

    /// A dictionary descriptor with JSON-literal conversion enabled.
    #[must_use]
    pub const fn dict() -> Self {
        Self::from_kind(Kind::Dict { convert: true })
    }

    /// A descriptor accepting any value unchanged.
    #[must_use]
    pub const fn any() -> Self {
        Self::from_kind(Kind::Any)
    }

    /// A descriptor that masks its value through the masking proxy.
    #[must_use]
    pub const fn secret() -> Self {
        Self::from_kind(Kind::Secret)
    }

    /// A masked password descriptor validated against the given rules.
    #[must_use]
    pub const fn strong_password(rules: PasswordRules) -> Self {
        Self::from_kind(Kind::StrongPassword(rules))
    }

    /// An email address descriptor.
    #[must_use]
    pub const fn email() -> Self {
        Self::from_kind(Kind::Email)
    }

    /// Disables the conversion stage. Raw input must then already have the
    /// expected native type or the type check fails. No effect on variants
    /// without a conversion stage.
    #[must_use]
    pub fn without_conversion(mut self) -> Self {
        match &mut self.kind {
            Kind::Integer { convert, .. }
            | Kind::PositiveInteger { convert }
            | Kind::NegativeInteger { convert }
            | Kind::Float { convert, .. }
            | Kind::Boolean { convert }
            | Kind::List { convert }
            | Kind::Dict { convert } => *convert = false,
            _ => {}
        }
        self
    }

    /// Accepts boolean input as numeric `0`/`1`. Only meaningful for the
    /// `Integer` and `Float` variants.
    #[must_use]
    pub fn allow_boolean(mut self) -> Self {
        match &mut self.kind {
            Kind::Integer {
                support_boolean, ..
            }
            | Kind::Float {
                support_boolean, ..
            } => *support_boolean = true,
            _ => {}
        }
        self
    }

    /// Accepts the textual forms `inf`/`-inf`. Only meaningful for the
    /// `Float` variant.
    #[must_use]
    pub fn allow_infinite(mut self) -> Self {
        if let Kind::Float {
            support_infinite, ..
        } = &mut self.kind
        {
            *support_infinite = true;
        }
        self
    }

    /// Installs a caller-supplied check invoked with the final canonical
    /// value. Its error propagates to the caller unchanged.
    #[must_use]
    pub fn with_check<F, E>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), E> + Send + Sync + 'static,
        E: StdError + Send + Sync + 'static,
    {
        self.user_check = Some(Arc::new(move |value| {
            check(value).map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)
        }));
        self
    }

    /// Returns the descriptor's kind.
    #[must_use]
    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns whether this descriptor wraps its value through the masking
    /// proxy.
    #[must_use]
    pub const fn masks_output(&self) -> bool {
        self.kind.masks_output()
    }

    /// Runs the full pipeline on a raw value and returns the canonical
    /// value.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error; later stages never run.
    pub fn set_value(
        &self,
        raw: impl Into<Value>,
        policy: &MaskPolicy,
    ) -> Result<Value, ConfigError> {
        self.apply(Some(raw.into()), policy)
    }

    /// Runs the full pipeline against an optional raw value. `None` means no
    /// value has ever been assigned and fails the precheck stage.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error; later stages never run.
    pub fn apply(&self, raw: Option<Value>, policy: &MaskPolicy) -> Result<Value, ConfigError> {
        // Stage 1: precheck
        let raw = raw.ok_or(ConfigError::EmptyValue)?;

        // Stage 2: convert (secrets wrap here, before any further checks)
        let value = self.convert(raw, policy).inspect_err(|error| {
            tracing::error!(%error, expected = self.kind.expected_type(), "conversion failed");
        })?;

        // Stage 3: type-check
        self.check_type(&value)?;

        // Stage 4: semantic-check
        self.check_semantics(&value)?;

        // Stage 5: user-check
        if let Some(check) = &self.user_check {
            check(&value).map_err(|source| ConfigError::UserCheck { source })?;
        }

        Ok(value)
    }

    // ------------------------------------------------------------------
    // Pipeline stages
    // ------------------------------------------------------------------

    fn convert(&self, raw: Value, policy: &MaskPolicy) -> Result<Value, ConfigError> {
        match &self.kind {
            Kind::Integer {
                convert: true,
                support_boolean,
            } => convert_integer(raw, *support_boolean),

            Kind::PositiveInteger { convert: true } | Kind::NegativeInteger { convert: true } => {
                convert_integer(raw, false)
            }

            Kind::Float {
                convert: true,
                support_infinite,
                support_boolean,
            } => convert_float(raw, *support_infinite, *support_boolean),

            Kind::Boolean { convert: true } => convert_boolean(raw),

            Kind::List { convert: true } => convert_container(raw, "list"),

            Kind::Dict { convert: true } => convert_container(raw, "dictionary"),

            Kind::Secret | Kind::StrongPassword(_) => Ok(Masked::wrap(raw, policy)),

            // Conversion disabled, or a variant without a conversion stage.
            _ => Ok(raw),
        }
    }

    fn check_type(&self, value: &Value) -> Result<(), ConfigError> {
        // Masked values type-check as their originals.
        let actual = value.reveal();

        let matches = match &self.kind {
            Kind::Any | Kind::Secret | Kind::StrongPassword(_) => true,
            Kind::String | Kind::Email => matches!(actual, Value::String(_)),
            Kind::Integer { .. } | Kind::PositiveInteger { .. } | Kind::NegativeInteger { .. } => {
                matches!(actual, Value::Integer(_))
            }
            Kind::Float { .. } => matches!(actual, Value::Float(_)),
            Kind::Boolean { .. } => matches!(actual, Value::Boolean(_)),
            Kind::List { .. } => matches!(actual, Value::List(_)),
            Kind::Dict { .. } => matches!(actual, Value::Map(_)),
        };

        if matches {
            Ok(())
        } else {
            Err(ConfigError::type_mismatch(
                self.kind.expected_type(),
                value,
                self.kind.masks_output(),
            ))
        }
    }

    fn check_semantics(&self, value: &Value) -> Result<(), ConfigError> {
        match &self.kind {
            Kind::PositiveInteger { .. } => {
                if let Value::Integer(n) = value.reveal()
                    && *n <= 0
                {
                    return Err(ConfigError::semantic(format!(
                        "value {n} must be a positive integer"
                    )));
                }
                Ok(())
            }

            Kind::NegativeInteger { .. } => {
                if let Value::Integer(n) = value.reveal()
                    && *n >= 0
                {
                    return Err(ConfigError::semantic(format!(
                        "value {n} must be a negative integer"
                    )));
                }
                Ok(())
            }

            Kind::StrongPassword(rules) => rules.check(value.reveal()),

            Kind::Email => email::check(value),

            _ => Ok(()),
        }
    }
}

impl Debug for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("kind", &self.kind)
            .field("user_check", &self.user_check.is_some())
            .finish()
    }
}

impl Default for Descriptor {
    /// The `Any` descriptor, matching the default applied when no descriptor
    /// is supplied for a key.
    fn default() -> Self {
        Self::any()
    }
}

// ============================================================================
// Conversion stage implementations
// ============================================================================

fn convert_integer(raw: Value, support_boolean: bool) -> Result<Value, ConfigError> {
    match raw {
        Value::Integer(_) => Ok(raw),

        Value::Boolean(b) if support_boolean => Ok(Value::Integer(i64::from(b))),

        Value::Float(f) => {
            if f.fract() == 0.0
                && let Some(n) = f.to_i64()
            {
                Ok(Value::Integer(n))
            } else {
                let message = format!("value {f} must be an integer, not a fractional float");
                Err(ConfigError::conversion("integer", &Value::Float(f), message))
            }
        }

        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(n) => {
                    // Exact round-trip check: a textual integer must equal
                    // its float parse.
                    let as_float = trimmed.parse::<f64>().unwrap_or(f64::NAN);
                    if (n as f64) == as_float {
                        Ok(Value::Integer(n))
                    } else {
                        let message = format!("value {s} must be an integer, not a fraction");
                        Err(ConfigError::conversion(
                            "integer",
                            &Value::String(s),
                            message,
                        ))
                    }
                }
                Err(e) => {
                    let message = format!("value {s} must be an integer");
                    Err(ConfigError::conversion_with_source(
                        "integer",
                        &Value::String(s),
                        message,
                        e,
                    ))
                }
            }
        }

        other => {
            let message = format!(
                "value {other} of type {} cannot be converted to an integer",
                other.type_name()
            );
            Err(ConfigError::conversion("integer", &other, message))
        }
    }
}

fn convert_float(raw: Value, support_infinite: bool, support_boolean: bool) -> Result<Value, ConfigError> {
    match raw {
        Value::Float(_) => Ok(raw),

        Value::Boolean(b) if support_boolean => Ok(Value::Float(if b { 1.0 } else { 0.0 })),

        Value::Boolean(b) => {
            let message = format!("value {b} must be a float, not a boolean");
            Err(ConfigError::conversion("float", &Value::Boolean(b), message))
        }

        Value::Integer(n) => match n.to_f64() {
            Some(f) => Ok(Value::Float(f)),
            None => {
                let message = format!("value {n} cannot be represented as a float");
                Err(ConfigError::conversion("float", &Value::Integer(n), message))
            }
        },

        Value::String(s) => {
            let trimmed = s.trim();

            if !support_infinite && matches!(trimmed.to_ascii_lowercase().as_str(), "inf" | "-inf")
            {
                let message = format!("value {s} must be a finite float");
                return Err(ConfigError::conversion("float", &Value::String(s), message));
            }

            match trimmed.parse::<f64>() {
                Ok(f) => Ok(Value::Float(f)),
                Err(e) => {
                    let message = format!("value {s} must be a float");
                    Err(ConfigError::conversion_with_source(
                        "float",
                        &Value::String(s),
                        message,
                        e,
                    ))
                }
            }
        }

        other => {
            let message = format!(
                "value {other} of type {} cannot be converted to a float",
                other.type_name()
            );
            Err(ConfigError::conversion("float", &other, message))
        }
    }
}

fn convert_boolean(raw: Value) -> Result<Value, ConfigError> {
    match raw {
        Value::Boolean(_) => Ok(raw),

        Value::Integer(0) => Ok(Value::Boolean(false)),
        Value::Integer(1) => Ok(Value::Boolean(true)),
        Value::Integer(n) => {
            let message = format!("value {n} as an integer is not supported for boolean conversion");
            Err(ConfigError::conversion(
                "boolean",
                &Value::Integer(n),
                message,
            ))
        }

        Value::String(s) => {
            let lowered = s.trim().to_lowercase();
            if TRUE_LITERALS.contains(&lowered.as_str()) {
                Ok(Value::Boolean(true))
            } else if FALSE_LITERALS.contains(&lowered.as_str()) {
                Ok(Value::Boolean(false))
            } else {
                let value = Value::String(s);
                let message = literal_set_message(&value);
                Err(ConfigError::conversion("boolean", &value, message))
            }
        }

        other => {
            let message = literal_set_message(&other);
            Err(ConfigError::conversion("boolean", &other, message))
        }
    }
}

/// The boolean conversion failure message listing the accepted literals.
fn literal_set_message(value: &Value) -> String {
    format!(
        "value {value} must be a string or boolean; valid literals are: true, 1, yes, y, false, 0, no, n"
    )
}

fn convert_container(raw: Value, expected: &'static str) -> Result<Value, ConfigError> {
    match raw {
        Value::String(s) => match serde_json::from_str::<serde_json::Value>(&s) {
            Ok(json) => Ok(Value::from_json(json)),
            Err(e) => {
                let message = format!("value {s} is not a valid {expected} in JSON format");
                Err(ConfigError::conversion_with_source(
                    expected,
                    &Value::String(s),
                    message,
                    e,
                ))
            }
        },

        // Non-string input passes through; the type check decides.
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> MaskPolicy {
        MaskPolicy::default()
    }

    #[test]
    fn test_precheck_fails_without_assignment() {
        let err = Descriptor::integer()
            .apply(None, &policy())
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::EmptyValue));
    }

    #[test]
    fn test_integer_text_round_trip() {
        let value = Descriptor::integer().set_value("42", &policy()).expect("ok");
        assert_eq!(value, Value::Integer(42));
    }

    #[test]
    fn test_integer_rejects_fractional_text() {
        let err = Descriptor::integer()
            .set_value("2.5", &policy())
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::Conversion { .. }));
    }

    #[test]
    fn test_integer_rejects_boolean_without_support() {
        assert!(Descriptor::integer().set_value(true, &policy()).is_err());
        assert_eq!(
            Descriptor::integer()
                .allow_boolean()
                .set_value(true, &policy())
                .expect("ok"),
            Value::Integer(1)
        );
    }

    #[test]
    fn test_integral_float_converts() {
        let value = Descriptor::integer().set_value(3.0, &policy()).expect("ok");
        assert_eq!(value, Value::Integer(3));
    }

    #[test]
    fn test_conversion_disabled_defers_to_type_check() {
        let err = Descriptor::integer()
            .without_conversion()
            .set_value("42", &policy())
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    }

    #[test]
    fn test_float_rejects_textual_infinity_by_default() {
        let d = Descriptor::float();
        assert!(d.set_value("inf", &policy()).is_err());
        assert!(d.set_value(" -INF ", &policy()).is_err());

        let value = Descriptor::float()
            .allow_infinite()
            .set_value("inf", &policy())
            .expect("ok");
        assert_eq!(value, Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_secret_wraps_before_checks() {
        let value = Descriptor::secret()
            .set_value("token", &policy())
            .expect("ok");
        assert!(value.is_secret());
        assert_eq!(value.to_string(), "******");
    }

    #[test]
    fn test_secret_reveal_policy_passes_through() {
        let value = Descriptor::secret()
            .set_value("token", &MaskPolicy::revealing())
            .expect("ok");
        assert!(!value.is_secret());
    }

    #[test]
    fn test_user_check_error_is_surfaced_unchanged() {
        let d = Descriptor::string().with_check(|_: &Value| {
            Err::<(), _>(std::io::Error::other("host must be lowercase"))
        });
        let err = d.set_value("HOST", &policy()).expect_err("must fail");
        assert_eq!(err.to_string(), "host must be lowercase");
    }

    #[test]
    fn test_user_check_runs_last() {
        // A failing user check must not be reached when conversion fails.
        let d = Descriptor::integer()
            .with_check(|_: &Value| Err::<(), _>(std::io::Error::other("user check")));
        let err = d.set_value("oops", &policy()).expect_err("must fail");
        assert!(matches!(err, ConfigError::Conversion { .. }));
    }

    #[test]
    fn test_set_value_is_idempotent_on_canonical_output() {
        let d = Descriptor::boolean();
        let first = d.set_value(" YES ", &policy()).expect("ok");
        let second = d.set_value(first.clone(), &policy()).expect("ok");
        assert_eq!(first, second);
    }
}
