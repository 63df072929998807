//! The masking proxy for sensitive values.
//!
//! A [`Masked`] wraps a single original [`Value`] so that casual display
//! (string conversion, `Debug`, logging) reveals the redaction marker while
//! operations on the value keep working transparently through the operation
//! families on [`Value`]. Derived results are re-wrapped or returned plain
//! depending on the wrapper's [`Form`].
//!
//! # Forms
//!
//! | Form | Produced when | Derived results |
//! |------|---------------|-----------------|
//! | [`Form::Mutable`] | policy allows mutable secrets | re-wrapped as new secrets |
//! | [`Form::Immutable`] | policy forbids mutable secrets and the original is a scalar | returned plain |
//!
//! When the policy forbids mutable secrets and the original is a container
//! (list or map), no wrapper is produced at all and the plain value is
//! returned — the degrade rule.
//!
//! # Policy
//!
//! [`MaskPolicy`] carries the process-wide masking switches as an explicit
//! configuration value, built once by the orchestration layer and passed by
//! reference into every wrap decision. With `reveal` set, no proxy is ever
//! created and canonical values flow through unmasked.

use std::fmt::{self, Debug, Display, Formatter};

use crate::value::Value;

/// The fixed redaction marker shown in place of any masked value.
pub const REDACTED: &str = "******";

// ============================================================================
// MaskPolicy
// ============================================================================

/// Process-wide masking switches, threaded explicitly through construction.
///
/// Build one before any descriptor runs and treat it as immutable afterward;
/// the pipeline reads it at the moment each sensitive value is produced.
///
/// # Example
///
/// ```rust,ignore
/// use envcell::MaskPolicy;
///
/// // Secrets stay masked and derived values stay secrets (the default).
/// let policy = MaskPolicy::default();
///
/// // Secrets are returned unmasked (e.g. local debugging).
/// let policy = MaskPolicy::revealing();
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskPolicy {
    /// When set, sensitive values are never wrapped and the canonical value
    /// is returned unchanged.
    pub reveal: bool,

    /// When set, wrappers forward operations and re-wrap derived values;
    /// when clear, scalars get a read-only wrapper and containers degrade to
    /// their plain value.
    pub mutable: bool,
}

impl MaskPolicy {
    /// Creates a policy from explicit switches.
    #[must_use]
    pub const fn new(reveal: bool, mutable: bool) -> Self {
        Self { reveal, mutable }
    }

    /// A policy that reveals all sensitive values (no proxies are created).
    #[must_use]
    pub const fn revealing() -> Self {
        Self::new(true, true)
    }

    /// A policy that masks values and forbids mutable wrappers.
    #[must_use]
    pub const fn frozen() -> Self {
        Self::new(false, false)
    }
}

impl Default for MaskPolicy {
    /// Masked and mutable.
    fn default() -> Self {
        Self::new(false, true)
    }
}

// ============================================================================
// Masked
// ============================================================================

/// The wrapper form, fixed at wrap time from the [`MaskPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    /// Read-only wrapper over a scalar; derived results come back plain.
    Immutable,

    /// Forwarding wrapper; derived results are re-wrapped as new secrets.
    Mutable,
}

/// A masked sensitive value.
///
/// Displays as [`REDACTED`]; the original is only reachable through the
/// deliberate [`reveal`](Masked::reveal) / [`into_inner`](Masked::into_inner)
/// accessors.
#[derive(Clone)]
pub struct Masked {
    original: Value,
    form: Form,
}

impl Masked {
    /// Wraps a value under the given policy.
    ///
    /// This is the single construction point for secrets:
    ///
    /// - with `policy.reveal` set, no proxy is created and the value is
    ///   returned unchanged;
    /// - `Null` and already-masked values are returned unchanged
    ///   (no double wrapping);
    /// - with `policy.mutable` clear, scalars get the [`Form::Immutable`]
    ///   wrapper and containers degrade to their plain value;
    /// - otherwise the value gets the [`Form::Mutable`] wrapper.
    #[must_use]
    pub fn wrap(value: Value, policy: &MaskPolicy) -> Value {
        if policy.reveal {
            return value;
        }

        match value {
            Value::Null | Value::Secret(_) => value,

            v if !policy.mutable => {
                if v.is_scalar() {
                    Value::Secret(Box::new(Masked {
                        original: v,
                        form: Form::Immutable,
                    }))
                } else {
                    // Degrade rule: containers stay plain when mutable
                    // wrappers are forbidden.
                    v
                }
            }

            v => Value::Secret(Box::new(Masked {
                original: v,
                form: Form::Mutable,
            })),
        }
    }

    /// Re-wraps a value derived from this secret.
    ///
    /// Mutable wrappers propagate secrecy to every non-null derived value;
    /// immutable wrappers return results plain. Length queries never reach
    /// this point — they are the documented ignored-member default.
    pub(crate) fn rewrap(&self, result: Value) -> Value {
        match self.form {
            Form::Immutable => result,
            Form::Mutable => match result {
                Value::Null | Value::Secret(_) => result,
                v => Value::Secret(Box::new(Masked {
                    original: v,
                    form: Form::Mutable,
                })),
            },
        }
    }

    /// Deliberately returns the unmasked original.
    #[must_use]
    pub const fn reveal(&self) -> &Value {
        &self.original
    }

    /// Consumes the wrapper and returns the unmasked original.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.original
    }

    /// Returns the wrapper form chosen at wrap time.
    #[must_use]
    pub const fn form(&self) -> Form {
        self.form
    }
}

impl Display for Masked {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Debug for Masked {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Masked")
            .field("original", &REDACTED)
            .field("form", &self.form)
            .finish()
    }
}

impl PartialEq for Masked {
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

// ============================================================================
// secrecy interop
// ============================================================================

#[cfg(feature = "secrecy")]
impl Masked {
    /// Converts a masked string into a [`secrecy::SecretString`] for handing
    /// to secrecy-typed APIs. Returns `None` for non-string originals.
    #[must_use]
    pub fn expose_secret_string(&self) -> Option<secrecy::SecretString> {
        match &self.original {
            Value::String(s) => Some(secrecy::SecretString::from(s.clone())),
            _ => None,
        }
    }
}

#[cfg(feature = "secrecy")]
impl From<secrecy::SecretString> for Value {
    /// An explicitly secret input stays masked regardless of policy; wrapping
    /// it again is a no-op.
    fn from(secret: secrecy::SecretString) -> Self {
        use secrecy::ExposeSecret;
        Value::Secret(Box::new(Masked {
            original: Value::String(secret.expose_secret().to_string()),
            form: Form::Mutable,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_policy_skips_wrapping() {
        let out = Masked::wrap(Value::from("token"), &MaskPolicy::revealing());
        assert_eq!(out, Value::from("token"));
        assert!(!out.is_secret());
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let policy = MaskPolicy::default();
        let once = Masked::wrap(Value::from(2), &policy);
        let twice = Masked::wrap(once.clone(), &policy);
        assert!(twice.is_secret());
        assert_eq!(twice.reveal(), &Value::Integer(2));
        // Still a single wrapper layer.
        assert_eq!(twice.reveal().type_name(), "integer");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_null_is_never_wrapped() {
        let out = Masked::wrap(Value::Null, &MaskPolicy::default());
        assert!(out.is_null());
    }

    #[test]
    fn test_frozen_policy_wraps_scalars_immutably() {
        let out = Masked::wrap(Value::from("secret"), &MaskPolicy::frozen());
        let Value::Secret(masked) = out else {
            panic!("expected a secret");
        };
        assert_eq!(masked.form(), Form::Immutable);
        assert_eq!(masked.to_string(), REDACTED);
    }

    #[test]
    fn test_frozen_policy_degrades_containers() {
        let out = Masked::wrap(Value::from(vec![1, 2]), &MaskPolicy::frozen());
        assert!(!out.is_secret());
        assert_eq!(out, Value::from(vec![1, 2]));
    }

    #[test]
    fn test_mutable_rewrap_propagates_secrecy() {
        let policy = MaskPolicy::default();
        let Value::Secret(masked) = Masked::wrap(Value::from(5), &policy) else {
            panic!("expected a secret");
        };
        let derived = masked.rewrap(Value::Integer(8));
        assert!(derived.is_secret());
        assert_eq!(derived.reveal(), &Value::Integer(8));
    }

    #[test]
    fn test_immutable_rewrap_returns_plain() {
        let Value::Secret(masked) = Masked::wrap(Value::from("secret"), &MaskPolicy::frozen())
        else {
            panic!("expected a secret");
        };
        let derived = masked.rewrap(Value::String("secret123".to_string()));
        assert!(!derived.is_secret());
    }

    #[test]
    fn test_null_results_come_back_unwrapped() {
        let Value::Secret(masked) = Masked::wrap(Value::from(5), &MaskPolicy::default()) else {
            panic!("expected a secret");
        };
        assert!(masked.rewrap(Value::Null).is_null());
    }
}
