//! Operation families for [`Value`].
//!
//! Each operation family is an explicit, compile-time-present method set on
//! [`Value`]:
//!
//! - **arithmetic** — [`try_add`](Value::try_add), [`try_sub`](Value::try_sub),
//!   [`try_mul`](Value::try_mul), [`try_div`](Value::try_div)
//! - **ordering** — [`try_compare`](Value::try_compare) with [`CompareOp`]
//! - **equality** — [`loose_eq`](Value::loose_eq)
//! - **container** — [`len`](Value::len), [`contains`](Value::contains),
//!   [`get_index`](Value::get_index), [`get_key`](Value::get_key)
//!
//! Every family dispatches transparently through the masking proxy: secret
//! operands are revealed, the raw operation runs, and the result is re-wrapped
//! according to the secret's form. Length queries and comparison booleans are
//! never re-wrapped (the documented ignored-member defaults), and absent
//! results come back plain.

use std::cmp::Ordering;

use crate::error::ConfigError;
use crate::value::Value;

/// An ordering comparison operator.
///
/// Equality is a separate family (see [`Value::loose_eq`]): an unsupported
/// ordering comparison is an error naming both operand types, while an
/// unsupported equality comparison is simply `false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// Strictly less than (`<`).
    Lt,

    /// Less than or equal (`<=`).
    Le,

    /// Strictly greater than (`>`).
    Gt,

    /// Greater than or equal (`>=`).
    Ge,
}

impl CompareOp {
    /// Returns the symbolic operator used in error messages.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Applies the operator to a resolved ordering.
    const fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::Le => ordering.is_le(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::Ge => ordering.is_ge(),
        }
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl Value {
    /// Adds two values: numeric addition, string concatenation, or list
    /// concatenation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedOperation`] for incompatible operand
    /// types and [`ConfigError::Overflow`] when 64-bit integer addition
    /// overflows.
    pub fn try_add(&self, rhs: &Value) -> Result<Value, ConfigError> {
        self.forward_binary(rhs, raw_add)
    }

    /// Subtracts `rhs` from this value (numeric only).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedOperation`] for non-numeric operands
    /// and [`ConfigError::Overflow`] on 64-bit integer overflow.
    pub fn try_sub(&self, rhs: &Value) -> Result<Value, ConfigError> {
        self.forward_binary(rhs, raw_sub)
    }

    /// Multiplies two numeric values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedOperation`] for non-numeric operands
    /// and [`ConfigError::Overflow`] on 64-bit integer overflow.
    pub fn try_mul(&self, rhs: &Value) -> Result<Value, ConfigError> {
        self.forward_binary(rhs, raw_mul)
    }

    /// Divides this value by `rhs`. The result is always a float.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedOperation`] for non-numeric operands
    /// and [`ConfigError::DivisionByZero`] when `rhs` is zero.
    pub fn try_div(&self, rhs: &Value) -> Result<Value, ConfigError> {
        self.forward_binary(rhs, raw_div)
    }

    /// Runs a raw binary operation with masking-aware dispatch: secret
    /// operands are revealed and the result is re-wrapped per the secret's
    /// form (the left operand's wrapper wins when both are secret).
    fn forward_binary(
        &self,
        rhs: &Value,
        op: fn(&Value, &Value) -> Result<Value, ConfigError>,
    ) -> Result<Value, ConfigError> {
        match (self, rhs) {
            (Value::Secret(masked), _) => {
                let result = op(masked.reveal(), rhs.reveal())?;
                Ok(masked.rewrap(result))
            }

            (_, Value::Secret(masked)) => {
                let result = op(self, masked.reveal())?;
                Ok(masked.rewrap(result))
            }

            _ => op(self, rhs),
        }
    }
}

fn raw_add(lhs: &Value, rhs: &Value) -> Result<Value, ConfigError> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => a
            .checked_add(*b)
            .map(Value::Integer)
            .ok_or(ConfigError::Overflow { symbol: "+" }),

        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),

        (Value::List(a), Value::List(b)) => {
            let mut items = a.clone();
            items.extend(b.iter().cloned());
            Ok(Value::List(items))
        }

        _ => numeric_float_op(lhs, rhs, "+", |a, b| a + b),
    }
}

fn raw_sub(lhs: &Value, rhs: &Value) -> Result<Value, ConfigError> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => a
            .checked_sub(*b)
            .map(Value::Integer)
            .ok_or(ConfigError::Overflow { symbol: "-" }),

        _ => numeric_float_op(lhs, rhs, "-", |a, b| a - b),
    }
}

fn raw_mul(lhs: &Value, rhs: &Value) -> Result<Value, ConfigError> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => a
            .checked_mul(*b)
            .map(Value::Integer)
            .ok_or(ConfigError::Overflow { symbol: "*" }),

        _ => numeric_float_op(lhs, rhs, "*", |a, b| a * b),
    }
}

fn raw_div(lhs: &Value, rhs: &Value) -> Result<Value, ConfigError> {
    let divisor = match rhs {
        Value::Integer(b) => *b as f64,
        Value::Float(b) => *b,
        _ => {
            return Err(ConfigError::UnsupportedOperation {
                symbol: "/",
                lhs: lhs.type_name(),
                rhs: rhs.type_name(),
            });
        }
    };

    if divisor == 0.0 {
        return Err(ConfigError::DivisionByZero);
    }

    numeric_float_op(lhs, rhs, "/", |a, b| a / b)
}

/// Applies a float operation to any numeric operand pair, widening integers.
fn numeric_float_op(
    lhs: &Value,
    rhs: &Value,
    symbol: &'static str,
    op: impl Fn(f64, f64) -> f64,
) -> Result<Value, ConfigError> {
    let (a, b) = match (lhs, rhs) {
        (Value::Integer(a), Value::Float(b)) => (*a as f64, *b),
        (Value::Float(a), Value::Integer(b)) => (*a, *b as f64),
        (Value::Float(a), Value::Float(b)) => (*a, *b),
        (Value::Integer(a), Value::Integer(b)) => (*a as f64, *b as f64),
        _ => {
            return Err(ConfigError::UnsupportedOperation {
                symbol,
                lhs: lhs.type_name(),
                rhs: rhs.type_name(),
            });
        }
    };

    Ok(Value::Float(op(a, b)))
}

// ============================================================================
// Comparison
// ============================================================================

impl Value {
    /// Compares two values with an ordering operator.
    ///
    /// Numeric values cross-compare; strings and booleans compare within
    /// their own family. Secrets compare by their revealed originals, and the
    /// boolean result is never re-wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedOperation`] naming both operand
    /// types and the symbolic operator when the pair cannot be ordered.
    pub fn try_compare(&self, rhs: &Value, op: CompareOp) -> Result<bool, ConfigError> {
        let (a, b) = (self.reveal(), rhs.reveal());

        let ordering = match (a, b) {
            (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
            (Value::Integer(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
            (Value::Float(x), Value::Integer(y)) => x.partial_cmp(&(*y as f64)),
            (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
            (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
            (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
            _ => {
                return Err(ConfigError::UnsupportedOperation {
                    symbol: op.symbol(),
                    lhs: a.type_name(),
                    rhs: b.type_name(),
                });
            }
        };

        // NaN operands are incomparable, never an error.
        Ok(ordering.is_some_and(|ord| op.holds(ord)))
    }

    /// Loose equality: structural, with numeric cross-family comparison
    /// (`1 == 1.0`). Incompatible pairs are `false`, never an error.
    /// Booleans remain a distinct family from integers.
    #[must_use]
    pub fn loose_eq(&self, rhs: &Value) -> bool {
        match (self.reveal(), rhs.reveal()) {
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                (*a as f64) == *b
            }
            (a, b) => a == b,
        }
    }
}

// ============================================================================
// Container operations
// ============================================================================

impl Value {
    /// Returns the length of a string (in characters), list, or map.
    ///
    /// Length queries on secrets answer for the original and are never
    /// re-wrapped.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self.reveal() {
            Value::String(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Returns whether a string, list, or map is empty.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|n| n == 0)
    }

    /// Membership test: substring for strings, element (loose equality) for
    /// lists, key for maps. Unsupported combinations are `false`.
    #[must_use]
    pub fn contains(&self, needle: &Value) -> bool {
        match (self.reveal(), needle.reveal()) {
            (Value::String(s), Value::String(sub)) => s.contains(sub.as_str()),
            (Value::List(items), n) => items.iter().any(|item| item.loose_eq(n)),
            (Value::Map(entries), Value::String(key)) => entries.contains_key(key),
            _ => false,
        }
    }

    /// Returns a list element by index. Elements of a mutable-form secret
    /// list come back as secrets themselves.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<Value> {
        match self {
            Value::Secret(masked) => masked
                .reveal()
                .get_index(index)
                .map(|item| masked.rewrap(item)),
            Value::List(items) => items.get(index).cloned(),
            _ => None,
        }
    }

    /// Returns a map entry by key. Entries of a mutable-form secret map come
    /// back as secrets themselves.
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<Value> {
        match self {
            Value::Secret(masked) => masked.reveal().get_key(key).map(|v| masked.rewrap(v)),
            Value::Map(entries) => entries.get(key).cloned(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::{MaskPolicy, Masked};

    #[test]
    fn test_integer_addition() {
        let sum = Value::from(5).try_add(&Value::from(3)).expect("add");
        assert_eq!(sum, Value::Integer(8));
    }

    #[test]
    fn test_mixed_numeric_widens_to_float() {
        let sum = Value::from(5).try_add(&Value::from(0.5)).expect("add");
        assert_eq!(sum, Value::Float(5.5));
    }

    #[test]
    fn test_string_concatenation() {
        let joined = Value::from("ab").try_add(&Value::from("cd")).expect("add");
        assert_eq!(joined, Value::from("abcd"));
    }

    #[test]
    fn test_incompatible_addition_names_both_types() {
        let err = Value::from(1)
            .try_add(&Value::from("x"))
            .expect_err("must fail");
        let display = err.to_string();
        assert!(display.contains("'+'"));
        assert!(display.contains("integer"));
        assert!(display.contains("string"));
    }

    #[test]
    fn test_integer_overflow() {
        let err = Value::Integer(i64::MAX)
            .try_add(&Value::from(1))
            .expect_err("must overflow");
        assert!(matches!(err, ConfigError::Overflow { symbol: "+" }));
    }

    #[test]
    fn test_division_always_floats() {
        let quotient = Value::from(7).try_div(&Value::from(2)).expect("div");
        assert_eq!(quotient, Value::Float(3.5));
    }

    #[test]
    fn test_division_by_zero() {
        let err = Value::from(1)
            .try_div(&Value::from(0))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::DivisionByZero));
    }

    #[test]
    fn test_ordering_comparison() {
        assert!(
            Value::from(1)
                .try_compare(&Value::from(2.5), CompareOp::Lt)
                .expect("comparable")
        );
        assert!(
            Value::from("b")
                .try_compare(&Value::from("a"), CompareOp::Gt)
                .expect("comparable")
        );
    }

    #[test]
    fn test_unsupported_ordering_is_an_error() {
        let err = Value::from(1)
            .try_compare(&Value::from("x"), CompareOp::Le)
            .expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "'<=' not supported between values of type 'integer' and 'string'"
        );
    }

    #[test]
    fn test_unsupported_equality_is_false() {
        assert!(!Value::from(1).loose_eq(&Value::from("1")));
        assert!(Value::from(1).loose_eq(&Value::from(1.0)));
        // Booleans are a distinct family from integers.
        assert!(!Value::from(true).loose_eq(&Value::from(1)));
    }

    #[test]
    fn test_secret_addition_rewraps() {
        let secret = Masked::wrap(Value::from(5), &MaskPolicy::default());
        let sum = secret.try_add(&Value::from(3)).expect("add");
        assert!(sum.is_secret());
        assert_eq!(sum.reveal(), &Value::Integer(8));
        assert_eq!(sum.to_string(), "******");
    }

    #[test]
    fn test_immutable_secret_addition_degrades() {
        let secret = Masked::wrap(Value::from("secret"), &MaskPolicy::frozen());
        let joined = secret.try_add(&Value::from("123")).expect("add");
        assert!(!joined.is_secret());
        assert_eq!(joined, Value::from("secret123"));
    }

    #[test]
    fn test_len_is_never_wrapped() {
        let secret = Masked::wrap(Value::from("hunter2"), &MaskPolicy::default());
        assert_eq!(secret.len(), Some(7));
    }

    #[test]
    fn test_secret_list_elements_stay_secret() {
        let secret = Masked::wrap(Value::from(vec![1, 2, 3]), &MaskPolicy::default());
        let element = secret.get_index(1).expect("present");
        assert!(element.is_secret());
        assert_eq!(element.reveal(), &Value::Integer(2));
        assert!(secret.get_index(9).is_none());
    }

    #[test]
    fn test_contains() {
        assert!(Value::from("hello world").contains(&Value::from("world")));
        assert!(Value::from(vec![1, 2]).contains(&Value::from(2)));
        assert!(!Value::from(vec![1, 2]).contains(&Value::from(3)));
    }
}
