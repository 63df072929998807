//! Type-erased configuration values.
//!
//! The [`Value`] enum is the canonical runtime representation of every
//! configuration value: the output of a descriptor's pipeline, the content of
//! a [`ConfigCell`](crate::cell::ConfigCell), and the operand type of the
//! masking proxy's forwarded operations.
//!
//! # Supported Types
//!
//! | Variant | Native type name |
//! |---------|------------------|
//! | `String` | `"string"` |
//! | `Integer` | `"integer"` |
//! | `Float` | `"float"` |
//! | `Boolean` | `"boolean"` |
//! | `List` | `"list"` |
//! | `Map` | `"dictionary"` |
//! | `Null` | `"null"` |
//! | `Secret` | `"secret"` |
//!
//! `Null` is the absent-value sentinel. It is distinct from "never assigned",
//! which only exists at the pipeline boundary (see
//! [`Descriptor::apply`](crate::descriptor::Descriptor::apply)).
//!
//! # Transparency of secrets
//!
//! A [`Secret`](Value::Secret) displays as the redaction marker but compares
//! equal to its revealed original, so masked values participate in equality
//! checks without leaking through `Display` or `Debug`.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};

use serde_json::Value as Json;

use crate::mask::{Masked, REDACTED};

/// A type-erased configuration value.
///
/// # Example
///
/// ```rust,ignore
/// use envcell::Value;
///
/// let port = Value::from(8080);
/// assert_eq!(port.type_name(), "integer");
/// assert_eq!(port.to_string(), "8080");
/// ```
#[derive(Clone)]
pub enum Value {
    /// A text value.
    String(String),

    /// A signed integer (stored as i64).
    Integer(i64),

    /// A floating-point value (stored as f64).
    Float(f64),

    /// A boolean value.
    Boolean(bool),

    /// An ordered list of values.
    List(Vec<Value>),

    /// A map of string keys to values.
    Map(BTreeMap<String, Value>),

    /// The absent-value sentinel.
    Null,

    /// A sensitive value wrapped by the masking proxy.
    Secret(Box<Masked>),
}

impl Value {
    /// Returns the native type name used in diagnostics and type checks.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::List(_) => "list",
            Value::Map(_) => "dictionary",
            Value::Null => "null",
            Value::Secret(_) => "secret",
        }
    }

    /// Returns `true` for the absent-value sentinel.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` when the value is wrapped by the masking proxy.
    #[must_use]
    pub const fn is_secret(&self) -> bool {
        matches!(self, Value::Secret(_))
    }

    /// Returns `true` for the scalar immutable family
    /// (string, integer, float, boolean).
    pub(crate) const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::String(_) | Value::Integer(_) | Value::Float(_) | Value::Boolean(_)
        )
    }

    /// Borrows the text content, if this is a string (secrets are seen
    /// through).
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.reveal() {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an integer (secrets are seen
    /// through).
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.reveal() {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float content, if this is a float (secrets are seen
    /// through).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.reveal() {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a boolean (secrets are seen
    /// through).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.reveal() {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrows the list content, if this is a list (secrets are seen
    /// through).
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self.reveal() {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the map content, if this is a map (secrets are seen through).
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self.reveal() {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Sees through the masking proxy to the original value.
    ///
    /// For non-secret values this is the identity.
    #[must_use]
    pub fn reveal(&self) -> &Value {
        match self {
            Value::Secret(masked) => masked.reveal(),
            _ => self,
        }
    }

    /// Consumes the value, unwrapping the masking proxy if present.
    #[must_use]
    pub fn into_revealed(self) -> Value {
        match self {
            Value::Secret(masked) => masked.into_inner(),
            _ => self,
        }
    }

    /// Converts a `serde_json` value into a [`Value`].
    ///
    /// Numbers become `Integer` when they fit in `i64`, `Float` otherwise.
    #[must_use]
    pub fn from_json(json: Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => n.as_i64().map_or_else(
                || Value::Float(n.as_f64().unwrap_or(f64::NAN)),
                Value::Integer,
            ),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from_json).collect()),
            Json::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts the value to a `serde_json` value.
    ///
    /// Secrets render as the redaction marker; non-finite floats render as
    /// their decimal text since JSON has no representation for them.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Value::String(s) => Json::String(s.clone()),
            Value::Integer(n) => Json::Number((*n).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or_else(|| Json::String(f.to_string()), Json::Number),
            Value::Boolean(b) => Json::Bool(*b),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Null => Json::Null,
            Value::Secret(_) => Json::String(REDACTED.to_string()),
        }
    }
}

// ============================================================================
// Display / Debug
// ============================================================================

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::Secret(_) => f.write_str(REDACTED),
            Value::List(_) | Value::Map(_) => {
                let rendered = serde_json::to_string(&self.to_json()).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Null => f.write_str("Null"),
            // The wrapped original never appears in Debug output.
            Value::Secret(_) => f.debug_tuple("Secret").field(&REDACTED).finish(),
        }
    }
}

// ============================================================================
// Equality
// ============================================================================

impl PartialEq for Value {
    /// Structural equality with secrets seen through on both sides, so a
    /// masked value compares equal to its original.
    fn eq(&self, other: &Self) -> bool {
        match (self.reveal(), other.reveal()) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

// ============================================================================
// Serde
// ============================================================================

impl serde::Serialize for Value {
    /// Serializes through the JSON bridge; secrets serialize as the
    /// redaction marker, never as their originals.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    /// Deserializes from any self-describing format through the JSON bridge.
    /// Deserialized values are always plain; masking only happens in the
    /// descriptor pipeline.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Json::deserialize(deserializer).map(Value::from_json)
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Generates `From<T>` implementations for integer-backed variants.
macro_rules! impl_from_integer {
    ($($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Integer(i64::from(n))
                }
            }
        )+
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Masked> for Value {
    fn from(masked: Masked) -> Self {
        Value::Secret(Box::new(masked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::MaskPolicy;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(1).type_name(), "integer");
        assert_eq!(Value::from(1.5).type_name(), "float");
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::from(vec![1, 2]).type_name(), "list");
        assert_eq!(Value::Null.type_name(), "null");
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::from("host").to_string(), "host");
        assert_eq!(Value::from(8080).to_string(), "8080");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_display_containers_as_json() {
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "[1,2,3]");

        let mut entries = BTreeMap::new();
        entries.insert("a".to_string(), Value::Integer(1));
        assert_eq!(Value::Map(entries).to_string(), r#"{"a":1}"#);
    }

    #[test]
    fn test_secret_display_and_debug_are_redacted() {
        let secret = Masked::wrap(Value::from("hunter2"), &MaskPolicy::default());
        assert_eq!(secret.to_string(), "******");
        let debug = format!("{secret:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_secret_compares_to_original() {
        let secret = Masked::wrap(Value::from(42), &MaskPolicy::default());
        assert_eq!(secret, Value::from(42));
        assert_ne!(secret, Value::from(43));
    }

    #[test]
    fn test_serde_round_trip() {
        let value = Value::from(vec![Value::Integer(1), Value::from("x")]);
        let encoded = serde_json::to_string(&value).expect("serializes");
        assert_eq!(encoded, r#"[1,"x"]"#);
        let decoded: Value = serde_json::from_str(&encoded).expect("deserializes");
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_serialize_redacts_secrets() {
        let secret = Masked::wrap(Value::from("hunter2"), &MaskPolicy::default());
        let encoded = serde_json::to_string(&secret).expect("serializes");
        assert_eq!(encoded, r#""******""#);
    }

    #[test]
    fn test_json_round_trip() {
        let parsed: Json = serde_json::from_str(r#"{"a": [1, 2.5, "x", null, true]}"#)
            .expect("valid json");
        let value = Value::from_json(parsed.clone());
        assert_eq!(value.to_json(), parsed);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5)), Value::Integer(5));
    }
}
