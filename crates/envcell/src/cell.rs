//! Config cells and the finalized configuration collection.
//!
//! A [`ConfigCell`] is the immutable pairing of a [`Descriptor`] and its
//! currently accepted value. A cell can only be constructed through the
//! descriptor's pipeline, so a cell never holds a value that has not passed
//! validation.
//!
//! A [`ConfigMap`] aggregates named cells. While open, keys can be inserted,
//! overridden, and removed; after [`finalize`](ConfigMap::finalize) every
//! mutation fails with [`ConfigError::Immutable`] and reads never fail. Reads
//! always return the canonical value, never the descriptor.

use std::fmt::{self, Display, Formatter};

use crate::descriptor::Descriptor;
use crate::error::ConfigError;
use crate::mask::MaskPolicy;
use crate::value::Value;

// ============================================================================
// ConfigCell
// ============================================================================

/// One descriptor paired with its accepted canonical value.
#[derive(Clone, Debug)]
pub struct ConfigCell {
    descriptor: Descriptor,
    value: Value,
}

impl ConfigCell {
    /// Validates `raw` through the descriptor's pipeline and pairs the
    /// canonical value with the descriptor.
    ///
    /// # Errors
    ///
    /// Returns the first failing pipeline stage's error.
    pub fn new(
        descriptor: Descriptor,
        raw: impl Into<Value>,
        policy: &MaskPolicy,
    ) -> Result<Self, ConfigError> {
        let value = descriptor.set_value(raw, policy)?;
        Ok(Self { descriptor, value })
    }

    /// Re-runs the whole pipeline on an override value, replacing the stored
    /// canonical value on success.
    ///
    /// # Errors
    ///
    /// Returns the first failing pipeline stage's error; the stored value is
    /// left unchanged on failure.
    pub fn set(&mut self, raw: impl Into<Value>, policy: &MaskPolicy) -> Result<(), ConfigError> {
        self.value = self.descriptor.set_value(raw, policy)?;
        Ok(())
    }

    /// Returns the canonical value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the descriptor this cell validates with.
    #[must_use]
    pub const fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Consumes the cell and returns the canonical value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

// ============================================================================
// ConfigMap
// ============================================================================

/// An insertion-ordered collection of named config cells with an explicit
/// finalization point.
///
/// # Example
///
/// ```rust,ignore
/// use envcell::{ConfigCell, ConfigMap, Descriptor, MaskPolicy};
///
/// let policy = MaskPolicy::default();
/// let mut config = ConfigMap::new();
/// config.insert("PORT", ConfigCell::new(Descriptor::positive_integer(), "8080", &policy)?)?;
/// config.finalize();
///
/// assert_eq!(config.get("PORT").and_then(|v| v.as_i64()), Some(8080));
/// // any further insert/update/remove now fails with ConfigError::Immutable
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConfigMap {
    entries: Vec<(String, ConfigCell)>,
    finalized: bool,
}

impl ConfigMap {
    /// Creates a new, open collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            finalized: false,
        }
    }

    /// Inserts a cell under a key, replacing any cell already stored there.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Immutable`] once the collection is finalized.
    pub fn insert(&mut self, key: impl Into<String>, cell: ConfigCell) -> Result<(), ConfigError> {
        self.guard_open()?;

        let key = key.into();
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = cell;
        } else {
            self.entries.push((key, cell));
        }
        Ok(())
    }

    /// Re-validates an override value through the key's descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Immutable`] once finalized,
    /// [`ConfigError::UnknownKey`] for undeclared keys, and any pipeline
    /// error annotated with the key name.
    pub fn update(
        &mut self,
        key: &str,
        raw: impl Into<Value>,
        policy: &MaskPolicy,
    ) -> Result<(), ConfigError> {
        self.guard_open()?;

        let Some((_, cell)) = self.entries.iter_mut().find(|(k, _)| k == key) else {
            return Err(ConfigError::UnknownKey {
                key: key.to_string(),
            });
        };

        cell.set(raw, policy).map_err(|e| e.for_key(key))
    }

    /// Removes a key and returns its cell, if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Immutable`] once the collection is finalized.
    pub fn remove(&mut self, key: &str) -> Result<Option<ConfigCell>, ConfigError> {
        self.guard_open()?;

        let position = self.entries.iter().position(|(k, _)| k == key);
        Ok(position.map(|i| self.entries.remove(i).1))
    }

    /// Seals the collection. Idempotent; all later mutations fail.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Returns whether the collection has been finalized.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns the canonical value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.get_cell(key).map(ConfigCell::value)
    }

    /// Returns the full cell for a key.
    #[must_use]
    pub fn get_cell(&self, key: &str) -> Option<&ConfigCell> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, cell)| cell)
    }

    /// Returns whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(key, canonical value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, cell)| (k.as_str(), cell.value()))
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn guard_open(&self) -> Result<(), ConfigError> {
        if self.finalized {
            Err(ConfigError::immutable(
                "cannot set or update values of a finalized configuration",
            ))
        } else {
            Ok(())
        }
    }
}

impl Display for ConfigMap {
    /// Renders keys with their canonical values as a JSON-style object.
    /// Secrets render as the redaction marker.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, cell)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let rendered =
                serde_json::to_string(&cell.value().to_json()).map_err(|_| fmt::Error)?;
            write!(f, "\"{key}\": {rendered}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;

    fn policy() -> MaskPolicy {
        MaskPolicy::default()
    }

    fn sample_map() -> ConfigMap {
        let mut map = ConfigMap::new();
        map.insert(
            "HOST",
            ConfigCell::new(Descriptor::string(), "localhost", &policy()).expect("valid"),
        )
        .expect("open");
        map.insert(
            "PORT",
            ConfigCell::new(Descriptor::positive_integer(), "8080", &policy()).expect("valid"),
        )
        .expect("open");
        map
    }

    #[test]
    fn test_cell_rejects_invalid_values() {
        assert!(ConfigCell::new(Descriptor::positive_integer(), "0", &policy()).is_err());
    }

    #[test]
    fn test_cell_set_reruns_pipeline() {
        let mut cell =
            ConfigCell::new(Descriptor::positive_integer(), "8080", &policy()).expect("valid");
        cell.set("9090", &policy()).expect("valid override");
        assert_eq!(cell.value(), &Value::Integer(9090));

        // A failing override leaves the stored value unchanged.
        assert!(cell.set("-1", &policy()).is_err());
        assert_eq!(cell.value(), &Value::Integer(9090));
    }

    #[test]
    fn test_reads_return_canonical_values() {
        let map = sample_map();
        assert_eq!(map.get("PORT"), Some(&Value::Integer(8080)));
        assert!(map.contains_key("HOST"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["HOST", "PORT"]);
    }

    #[test]
    fn test_finalized_map_rejects_mutation() {
        let mut map = sample_map();
        map.finalize();

        let cell = ConfigCell::new(Descriptor::string(), "x", &policy()).expect("valid");
        assert!(matches!(
            map.insert("NEW", cell),
            Err(ConfigError::Immutable { .. })
        ));
        assert!(matches!(
            map.update("PORT", "9090", &policy()),
            Err(ConfigError::Immutable { .. })
        ));
        assert!(matches!(
            map.remove("PORT"),
            Err(ConfigError::Immutable { .. })
        ));

        // Reads never fail after finalization.
        assert_eq!(map.get("PORT"), Some(&Value::Integer(8080)));
        assert!(map.get("MISSING").is_none());
    }

    #[test]
    fn test_update_unknown_key() {
        let mut map = sample_map();
        assert!(matches!(
            map.update("MISSING", "x", &policy()),
            Err(ConfigError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_update_failure_names_the_key() {
        let mut map = sample_map();
        let err = map.update("PORT", "-1", &policy()).expect_err("must fail");
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_display_redacts_secrets() {
        let mut map = sample_map();
        map.insert(
            "API_KEY",
            ConfigCell::new(Descriptor::secret(), "hunter2", &policy()).expect("valid"),
        )
        .expect("open");

        let rendered = map.to_string();
        assert!(rendered.contains("\"HOST\": \"localhost\""));
        assert!(rendered.contains("\"PORT\": 8080"));
        assert!(rendered.contains("\"API_KEY\": \"******\""));
        assert!(!rendered.contains("hunter2"));
    }
}
