//! Environment orchestration: named environments, selection, and overrides.
//!
//! The [`EnvLoader`] builder registers named [`EnvironmentSpec`]s, resolves
//! which one is active, applies overrides from the process environment and an
//! optional `.env` file, and returns a finalized, read-only
//! [`ConfigMap`](crate::cell::ConfigMap).
//!
//! # Selection order
//!
//! 1. explicit [`select`](EnvLoader::select) from application code;
//! 2. the `ENV` process variable;
//! 3. the configured [`default_environment`](EnvLoader::default_environment).
//!
//! An unresolvable or unknown name fails with an error listing the
//! registered environments.
//!
//! # Overrides
//!
//! Overrides apply only to keys already declared in the active environment;
//! unknown keys are ignored. Each override re-runs the key's full validation
//! pipeline, and a failure is reported with the offending key. Process
//! environment variables take priority over `.env` file entries. The `.env`
//! file is read directly; the process environment is never mutated.
//!
//! # Example
//!
//! ```rust,ignore
//! use envcell::{Descriptor, EnvLoader, EnvironmentSpec, MaskPolicy};
//!
//! let loaded = EnvLoader::new()
//!     .environment(
//!         "dev",
//!         EnvironmentSpec::new()
//!             .set("HOST", "localhost")
//!             .set_with("PORT", Descriptor::positive_integer(), "8080")
//!             .set_with("API_KEY", Descriptor::secret(), "dev-key"),
//!     )
//!     .default_environment("dev")
//!     .policy(MaskPolicy::default())
//!     .override_from_process_env(true)
//!     .load()?;
//!
//! let port = loaded.config().get("PORT");
//! ```

use std::collections::BTreeMap;

use crate::cell::{ConfigCell, ConfigMap};
use crate::descriptor::Descriptor;
use crate::error::ConfigError;
use crate::mask::MaskPolicy;
use crate::value::Value;

// ============================================================================
// EnvironmentSpec
// ============================================================================

/// One declared configuration entry: a key, its descriptor, and an optional
/// initial value.
#[derive(Clone, Debug)]
struct EnvEntry {
    key: String,
    descriptor: Descriptor,
    raw: Option<Value>,
}

/// A named environment's declared keys, descriptors, and initial values.
///
/// Keys without an initial value must be satisfied by an override source or
/// loading fails the precheck for that key.
#[derive(Clone, Debug, Default)]
pub struct EnvironmentSpec {
    entries: Vec<EnvEntry>,
}

impl EnvironmentSpec {
    /// Creates an empty environment spec.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declares a key with an initial value and no particular type
    /// (the `Any` descriptor).
    #[must_use]
    pub fn set(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entry(key, Descriptor::any(), Some(value.into()))
    }

    /// Declares a key with a descriptor and an initial value.
    #[must_use]
    pub fn set_with(
        self,
        key: impl Into<String>,
        descriptor: Descriptor,
        value: impl Into<Value>,
    ) -> Self {
        self.entry(key, descriptor, Some(value.into()))
    }

    /// Declares a key with a descriptor but no initial value; an override
    /// source must supply one.
    #[must_use]
    pub fn declare(self, key: impl Into<String>, descriptor: Descriptor) -> Self {
        self.entry(key, descriptor, None)
    }

    fn entry(mut self, key: impl Into<String>, descriptor: Descriptor, raw: Option<Value>) -> Self {
        let key = key.into();
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            existing.descriptor = descriptor;
            existing.raw = raw;
        } else {
            self.entries.push(EnvEntry {
                key,
                descriptor,
                raw,
            });
        }
        self
    }
}

// ============================================================================
// LoadedEnvironment
// ============================================================================

/// The result of loading: the resolved environment name and its finalized
/// configuration.
#[derive(Clone, Debug)]
pub struct LoadedEnvironment {
    name: String,
    config: ConfigMap,
}

impl LoadedEnvironment {
    /// Returns the resolved environment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the finalized configuration.
    #[must_use]
    pub const fn config(&self) -> &ConfigMap {
        &self.config
    }

    /// Consumes the result and returns the finalized configuration.
    #[must_use]
    pub fn into_config(self) -> ConfigMap {
        self.config
    }
}

// ============================================================================
// EnvLoader
// ============================================================================

/// Builder for loading one of several named environments.
#[derive(Clone, Debug, Default)]
pub struct EnvLoader {
    environments: Vec<(String, EnvironmentSpec)>,
    selected: Option<String>,
    default_env: Option<String>,
    policy: MaskPolicy,
    use_process_env: bool,
    #[cfg(feature = "dotenv")]
    dotenv_path: Option<std::path::PathBuf>,
}

impl EnvLoader {
    /// Creates an empty loader with the default masking policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named environment, replacing any previous registration
    /// under the same name.
    #[must_use]
    pub fn environment(mut self, name: impl Into<String>, spec: EnvironmentSpec) -> Self {
        let name = name.into();
        if let Some(existing) = self.environments.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = spec;
        } else {
            self.environments.push((name, spec));
        }
        self
    }

    /// Selects the active environment explicitly. Takes precedence over the
    /// `ENV` variable and the default.
    #[must_use]
    pub fn select(mut self, name: impl Into<String>) -> Self {
        self.selected = Some(name.into());
        self
    }

    /// Sets the environment used when neither an explicit selection nor the
    /// `ENV` variable resolves one.
    #[must_use]
    pub fn default_environment(mut self, name: impl Into<String>) -> Self {
        self.default_env = Some(name.into());
        self
    }

    /// Sets the masking policy threaded into every pipeline run. Set it once,
    /// before loading.
    #[must_use]
    pub fn policy(mut self, policy: MaskPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables overriding declared keys from process environment variables.
    #[must_use]
    pub fn override_from_process_env(mut self, enabled: bool) -> Self {
        self.use_process_env = enabled;
        self
    }

    /// Reads overrides for declared keys from a `.env` file. The file is
    /// parsed directly; the process environment is never mutated.
    #[cfg(feature = "dotenv")]
    #[must_use]
    pub fn dotenv_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }

    /// Resolves the active environment, applies overrides, and returns the
    /// finalized configuration.
    ///
    /// # Errors
    ///
    /// Fails when no environment resolves, when the resolved name is
    /// unknown, when the `.env` file cannot be read, or when any value is
    /// rejected by its descriptor's pipeline (reported with the offending
    /// key).
    pub fn load(self) -> Result<LoadedEnvironment, ConfigError> {
        let name = self.resolve_name()?;
        let overrides = self.collect_overrides()?;

        let spec = self
            .environments
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, spec)| spec)
            .ok_or_else(|| ConfigError::unknown_environment(&name, self.available()))?;

        let mut config = ConfigMap::new();

        for entry in &spec.entries {
            let cell = self.build_cell(entry, overrides.get(&entry.key))?;
            config.insert(entry.key.clone(), cell)?;
        }

        config.finalize();
        tracing::info!(environment = %name, keys = config.len(), "environment configuration loaded");

        Ok(LoadedEnvironment { name, config })
    }

    /// Builds one cell, running the pipeline once for the initial assignment
    /// and again for an override when one exists.
    fn build_cell(
        &self,
        entry: &EnvEntry,
        override_value: Option<&String>,
    ) -> Result<ConfigCell, ConfigError> {
        match (&entry.raw, override_value) {
            (Some(raw), Some(text)) => {
                let mut cell = ConfigCell::new(entry.descriptor.clone(), raw.clone(), &self.policy)
                    .map_err(|e| e.for_key(&entry.key))?;
                cell.set(text.as_str(), &self.policy)
                    .map_err(|e| e.for_key(&entry.key))?;
                tracing::info!(key = %entry.key, "declared value overridden from environment");
                Ok(cell)
            }

            (Some(raw), None) => ConfigCell::new(entry.descriptor.clone(), raw.clone(), &self.policy)
                .map_err(|e| e.for_key(&entry.key)),

            (None, Some(text)) => {
                tracing::info!(key = %entry.key, "declared key satisfied from environment");
                ConfigCell::new(entry.descriptor.clone(), text.as_str(), &self.policy)
                    .map_err(|e| e.for_key(&entry.key))
            }

            (None, None) => Err(ConfigError::EmptyValue.for_key(&entry.key)),
        }
    }

    /// Gathers override pairs: `.env` file entries first, then process
    /// environment variables on top (process environment wins).
    fn collect_overrides(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut overrides = BTreeMap::new();

        #[cfg(feature = "dotenv")]
        if let Some(path) = &self.dotenv_path {
            let iter = dotenvy::from_path_iter(path).map_err(|source| ConfigError::Dotenv {
                path: path.clone(),
                source,
            })?;
            for item in iter {
                let (key, value) = item.map_err(|source| ConfigError::Dotenv {
                    path: path.clone(),
                    source,
                })?;
                overrides.insert(key, value);
            }
            tracing::debug!(path = %path.display(), "dotenv overrides loaded");
        }

        if self.use_process_env {
            for (key, value) in std::env::vars() {
                overrides.insert(key, value);
            }
        }

        Ok(overrides)
    }

    fn resolve_name(&self) -> Result<String, ConfigError> {
        if let Some(name) = &self.selected {
            tracing::info!(environment = %name, "environment selected from application code");
            return self.ensure_known(name);
        }

        if let Ok(name) = std::env::var("ENV")
            && !name.is_empty()
        {
            tracing::info!(environment = %name, "environment selected from ENV variable");
            return self.ensure_known(&name);
        }

        if let Some(name) = &self.default_env {
            tracing::warn!(environment = %name, "no environment selected; using the default");
            return self.ensure_known(name);
        }

        Err(ConfigError::NoEnvironment)
    }

    fn ensure_known(&self, name: &str) -> Result<String, ConfigError> {
        if self.environments.iter().any(|(n, _)| n == name) {
            Ok(name.to_string())
        } else {
            Err(ConfigError::unknown_environment(name, self.available()))
        }
    }

    fn available(&self) -> Vec<String> {
        self.environments.iter().map(|(n, _)| n.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_spec() -> EnvironmentSpec {
        EnvironmentSpec::new()
            .set("HOST", "localhost")
            .set_with("PORT", Descriptor::positive_integer(), "8080")
    }

    #[test]
    fn test_explicit_selection() {
        let loaded = EnvLoader::new()
            .environment("dev", dev_spec())
            .select("dev")
            .load()
            .expect("loads");

        assert_eq!(loaded.name(), "dev");
        assert_eq!(loaded.config().get("PORT"), Some(&Value::Integer(8080)));
        assert!(loaded.config().is_finalized());
    }

    #[test]
    fn test_unknown_environment_lists_available() {
        let err = EnvLoader::new()
            .environment("dev", dev_spec())
            .environment("prod", dev_spec())
            .select("staging")
            .load()
            .expect_err("must fail");

        let ConfigError::UnknownEnvironment { available, .. } = err else {
            panic!("expected UnknownEnvironment");
        };
        assert_eq!(available, vec!["dev".to_string(), "prod".to_string()]);
    }

    #[test]
    fn test_invalid_declared_value_names_the_key() {
        let err = EnvLoader::new()
            .environment(
                "dev",
                EnvironmentSpec::new().set_with("PORT", Descriptor::positive_integer(), "-1"),
            )
            .select("dev")
            .load()
            .expect_err("must fail");

        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_declared_key_without_value_fails_precheck() {
        let err = EnvLoader::new()
            .environment(
                "dev",
                EnvironmentSpec::new().declare("TOKEN", Descriptor::secret()),
            )
            .select("dev")
            .load()
            .expect_err("must fail");

        assert!(err.to_string().contains("TOKEN"));
        assert!(err.to_string().contains("no value has been assigned"));
    }

    #[test]
    fn test_redefining_a_key_replaces_it() {
        let spec = EnvironmentSpec::new()
            .set("PORT", "old")
            .set_with("PORT", Descriptor::positive_integer(), "8080");

        let loaded = EnvLoader::new()
            .environment("dev", spec)
            .select("dev")
            .load()
            .expect("loads");
        assert_eq!(loaded.config().get("PORT"), Some(&Value::Integer(8080)));
        assert_eq!(loaded.config().len(), 1);
    }
}
