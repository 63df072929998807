//! # envcell
//!
//! Typed validation, coercion, and masking for configuration values.
//!
//! `envcell` takes raw configuration input from heterogeneous sources
//! (application code, the process environment, `.env` files) and turns it
//! into canonical, validated values before a consuming program ever sees
//! them. Sensitive values can be wrapped so that casual display reveals a
//! redaction marker while operations on them keep working transparently.
//!
//! ## The pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`Descriptor`] | One of twelve value-type variants running a five-stage pipeline |
//! | [`Value`] | The canonical, type-erased representation of a validated value |
//! | [`Masked`] / [`MaskPolicy`] | The masking proxy and the process-wide masking switches |
//! | [`ConfigCell`] | The immutable pairing of a descriptor and its accepted value |
//! | [`ConfigMap`] | A finalized, read-only collection of named cells |
//! | [`EnvLoader`] | Orchestration: environment selection and override ingestion |
//!
//! ## Pipeline
//!
//! Every call to [`Descriptor::set_value`] runs the same five stages, failing
//! fast on the first violation:
//!
//! 1. **precheck** — a value must have been assigned;
//! 2. **convert** — text and numeric coercion to the canonical type
//!    (secrets wrap through the masking proxy here);
//! 3. **type-check** — exact native-type match;
//! 4. **semantic-check** — positivity, negativity, password policy, email
//!    grammar;
//! 5. **user-check** — caller-supplied policy, surfaced unchanged.
//!
//! ## Quick start
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
//! let config = loaded.config();
//! assert_eq!(config.get("PORT").and_then(|v| v.as_i64()), Some(8080));
//!
//! // Secrets display as the redaction marker and must be revealed
//! // deliberately.
//! let key = config.get("API_KEY").expect("declared");
//! assert_eq!(key.to_string(), "******");
//! assert_eq!(key.reveal().as_str(), Some("dev-key"));
//! ```
//!
//! ## Masking
//!
//! The masking proxy is controlled by a [`MaskPolicy`] built once by the
//! caller and threaded into every wrap decision:
//!
//! - `reveal` — no proxies are created at all; canonical values flow through
//!   unmasked (e.g. local debugging);
//! - `mutable` — derived values stay secrets. With `mutable` off, scalar
//!   secrets become read-only wrappers whose derived values come back plain,
//!   and container secrets degrade to their plain values.
//!
//! Operations on masked values go through the explicit operation families on
//! [`Value`] (arithmetic, ordering, equality, container access); see
//! [`CompareOp`] and the `try_*` methods.
//!
//! ## Error handling
//!
//! Everything fails through [`ConfigError`], which integrates with
//! [`miette`] for rich terminal diagnostics:
//!
//! ```rust,ignore
//! if let Err(e) = loader.load() {
//!     eprintln!("{:?}", miette::Report::from(e));
//! }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `dotenv` | `.env` override ingestion via [`dotenvy`] | **Yes** |
//! | `secrecy` | `SecretString` interop for masked values | No |

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(unused, reason = "False warnings")]

// ============================================================================
// Re-exported Dependencies
// ============================================================================

/// Re-export miette for error handling.
/// Users can use `envcell::miette` instead of adding miette as a dependency.
pub use miette;

/// Re-export secrecy when the feature is enabled.
#[cfg(feature = "secrecy")]
pub use secrecy;

/// Re-export dotenvy when the dotenv feature is enabled.
#[cfg(feature = "dotenv")]
pub use dotenvy;

// ============================================================================
// Core Modules
// ============================================================================

pub mod cell;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod mask;
pub mod password;
pub mod value;

mod email;
mod ops;
mod tld;

pub use cell::{ConfigCell, ConfigMap};
pub use descriptor::{Descriptor, Kind};
pub use error::ConfigError;
pub use loader::{EnvLoader, EnvironmentSpec, LoadedEnvironment};
pub use mask::{Form, MaskPolicy, Masked, REDACTED};
pub use ops::CompareOp;
pub use password::PasswordRules;
pub use value::Value;

/// A Result type defaulting to [`ConfigError`].
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
