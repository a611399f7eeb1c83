//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → env.rs (PORT, UPSTREAM_URL, ... overrides)
//!     → command-line flags (binary only)
//!     → validation.rs (semantic checks, all errors at once)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config_file, ConfigError};
pub use schema::{
    ApiConfig, HealthConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    RewriteConfig, StaticFilesConfig, TimeoutConfig, TlsConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
