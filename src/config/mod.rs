//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → AdminServiceConfig (validated, immutable)
//!     → handed to HttpServer, which builds the store and reload command
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, AdminServiceConfig, ListenerConfig, ObservabilityConfig, ReloadConfig,
    SecurityConfig, SitesConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
