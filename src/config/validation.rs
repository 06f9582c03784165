//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that the sites layout rules are usable as path components
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AdminServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AdminServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AdminServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.sites.root.as_os_str().is_empty() {
        errors.push(ValidationError::new("sites.root", "must not be empty"));
    }

    let suffix = &config.sites.suffix;
    if !suffix.starts_with('.') || suffix.len() < 2 || suffix.contains('/') {
        errors.push(ValidationError::new(
            "sites.suffix",
            format!("'{}' must look like '.conf'", suffix),
        ));
    }

    let subdir = &config.sites.subdirectory;
    if subdir.is_empty()
        || subdir == "."
        || subdir.contains("..")
        || subdir.contains('/')
        || subdir.contains('\\')
    {
        errors.push(ValidationError::new(
            "sites.subdirectory",
            format!("'{}' must be a single plain directory name", subdir),
        ));
    }

    if config.reload.program.trim().is_empty() {
        errors.push(ValidationError::new("reload.program", "must not be empty"));
    }

    if config.reload.timeout_secs == 0 {
        errors.push(ValidationError::new("reload.timeout_secs", "must be greater than 0"));
    }

    if config.timeouts.request_secs <= config.reload.timeout_secs {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must exceed reload.timeout_secs ({}) so a reload is never cut short",
                config.reload.timeout_secs
            ),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}', expected 'pretty' or 'json'", other),
        )),
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if let Some(key) = &config.admin.api_key {
        if key.trim().is_empty() {
            errors.push(ValidationError::new("admin.api_key", "must not be blank when set"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AdminServiceConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AdminServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.sites.suffix = "conf".into();
        config.sites.subdirectory = "../etc".into();
        config.reload.program = " ".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "sites.suffix",
                "sites.subdirectory",
                "reload.program",
            ]
        );
    }

    #[test]
    fn test_request_timeout_must_exceed_reload_timeout() {
        let mut config = AdminServiceConfig::default();
        config.reload.timeout_secs = 30;
        config.timeouts.request_secs = 30;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "timeouts.request_secs");
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = AdminServiceConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let mut config = AdminServiceConfig::default();
        config.admin.api_key = Some("".into());
        assert!(validate_config(&config).is_err());
    }
}
