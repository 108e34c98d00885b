//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check bind addresses parse and do not collide
//! - Check the static index file and MIME table are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::ProxyConfig;
use crate::observability::logging::filter_for;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate `config`, collecting every error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let proxy_addr = parse_addr(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );

    let statics = &config.static_files;
    if statics.enabled {
        let static_addr = parse_addr("static_files.bind_address", &statics.bind_address, &mut errors);
        if let (Some(a), Some(b)) = (proxy_addr, static_addr) {
            if a == b && a.port() != 0 {
                errors.push(ValidationError::new(
                    "static_files.bind_address",
                    format!("collides with listener.bind_address ({})", a),
                ));
            }
        }

        if statics.index_file.is_empty()
            || statics.index_file.contains('/')
            || statics.index_file.contains('\\')
            || statics.index_file == ".."
        {
            errors.push(ValidationError::new(
                "static_files.index_file",
                "must be a plain file name",
            ));
        }

        for (ext, content_type) in &statics.mime_types {
            if ext.is_empty() || ext.starts_with('.') {
                errors.push(ValidationError::new(
                    "static_files.mime_types",
                    format!("extension {:?} must be non-empty and without a leading dot", ext),
                ));
            }
            if HeaderValue::from_str(content_type).is_err() {
                errors.push(ValidationError::new(
                    "static_files.mime_types",
                    format!("{:?} is not a valid header value", content_type),
                ));
            }
        }
    }

    let obs = &config.observability;
    if let Err(e) = filter_for(&obs.log_level) {
        errors.push(ValidationError::new("observability.log_level", e.to_string()));
    }
    if obs.metrics_enabled {
        parse_addr("observability.metrics_address", &obs.metrics_address, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_addr(field: &str, value: &str, errors: &mut Vec<ValidationError>) -> Option<SocketAddr> {
    match value.parse::<SocketAddr>() {
        Ok(addr) => Some(addr),
        Err(e) => {
            errors.push(ValidationError::new(field, format!("{:?}: {}", value, e)));
            None
        }
    }
}
