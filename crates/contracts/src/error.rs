//! Layered error definitions
//!
//! Categorized by source: config / filter / broker

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum RelayError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Filter Errors =====
    /// Filter pattern failed to compile
    #[error("invalid filter pattern '{pattern}': {message}")]
    FilterPattern { pattern: String, message: String },

    // ===== Broker Errors =====
    /// Broker connection error
    #[error("broker connection error ({addr}): {message}")]
    BrokerConnection { addr: String, message: String },

    /// Broker rejected or failed a publish
    #[error("publish to topic '{topic}' failed: {message}")]
    BrokerPublish { topic: String, message: String },

    /// Unexpected data on the broker connection
    #[error("broker protocol error: {message}")]
    BrokerProtocol { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create filter pattern error
    pub fn filter_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FilterPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create broker connection error
    pub fn broker_connection(addr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BrokerConnection {
            addr: addr.into(),
            message: message.into(),
        }
    }

    /// Create broker publish error
    pub fn broker_publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BrokerPublish {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Create broker protocol error
    pub fn broker_protocol(message: impl Into<String>) -> Self {
        Self::BrokerProtocol {
            message: message.into(),
        }
    }
}
