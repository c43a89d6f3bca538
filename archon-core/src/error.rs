//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use archon_provider::ProviderError;

use crate::types::PortMappingError;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// Port string rejected
    #[error("{0}")]
    PortMapping(#[from] PortMappingError),

    /// Settings could not be parsed or are out of range
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A mapping was applied to a domain it does not point into
    #[error("Domain mismatch: mapping targets {expected}, got domain {actual}")]
    DomainMismatch { expected: String, actual: String },

    /// Target address is neither IPv4 nor IPv6
    #[error("Invalid target address: {0}")]
    InvalidTarget(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, configuration), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::PortMapping(_)
            | Self::ConfigError(_)
            | Self::DomainMismatch { .. }
            | Self::InvalidTarget(_) => true,
            Self::Provider(e) => e.is_expected(),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
