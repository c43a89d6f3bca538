use serde::{Deserialize, Serialize};

/// Unified error type for all DNS provider operations.
///
/// Each variant carries the `provider` that produced it so a caller juggling
/// several domains can tell which backend failed. All variants are
/// serializable for structured error reporting.
///
/// Nothing here is retried internally. A caller that wants a retry policy
/// should key it off [`Transport`](Self::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// `update_record` / `delete_record` was called without a record id.
    ///
    /// Raised before any request is built.
    MissingRecordId {
        /// Provider that produced the error.
        provider: String,
        /// Operation that required the id (`"update"` or `"delete"`).
        operation: String,
    },

    /// The request never produced a readable response (connect failure,
    /// timeout, truncated body).
    Transport {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The response body could not be decoded.
    Decode {
        /// Provider that produced the error.
        provider: String,
        /// Details about the decode failure.
        detail: String,
    },

    /// The remote API answered but reported failure.
    Api {
        /// Provider that produced the error.
        provider: String,
        /// First error code reported by the API, if any.
        raw_code: Option<String>,
        /// First error message reported by the API.
        message: String,
    },

    /// The domain uses manual DNS; records must be configured by hand.
    ManualDns {
        /// Domain the operation targeted.
        domain: String,
    },

    /// The provider configuration is incomplete (missing token, zone id, ...).
    InvalidConfig {
        /// Provider that produced the error.
        provider: String,
        /// What is missing or wrong.
        detail: String,
    },
}

impl ProviderError {
    /// Whether this is expected behaviour (user input, configuration), used
    /// to pick the log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::MissingRecordId { .. }
                | Self::ManualDns { .. }
                | Self::InvalidConfig { .. }
                | Self::Api { .. }
        )
    }

    /// Provider identifier attached to this error.
    pub fn provider(&self) -> &str {
        match self {
            Self::MissingRecordId { provider, .. }
            | Self::Transport { provider, .. }
            | Self::Decode { provider, .. }
            | Self::Api { provider, .. }
            | Self::InvalidConfig { provider, .. } => provider,
            Self::ManualDns { .. } => "manual",
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRecordId {
                provider,
                operation,
            } => {
                write!(f, "[{provider}] Record id is required for {operation}")
            }
            Self::Transport { provider, detail } => {
                write!(f, "[{provider}] Transport error: {detail}")
            }
            Self::Decode { provider, detail } => {
                write!(f, "[{provider}] Decode error: {detail}")
            }
            Self::Api {
                provider,
                raw_code,
                message,
            } => {
                if let Some(code) = raw_code {
                    write!(f, "[{provider}] API error {code}: {message}")
                } else {
                    write!(f, "[{provider}] API error: {message}")
                }
            }
            Self::ManualDns { domain } => {
                write!(
                    f,
                    "Domain '{domain}' uses manual DNS; configure records with your DNS host"
                )
            }
            Self::InvalidConfig { provider, detail } => {
                write!(f, "[{provider}] Invalid configuration: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
