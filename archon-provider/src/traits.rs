use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::DnsRecord;

/// Raw API error (internal use).
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code, format differs per provider.
    pub code: Option<String>,
    /// Original error message.
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Builds [`ProviderError`]s tagged with the implementing provider's name
/// (internal use).
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier.
    fn provider_name(&self) -> &'static str;

    /// The remote API reported failure.
    fn api_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Api {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            message: raw.message,
        }
    }

    /// The response body could not be decoded.
    fn decode_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::Decode {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }
}

/// DNS provider capability.
///
/// Every backend (manual, Cloudflare, Route53) implements exactly these four
/// record operations so callers never branch on the provider type. `domain`
/// is the zone's domain name (`example.com`); providers that address zones
/// by id carry the id themselves.
///
/// Implementations hold no mutable state and make at most the requests
/// needed for one call. Nothing is retried.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider identifier.
    fn id(&self) -> &'static str;

    /// List all DNS records of the zone.
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>>;

    /// Create a record. `record.id` is ignored; the returned record carries
    /// the id assigned by the provider.
    ///
    /// Providers with a per-record annotation map the first tag onto it,
    /// the others ignore `tags`.
    async fn create_record(
        &self,
        domain: &str,
        record: &DnsRecord,
        tags: &[String],
    ) -> Result<DnsRecord>;

    /// Replace the record identified by `record.id`.
    ///
    /// Fails with [`ProviderError::MissingRecordId`] before any I/O when the
    /// id is absent or empty.
    async fn update_record(
        &self,
        domain: &str,
        record: &DnsRecord,
        tags: &[String],
    ) -> Result<DnsRecord>;

    /// Delete a record by id.
    ///
    /// Fails with [`ProviderError::MissingRecordId`] before any I/O when
    /// `record_id` is empty.
    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()>;
}

/// Shared fast-fail for `delete_record`.
pub(crate) fn require_record_id<'a>(provider: &str, record_id: &'a str) -> Result<&'a str> {
    if record_id.is_empty() {
        Err(ProviderError::MissingRecordId {
            provider: provider.to_string(),
            operation: "delete".to_string(),
        })
    } else {
        Ok(record_id)
    }
}
