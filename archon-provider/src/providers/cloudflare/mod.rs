//! Cloudflare DNS Provider

mod http;
mod provider;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::traits::ProviderErrorMapper;
use crate::types::{CLOUDFLARE_API_BASE, DEFAULT_REQUEST_TIMEOUT};
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use types::{CloudflareDnsRecord, CloudflareRecordBody, CloudflareResponse};

/// Cloudflare DNS Records API page size.
pub(crate) const RECORDS_PER_PAGE: u32 = 100;

/// Cloudflare DNS Provider
///
/// Bound to one zone. The token needs `Zone.DNS:Edit` on that zone.
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) zone_id: String,
    pub(crate) api_base: String,
}

/// Cloudflare Provider Builder
pub struct CloudflareProviderBuilder {
    api_token: String,
    zone_id: String,
    api_base: String,
    timeout: Duration,
}

impl CloudflareProviderBuilder {
    fn new(api_token: String, zone_id: String) -> Self {
        Self {
            api_token,
            zone_id,
            api_base: CLOUDFLARE_API_BASE.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the API base URL (no trailing slash).
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// # Errors
    /// [`ProviderError::InvalidConfig`] when the token or zone id is empty.
    pub fn build(self) -> Result<CloudflareProvider> {
        let invalid = |detail: &str| ProviderError::InvalidConfig {
            provider: "cloudflare".to_string(),
            detail: detail.to_string(),
        };
        if self.api_token.trim().is_empty() {
            return Err(invalid("API token is required"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(invalid("zone id is required"));
        }

        log::debug!(
            "[cloudflare] zone {} with token {}",
            self.zone_id,
            mask_secret(&self.api_token)
        );

        Ok(CloudflareProvider {
            client: create_http_client("cloudflare", self.timeout)?,
            api_token: self.api_token,
            zone_id: self.zone_id,
            api_base: self.api_base.trim_end_matches('/').to_string(),
        })
    }
}

impl CloudflareProvider {
    /// # Errors
    /// See [`CloudflareProviderBuilder::build`].
    pub fn new(api_token: String, zone_id: String) -> Result<Self> {
        Self::builder(api_token, zone_id).build()
    }

    pub fn builder(api_token: String, zone_id: String) -> CloudflareProviderBuilder {
        CloudflareProviderBuilder::new(api_token, zone_id)
    }

    /// `/zones/{zone_id}/dns_records`
    pub(crate) fn records_path(&self) -> String {
        format!("/zones/{}/dns_records", self.zone_id)
    }

    /// `/zones/{zone_id}/dns_records/{record_id}`
    pub(crate) fn record_path(&self, record_id: &str) -> String {
        format!("{}/{record_id}", self.records_path())
    }
}

impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
