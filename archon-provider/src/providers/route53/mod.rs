//! AWS Route53 DNS Provider
//!
//! Route53 has no per-record ids: a record set is identified by its name and
//! type. Records handed out by this provider carry the synthetic id
//! `"{fqdn}|{TYPE}"`, and every value of a multi-value set is listed as its
//! own [`DnsRecord`](crate::DnsRecord) sharing that id.

mod http;
mod provider;
mod sign;
mod types;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::traits::ProviderErrorMapper;
use crate::types::{DEFAULT_REQUEST_TIMEOUT, ROUTE53_ENDPOINT};
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use types::{
    Change, ChangeBatch, ChangeInfo, ChangeResourceRecordSetsRequest,
    ChangeResourceRecordSetsResponse, Changes, ErrorResponse, InvalidChangeBatch,
    ListResourceRecordSetsResponse, ResourceRecord, ResourceRecordSet, ResourceRecords,
};

pub(crate) const ROUTE53_API_VERSION: &str = "2013-04-01";
pub(crate) const ROUTE53_REGION: &str = "us-east-1";
pub(crate) const ROUTE53_SERVICE: &str = "route53";
pub(crate) const ROUTE53_XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";
/// `ListResourceRecordSets` page size.
pub(crate) const MAX_ITEMS: u32 = 300;

/// AWS Route53 DNS Provider
///
/// Bound to one hosted zone. The IAM key needs
/// `route53:ListResourceRecordSets` and `route53:ChangeResourceRecordSets`.
pub struct Route53Provider {
    pub(crate) client: Client,
    pub(crate) access_key: String,
    pub(crate) secret_key: String,
    pub(crate) hosted_zone_id: String,
    pub(crate) endpoint: String,
    /// `Host` header value signed into every request.
    pub(crate) host: String,
}

/// Route53 Provider Builder
pub struct Route53ProviderBuilder {
    access_key: String,
    secret_key: String,
    hosted_zone_id: String,
    endpoint: String,
    timeout: Duration,
}

impl Route53ProviderBuilder {
    fn new(access_key: String, secret_key: String, hosted_zone_id: String) -> Self {
        Self {
            access_key,
            secret_key,
            hosted_zone_id,
            endpoint: ROUTE53_ENDPOINT.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the API endpoint (scheme and authority only).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// # Errors
    /// [`ProviderError::InvalidConfig`] when a credential or the hosted zone
    /// id is empty, or the endpoint is not a URL.
    pub fn build(self) -> Result<Route53Provider> {
        let invalid = |detail: String| ProviderError::InvalidConfig {
            provider: "route53".to_string(),
            detail,
        };
        if self.access_key.trim().is_empty() {
            return Err(invalid("access key is required".to_string()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(invalid("secret key is required".to_string()));
        }
        let hosted_zone_id = normalize_hosted_zone_id(&self.hosted_zone_id);
        if hosted_zone_id.is_empty() {
            return Err(invalid("hosted zone id is required".to_string()));
        }

        let endpoint = self.endpoint.trim_end_matches('/').to_string();
        let url = Url::parse(&endpoint)
            .map_err(|e| invalid(format!("invalid endpoint '{endpoint}': {e}")))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(invalid(format!("endpoint '{endpoint}' has no host"))),
        };

        log::debug!(
            "[route53] hosted zone {hosted_zone_id} with key {}",
            mask_secret(&self.access_key)
        );

        Ok(Route53Provider {
            client: create_http_client("route53", self.timeout)?,
            access_key: self.access_key,
            secret_key: self.secret_key,
            hosted_zone_id,
            endpoint,
            host,
        })
    }
}

impl Route53Provider {
    /// # Errors
    /// See [`Route53ProviderBuilder::build`].
    pub fn new(access_key: String, secret_key: String, hosted_zone_id: String) -> Result<Self> {
        Self::builder(access_key, secret_key, hosted_zone_id).build()
    }

    pub fn builder(
        access_key: String,
        secret_key: String,
        hosted_zone_id: String,
    ) -> Route53ProviderBuilder {
        Route53ProviderBuilder::new(access_key, secret_key, hosted_zone_id)
    }

    /// `/2013-04-01/hostedzone/{id}/rrset`
    pub(crate) fn rrset_path(&self) -> String {
        format!(
            "/{ROUTE53_API_VERSION}/hostedzone/{}/rrset",
            self.hosted_zone_id
        )
    }
}

impl ProviderErrorMapper for Route53Provider {
    fn provider_name(&self) -> &'static str {
        "route53"
    }
}

/// `/hostedzone/Z123` and `Z123` are both accepted.
fn normalize_hosted_zone_id(raw: &str) -> String {
    let raw = raw.trim();
    raw.strip_prefix("/hostedzone/")
        .unwrap_or(raw)
        .trim_matches('/')
        .to_string()
}
