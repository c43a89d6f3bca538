use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

// ============ Defaults ============

/// Cloudflare v4 API base URL.
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Route53 global API endpoint.
pub const ROUTE53_ENDPOINT: &str = "https://route53.amazonaws.com";

/// Client-side bound on every provider request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// TTL sent when a record is created or updated with `ttl == 0`.
pub const DEFAULT_RECORD_TTL: u32 = 300;

// ============ Provider Types ============

/// Identifies which DNS provider backs a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Records are configured by hand; no API calls.
    Manual,
    /// Cloudflare DNS.
    Cloudflare,
    /// AWS Route53.
    Route53,
}

impl ProviderType {
    /// Human-readable name for status bars and notifications.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Manual => "Manual DNS",
            Self::Cloudflare => "Cloudflare",
            Self::Route53 => "AWS Route53",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Cloudflare => write!(f, "cloudflare"),
            Self::Route53 => write!(f, "route53"),
        }
    }
}

/// Everything needed to build one concrete provider.
///
/// Each remote variant is gated behind its feature flag.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// Manual DNS. `records` is the domain's locally stored record list,
    /// returned as-is by `list_records`.
    Manual {
        /// Locally stored records.
        records: Vec<DnsRecord>,
    },
    /// Cloudflare zone accessed with an API token.
    #[cfg(feature = "cloudflare")]
    Cloudflare {
        /// Bearer token.
        api_token: String,
        /// Zone identifier.
        zone_id: String,
    },
    /// Route53 hosted zone accessed with an IAM key pair.
    #[cfg(feature = "route53")]
    Route53 {
        /// IAM access key id.
        access_key: String,
        /// IAM secret access key.
        secret_key: String,
        /// Hosted zone id, with or without the `/hostedzone/` prefix.
        hosted_zone_id: String,
    },
}

impl ProviderConfig {
    /// Provider type this configuration builds.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Manual { .. } => ProviderType::Manual,
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { .. } => ProviderType::Cloudflare,
            #[cfg(feature = "route53")]
            Self::Route53 { .. } => ProviderType::Route53,
        }
    }
}

/// Transport knobs shared by all remote providers.
///
/// The endpoint overrides exist so tests and proxies can redirect traffic.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Cloudflare API base URL (no trailing slash).
    pub cloudflare_api_base: String,
    /// Route53 endpoint (no trailing slash).
    pub route53_endpoint: String,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            cloudflare_api_base: CLOUDFLARE_API_BASE.to_string(),
            route53_endpoint: ROUTE53_ENDPOINT.to_string(),
        }
    }
}

// ============ DNS Record Types ============

/// DNS record type.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Service locator record.
    Srv,
    /// Name server record.
    Ns,
    /// Certificate Authority Authorization record.
    Caa,
}

impl DnsRecordType {
    /// Wire representation shared by every provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Srv => "SRV",
            Self::Ns => "NS",
            Self::Caa => "CAA",
        }
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnsRecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "SRV" => Ok(Self::Srv),
            "NS" => Ok(Self::Ns),
            "CAA" => Ok(Self::Caa),
            _ => Err(format!("unsupported DNS record type: {s}")),
        }
    }
}

/// A provider-agnostic DNS record.
///
/// `id` is `None` until a provider confirms creation. `ttl == 0` asks the
/// provider to apply its default ([`DEFAULT_RECORD_TTL`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Record name, relative (`www`) or fully qualified (`www.example.com`).
    pub name: String,
    /// Record content (address, target, text, ...).
    pub value: String,
    /// Time to live in seconds.
    #[serde(default)]
    pub ttl: u32,
    /// Edge proxying. Only Cloudflare honours it.
    #[serde(default)]
    pub proxied: bool,
}

impl DnsRecord {
    /// A record that has not been created yet.
    pub fn new(
        record_type: DnsRecordType,
        name: impl Into<String>,
        value: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            id: None,
            record_type,
            name: name.into(),
            value: value.into(),
            ttl,
            proxied: false,
        }
    }

    #[must_use]
    pub fn with_proxy(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The record id, treating an empty string as absent.
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// TTL with the shared default applied.
    pub fn effective_ttl(&self) -> u32 {
        if self.ttl == 0 {
            DEFAULT_RECORD_TTL
        } else {
            self.ttl
        }
    }

    /// Record id required by `update`/`delete`, or [`ProviderError::MissingRecordId`].
    pub(crate) fn require_id(&self, provider: &str, operation: &str) -> crate::Result<&str> {
        self.record_id()
            .ok_or_else(|| ProviderError::MissingRecordId {
                provider: provider.to_string(),
                operation: operation.to_string(),
            })
    }
}
