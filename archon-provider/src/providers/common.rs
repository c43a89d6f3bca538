//! Helpers shared by the provider implementations.

#[cfg(any(feature = "cloudflare", feature = "route53"))]
use std::time::Duration;

#[cfg(any(feature = "cloudflare", feature = "route53"))]
use reqwest::Client;

#[cfg(any(feature = "cloudflare", feature = "route53"))]
use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// Connect timeout, bounded by the overall request timeout.
#[cfg(any(feature = "cloudflare", feature = "route53"))]
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create an HTTP client whose requests give up after `timeout`.
#[cfg(any(feature = "cloudflare", feature = "route53"))]
pub fn create_http_client(provider: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::InvalidConfig {
            provider: provider.to_string(),
            detail: format!("failed to create HTTP client: {e}"),
        })
}

// ============ HMAC-SHA256 ============

/// HMAC-SHA256 (used by Route53 request signing).
#[cfg(feature = "route53")]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    use hmac::{Hmac, Mac};

    // `new_from_slice` only fails for fixed-size keys; HMAC accepts any length.
    let Ok(mut mac) = Hmac::<sha2::Sha256>::new_from_slice(key) else {
        return Vec::new();
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

// ============ Domain name handling ============

/// Strip a trailing root dot.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// Expand a relative name against its zone.
///
/// `"www"` + `"example.com"` → `"www.example.com"`; `"@"` or `""` → the zone;
/// names already inside the zone are returned normalized.
pub fn relative_to_full_name(name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);
    let name = normalize_domain_name(name);

    if name == "@" || name.is_empty() || name == zone {
        zone
    } else if name.ends_with(&format!(".{zone}")) {
        name
    } else {
        format!("{name}.{zone}")
    }
}
