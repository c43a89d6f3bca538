//! # archon-provider
//!
//! DNS provider abstraction for archon domains. One [`DnsProvider`] trait
//! covers record listing and mutation so callers never branch on the backend.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | Manual DNS | *(always)* | none, no API calls |
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | Bearer Token |
//! | [AWS Route53](https://aws.amazon.com/route53/) | `route53` | AWS Signature V4 |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: enable Cloudflare and Route53.
//! - **`cloudflare`** / **`route53`**: enable a single remote provider.
//! - **`rustls`** *(default)* / **`native-tls`**: TLS backend for reqwest.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use archon_provider::{
//!     create_provider, DnsProvider, DnsRecord, DnsRecordType, ProviderConfig, ProviderOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(
//!         ProviderConfig::Cloudflare {
//!             api_token: "your-token".to_string(),
//!             zone_id: "your-zone-id".to_string(),
//!         },
//!         &ProviderOptions::default(),
//!     )?;
//!
//!     let record = DnsRecord::new(DnsRecordType::A, "www", "203.0.113.7", 0);
//!     let created = provider
//!         .create_record("example.com", &record, &["archon".to_string()])
//!         .await?;
//!     println!("created {:?}", created.id);
//!
//!     for record in provider.list_records("example.com").await? {
//!         println!("{} {} -> {}", record.name, record.record_type, record.value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::MissingRecordId`]: update/delete without an id, raised
//!   before any request is sent
//! - [`ProviderError::Transport`]: connect failure or timeout
//! - [`ProviderError::Decode`]: unparseable response body
//! - [`ProviderError::Api`]: the remote API reported failure
//! - [`ProviderError::ManualDns`]: mutation attempted on a manual domain
//!
//! Nothing is retried; retry policy belongs to the caller.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
pub mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::create_provider;

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

// Re-export types
pub use types::{
    CLOUDFLARE_API_BASE, DEFAULT_RECORD_TTL, DEFAULT_REQUEST_TIMEOUT, DnsRecord, DnsRecordType,
    ProviderConfig, ProviderOptions, ProviderType, ROUTE53_ENDPOINT,
};

// Shared name helpers
pub use providers::common::{normalize_domain_name, relative_to_full_name};

// Re-export concrete providers (behind feature flags)
pub use providers::ManualProvider;

#[cfg(feature = "cloudflare")]
pub use providers::{CloudflareProvider, CloudflareProviderBuilder};

#[cfg(feature = "route53")]
pub use providers::{Route53Provider, Route53ProviderBuilder};
