//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "cloudflare")]
mod cloudflare;
mod manual;
#[cfg(feature = "route53")]
mod route53;

#[cfg(feature = "cloudflare")]
pub use cloudflare::{CloudflareProvider, CloudflareProviderBuilder};
pub use manual::ManualProvider;
#[cfg(feature = "route53")]
pub use route53::{Route53Provider, Route53ProviderBuilder};
