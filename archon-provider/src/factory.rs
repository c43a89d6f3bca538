//! Provider factory.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::ManualProvider;
use crate::traits::DnsProvider;
use crate::types::{ProviderConfig, ProviderOptions};

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareProvider;
#[cfg(feature = "route53")]
use crate::providers::Route53Provider;

/// Creates a [`DnsProvider`] from its configuration.
///
/// The concrete provider type is determined by the [`ProviderConfig`] variant.
/// The returned provider is wrapped in `Arc<dyn DnsProvider>` for easy sharing
/// across async tasks.
///
/// # Errors
/// [`ProviderError::InvalidConfig`](crate::ProviderError::InvalidConfig) when a
/// required credential is empty or the HTTP client cannot be built.
///
/// # Examples
///
/// ```rust,no_run
/// use archon_provider::{create_provider, ProviderConfig, ProviderOptions};
///
/// let provider = create_provider(
///     ProviderConfig::Cloudflare {
///         api_token: "your-token".to_string(),
///         zone_id: "your-zone".to_string(),
///     },
///     &ProviderOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(provider.id(), "cloudflare");
/// ```
#[cfg_attr(
    not(any(feature = "cloudflare", feature = "route53")),
    allow(unused_variables)
)]
pub fn create_provider(
    config: ProviderConfig,
    options: &ProviderOptions,
) -> Result<Arc<dyn DnsProvider>> {
    log::debug!("creating {} provider", config.provider_type());

    match config {
        ProviderConfig::Manual { records } => Ok(Arc::new(ManualProvider::new(records))),
        #[cfg(feature = "cloudflare")]
        ProviderConfig::Cloudflare { api_token, zone_id } => Ok(Arc::new(
            CloudflareProvider::builder(api_token, zone_id)
                .api_base(options.cloudflare_api_base.clone())
                .timeout(options.timeout)
                .build()?,
        )),
        #[cfg(feature = "route53")]
        ProviderConfig::Route53 {
            access_key,
            secret_key,
            hosted_zone_id,
        } => Ok(Arc::new(
            Route53Provider::builder(access_key, secret_key, hosted_zone_id)
                .endpoint(options.route53_endpoint.clone())
                .timeout(options.timeout)
                .build()?,
        )),
    }
}
