//! Provider resolver abstract Trait

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use archon_provider::{DnsProvider, ProviderConfig, ProviderOptions, create_provider};

use crate::config::Settings;
use crate::error::CoreResult;
use crate::types::{DnsProviderSettings, Domain};

/// Provider Resolver Trait
///
/// Turns a [`Domain`] into the provider that manages its records.
#[async_trait]
pub trait ProviderResolver: Send + Sync {
    /// Get the Provider instance for `domain`
    async fn resolve(&self, domain: &Domain) -> CoreResult<Arc<dyn DnsProvider>>;

    /// Forget any cached instance for the domain
    async fn invalidate(&self, domain_id: Uuid);
}

/// Resolver building providers from domain settings plus global [`Settings`].
///
/// Credentials set on the domain win; empty ones fall back to the global
/// Cloudflare token or Route53 key pair. Remote providers are cached per
/// domain and rebuilt when the effective settings change. Manual providers
/// are never cached since they echo the domain's current records.
#[derive(Clone)]
pub struct ConfiguredProviderResolver {
    settings: Settings,
    options: ProviderOptions,
    providers: Arc<RwLock<HashMap<Uuid, (DnsProviderSettings, Arc<dyn DnsProvider>)>>>,
}

impl ConfiguredProviderResolver {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let options = settings.provider_options();
        Self {
            settings,
            options,
            providers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Override transport options (endpoints, timeout).
    #[must_use]
    pub fn with_options(mut self, options: ProviderOptions) -> Self {
        self.options = options;
        self
    }

    /// Domain settings with empty credentials filled from global settings.
    pub fn effective_settings(&self, domain: &Domain) -> DnsProviderSettings {
        fn or_global(value: &str, global: Option<&String>) -> String {
            if value.is_empty() {
                global.cloned().unwrap_or_default()
            } else {
                value.to_string()
            }
        }

        match &domain.dns_provider {
            DnsProviderSettings::Manual => DnsProviderSettings::Manual,
            DnsProviderSettings::Cloudflare { api_token, zone_id } => {
                DnsProviderSettings::Cloudflare {
                    api_token: or_global(api_token, self.settings.cloudflare_api_token.as_ref()),
                    zone_id: zone_id.clone(),
                }
            }
            DnsProviderSettings::Route53 {
                access_key,
                secret_key,
                hosted_zone_id,
            } => DnsProviderSettings::Route53 {
                access_key: or_global(access_key, self.settings.route53_access_key.as_ref()),
                secret_key: or_global(secret_key, self.settings.route53_secret_key.as_ref()),
                hosted_zone_id: hosted_zone_id.clone(),
            },
        }
    }
}

fn provider_config(settings: &DnsProviderSettings, domain: &Domain) -> ProviderConfig {
    match settings.clone() {
        DnsProviderSettings::Manual => ProviderConfig::Manual {
            records: domain.dns_records.clone(),
        },
        DnsProviderSettings::Cloudflare { api_token, zone_id } => {
            ProviderConfig::Cloudflare { api_token, zone_id }
        }
        DnsProviderSettings::Route53 {
            access_key,
            secret_key,
            hosted_zone_id,
        } => ProviderConfig::Route53 {
            access_key,
            secret_key,
            hosted_zone_id,
        },
    }
}

#[async_trait]
impl ProviderResolver for ConfiguredProviderResolver {
    async fn resolve(&self, domain: &Domain) -> CoreResult<Arc<dyn DnsProvider>> {
        let effective = self.effective_settings(domain);
        if effective.is_manual() {
            return Ok(create_provider(
                provider_config(&effective, domain),
                &self.options,
            )?);
        }

        if let Some((cached_settings, provider)) = self.providers.read().await.get(&domain.id) {
            if *cached_settings == effective {
                return Ok(provider.clone());
            }
        }

        let provider = create_provider(provider_config(&effective, domain), &self.options)?;
        log::debug!(
            "domain {}: built {} provider",
            domain.name,
            effective.provider_type()
        );
        self.providers
            .write()
            .await
            .insert(domain.id, (effective, provider.clone()));
        Ok(provider)
    }

    async fn invalidate(&self, domain_id: Uuid) {
        self.providers.write().await.remove(&domain_id);
    }
}
