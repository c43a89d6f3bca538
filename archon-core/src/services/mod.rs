//! Business logic service layer

mod dns_service;

pub use dns_service::{DnsService, ReconcileReport, site_tag};

use std::sync::Arc;

use archon_provider::{DnsProvider, ProviderError};

use crate::config::Settings;
use crate::error::{CoreError, CoreResult};
use crate::traits::{ConfiguredProviderResolver, ProviderResolver};
use crate::types::Domain;

/// Service context - holds all dependencies
///
/// The client creates this once and shares it between services.
pub struct ServiceContext {
    /// Provider resolver
    pub provider_resolver: Arc<dyn ProviderResolver>,
    /// Application settings
    pub settings: Settings,
}

impl ServiceContext {
    /// Create a service context
    #[must_use]
    pub fn new(provider_resolver: Arc<dyn ProviderResolver>, settings: Settings) -> Self {
        Self {
            provider_resolver,
            settings,
        }
    }

    /// Context resolving providers from `settings` alone
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        let resolver = ConfiguredProviderResolver::new(settings.clone());
        Self::new(Arc::new(resolver), settings)
    }

    /// Get the Provider instance for a domain
    pub async fn get_provider(&self, domain: &Domain) -> CoreResult<Arc<dyn DnsProvider>> {
        self.provider_resolver.resolve(domain).await
    }

    /// Log a provider error at the level its classification asks for
    pub fn handle_provider_error(&self, domain: &Domain, err: ProviderError) -> CoreError {
        if err.is_expected() {
            log::warn!("DNS operation on {} failed: {err}", domain.name);
        } else {
            log::error!("DNS operation on {} failed: {err}", domain.name);
        }
        CoreError::Provider(err)
    }
}
