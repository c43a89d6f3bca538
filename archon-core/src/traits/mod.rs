//! Service-layer abstraction trait definition

mod provider_resolver;

pub use provider_resolver::{ConfiguredProviderResolver, ProviderResolver};
