//! Archon Core Library
//!
//! Site and domain model for a self-hosted deployment manager:
//! - Site domain mappings with the legacy single domain/port fallback
//! - Port mapping notation (`"3000"`, `"3000:3001"`)
//! - Domains with their DNS provider selection (manual, Cloudflare, Route53)
//! - DNS record sync and per-site reconciliation (DNS Service)
//!
//! Providers come from `archon-provider`; this crate only decides which one
//! a domain uses and keeps the domain's record list in step with it.

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::Settings;
pub use error::{CoreError, CoreResult};
pub use services::{DnsService, ReconcileReport, ServiceContext};
pub use traits::{ConfiguredProviderResolver, ProviderResolver};
