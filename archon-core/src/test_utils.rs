//! Test helper module
//!
//! Provides mock implementations and convenient test factory methods.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use archon_provider::{DnsProvider, DnsRecord, ProviderError, Result};

use crate::config::Settings;
use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::ProviderResolver;
use crate::types::{DnsProviderSettings, Domain};

// ===== MockDnsProvider =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    List,
    Create { record: DnsRecord, tags: Vec<String> },
    Update { record: DnsRecord, tags: Vec<String> },
    Delete { record_id: String },
}

/// In-memory provider recording every call that reaches it.
pub struct MockDnsProvider {
    records: RwLock<Vec<DnsRecord>>,
    calls: RwLock<Vec<MockCall>>,
    /// If Some, the next call returns this error instead of running
    fail_next: RwLock<Option<ProviderError>>,
    next_id: AtomicUsize,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            fail_next: RwLock::new(None),
            next_id: AtomicUsize::new(1),
        }
    }

    pub async fn seed(&self, records: Vec<DnsRecord>) {
        *self.records.write().await = records;
    }

    pub async fn fail_next(&self, err: ProviderError) {
        *self.fail_next.write().await = Some(err);
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| !matches!(c, MockCall::List))
            .count()
    }

    async fn record_call(&self, call: MockCall) -> Result<()> {
        self.calls.write().await.push(call);
        match self.fail_next.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn require_id<'a>(record_id: Option<&'a str>, operation: &str) -> Result<&'a str> {
        record_id.ok_or_else(|| ProviderError::MissingRecordId {
            provider: "mock".to_string(),
            operation: operation.to_string(),
        })
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn list_records(&self, _domain: &str) -> Result<Vec<DnsRecord>> {
        self.record_call(MockCall::List).await?;
        Ok(self.records.read().await.clone())
    }

    async fn create_record(
        &self,
        _domain: &str,
        record: &DnsRecord,
        tags: &[String],
    ) -> Result<DnsRecord> {
        self.record_call(MockCall::Create {
            record: record.clone(),
            tags: tags.to_vec(),
        })
        .await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = record.clone().with_id(format!("mock-{id}"));
        self.records.write().await.push(created.clone());
        Ok(created)
    }

    async fn update_record(
        &self,
        _domain: &str,
        record: &DnsRecord,
        tags: &[String],
    ) -> Result<DnsRecord> {
        let id = Self::require_id(record.record_id(), "update")?;
        self.record_call(MockCall::Update {
            record: record.clone(),
            tags: tags.to_vec(),
        })
        .await?;
        let mut records = self.records.write().await;
        let Some(slot) = records.iter_mut().find(|r| r.record_id() == Some(id)) else {
            return Err(ProviderError::Api {
                provider: "mock".to_string(),
                raw_code: Some("NotFound".to_string()),
                message: format!("no record {id}"),
            });
        };
        *slot = record.clone();
        Ok(record.clone())
    }

    async fn delete_record(&self, _domain: &str, record_id: &str) -> Result<()> {
        let id = Self::require_id(Some(record_id).filter(|id| !id.is_empty()), "delete")?;
        self.record_call(MockCall::Delete {
            record_id: id.to_string(),
        })
        .await?;
        self.records
            .write()
            .await
            .retain(|r| r.record_id() != Some(id));
        Ok(())
    }
}

// ===== MockProviderResolver =====

/// Resolves every domain to the same mock provider and counts resolutions.
pub struct MockProviderResolver {
    provider: Arc<MockDnsProvider>,
    resolves: AtomicUsize,
}

impl MockProviderResolver {
    pub fn new(provider: Arc<MockDnsProvider>) -> Self {
        Self {
            provider,
            resolves: AtomicUsize::new(0),
        }
    }

    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderResolver for MockProviderResolver {
    async fn resolve(&self, _domain: &Domain) -> CoreResult<Arc<dyn DnsProvider>> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        let provider: Arc<dyn DnsProvider> = self.provider.clone();
        Ok(provider)
    }

    async fn invalidate(&self, _domain_id: Uuid) {}
}

// ===== Factories =====

/// A Cloudflare-backed `example.com` domain.
pub fn remote_domain() -> Domain {
    Domain::new("example.com").with_provider(DnsProviderSettings::Cloudflare {
        api_token: "token".to_string(),
        zone_id: "zone".to_string(),
    })
}

/// Create a test `ServiceContext` backed by a fresh mock provider.
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockDnsProvider>,
    Arc<MockProviderResolver>,
) {
    let provider = Arc::new(MockDnsProvider::new());
    let resolver = Arc::new(MockProviderResolver::new(provider.clone()));
    let ctx = Arc::new(ServiceContext::new(resolver.clone(), Settings::default()));
    (ctx, provider, resolver)
}
