//! Manual DNS provider
//!
//! The operator manages records at their DNS host. Nothing here touches the
//! network: listing echoes the locally stored records and every mutation is
//! refused with [`ProviderError::ManualDns`].

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::traits::DnsProvider;
use crate::types::DnsRecord;

/// Manual DNS provider.
#[derive(Debug, Clone, Default)]
pub struct ManualProvider {
    records: Vec<DnsRecord>,
}

impl ManualProvider {
    /// `records` is the domain's locally stored record list.
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self { records }
    }

    fn refuse(domain: &str) -> ProviderError {
        log::warn!("[manual] refusing record change for {domain}: manual DNS");
        ProviderError::ManualDns {
            domain: domain.to_string(),
        }
    }
}

#[async_trait]
impl DnsProvider for ManualProvider {
    fn id(&self) -> &'static str {
        "manual"
    }

    async fn list_records(&self, _domain: &str) -> Result<Vec<DnsRecord>> {
        Ok(self.records.clone())
    }

    async fn create_record(
        &self,
        domain: &str,
        _record: &DnsRecord,
        _tags: &[String],
    ) -> Result<DnsRecord> {
        Err(Self::refuse(domain))
    }

    async fn update_record(
        &self,
        domain: &str,
        record: &DnsRecord,
        _tags: &[String],
    ) -> Result<DnsRecord> {
        record.require_id(self.id(), "update")?;
        Err(Self::refuse(domain))
    }

    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        crate::traits::require_record_id(self.id(), record_id)?;
        Err(Self::refuse(domain))
    }
}
