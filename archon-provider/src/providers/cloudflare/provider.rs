//! Cloudflare `DnsProvider` trait implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{DnsProvider, ProviderErrorMapper, require_record_id};
use crate::types::{DnsRecord, DnsRecordType};

use super::{CloudflareDnsRecord, CloudflareProvider, CloudflareRecordBody};

impl CloudflareProvider {
    /// Convert a Cloudflare record. Unknown types yield `None`.
    fn convert_record(cf_record: CloudflareDnsRecord) -> Option<DnsRecord> {
        let record_type = cf_record.record_type.parse::<DnsRecordType>().ok()?;
        Some(DnsRecord {
            id: Some(cf_record.id),
            record_type,
            name: cf_record.name,
            value: cf_record.content,
            ttl: cf_record.ttl,
            proxied: cf_record.proxied,
        })
    }

    /// Convert a record echoed back from a write. The type was ours, so an
    /// unknown one means the response is malformed.
    fn convert_written(&self, cf_record: CloudflareDnsRecord) -> Result<DnsRecord> {
        let record_type = cf_record.record_type.clone();
        Self::convert_record(cf_record)
            .ok_or_else(|| self.decode_error(format!("unexpected record type '{record_type}'")))
    }

    fn request_body<'a>(
        record: &'a DnsRecord,
        id: Option<&'a str>,
        tags: &'a [String],
    ) -> CloudflareRecordBody<'a> {
        CloudflareRecordBody {
            id,
            record_type: record.record_type.as_str(),
            name: &record.name,
            content: &record.value,
            ttl: record.effective_ttl(),
            proxied: record.proxied,
            comment: tags.first().map(String::as_str),
        }
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let (cf_records, has_more) = self.get_records_page(page).await?;
            for cf_record in cf_records {
                let (id, record_type) = (cf_record.id.clone(), cf_record.record_type.clone());
                match Self::convert_record(cf_record) {
                    Some(record) => records.push(record),
                    None => {
                        log::warn!("[cloudflare] skipping record {id} with unsupported type {record_type}");
                    }
                }
            }
            if !has_more {
                break;
            }
            page += 1;
        }

        log::debug!("[cloudflare] listed {} records for {domain}", records.len());
        Ok(records)
    }

    async fn create_record(
        &self,
        domain: &str,
        record: &DnsRecord,
        tags: &[String],
    ) -> Result<DnsRecord> {
        let body = Self::request_body(record, None, tags);
        let created = self.post_record(&body).await?;
        log::info!(
            "[cloudflare] created {} {} for {domain} (id {})",
            record.record_type,
            record.name,
            created.id
        );
        self.convert_written(created)
    }

    async fn update_record(
        &self,
        domain: &str,
        record: &DnsRecord,
        tags: &[String],
    ) -> Result<DnsRecord> {
        let record_id = record.require_id(self.id(), "update")?;
        let body = Self::request_body(record, Some(record_id), tags);
        let updated = self.put_record(record_id, &body).await?;
        log::info!("[cloudflare] updated record {record_id} for {domain}");
        self.convert_written(updated)
    }

    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        let record_id = require_record_id(self.id(), record_id)?;
        self.delete_record_by_id(record_id).await?;
        log::info!("[cloudflare] deleted record {record_id} for {domain}");
        Ok(())
    }
}
