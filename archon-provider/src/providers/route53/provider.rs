//! Route53 `DnsProvider` trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, relative_to_full_name};
use crate::traits::{DnsProvider, ProviderErrorMapper, RawApiError, require_record_id};
use crate::types::{DnsRecord, DnsRecordType};

use super::{Change, ResourceRecord, ResourceRecordSet, ResourceRecords, Route53Provider};

/// Route53 escapes `*` in names as `\052`.
fn decode_name(name: &str) -> String {
    normalize_domain_name(name).replace("\\052", "*")
}

/// Case- and trailing-dot-insensitive name comparison.
pub(super) fn same_name(a: &str, b: &str) -> bool {
    decode_name(a).eq_ignore_ascii_case(&decode_name(b))
}

fn record_set_id(fqdn: &str, record_type: DnsRecordType) -> String {
    format!("{fqdn}|{record_type}")
}

/// TXT values travel quoted.
fn encode_value(record_type: DnsRecordType, value: &str) -> String {
    if record_type == DnsRecordType::Txt && !value.starts_with('"') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

fn decode_value(record_type: DnsRecordType, value: &str) -> String {
    if record_type == DnsRecordType::Txt {
        value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value)
            .to_string()
    } else {
        value.to_string()
    }
}

impl Route53Provider {
    /// Split a `"{fqdn}|{TYPE}"` id.
    fn parse_record_id<'a>(&self, record_id: &'a str) -> Result<(&'a str, &'a str)> {
        record_id
            .split_once('|')
            .filter(|(name, record_type)| !name.is_empty() && !record_type.is_empty())
            .ok_or_else(|| ProviderError::InvalidConfig {
                provider: self.provider_name().to_string(),
                detail: format!("malformed record id '{record_id}', expected '<name>|<TYPE>'"),
            })
    }

    /// One `DnsRecord` per value of a plain record set. Alias sets and
    /// unsupported types yield nothing.
    fn flatten(set: &ResourceRecordSet) -> Vec<DnsRecord> {
        let Ok(record_type) = set.record_type.parse::<DnsRecordType>() else {
            log::debug!("[route53] skipping {} set {}", set.record_type, set.name);
            return Vec::new();
        };
        let name = decode_name(&set.name);
        let id = record_set_id(&name, record_type);

        set.values()
            .map(|value| DnsRecord {
                id: Some(id.clone()),
                record_type,
                name: name.clone(),
                value: decode_value(record_type, value),
                ttl: set.ttl.unwrap_or_default(),
                proxied: false,
            })
            .collect()
    }

    fn record_set(fqdn: &str, record: &DnsRecord) -> ResourceRecordSet {
        ResourceRecordSet {
            name: fqdn.to_string(),
            record_type: record.record_type.as_str().to_string(),
            ttl: Some(record.effective_ttl()),
            resource_records: Some(ResourceRecords {
                items: vec![ResourceRecord {
                    value: encode_value(record.record_type, &record.value),
                }],
            }),
        }
    }

    /// The record as stored after a successful write.
    fn confirmed(fqdn: String, record: &DnsRecord) -> DnsRecord {
        DnsRecord {
            id: Some(record_set_id(&fqdn, record.record_type)),
            record_type: record.record_type,
            name: fqdn,
            value: record.value.clone(),
            ttl: record.effective_ttl(),
            proxied: false,
        }
    }

    fn log_ignored_tags(tags: &[String]) {
        if !tags.is_empty() {
            log::debug!("[route53] ignoring {} tag(s)", tags.len());
        }
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    fn id(&self) -> &'static str {
        "route53"
    }

    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut start: Option<(String, String)> = None;

        loop {
            let page = self
                .list_record_sets_page(
                    start.as_ref().map(|(name, t)| (name.as_str(), t.as_str())),
                    None,
                )
                .await?;

            for set in &page.resource_record_sets.items {
                records.extend(Self::flatten(set));
            }

            match (page.is_truncated, page.next_record_name, page.next_record_type) {
                (true, Some(name), Some(record_type)) => start = Some((name, record_type)),
                _ => break,
            }
        }

        log::debug!("[route53] listed {} records for {domain}", records.len());
        Ok(records)
    }

    /// Submits a `CREATE` change. Fails if the record set already exists.
    async fn create_record(
        &self,
        domain: &str,
        record: &DnsRecord,
        tags: &[String],
    ) -> Result<DnsRecord> {
        Self::log_ignored_tags(tags);
        let fqdn = relative_to_full_name(&record.name, domain);

        self.change_record_sets(vec![Change {
            action: "CREATE",
            resource_record_set: Self::record_set(&fqdn, record),
        }])
        .await?;

        log::info!("[route53] created {} {fqdn}", record.record_type);
        Ok(Self::confirmed(fqdn, record))
    }

    /// Submits an `UPSERT`, which replaces every value of the set. When the
    /// record moved to a new name or type the old set is deleted in the same
    /// batch.
    async fn update_record(
        &self,
        domain: &str,
        record: &DnsRecord,
        tags: &[String],
    ) -> Result<DnsRecord> {
        let record_id = record.require_id(self.id(), "update")?;
        let (old_name, old_type) = self.parse_record_id(record_id)?;
        Self::log_ignored_tags(tags);

        let fqdn = relative_to_full_name(&record.name, domain);
        let mut changes = Vec::with_capacity(2);

        if !same_name(old_name, &fqdn) || old_type != record.record_type.as_str() {
            if let Some(old_set) = self.find_record_set(old_name, old_type).await? {
                changes.push(Change {
                    action: "DELETE",
                    resource_record_set: old_set,
                });
            }
        }
        changes.push(Change {
            action: "UPSERT",
            resource_record_set: Self::record_set(&fqdn, record),
        });

        self.change_record_sets(changes).await?;

        log::info!("[route53] updated {record_id} to {} {fqdn}", record.record_type);
        Ok(Self::confirmed(fqdn, record))
    }

    /// Deletes the whole record set named by the id.
    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        let record_id = require_record_id(self.id(), record_id)?;
        let (name, record_type) = self.parse_record_id(record_id)?;

        let Some(set) = self.find_record_set(name, record_type).await? else {
            return Err(self.api_error(RawApiError::with_code(
                "NotFound",
                format!("record set {name} {record_type} does not exist in {domain}"),
            )));
        };

        self.change_record_sets(vec![Change {
            action: "DELETE",
            resource_record_set: set,
        }])
        .await?;

        log::info!("[route53] deleted {record_id}");
        Ok(())
    }
}
