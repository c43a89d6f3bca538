//! DNS record management service

use std::net::IpAddr;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use archon_provider::{DnsRecord, DnsRecordType, ProviderError, relative_to_full_name};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{Domain, Site};

/// Tag attached to every record created for a site.
pub fn site_tag(site_id: Uuid) -> String {
    format!("archon:site:{site_id}")
}

/// Outcome of [`DnsService::reconcile_site`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Records that did not exist and were created.
    pub created: Vec<DnsRecord>,
    /// Records whose value differed and were rewritten.
    pub updated: Vec<DnsRecord>,
    /// Records already pointing at the target.
    pub unchanged: Vec<DnsRecord>,
}

impl ReconcileReport {
    /// Whether any provider write happened.
    pub fn changed(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty()
    }
}

/// DNS record management service
///
/// Every method takes the domain by `&mut` and mirrors confirmed provider
/// results into `domain.dns_records`. Nothing is written locally when the
/// provider call fails.
pub struct DnsService {
    ctx: Arc<ServiceContext>,
}

impl DnsService {
    /// Create a DNS service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Replace the stored records with the provider's list and clear the
    /// stale flag. Returns the number of records now stored.
    pub async fn sync_records(&self, domain: &mut Domain) -> CoreResult<usize> {
        let provider = self.ctx.get_provider(domain).await?;
        match provider.list_records(&domain.name).await {
            Ok(records) => {
                log::info!(
                    "domain {}: synced {} record(s) from {}",
                    domain.name,
                    records.len(),
                    provider.id()
                );
                let count = records.len();
                domain.mark_synced(records);
                Ok(count)
            }
            Err(e) => Err(self.ctx.handle_provider_error(domain, e)),
        }
    }

    /// Create a DNS record
    pub async fn create_record(
        &self,
        domain: &mut Domain,
        record: &DnsRecord,
        tags: &[String],
    ) -> CoreResult<DnsRecord> {
        let provider = self.ctx.get_provider(domain).await?;
        match provider.create_record(&domain.name, record, tags).await {
            Ok(created) => {
                domain.upsert_record(created.clone());
                Ok(created)
            }
            Err(e) => Err(self.ctx.handle_provider_error(domain, e)),
        }
    }

    /// Update a DNS record
    ///
    /// When the provider assigns a new id (Route53 renames), the record
    /// stored under the old id is dropped.
    pub async fn update_record(
        &self,
        domain: &mut Domain,
        record: &DnsRecord,
        tags: &[String],
    ) -> CoreResult<DnsRecord> {
        let provider = self.ctx.get_provider(domain).await?;
        match provider.update_record(&domain.name, record, tags).await {
            Ok(updated) => {
                if let Some(old_id) = record.record_id() {
                    if updated.record_id() != Some(old_id) {
                        domain.remove_record(old_id);
                    }
                }
                domain.upsert_record(updated.clone());
                Ok(updated)
            }
            Err(e) => Err(self.ctx.handle_provider_error(domain, e)),
        }
    }

    /// Delete a DNS record
    pub async fn delete_record(&self, domain: &mut Domain, record_id: &str) -> CoreResult<()> {
        let provider = self.ctx.get_provider(domain).await?;
        match provider.delete_record(&domain.name, record_id).await {
            Ok(()) => {
                domain.remove_record(record_id);
                Ok(())
            }
            Err(e) => Err(self.ctx.handle_provider_error(domain, e)),
        }
    }

    /// Records `site` needs on `domain` to reach `target_ip`.
    ///
    /// One A (IPv4) or AAAA (IPv6) record per distinct hostname among the
    /// site's mappings into this domain, with the configured default TTL.
    /// Hostnames are lowercased.
    pub fn plan_site_records(
        &self,
        site: &Site,
        domain: &Domain,
        target_ip: &str,
    ) -> CoreResult<Vec<DnsRecord>> {
        let ip: IpAddr = target_ip
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidTarget(target_ip.to_string()))?;
        let record_type = match ip {
            IpAddr::V4(_) => DnsRecordType::A,
            IpAddr::V6(_) => DnsRecordType::Aaaa,
        };

        let mappings = site.domain_mappings();
        let on_domain: Vec<_> = mappings
            .iter()
            .filter(|m| m.domain_id == domain.id)
            .collect();
        if on_domain.is_empty() {
            let expected = mappings
                .iter()
                .map(|m| m.domain_id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(CoreError::DomainMismatch {
                expected: if expected.is_empty() {
                    "no domain".to_string()
                } else {
                    expected
                },
                actual: domain.name.clone(),
            });
        }

        let mut planned: Vec<DnsRecord> = Vec::with_capacity(on_domain.len());
        for mapping in on_domain {
            let name = mapping.full_domain(&domain.name).to_ascii_lowercase();
            if planned.iter().any(|r| r.name == name) {
                continue;
            }
            planned.push(DnsRecord::new(
                record_type,
                name,
                ip.to_string(),
                self.ctx.settings.default_dns_ttl,
            ));
        }
        Ok(planned)
    }

    /// Bring `domain`'s records in line with what `site` needs.
    ///
    /// Lists the live records first, then creates missing ones and rewrites
    /// ones pointing elsewhere. Stops at the first provider failure; records
    /// written before it stay mirrored in `domain`.
    pub async fn reconcile_site(
        &self,
        site: &Site,
        domain: &mut Domain,
        target_ip: &str,
    ) -> CoreResult<ReconcileReport> {
        if domain.is_manual_dns() {
            log::warn!(
                "site {}: {} uses manual DNS, skipping reconcile",
                site.name,
                domain.name
            );
            return Err(ProviderError::ManualDns {
                domain: domain.name.clone(),
            }
            .into());
        }

        let planned = self.plan_site_records(site, domain, target_ip)?;
        self.sync_records(domain).await?;
        let tags = [site_tag(site.id)];
        let mut report = ReconcileReport::default();

        for wanted in planned {
            let existing: Vec<&DnsRecord> = domain
                .dns_records
                .iter()
                .filter(|r| {
                    r.record_type == wanted.record_type
                        && relative_to_full_name(
                            &r.name.to_ascii_lowercase(),
                            &domain.name.to_ascii_lowercase(),
                        ) == wanted.name
                })
                .collect();

            if let Some(current) = existing.iter().find(|r| same_value(&r.value, &wanted.value)) {
                report.unchanged.push((*current).clone());
                continue;
            }

            match existing.first().and_then(|r| r.record_id()).map(str::to_string) {
                Some(id) => {
                    let record = wanted.with_id(id);
                    let updated = self.update_record(domain, &record, &tags).await?;
                    report.updated.push(updated);
                }
                None => {
                    let created = self.create_record(domain, &wanted, &tags).await?;
                    report.created.push(created);
                }
            }
        }

        log::info!(
            "site {} on {}: {} created, {} updated, {} unchanged",
            site.name,
            domain.name,
            report.created.len(),
            report.updated.len(),
            report.unchanged.len()
        );
        Ok(report)
    }
}

fn same_value(current: &str, wanted: &str) -> bool {
    match (current.trim().parse::<IpAddr>(), wanted.parse::<IpAddr>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => current.trim() == wanted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockCall, create_test_context, remote_domain};
    use crate::types::{DomainMapping, full_domain};

    fn site_on(domain: &Domain) -> Site {
        let mut site = Site::new("blog", domain.id, Uuid::new_v4(), 80);
        site.push_domain_mapping(DomainMapping::new(domain.id, 3000).with_subdomain("api"));
        site
    }

    #[tokio::test]
    async fn sync_replaces_records_and_clears_stale() {
        let (ctx, provider, _) = create_test_context();
        provider
            .seed(vec![
                DnsRecord::new(DnsRecordType::A, "example.com", "192.0.2.1", 300).with_id("r1"),
            ])
            .await;
        let service = DnsService::new(ctx);

        let mut domain = remote_domain();
        domain.records_stale = true;
        domain.dns_records = vec![DnsRecord::new(DnsRecordType::Txt, "old", "x", 300)];

        assert_eq!(service.sync_records(&mut domain).await.unwrap(), 1);
        assert!(!domain.records_stale);
        assert_eq!(domain.dns_records[0].record_id(), Some("r1"));
    }

    #[tokio::test]
    async fn failed_sync_keeps_stale_records() {
        let (ctx, provider, _) = create_test_context();
        provider
            .fail_next(ProviderError::Transport {
                provider: "mock".to_string(),
                detail: "timed out".to_string(),
            })
            .await;
        let service = DnsService::new(ctx);

        let mut domain = remote_domain();
        domain.records_stale = true;
        domain.dns_records = vec![DnsRecord::new(DnsRecordType::Txt, "old", "x", 300)];

        let err = service.sync_records(&mut domain).await.unwrap_err();
        assert!(matches!(err, CoreError::Provider(ProviderError::Transport { .. })));
        assert!(domain.records_stale);
        assert_eq!(domain.dns_records.len(), 1);
    }

    #[tokio::test]
    async fn crud_mirrors_into_domain() {
        let (ctx, provider, _) = create_test_context();
        let service = DnsService::new(ctx);
        let mut domain = remote_domain();

        let created = service
            .create_record(
                &mut domain,
                &DnsRecord::new(DnsRecordType::A, "www", "192.0.2.1", 0),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(domain.dns_records, vec![created.clone()]);

        let changed = created.clone().with_proxy(true);
        let updated = service
            .update_record(&mut domain, &changed, &[])
            .await
            .unwrap();
        assert_eq!(domain.dns_records, vec![updated]);

        let id = created.record_id().unwrap().to_string();
        service.delete_record(&mut domain, &id).await.unwrap();
        assert!(domain.dns_records.is_empty());
        assert!(matches!(
            provider.calls().await.last(),
            Some(MockCall::Delete { record_id }) if *record_id == id
        ));
    }

    #[tokio::test]
    async fn missing_id_fails_without_local_change() {
        let (ctx, provider, _) = create_test_context();
        let service = DnsService::new(ctx);
        let mut domain = remote_domain();
        domain.dns_records = vec![DnsRecord::new(DnsRecordType::A, "www", "192.0.2.1", 0)];
        let before = domain.clone();

        let err = service
            .update_record(&mut domain, &before.dns_records[0], &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Provider(ProviderError::MissingRecordId { .. })
        ));
        assert_eq!(domain, before);
        assert!(provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn plan_covers_mappings_on_the_domain_only() {
        let (ctx, _, _) = create_test_context();
        let service = DnsService::new(ctx);
        let domain = remote_domain();
        let mut site = site_on(&domain);
        // same hostname on another port
        site.push_domain_mapping(DomainMapping::new(domain.id, 4000).with_subdomain("api"));
        site.add_domain_mapping(Uuid::new_v4(), 5000);

        let planned = service
            .plan_site_records(&site, &domain, "203.0.113.7")
            .unwrap();
        let names: Vec<_> = planned.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["example.com", "api.example.com"]);
        assert!(planned.iter().all(|r| r.record_type == DnsRecordType::A));
        assert!(planned.iter().all(|r| r.ttl == 300));
        assert!(planned.iter().all(|r| r.id.is_none()));
    }

    #[tokio::test]
    async fn plan_uses_aaaa_for_ipv6() {
        let (ctx, _, _) = create_test_context();
        let service = DnsService::new(ctx);
        let domain = remote_domain();

        let planned = service
            .plan_site_records(&site_on(&domain), &domain, "2001:db8::1")
            .unwrap();
        assert!(planned.iter().all(|r| r.record_type == DnsRecordType::Aaaa));
        assert_eq!(planned[0].value, "2001:db8::1");
    }

    #[tokio::test]
    async fn plan_rejects_bad_target_and_foreign_domain() {
        let (ctx, _, _) = create_test_context();
        let service = DnsService::new(ctx);
        let domain = remote_domain();

        assert!(matches!(
            service.plan_site_records(&site_on(&domain), &domain, "not-an-ip"),
            Err(CoreError::InvalidTarget(_))
        ));

        let other = remote_domain();
        let err = service
            .plan_site_records(&site_on(&other), &domain, "192.0.2.1")
            .unwrap_err();
        assert!(matches!(err, CoreError::DomainMismatch { .. }));
        assert!(err.is_expected());
    }

    #[tokio::test]
    async fn reconcile_creates_missing_and_updates_changed() {
        let (ctx, provider, _) = create_test_context();
        let domain_template = remote_domain();
        provider
            .seed(vec![
                DnsRecord::new(DnsRecordType::A, "example.com", "203.0.113.7", 300)
                    .with_id("apex"),
                DnsRecord::new(DnsRecordType::A, "blog.example.com", "192.0.2.1", 300)
                    .with_id("blog"),
            ])
            .await;
        let service = DnsService::new(ctx);

        let mut domain = domain_template;
        let mut site = site_on(&domain);
        site.push_domain_mapping(DomainMapping::new(domain.id, 80).with_subdomain("blog"));

        let report = service
            .reconcile_site(&site, &mut domain, "203.0.113.7")
            .await
            .unwrap();

        assert!(report.changed());
        assert_eq!(report.unchanged.len(), 1);
        assert_eq!(report.unchanged[0].record_id(), Some("apex"));
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].name, full_domain("example.com", "api"));
        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.updated[0].record_id(), Some("blog"));
        assert_eq!(report.updated[0].value, "203.0.113.7");

        let tag = site_tag(site.id);
        let writes: Vec<_> = provider
            .calls()
            .await
            .into_iter()
            .filter(|c| !matches!(c, MockCall::List))
            .collect();
        assert_eq!(writes.len(), 2);
        for call in &writes {
            match call {
                MockCall::Create { record, tags } | MockCall::Update { record, tags } => {
                    assert_eq!(tags, &vec![tag.clone()]);
                    assert_eq!(record.ttl, 300);
                }
                other => panic!("unexpected call: {other:?}"),
            }
        }

        assert_eq!(domain.dns_records.len(), 3);
        assert!(
            domain
                .find_record("blog", DnsRecordType::A)
                .is_some_and(|r| r.value == "203.0.113.7")
        );
    }

    #[tokio::test]
    async fn reconcile_matches_hostnames_case_insensitively() {
        let (ctx, provider, _) = create_test_context();
        provider
            .seed(vec![
                DnsRecord::new(DnsRecordType::A, "example.com", "203.0.113.7", 300)
                    .with_id("apex"),
                DnsRecord::new(DnsRecordType::A, "api.example.com", "203.0.113.7", 300)
                    .with_id("r1"),
            ])
            .await;
        let service = DnsService::new(ctx);
        let mut domain = remote_domain();
        let mut site = Site::new("blog", domain.id, Uuid::new_v4(), 80);
        site.push_domain_mapping(DomainMapping::new(domain.id, 3000).with_subdomain("API"));

        let planned = service
            .plan_site_records(&site, &domain, "203.0.113.7")
            .unwrap();
        assert_eq!(planned[1].name, "api.example.com");

        let report = service
            .reconcile_site(&site, &mut domain, "203.0.113.7")
            .await
            .unwrap();
        assert!(!report.changed());
        assert_eq!(report.unchanged.len(), 2);
        assert_eq!(provider.write_count().await, 0);
    }

    #[tokio::test]
    async fn reconcile_twice_is_a_no_op() {
        let (ctx, provider, _) = create_test_context();
        let service = DnsService::new(ctx);
        let mut domain = remote_domain();
        let site = site_on(&domain);

        let first = service
            .reconcile_site(&site, &mut domain, "203.0.113.7")
            .await
            .unwrap();
        assert_eq!(first.created.len(), 2);

        let second = service
            .reconcile_site(&site, &mut domain, "203.0.113.7")
            .await
            .unwrap();
        assert!(!second.changed());
        assert_eq!(second.unchanged.len(), 2);
        assert_eq!(provider.write_count().await, 2);
    }

    #[tokio::test]
    async fn reconcile_on_manual_domain_makes_no_calls() {
        let (ctx, provider, resolver) = create_test_context();
        let service = DnsService::new(ctx);
        let mut domain = Domain::new("example.com");
        let site = site_on(&domain);

        let err = service
            .reconcile_site(&site, &mut domain, "203.0.113.7")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::Provider(ProviderError::ManualDns {
                domain: "example.com".to_string()
            })
        );
        assert_eq!(resolver.resolve_count(), 0);
        assert!(provider.calls().await.is_empty());
    }
}
