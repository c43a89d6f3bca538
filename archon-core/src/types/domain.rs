//! Domains and their DNS provider selection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use archon_provider::{
    DnsRecord, DnsRecordType, ProviderType, normalize_domain_name, relative_to_full_name,
};

/// Warning shown for every domain that uses manual DNS.
pub const MANUAL_DNS_WARNING: &str = "Manual DNS - Configure records manually at your DNS provider";

/// Which provider backs a domain, with its credentials.
///
/// Persisted as an internally tagged object: `{"type": "cloudflare",
/// "zone_id": "...", "api_token": "..."}`. Empty credentials are omitted and
/// fall back to the global [`Settings`](crate::Settings) at resolve time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DnsProviderSettings {
    /// No API automation.
    #[default]
    Manual,
    Cloudflare {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        api_token: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        zone_id: String,
    },
    Route53 {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        access_key: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        secret_key: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        hosted_zone_id: String,
    },
}

impl DnsProviderSettings {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Manual => ProviderType::Manual,
            Self::Cloudflare { .. } => ProviderType::Cloudflare,
            Self::Route53 { .. } => ProviderType::Route53,
        }
    }

    /// Zone identity at the provider (`zone_id` or `hosted_zone_id`).
    pub fn zone(&self) -> Option<&str> {
        match self {
            Self::Manual => None,
            Self::Cloudflare { zone_id, .. } => Some(zone_id),
            Self::Route53 { hosted_zone_id, .. } => Some(hosted_zone_id),
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

fn default_true() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

/// A DNS zone under management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub dns_provider: DnsProviderSettings,
    /// Last known records. Refreshed only by an explicit sync.
    #[serde(default)]
    pub dns_records: Vec<DnsRecord>,
    #[serde(default = "default_true")]
    pub traefik_enabled: bool,
    pub created_at: DateTime<Utc>,
    /// `dns_records` came from a previous provider configuration.
    #[serde(default, skip_serializing_if = "is_false")]
    pub records_stale: bool,
}

impl Domain {
    /// New manual-DNS domain with no records.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: normalize_domain_name(name.into().trim()).to_lowercase(),
            dns_provider: DnsProviderSettings::Manual,
            dns_records: Vec::new(),
            traefik_enabled: true,
            created_at: Utc::now(),
            records_stale: false,
        }
    }

    #[must_use]
    pub fn with_provider(mut self, settings: DnsProviderSettings) -> Self {
        self.dns_provider = settings;
        self
    }

    pub fn is_manual_dns(&self) -> bool {
        self.dns_provider.is_manual()
    }

    /// Display name of the backing provider.
    pub fn provider_name(&self) -> &'static str {
        self.dns_provider.provider_type().display_name()
    }

    /// Persistent warning for manual-DNS domains, `None` otherwise.
    pub fn manual_dns_warning(&self) -> Option<&'static str> {
        self.is_manual_dns().then_some(MANUAL_DNS_WARNING)
    }

    /// Replace the provider configuration.
    ///
    /// Records are kept for display but marked stale when the provider type
    /// or zone changes; a credential-only change leaves them fresh. Returns
    /// whether the records became stale.
    pub fn set_dns_provider(&mut self, settings: DnsProviderSettings) -> bool {
        let moved = self.dns_provider.provider_type() != settings.provider_type()
            || self.dns_provider.zone() != settings.zone();
        if moved {
            log::info!(
                "domain {}: provider changed to {}, {} record(s) now stale",
                self.name,
                settings.provider_type(),
                self.dns_records.len()
            );
            self.records_stale = true;
        }
        self.dns_provider = settings;
        moved
    }

    /// Store records freshly listed from the provider.
    pub fn mark_synced(&mut self, records: Vec<DnsRecord>) {
        self.dns_records = records;
        self.records_stale = false;
    }

    /// First stored record with this name (relative or fully qualified) and type.
    ///
    /// Names compare case-insensitively.
    pub fn find_record(&self, name: &str, record_type: DnsRecordType) -> Option<&DnsRecord> {
        let wanted = self.qualify(name);
        self.dns_records
            .iter()
            .find(|r| r.record_type == record_type && self.qualify(&r.name) == wanted)
    }

    /// Insert `record`, replacing stored records that share its id.
    ///
    /// The record takes the position of the first one it replaces.
    pub(crate) fn upsert_record(&mut self, record: DnsRecord) {
        let Some(id) = record.record_id().map(str::to_string) else {
            self.dns_records.push(record);
            return;
        };
        let at = self
            .dns_records
            .iter()
            .position(|r| r.record_id() == Some(id.as_str()));
        self.remove_record(&id);
        match at {
            Some(at) => self.dns_records.insert(at, record),
            None => self.dns_records.push(record),
        }
    }

    /// Drop every stored record with this id.
    pub(crate) fn remove_record(&mut self, record_id: &str) {
        self.dns_records.retain(|r| r.record_id() != Some(record_id));
    }

    fn qualify(&self, name: &str) -> String {
        relative_to_full_name(&name.to_ascii_lowercase(), &self.name.to_ascii_lowercase())
    }
}
