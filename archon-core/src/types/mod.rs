//! Type definitions

mod domain;
mod port;
mod site;

pub use domain::{DnsProviderSettings, Domain, MANUAL_DNS_WARNING};
pub use port::{PortMappingError, PortSide, format_port_mapping, parse_port_mapping};
pub use site::{ConfigFile, DomainMapping, Site, SiteStatus, full_domain};

// Re-export the provider crate's record types
pub use archon_provider::{DnsRecord, DnsRecordType, ProviderType};
