//! Sites and their domain mappings

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::port::{PortMappingError, format_port_mapping, parse_port_mapping};

/// Site deployment status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[default]
    Inactive,
    Deploying,
    Running,
    Failed,
    Stopped,
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "Inactive"),
            Self::Deploying => write!(f, "Deploying"),
            Self::Running => write!(f, "Running"),
            Self::Failed => write!(f, "Failed"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(port: &u16) -> bool {
    *port == 0
}

/// One hostname a site is reachable under.
///
/// `host_port == 0` means "same as the container port"; use
/// [`effective_host_port`](Self::effective_host_port) instead of reading it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMapping {
    /// Domain (zone) the hostname lives in.
    pub domain_id: Uuid,
    /// Label in front of the domain name. Empty means the apex.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subdomain: String,
    /// Port the container listens on.
    #[serde(rename = "port")]
    pub container_port: u16,
    /// Port published on the node.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub host_port: u16,
}

impl DomainMapping {
    /// Apex mapping publishing `port` on the same host port.
    ///
    /// No range check: ports outside 1-65535 (that is, 0) are the caller's
    /// responsibility. [`from_port_spec`](Self::from_port_spec) validates.
    pub fn new(domain_id: Uuid, port: u16) -> Self {
        Self {
            domain_id,
            subdomain: String::new(),
            container_port: port,
            host_port: port,
        }
    }

    /// Build a mapping from a user-typed port string (`"3000"` or `"3000:3001"`).
    ///
    /// # Errors
    /// [`PortMappingError`] when the port string does not parse.
    pub fn from_port_spec(
        domain_id: Uuid,
        subdomain: impl Into<String>,
        port_spec: &str,
    ) -> Result<Self, PortMappingError> {
        let (container_port, host_port) = parse_port_mapping(port_spec)?;
        Ok(Self {
            domain_id,
            subdomain: subdomain.into().trim().to_string(),
            container_port,
            host_port,
        })
    }

    #[must_use]
    pub fn with_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = subdomain.into();
        self
    }

    #[must_use]
    pub fn with_host_port(mut self, host_port: u16) -> Self {
        self.host_port = host_port;
        self
    }

    /// Host port, defaulting to the container port when unset.
    pub fn effective_host_port(&self) -> u16 {
        if self.host_port > 0 {
            self.host_port
        } else {
            self.container_port
        }
    }

    /// Ports in display form, see [`format_port_mapping`].
    pub fn port_spec(&self) -> String {
        format_port_mapping(self.container_port, self.host_port)
    }

    /// Hostname of this mapping under `domain_name`.
    pub fn full_domain(&self, domain_name: &str) -> String {
        full_domain(domain_name, &self.subdomain)
    }
}

/// `domain_name` for an empty subdomain, `"{subdomain}.{domain_name}"` otherwise.
pub fn full_domain(domain_name: &str, subdomain: &str) -> String {
    if subdomain.is_empty() {
        domain_name.to_string()
    } else {
        format!("{subdomain}.{domain_name}")
    }
}

/// A file written into the container before it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub name: String,
    pub content: String,
    pub container_path: String,
}

/// A deployable containerized service.
///
/// Sites persisted before multi-domain support carry a single `domain_id`
/// and `port`. Those fields are still written for older readers, but
/// [`domain_mappings`](Self::domain_mappings) is the only way to read the
/// hostnames a site exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    /// Legacy single domain.
    #[serde(default)]
    pub domain_id: Uuid,
    pub node_id: Uuid,
    #[serde(default)]
    pub docker_image: String,
    /// Private registry credentials.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub docker_username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub docker_token: String,
    #[serde(default)]
    pub environment_vars: BTreeMap<String, String>,
    /// Legacy single port.
    #[serde(default)]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain_mappings: Vec<DomainMapping>,
    pub ssl_enabled: bool,
    /// Let's Encrypt registration address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssl_email: String,
    #[serde(default)]
    pub config_files: Vec<ConfigFile>,
    #[serde(default)]
    pub status: SiteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// New inactive site with SSL on and one apex mapping for `domain_id`.
    ///
    /// `port` is not validated; a 0 port yields a mapping that never routes.
    /// Parse user input with [`DomainMapping::from_port_spec`] instead.
    pub fn new(name: impl Into<String>, domain_id: Uuid, node_id: Uuid, port: u16) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            domain_id,
            node_id,
            docker_image: String::new(),
            docker_username: String::new(),
            docker_token: String::new(),
            environment_vars: BTreeMap::new(),
            port,
            domain_mappings: vec![DomainMapping::new(domain_id, port)],
            ssl_enabled: true,
            ssl_email: String::new(),
            config_files: Vec::new(),
            status: SiteStatus::Inactive,
            created_at: now,
            updated_at: now,
        }
    }

    /// All mappings of this site.
    ///
    /// Stored mappings win. A site without any falls back to one apex
    /// mapping built from the legacy `domain_id`/`port` when both are set.
    /// Never mutates the site.
    pub fn domain_mappings(&self) -> Cow<'_, [DomainMapping]> {
        if !self.domain_mappings.is_empty() {
            return Cow::Borrowed(&self.domain_mappings);
        }
        if !self.domain_id.is_nil() && self.port > 0 {
            return Cow::Owned(vec![DomainMapping::new(self.domain_id, self.port)]);
        }
        Cow::Borrowed(&[])
    }

    /// Mappings that point into `domain_id`.
    pub fn mappings_for_domain(&self, domain_id: Uuid) -> Vec<DomainMapping> {
        self.domain_mappings()
            .iter()
            .filter(|m| m.domain_id == domain_id)
            .cloned()
            .collect()
    }

    /// Append an apex mapping whose host port equals `port`.
    ///
    /// Like [`DomainMapping::new`], `port` is taken as already validated.
    pub fn add_domain_mapping(&mut self, domain_id: Uuid, port: u16) {
        self.push_domain_mapping(DomainMapping::new(domain_id, port));
    }

    /// Append a fully built mapping.
    pub fn push_domain_mapping(&mut self, mapping: DomainMapping) {
        self.domain_mappings.push(mapping);
        self.touch();
    }

    /// Remove the mapping at `index`, keeping the order of the rest.
    ///
    /// Out-of-range indices are ignored and leave `updated_at` alone.
    pub fn remove_domain_mapping(&mut self, index: usize) -> Option<DomainMapping> {
        if index >= self.domain_mappings.len() {
            log::debug!(
                "site {}: ignoring removal of mapping {index} (have {})",
                self.id,
                self.domain_mappings.len()
            );
            return None;
        }
        let removed = self.domain_mappings.remove(index);
        self.touch();
        Some(removed)
    }

    /// Traefik docker labels routing every resolvable mapping to this site.
    ///
    /// `resolve_domain` maps a domain id to its name; mappings whose domain
    /// is unknown are skipped. Returns no labels when nothing resolves.
    pub fn traefik_labels<F>(&self, resolve_domain: F) -> BTreeMap<String, String>
    where
        F: Fn(Uuid) -> Option<String>,
    {
        let mut labels = BTreeMap::new();
        let entrypoint = if self.ssl_enabled { "websecure" } else { "web" };

        for (index, mapping) in self.domain_mappings().iter().enumerate() {
            let Some(domain_name) = resolve_domain(mapping.domain_id) else {
                log::warn!(
                    "site {}: skipping mapping {index}, domain {} is unknown",
                    self.id,
                    mapping.domain_id
                );
                continue;
            };

            let router = format!("site-{}-{index}", self.id);
            let host = mapping.full_domain(&domain_name);

            labels.insert(
                format!("traefik.http.routers.{router}.rule"),
                format!("Host(`{host}`)"),
            );
            labels.insert(
                format!("traefik.http.routers.{router}.entrypoints"),
                entrypoint.to_string(),
            );
            labels.insert(
                format!("traefik.http.routers.{router}.service"),
                router.clone(),
            );
            if self.ssl_enabled {
                labels.insert(
                    format!("traefik.http.routers.{router}.tls"),
                    "true".to_string(),
                );
                labels.insert(
                    format!("traefik.http.routers.{router}.tls.certresolver"),
                    "letsencrypt".to_string(),
                );
            }
            labels.insert(
                format!("traefik.http.services.{router}.loadbalancer.server.port"),
                mapping.container_port.to_string(),
            );
        }

        if !labels.is_empty() {
            labels.insert("traefik.enable".to_string(), "true".to_string());
        }
        labels
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_site(domain_id: Uuid, port: u16) -> Site {
        let mut site = Site::new("blog", domain_id, Uuid::new_v4(), port);
        site.domain_mappings.clear();
        site
    }

    #[test]
    fn new_site_seeds_one_mapping() {
        let domain_id = Uuid::new_v4();
        let site = Site::new("blog", domain_id, Uuid::new_v4(), 8080);

        assert!(site.ssl_enabled);
        assert_eq!(site.status, SiteStatus::Inactive);
        assert_eq!(site.domain_mappings(), [DomainMapping::new(domain_id, 8080)].as_slice());
    }

    #[test]
    fn stored_mappings_win_over_legacy_fields() {
        let mut site = legacy_site(Uuid::new_v4(), 8080);
        let stored = vec![
            DomainMapping::new(Uuid::new_v4(), 3000).with_subdomain("api"),
            DomainMapping::new(Uuid::new_v4(), 4000).with_host_port(4001),
        ];
        site.domain_mappings = stored.clone();

        let mappings = site.domain_mappings();
        assert!(matches!(mappings, Cow::Borrowed(_)));
        assert_eq!(mappings.as_ref(), stored.as_slice());
    }

    #[test]
    fn legacy_fields_synthesize_one_mapping() {
        let domain_id = Uuid::new_v4();
        let site = legacy_site(domain_id, 8080);

        let mappings = site.domain_mappings();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].domain_id, domain_id);
        assert_eq!(mappings[0].subdomain, "");
        assert_eq!(mappings[0].container_port, 8080);
        assert_eq!(mappings[0].effective_host_port(), 8080);

        // pure read: nothing was written back
        assert!(site.domain_mappings.is_empty());
        assert_eq!(site.domain_mappings(), mappings);
    }

    #[test]
    fn incomplete_legacy_fields_give_nothing() {
        assert!(legacy_site(Uuid::new_v4(), 0).domain_mappings().is_empty());
        assert!(legacy_site(Uuid::nil(), 8080).domain_mappings().is_empty());
    }

    #[test]
    fn add_appends_and_touches() {
        let mut site = Site::new("blog", Uuid::new_v4(), Uuid::new_v4(), 80);
        let before = site.updated_at;
        let other = Uuid::new_v4();

        site.add_domain_mapping(other, 3000);

        assert_eq!(site.domain_mappings.len(), 2);
        assert_eq!(site.domain_mappings[1], DomainMapping::new(other, 3000));
        assert_eq!(site.domain_mappings[1].host_port, 3000);
        assert!(site.updated_at >= before);
    }

    #[test]
    fn remove_out_of_range_is_a_no_op() {
        let mut site = Site::new("blog", Uuid::new_v4(), Uuid::new_v4(), 80);
        site.add_domain_mapping(Uuid::new_v4(), 3000);
        let snapshot = site.clone();

        assert_eq!(site.remove_domain_mapping(2), None);
        assert_eq!(site.remove_domain_mapping(usize::MAX), None);
        assert_eq!(site, snapshot);
    }

    #[test]
    fn remove_keeps_order() {
        let first = Uuid::new_v4();
        let mut site = Site::new("blog", first, Uuid::new_v4(), 80);
        let (second, third) = (Uuid::new_v4(), Uuid::new_v4());
        site.add_domain_mapping(second, 81);
        site.add_domain_mapping(third, 82);

        let removed = site.remove_domain_mapping(1).unwrap();
        assert_eq!(removed.domain_id, second);
        let ids: Vec<_> = site.domain_mappings.iter().map(|m| m.domain_id).collect();
        assert_eq!(ids, [first, third]);
    }

    #[test]
    fn effective_host_port_defaults_to_container_port() {
        let mapping = DomainMapping::new(Uuid::new_v4(), 80).with_host_port(0);
        assert_eq!(mapping.effective_host_port(), 80);
        assert_eq!(mapping.with_host_port(8080).effective_host_port(), 8080);
    }

    #[test]
    fn full_domain_joins_labels() {
        assert_eq!(full_domain("example.com", ""), "example.com");
        assert_eq!(full_domain("example.com", "www"), "www.example.com");
    }

    #[test]
    fn port_spec_round_trips_through_mapping() {
        let domain_id = Uuid::new_v4();
        let mapping = DomainMapping::from_port_spec(domain_id, " api ", "3000:3001").unwrap();
        assert_eq!(mapping.subdomain, "api");
        assert_eq!(mapping.container_port, 3000);
        assert_eq!(mapping.host_port, 3001);
        assert_eq!(mapping.port_spec(), "3000:3001");

        let mapping = DomainMapping::from_port_spec(domain_id, "", "8080").unwrap();
        assert_eq!(mapping.port_spec(), "8080");

        assert!(matches!(
            DomainMapping::from_port_spec(domain_id, "", "abc:80"),
            Err(PortMappingError::InvalidPort { .. })
        ));
    }

    #[test]
    fn zero_port_only_rejected_when_parsed() {
        let domain_id = Uuid::new_v4();
        assert!(matches!(
            DomainMapping::from_port_spec(domain_id, "", "0"),
            Err(PortMappingError::PortOutOfRange { .. })
        ));

        // The direct constructors trust their input.
        let mapping = DomainMapping::new(domain_id, 0);
        assert_eq!(mapping.effective_host_port(), 0);
        let mut site = Site::new("blog", domain_id, Uuid::new_v4(), 0);
        site.add_domain_mapping(domain_id, 0);
        assert_eq!(site.domain_mappings.len(), 2);
    }

    #[test]
    fn mapping_serializes_with_omitted_defaults() {
        let domain_id = Uuid::nil();
        let mapping = DomainMapping::new(domain_id, 80).with_host_port(0);
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "domain_id": domain_id, "port": 80 })
        );

        let mapping: DomainMapping = serde_json::from_value(serde_json::json!({
            "domain_id": domain_id, "subdomain": "www", "port": 3000, "host_port": 3001
        }))
        .unwrap();
        assert_eq!(mapping.port_spec(), "3000:3001");
    }

    #[test]
    fn legacy_document_round_trips_every_field() {
        let domain_id = Uuid::new_v4();
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "old",
            "domain_id": domain_id,
            "node_id": Uuid::new_v4(),
            "docker_image": "nginx:latest",
            "environment_vars": { "APP_ENV": "prod", "LOG": "info" },
            "port": 8080,
            "ssl_enabled": true,
            "ssl_email": "ops@example.com",
            "config_files": [
                { "name": "nginx.conf", "content": "worker_processes 1;", "container_path": "/etc/nginx/nginx.conf" }
            ],
            "status": "running",
            "created_at": "2024-01-15T08:00:00Z",
            "updated_at": "2024-01-15T08:00:00Z"
        });
        let site: Site = serde_json::from_value(json.clone()).unwrap();
        assert!(site.domain_mappings.is_empty());
        assert_eq!(site.status, SiteStatus::Running);
        assert_eq!(site.domain_mappings()[0].domain_id, domain_id);
        assert_eq!(site.docker_image, "nginx:latest");
        assert_eq!(site.environment_vars["APP_ENV"], "prod");
        assert_eq!(site.config_files[0].container_path, "/etc/nginx/nginx.conf");

        let back = serde_json::to_value(&site).unwrap();
        assert_eq!(back, json);
        assert!(back.get("domain_mappings").is_none());
        assert!(back.get("docker_username").is_none());
        assert!(back.get("docker_token").is_none());
    }

    #[test]
    fn registry_credentials_serialize_when_set() {
        let mut site = Site::new("blog", Uuid::new_v4(), Uuid::new_v4(), 80);
        site.docker_username = "deploy".to_string();
        site.docker_token = "secret".to_string();

        let json = serde_json::to_value(&site).unwrap();
        assert_eq!(json["docker_username"], "deploy");
        assert_eq!(json["docker_token"], "secret");
        assert_eq!(json["docker_image"], "");
        assert_eq!(json["environment_vars"], serde_json::json!({}));
        assert_eq!(json["config_files"], serde_json::json!([]));
        assert!(json.get("ssl_email").is_none());
    }

    #[test]
    fn traefik_labels_route_each_mapping() {
        let apex = Uuid::new_v4();
        let unknown = Uuid::new_v4();
        let mut site = Site::new("blog", apex, Uuid::new_v4(), 80);
        site.push_domain_mapping(DomainMapping::new(apex, 3000).with_subdomain("api"));
        site.add_domain_mapping(unknown, 9000);

        let labels = site.traefik_labels(|id| (id == apex).then(|| "example.com".to_string()));
        let r0 = format!("site-{}-0", site.id);
        let r1 = format!("site-{}-1", site.id);

        assert_eq!(labels["traefik.enable"], "true");
        assert_eq!(
            labels[&format!("traefik.http.routers.{r0}.rule")],
            "Host(`example.com`)"
        );
        assert_eq!(
            labels[&format!("traefik.http.routers.{r1}.rule")],
            "Host(`api.example.com`)"
        );
        assert_eq!(labels[&format!("traefik.http.routers.{r1}.entrypoints")], "websecure");
        assert_eq!(
            labels[&format!("traefik.http.routers.{r1}.tls.certresolver")],
            "letsencrypt"
        );
        assert_eq!(
            labels[&format!("traefik.http.services.{r1}.loadbalancer.server.port")],
            "3000"
        );
        assert!(!labels.keys().any(|k| k.contains(&format!("site-{}-2", site.id))));
    }

    #[test]
    fn traefik_labels_without_ssl_use_web_entrypoint() {
        let apex = Uuid::new_v4();
        let mut site = Site::new("blog", apex, Uuid::new_v4(), 80);
        site.ssl_enabled = false;

        let labels = site.traefik_labels(|_| Some("example.com".to_string()));
        let router = format!("site-{}-0", site.id);
        assert_eq!(labels[&format!("traefik.http.routers.{router}.entrypoints")], "web");
        assert!(!labels.contains_key(&format!("traefik.http.routers.{router}.tls")));

        assert!(site.traefik_labels(|_| None).is_empty());
    }
}
