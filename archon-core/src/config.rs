//! Application settings
//!
//! Only the `[settings]` table is owned here; the rest of the config document
//! belongs to the client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use archon_provider::ProviderOptions;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Persist every change immediately.
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,
    /// Seconds between node health checks.
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval_secs: u64,
    /// TTL for records created on behalf of sites.
    #[serde(default = "default_dns_ttl")]
    pub default_dns_ttl: u32,
    /// Bound on every provider request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Fallback Cloudflare token for domains without their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudflare_api_token: Option<String>,
    /// Fallback Route53 key pair for domains without their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route53_access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route53_secret_key: Option<String>,
}

fn default_auto_save() -> bool {
    true
}

fn default_health_check_interval() -> u64 {
    300
}

fn default_dns_ttl() -> u32 {
    300
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_save: default_auto_save(),
            health_check_interval_secs: default_health_check_interval(),
            default_dns_ttl: default_dns_ttl(),
            request_timeout_secs: default_request_timeout(),
            cloudflare_api_token: None,
            route53_access_key: None,
            route53_secret_key: None,
        }
    }
}

impl Settings {
    /// Parse settings from TOML.
    ///
    /// Accepts a whole config document (the `[settings]` table is used and
    /// everything else ignored) or a bare settings fragment. A document
    /// without a `[settings]` table that has other tables yields defaults.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let mut table: toml::Table =
            toml::from_str(content).map_err(|e| CoreError::ConfigError(e.to_string()))?;

        let fragment = match table.remove("settings") {
            Some(toml::Value::Table(settings)) => settings,
            Some(other) => {
                return Err(CoreError::ConfigError(format!(
                    "[settings] must be a table, found {}",
                    other.type_str()
                )));
            }
            None => table
                .into_iter()
                .filter(|(_, value)| !value.is_table() && !value.is_array())
                .collect(),
        };

        let settings: Self = toml::Value::Table(fragment)
            .try_into()
            .map_err(|e: toml::de::Error| CoreError::ConfigError(e.to_string()))?;
        settings.validate()?;
        log::debug!(
            "settings loaded: ttl={}s, timeout={}s",
            settings.default_dns_ttl,
            settings.request_timeout_secs
        );
        Ok(settings)
    }

    /// Render as a `[settings]` table.
    pub fn to_toml_string(&self) -> CoreResult<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            settings: &'a Settings,
        }

        toml::to_string(&Document { settings: self })
            .map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.default_dns_ttl == 0 {
            return Err(CoreError::ConfigError(
                "default_dns_ttl must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "request_timeout_secs must be at least 1 second".to_string(),
            ));
        }
        if self.health_check_interval_secs == 0 {
            return Err(CoreError::ConfigError(
                "health_check_interval_secs must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Transport options for the provider factory.
    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            timeout: self.request_timeout(),
            ..ProviderOptions::default()
        }
    }
}
