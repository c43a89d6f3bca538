//! Cloudflare API type definitions

use serde::{Deserialize, Serialize};

/// Cloudflare API response envelope
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<CloudflareError>,
    pub result_info: Option<CloudflareResultInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareResultInfo {
    pub page: u32,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u32>,
}

impl CloudflareResultInfo {
    /// Whether pages after `self.page` remain.
    pub fn has_more(&self) -> bool {
        if let Some(total_pages) = self.total_pages {
            return self.page < total_pages;
        }
        match (self.per_page, self.total_count) {
            (Some(per_page), Some(total)) if per_page > 0 => {
                u64::from(self.page) * u64::from(per_page) < u64::from(total)
            }
            _ => false,
        }
    }
}

/// Cloudflare DNS record (response)
#[derive(Debug, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

/// Cloudflare DNS record (request body for create/update)
#[derive(Debug, Serialize)]
pub struct CloudflareRecordBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    pub proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}
