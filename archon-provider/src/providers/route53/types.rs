//! Route53 API XML documents

use serde::{Deserialize, Serialize};

// ============ ListResourceRecordSets ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListResourceRecordSetsResponse {
    #[serde(default)]
    pub resource_record_sets: ResourceRecordSetList,
    #[serde(default)]
    pub is_truncated: bool,
    #[serde(default)]
    pub next_record_name: Option<String>,
    #[serde(default)]
    pub next_record_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceRecordSetList {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<ResourceRecordSet>,
}

/// One record set (request and response).
///
/// Alias sets have no `ResourceRecords` and no `TTL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecordSet {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(
        rename = "ResourceRecords",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_records: Option<ResourceRecords>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecords {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<ResourceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(rename = "Value")]
    pub value: String,
}

impl ResourceRecordSet {
    /// Values of a plain (non-alias) set.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.resource_records
            .iter()
            .flat_map(|r| r.items.iter().map(|item| item.value.as_str()))
    }
}

// ============ ChangeResourceRecordSets ============

/// Serialized with root `ChangeResourceRecordSetsRequest`.
#[derive(Debug, Serialize)]
pub struct ChangeResourceRecordSetsRequest {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "ChangeBatch")]
    pub change_batch: ChangeBatch,
}

#[derive(Debug, Serialize)]
pub struct ChangeBatch {
    #[serde(rename = "Changes")]
    pub changes: Changes,
}

#[derive(Debug, Serialize)]
pub struct Changes {
    #[serde(rename = "Change")]
    pub items: Vec<Change>,
}

#[derive(Debug, Serialize)]
pub struct Change {
    /// `CREATE`, `UPSERT` or `DELETE`.
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "ResourceRecordSet")]
    pub resource_record_set: ResourceRecordSet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeResourceRecordSetsResponse {
    pub change_info: ChangeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeInfo {
    pub id: String,
    pub status: String,
}

// ============ Errors ============

/// `<ErrorResponse><Error><Code/><Message/></Error></ErrorResponse>`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDetail {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// `<InvalidChangeBatch><Messages><Message/>…</Messages></InvalidChangeBatch>`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvalidChangeBatch {
    pub messages: ChangeBatchMessages,
}

#[derive(Debug, Deserialize)]
pub struct ChangeBatchMessages {
    #[serde(rename = "Message", default)]
    pub items: Vec<String>,
}
