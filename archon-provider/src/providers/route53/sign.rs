//! AWS Signature Version 4

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::providers::common::hmac_sha256;

use super::{ROUTE53_REGION, ROUTE53_SERVICE, Route53Provider};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SIGNED_HEADERS: &str = "host;x-amz-date";

/// Headers produced by [`Route53Provider::sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignedHeaders {
    /// `X-Amz-Date` value (`YYYYMMDD'T'HHMMSS'Z'`).
    pub amz_date: String,
    /// `Authorization` value.
    pub authorization: String,
}

/// Derive the SigV4 signing key.
pub(crate) fn signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Build the canonical query string: keys sorted, keys and values
/// RFC 3986 encoded.
pub(crate) fn canonical_query_string(params: &[(&str, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

impl Route53Provider {
    /// Sign one request.
    ///
    /// `canonical_query` must be the exact query string sent on the wire
    /// (see [`canonical_query_string`]).
    pub(crate) fn sign(
        &self,
        method: &str,
        canonical_uri: &str,
        canonical_query: &str,
        payload: &str,
        timestamp: i64,
    ) -> SignedHeaders {
        let datetime = DateTime::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
        let amz_date = datetime.format("%Y%m%dT%H%M%SZ").to_string();
        let date = datetime.format("%Y%m%d").to_string();

        // 1. canonical request
        let canonical_headers = format!("host:{}\nx-amz-date:{amz_date}\n", self.host);
        let hashed_payload = hex::encode(Sha256::digest(payload.as_bytes()));
        let canonical_request = format!(
            "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{SIGNED_HEADERS}\n{hashed_payload}"
        );

        // 2. string to sign
        let credential_scope = format!("{date}/{ROUTE53_REGION}/{ROUTE53_SERVICE}/aws4_request");
        let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign =
            format!("{ALGORITHM}\n{amz_date}\n{credential_scope}\n{hashed_canonical_request}");

        // 3. signature
        let key = signing_key(&self.secret_key, &date, ROUTE53_REGION, ROUTE53_SERVICE);
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        SignedHeaders {
            authorization: format!(
                "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
                self.access_key
            ),
            amz_date,
        }
    }
}
