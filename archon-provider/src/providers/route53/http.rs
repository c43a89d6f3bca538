//! Route53 HTTP request methods

use chrono::Utc;
use reqwest::Method;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ProviderErrorMapper, RawApiError};

use super::sign::canonical_query_string;
use super::{
    Change, ChangeBatch, ChangeInfo, ChangeResourceRecordSetsRequest,
    ChangeResourceRecordSetsResponse, Changes, ErrorResponse, InvalidChangeBatch,
    ListResourceRecordSetsResponse, MAX_ITEMS, ROUTE53_XMLNS, ResourceRecordSet,
    Route53Provider,
};

impl Route53Provider {
    /// Sign and send one request. Returns the body of a 2xx response.
    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<String>,
    ) -> Result<String> {
        let query = canonical_query_string(params);
        let url = if query.is_empty() {
            format!("{}{path}", self.endpoint)
        } else {
            format!("{}{path}?{query}", self.endpoint)
        };

        let payload = body.unwrap_or_default();
        let signed = self.sign(
            method.as_str(),
            path,
            &query,
            &payload,
            Utc::now().timestamp(),
        );

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("X-Amz-Date", &signed.amz_date)
            .header("Authorization", &signed.authorization);
        if !payload.is_empty() {
            log::debug!("[route53] Request Body: {payload}");
            request = request
                .header("Content-Type", "application/xml")
                .body(payload);
        }

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), &url)
                .await?;

        if !(200..300).contains(&status) {
            return Err(self.error_from_body(status, &response_text));
        }
        Ok(response_text)
    }

    /// Map a non-2xx body onto [`ProviderError::Api`].
    fn error_from_body(&self, status: u16, body: &str) -> ProviderError {
        let raw = if let Ok(response) = quick_xml::de::from_str::<ErrorResponse>(body) {
            RawApiError::with_code(response.error.code, response.error.message)
        } else if let Ok(batch) = quick_xml::de::from_str::<InvalidChangeBatch>(body) {
            let message = batch
                .messages
                .items
                .into_iter()
                .next()
                .unwrap_or_else(|| "invalid change batch".to_string());
            RawApiError::with_code("InvalidChangeBatch", message)
        } else {
            RawApiError::with_code(status.to_string(), format!("HTTP {status}"))
        };

        log::error!(
            "[route53] API error: {} - {}",
            raw.code.as_deref().unwrap_or_default(),
            raw.message
        );
        self.api_error(raw)
    }

    /// One page of `ListResourceRecordSets`, optionally starting at
    /// `(name, type)`.
    pub(crate) async fn list_record_sets_page(
        &self,
        start: Option<(&str, &str)>,
        max_items: Option<u32>,
    ) -> Result<ListResourceRecordSetsResponse> {
        let mut params = vec![("maxitems", max_items.unwrap_or(MAX_ITEMS).to_string())];
        if let Some((name, record_type)) = start {
            params.push(("name", name.to_string()));
            params.push(("type", record_type.to_string()));
        }

        let text = self
            .send(Method::GET, &self.rrset_path(), &params, None)
            .await?;
        HttpUtils::parse_xml(&text, self.provider_name())
    }

    /// Submit one change batch.
    pub(crate) async fn change_record_sets(&self, changes: Vec<Change>) -> Result<ChangeInfo> {
        let request = ChangeResourceRecordSetsRequest {
            xmlns: ROUTE53_XMLNS,
            change_batch: ChangeBatch {
                changes: Changes { items: changes },
            },
        };
        let body = quick_xml::se::to_string_with_root("ChangeResourceRecordSetsRequest", &request)
            .map_err(|e| self.decode_error(format!("failed to encode change batch: {e}")))?;

        let text = self
            .send(Method::POST, &self.rrset_path(), &[], Some(body))
            .await?;
        let response: ChangeResourceRecordSetsResponse =
            HttpUtils::parse_xml(&text, self.provider_name())?;

        log::debug!(
            "[route53] change {} is {}",
            response.change_info.id,
            response.change_info.status
        );
        Ok(response.change_info)
    }

    /// The record set named `fqdn` with type `record_type`, if it exists.
    pub(crate) async fn find_record_set(
        &self,
        fqdn: &str,
        record_type: &str,
    ) -> Result<Option<ResourceRecordSet>> {
        let page = self
            .list_record_sets_page(Some((fqdn, record_type)), Some(1))
            .await?;
        Ok(page.resource_record_sets.items.into_iter().find(|set| {
            super::provider::same_name(&set.name, fqdn) && set.record_type == record_type
        }))
    }
}
