//! Cloudflare HTTP request methods

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ProviderErrorMapper, RawApiError};

use super::{
    CloudflareDnsRecord, CloudflareProvider, CloudflareRecordBody, CloudflareResponse,
    RECORDS_PER_PAGE,
};

impl CloudflareProvider {
    /// Attach bearer auth and the JSON content type.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
    }

    /// Send one request and unwrap the Cloudflare envelope.
    ///
    /// `success: false` becomes an API error carrying the first reported
    /// sub-error, regardless of the HTTP status.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&CloudflareRecordBody<'_>>,
    ) -> Result<CloudflareResponse<T>> {
        let url = format!("{}{path}", self.api_base);

        let mut request = self.authorized(self.client.request(method.clone(), &url));
        if let Some(body) = body {
            if let Ok(json) = serde_json::to_string(body) {
                log::debug!("[cloudflare] Request Body: {json}");
            }
            request = request.json(body);
        }

        let (_status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), &url)
                .await?;

        let cf_response: CloudflareResponse<T> =
            HttpUtils::parse_json(&response_text, self.provider_name())?;

        if !cf_response.success {
            let raw = cf_response.errors.first().map_or_else(
                || RawApiError::new("Unknown error"),
                |e| RawApiError::with_code(e.code.to_string(), e.message.clone()),
            );
            log::error!("[cloudflare] API error: {}", raw.message);
            return Err(self.api_error(raw));
        }

        Ok(cf_response)
    }

    /// Execute a request whose envelope must carry a `result`.
    async fn send_for_result<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&CloudflareRecordBody<'_>>,
    ) -> Result<T> {
        self.send(method, path, body)
            .await?
            .result
            .ok_or_else(|| self.decode_error("response is missing the result field"))
    }

    /// GET one page of zone records. Returns the records and whether more
    /// pages follow.
    pub(crate) async fn get_records_page(
        &self,
        page: u32,
    ) -> Result<(Vec<CloudflareDnsRecord>, bool)> {
        let path = format!(
            "{}?page={page}&per_page={RECORDS_PER_PAGE}",
            self.records_path()
        );
        let response: CloudflareResponse<Vec<CloudflareDnsRecord>> =
            self.send(Method::GET, &path, None).await?;

        let has_more = response.result_info.as_ref().is_some_and(|i| i.has_more());
        Ok((response.result.unwrap_or_default(), has_more))
    }

    /// POST a new record.
    pub(crate) async fn post_record(
        &self,
        body: &CloudflareRecordBody<'_>,
    ) -> Result<CloudflareDnsRecord> {
        self.send_for_result(Method::POST, &self.records_path(), Some(body))
            .await
    }

    /// PUT (full replace) an existing record.
    pub(crate) async fn put_record(
        &self,
        record_id: &str,
        body: &CloudflareRecordBody<'_>,
    ) -> Result<CloudflareDnsRecord> {
        self.send_for_result(Method::PUT, &self.record_path(record_id), Some(body))
            .await
    }

    /// DELETE a record.
    pub(crate) async fn delete_record_by_id(&self, record_id: &str) -> Result<()> {
        self.send::<serde_json::Value>(Method::DELETE, &self.record_path(record_id), None)
            .await
            .map(|_| ())
    }
}
