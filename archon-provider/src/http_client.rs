//! Shared HTTP plumbing for the remote providers.
//!
//! Each provider builds its own `RequestBuilder` (auth headers and signing
//! differ too much to unify); this module sends it, logs the exchange and
//! decodes the body. Requests are sent exactly once.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP helper functions.
pub struct HttpUtils;

impl HttpUtils {
    /// Send a request and return `(status_code, response_text)`.
    ///
    /// Non-2xx statuses are not errors here: Cloudflare and Route53 both put
    /// the failure reason in the body, which the caller decodes.
    ///
    /// # Errors
    /// [`ProviderError::Transport`] when the request times out, cannot
    /// connect, or the body cannot be read.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            let detail = if e.is_timeout() {
                format!("request timed out: {e}")
            } else {
                e.to_string()
            };
            log::warn!("[{provider_name}] {method_name} {url} failed: {detail}");
            ProviderError::Transport {
                provider: provider_name.to_string(),
                detail,
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    ///
    /// # Errors
    /// [`ProviderError::Decode`] when the text is not the expected JSON.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::Decode {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Parse an XML response body.
    ///
    /// # Errors
    /// [`ProviderError::Decode`] when the text is not the expected document.
    #[cfg(feature = "route53")]
    pub fn parse_xml<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        quick_xml::de::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] XML parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::Decode {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}
