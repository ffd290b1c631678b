//! Single-shot HTTP helper shared by the provider importers.
//!
//! Every importer should use [`get_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so that non-success
//! statuses and undecodable bodies are reported the same way for every
//! provider.
//!
//! No retries happen here: a failed import exits non-zero and the external
//! scheduler owns re-runs.

use std::time::Duration;

use crate::SourceError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Builds the HTTP client shared by all importers in one run.
///
/// # Errors
///
/// Returns [`reqwest::Error`] if the TLS backend cannot be initialized.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Sends a GET to `url` and parses the response body as JSON.
///
/// A blank body is returned as [`serde_json::Value::Null`] so callers can
/// treat it as an empty catalog.
///
/// # Errors
///
/// * [`SourceError::Fetch`] if the status is not 2xx.
/// * [`SourceError::Http`] if the request or body read fails.
/// * [`SourceError::InvalidResponse`] if the body is not valid JSON.
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    source_name: &str,
) -> Result<serde_json::Value, SourceError> {
    log::debug!("[{source_name}] GET {url}");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| SourceError::Http {
            source_name: source_name.to_string(),
            error,
        })?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("[{source_name}] {url} answered HTTP {status}");
        return Err(SourceError::Fetch {
            source_name: source_name.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let text = response.text().await.map_err(|error| SourceError::Http {
        source_name: source_name.to_string(),
        error,
    })?;

    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }

    serde_json::from_str(&text).map_err(|json_err| {
        let preview = if text.len() > BODY_PREVIEW_LEN {
            format!("{}...", text.chars().take(BODY_PREVIEW_LEN).collect::<String>())
        } else {
            text.clone()
        };
        log::error!(
            "[{source_name}] JSON parse failed.\n  \
             url: {url}\n  \
             status: {status}\n  \
             content-type: {content_type:?}\n  \
             received: {} bytes\n  \
             parse error: {json_err}\n  \
             body preview: {preview}",
            text.len(),
        );
        SourceError::InvalidResponse {
            source_name: source_name.to_string(),
            message: format!(
                "JSON parse failed: {json_err} (received {} bytes, content-type={content_type:?})",
                text.len()
            ),
        }
    })
}

/// Returns a short name for the JSON type of `value`, for error messages.
#[must_use]
pub const fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
