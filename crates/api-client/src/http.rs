use crate::error::ApiError;
use configuration::ProviderConfig;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// Builds a `reqwest::Client` carrying the provider's timeout and API key.
pub(crate) fn build_client(config: &ProviderConfig) -> Result<reqwest::Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(key) = config.api_key() {
        let value = HeaderValue::from_str(key)
            .map_err(|_| ApiError::InvalidData("API key contains invalid header characters".to_string()))?;
        headers.insert("X-API-Key", value);
    }

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

/// Joins a base URL and an endpoint path without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Issues a GET and decodes the JSON body, mapping non-success statuses to
/// `ApiError::Upstream`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, ApiError> {
    let response = client.get(url).query(query).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
    } else {
        tracing::warn!(%url, status = status.as_u16(), "Provider returned an error status");
        Err(ApiError::Upstream(status.as_u16(), text))
    }
}
