use reqwest::{RequestBuilder, Response, StatusCode, Url};

use crate::{FailureKind, ServiceSettings, StoreError};

pub(crate) fn build_client(settings: &ServiceSettings) -> Result<reqwest::Client, StoreError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| StoreError::new(FailureKind::Network, err.to_string()))
}

/// `{base_url}/{path}` with any trailing slash on the base ignored.
pub(crate) fn endpoint(settings: &ServiceSettings, path: &str) -> Result<Url, StoreError> {
    let raw = format!("{}/{}", settings.base_url.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|err| StoreError::new(FailureKind::InvalidUrl, err.to_string()))
}

/// Adds the service key and the bearer credential.
pub(crate) fn authorize(
    request: RequestBuilder,
    settings: &ServiceSettings,
    token: Option<&str>,
) -> RequestBuilder {
    let bearer = token.unwrap_or(&settings.anon_key);
    request
        .header("apikey", settings.anon_key.as_str())
        .bearer_auth(bearer)
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        return StoreError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return StoreError::new(FailureKind::Decode, err.to_string());
    }
    StoreError::new(FailureKind::Network, err.to_string())
}

pub(crate) fn status_failure(status: StatusCode) -> FailureKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureKind::Unauthorized,
        StatusCode::NOT_FOUND => FailureKind::NotFound,
        other => FailureKind::HttpStatus(other.as_u16()),
    }
}

/// Sends the request and turns any non-2xx status into an error.
pub(crate) async fn send_checked(request: RequestBuilder) -> Result<Response, StoreError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {body}")
        };
        return Err(StoreError::new(status_failure(status), message));
    }
    Ok(response)
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, StoreError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| StoreError::new(FailureKind::Decode, err.to_string()))
}

pub(crate) fn json_body<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(|err| StoreError::new(FailureKind::Decode, err.to_string()))
}
