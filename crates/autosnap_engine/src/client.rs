use std::time::Duration;

use autosnap_core::{ResourceId, ScrapeResult};
use autosnap_logging::{redact_url, snap_debug, snap_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::{ApiError, FailureKind, HealthStatus};

/// Service base, fixed at build time through `AUTOSNAP_API_BASE`.
pub const DEFAULT_API_BASE: &str = match option_env!("AUTOSNAP_API_BASE") {
    Some(base) => base,
    None => "https://car-scraper-ev8b.onrender.com/api",
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to every call; a live scrape can take close to two minutes.
    pub request_timeout: Duration,
    pub max_archive_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            max_archive_bytes: 512 * 1024 * 1024,
        }
    }
}

/// The three calls of the fetch workflow plus a liveness probe.
#[async_trait::async_trait]
pub trait ScrapeApi: Send + Sync {
    async fn scrape(&self, listing_url: &str) -> Result<ScrapeResult, ApiError>;
    async fn fetch_archive(&self, resource_id: &ResourceId) -> Result<Vec<u8>, ApiError>;
    async fn delete_folder(&self, resource_id: &ResourceId) -> Result<(), ApiError>;
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestScrapeApi {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl ReqwestScrapeApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidBaseUrl,
                "base url cannot carry a path",
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Appends `segments` to the base path; each one is percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ApiError::new(FailureKind::InvalidBaseUrl, "base url cannot carry a path")
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn origin(&self) -> Url {
        let mut url = self.base.clone();
        url.set_path("/");
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

#[async_trait::async_trait]
impl ScrapeApi for ReqwestScrapeApi {
    async fn scrape(&self, listing_url: &str) -> Result<ScrapeResult, ApiError> {
        let endpoint = self.endpoint(&["scrape"])?;
        snap_debug!("POST {} url={}", endpoint, redact_url(listing_url));

        let payload = serde_json::json!({ "url": listing_url });
        let body = serde_json::to_vec(&payload)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice::<ScrapeResult>(&bytes)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn fetch_archive(&self, resource_id: &ResourceId) -> Result<Vec<u8>, ApiError> {
        let endpoint = self.endpoint(&["download", resource_id.as_str()])?;
        snap_debug!("GET {}", endpoint);

        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let max_bytes = self.settings.max_archive_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "archive too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "archive too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    async fn delete_folder(&self, resource_id: &ResourceId) -> Result<(), ApiError> {
        let endpoint = self.endpoint(&["delete", resource_id.as_str()])?;
        snap_debug!("DELETE {}", endpoint);

        let response = self
            .client
            .delete(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let endpoint = self.origin();
        snap_debug!("GET {}", endpoint);

        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice::<HealthStatus>(&bytes)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

/// Passes 2xx responses through; turns anything else into an error, keeping the
/// service's own `error` text when the body has one.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let server_message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|message| !message.is_empty());

    match server_message {
        Some(message) => {
            snap_warn!("service rejected request with {}: {}", status, message);
            Err(ApiError::new(
                FailureKind::Rejected {
                    status: status.as_u16(),
                    message: message.clone(),
                },
                message,
            ))
        }
        None => Err(status_error(status)),
    }
}

fn status_error(status: StatusCode) -> ApiError {
    ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> ReqwestScrapeApi {
        ReqwestScrapeApi::new(ClientSettings {
            base_url: base.to_string(),
            ..ClientSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let api = api("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["download", "2016"]).unwrap().as_str(),
            "http://localhost:5000/api/download/2016"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let api = api("http://localhost:5000/api/");
        assert_eq!(
            api.endpoint(&["scrape"]).unwrap().as_str(),
            "http://localhost:5000/api/scrape"
        );
    }

    #[test]
    fn endpoint_encodes_resource_segment() {
        let api = api("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["delete", "Unknown/../x"]).unwrap().as_str(),
            "http://localhost:5000/api/delete/Unknown%2F..%2Fx"
        );
    }

    #[test]
    fn origin_drops_api_path() {
        let api = api("http://localhost:5000/api?x=1");
        assert_eq!(api.origin().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn rejects_unusable_base() {
        let err = ReqwestScrapeApi::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidBaseUrl);

        let err = ReqwestScrapeApi::new(ClientSettings {
            base_url: "mailto:someone@example.com".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidBaseUrl);
    }

    #[test]
    fn default_timeout_covers_live_scrape() {
        assert_eq!(
            ClientSettings::default().request_timeout,
            Duration::from_secs(120)
        );
    }
}
