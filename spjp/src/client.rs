//! Fetching badge and emote listings from the badge server.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::models::{ApiEnvelope, BadgeSet, Emote};

/// A source of badge and emote listings.
///
/// In practice this is the badge server over http, via [`CatalogClient`]. Tests and offline
/// callers can supply fixed listings with [`StaticCatalog`].
#[async_trait]
pub trait FetchCatalog: Send + Sync {
    async fn fetch_badges(&self) -> Result<Vec<BadgeSet>>;

    async fn fetch_emotes(&self) -> Result<Vec<Emote>>;

    /// Fetch both listings concurrently. Each listing succeeds or fails on its own.
    async fn fetch_all(&self) -> (Result<Vec<BadgeSet>>, Result<Vec<Emote>>) {
        tokio::join!(self.fetch_badges(), self.fetch_emotes())
    }
}

/// Install the process-wide rustls crypto provider. Safe to call more than once.
pub fn install_crypto_provider() {
    // Err only means a provider is already installed
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// The concrete implementation of `FetchCatalog`, talking to the badge server with `reqwest`.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
}

impl CatalogClient {
    pub fn new(base_url: Url, request_timeout: Duration) -> Result<Self> {
        install_crypto_provider();
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("spjp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Other(anyhow::anyhow!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_listing<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<Vec<T>> {
        let url = ensure_slash(&self.base_url)
            .join(path)
            .map_err(|e| Error::Config {
                message: format!("Failed to construct {what} URL: {e}"),
            })?;

        debug!("Fetching {} from {}", what, url);

        let response = self
            .client
            .get(url.clone())
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|source| Error::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Failed to fetch {} from {}: HTTP {}", what, url, status);
            return Err(Error::Api { status, body });
        }

        // Get the response body as text first for logging
        let body_text = response.text().await.map_err(|source| Error::Http {
            url: url.to_string(),
            source,
        })?;

        let envelope: ApiEnvelope<T> = match serde_json::from_str(&body_text) {
            Ok(parsed) => parsed,
            Err(source) => {
                tracing::error!("Failed to parse {} response as JSON. Error: {}", what, source);
                tracing::debug!("Response body was: {}", body_text);
                return Err(Error::Decode {
                    what: what.to_string(),
                    source,
                });
            }
        };

        if let Some(message) = envelope.error {
            return Err(Error::Backend { message });
        }

        debug!("Fetched {} {}", envelope.data.len(), what);
        Ok(envelope.data)
    }
}

/// Makes sure a url has a trailing slash.
///
/// `Url::join` replaces the last path segment unless the base ends in '/', so joining
/// 'https://host/site' with 'api/badges' would otherwise give 'https://host/api/badges'.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

#[async_trait]
impl FetchCatalog for CatalogClient {
    async fn fetch_badges(&self) -> Result<Vec<BadgeSet>> {
        self.get_listing("api/badges", "badges").await
    }

    async fn fetch_emotes(&self) -> Result<Vec<Emote>> {
        self.get_listing("api/emotes", "emotes").await
    }
}

/// A fixed set of listings, for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    pub badges: Vec<BadgeSet>,
    pub emotes: Vec<Emote>,
}

#[async_trait]
impl FetchCatalog for StaticCatalog {
    async fn fetch_badges(&self) -> Result<Vec<BadgeSet>> {
        debug!("Returning static badge list with {} badges", self.badges.len());
        Ok(self.badges.clone())
    }

    async fn fetch_emotes(&self) -> Result<Vec<Emote>> {
        debug!("Returning static emote list with {} emotes", self.emotes.len());
        Ok(self.emotes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CatalogClient {
        CatalogClient::new(Url::parse(&server.uri()).unwrap(), Duration::from_secs(5)).unwrap()
    }

    fn badge_listing() -> serde_json::Value {
        json!({
            "data": [
                {
                    "set_id": "legendus",
                    "versions": [{"id": "1", "image_url_1x": "https://example.com/l/1"}],
                    "created_at": "2025-06-28T06:15:55.000Z",
                    "has_real_timestamp": true
                },
                {
                    "set_id": "moderator",
                    "versions": [{"id": "1", "image_url_1x": "https://example.com/m/1"}],
                    "has_real_timestamp": false
                }
            ]
        })
    }

    #[test]
    fn test_ensure_slash() {
        let url = Url::parse("https://example.com/site").unwrap();
        assert_eq!(ensure_slash(&url).join("api/badges").unwrap().as_str(), "https://example.com/site/api/badges");

        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(ensure_slash(&url).join("api/emotes").unwrap().as_str(), "https://example.com/api/emotes");
    }

    #[test_log::test(tokio::test)]
    async fn test_fetch_badges() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/badges"))
            .respond_with(ResponseTemplate::new(200).set_body_json(badge_listing()))
            .expect(1)
            .mount(&server)
            .await;

        let badges = client_for(&server).fetch_badges().await.unwrap();
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].set_id, "legendus");
        assert!(badges[0].has_real_timestamp);
        assert_eq!(badges[1].created_at, None);
    }

    #[test_log::test(tokio::test)]
    async fn test_fetch_under_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mirror/api/emotes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/mirror", server.uri())).unwrap();
        let client = CatalogClient::new(base, Duration::from_secs(5)).unwrap();
        assert!(client.fetch_emotes().await.unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/badges"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Failed to fetch badges"})))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_badges().await.unwrap_err();
        match err {
            Error::Api { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert!(body.contains("Failed to fetch badges"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_error_payload_with_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/emotes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "Failed to get access token"})))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_emotes().await.unwrap_err();
        assert!(matches!(err, Error::Backend { ref message } if message == "Failed to get access token"));
        assert_eq!(err.user_message(), "Failed to get access token");
    }

    #[test_log::test(tokio::test)]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/badges"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_badges().await.unwrap_err();
        assert!(matches!(err, Error::Decode { ref what, .. } if what == "badges"));
    }

    #[test_log::test(tokio::test)]
    async fn test_unreachable_server() {
        // Nothing listens on port 9 on a test machine
        let client = CatalogClient::new(Url::parse("http://127.0.0.1:9").unwrap(), Duration::from_secs(2)).unwrap();
        let err = client.fetch_badges().await.unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
    }

    #[test_log::test(tokio::test)]
    async fn test_fetch_all_keeps_the_listing_that_loaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/badges"))
            .respond_with(ResponseTemplate::new(200).set_body_json(badge_listing()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/emotes"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (badges, emotes) = client_for(&server).fetch_all().await;
        assert_eq!(badges.unwrap().len(), 2);
        let err = emotes.unwrap_err();
        assert!(matches!(err, Error::Api { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_static_catalog() {
        let catalog = StaticCatalog::default();
        let (badges, emotes) = catalog.fetch_all().await;
        assert!(badges.unwrap().is_empty());
        assert!(emotes.unwrap().is_empty());
    }
}
