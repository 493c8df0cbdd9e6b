//! Remote quote sources

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;

/// A record from the remote endpoint
///
/// Only `title` is used; every other field is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRecord {
    pub title: String,
}

impl RemoteRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Something the sync agent can fetch remote records from
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RemoteRecord>>;
}

/// Fetches records with a plain `GET` over HTTP
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Create a source for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quotes/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a source from the sync settings in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.sync_url.clone(), config.sync_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<RemoteRecord>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?
            .error_for_status()
            .with_context(|| format!("Server at {} returned an error", self.url))?;

        response
            .json::<Vec<RemoteRecord>>()
            .await
            .with_context(|| format!("Unexpected response from {}", self.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use tokio::net::TcpListener;

    async fn spawn_server(app: Router) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/posts")
    }

    #[tokio::test]
    async fn test_fetch_reads_titles_and_ignores_other_fields() {
        let app = Router::new().route(
            "/posts",
            get(|| async {
                Json(serde_json::json!([
                    {"userId": 1, "id": 1, "title": "first", "body": "ignored"},
                    {"userId": 1, "id": 2, "title": "second", "body": "ignored"}
                ]))
            }),
        );
        let url = spawn_server(app).await;

        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        let records = source.fetch().await.unwrap();

        assert_eq!(
            records,
            vec![RemoteRecord::new("first"), RemoteRecord::new("second")]
        );
    }

    #[tokio::test]
    async fn test_fetch_fails_on_server_error() {
        let app = Router::new().route(
            "/posts",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let url = spawn_server(app).await;

        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        assert!(source.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_fails_when_title_missing() {
        let app = Router::new().route(
            "/posts",
            get(|| async { Json(serde_json::json!([{"id": 1}])) }),
        );
        let url = spawn_server(app).await;

        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        assert!(source.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_fails_on_unreachable_host() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

        let source = HttpSource::new(format!("http://{addr}/posts"), Duration::from_secs(2)).unwrap();
        assert!(source.fetch().await.is_err());
    }

    #[test]
    fn test_from_config_uses_sync_url() {
        let config = Config::default();
        let source = HttpSource::from_config(&config).unwrap();
        assert_eq!(source.url(), crate::config::DEFAULT_SYNC_URL);
    }
}
