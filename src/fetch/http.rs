//! HTTP retrieval from a source-indexed endpoint (`GET {url}?source={key}`)

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::sources::SourceKind;

use super::{FetchError, SourceFetcher};

pub struct HttpFetcher {
    client: reqwest::Client,
    entries_url: String,
}

impl HttpFetcher {
    pub fn new(entries_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            entries_url: entries_url.into(),
        })
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError> {
        tracing::debug!(source = kind.key(), url = %self.entries_url, "Fetching source");

        let response = self
            .client
            .get(&self.entries_url)
            .query(&[("source", kind.key())])
            .send()
            .await
            .map_err(|source| FetchError::Request { kind, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                kind,
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::Request { kind, source })?;

        serde_json::from_str(&text).map_err(|source| FetchError::Decode { kind, source })
    }

    fn describe(&self) -> String {
        format!("http: {}", self.entries_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the request head
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/entries", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_fetch_sends_source_key() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", r#"[{"id":"1"}]"#).await;
        let fetcher = HttpFetcher::new(url, Duration::from_secs(5)).unwrap();

        let value = fetcher.fetch(SourceKind::C).await.unwrap();
        assert_eq!(value[0]["id"], "1");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/entries?source=c "));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let (url, _server) = serve_once("HTTP/1.1 503 Service Unavailable", "").await;
        let fetcher = HttpFetcher::new(url, Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch(SourceKind::B).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert_eq!(err.to_string(), "Failed to fetch source b: HTTP 503");
    }

    #[tokio::test]
    async fn test_invalid_body_is_a_decode_error() {
        let (url, _server) = serve_once("HTTP/1.1 200 OK", "<html>oops</html>").await;
        let fetcher = HttpFetcher::new(url, Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch(SourceKind::A).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { kind: SourceKind::A, .. }));
    }
}
