//! HTTP transport that POSTs entries to a collector

use crate::format::entry_json;
use reqlog_core::{Level, LogCallback, LogEntry, Transport, TransportError, TransportResult};
use std::fmt;
use std::time::Duration;

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// URL to POST entries to
    pub url: String,
    /// Optional authorization header value
    pub auth_header: Option<String>,
    /// Custom headers to include
    pub headers: Vec<(String, String)>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Least severe level that is still sent
    pub level: Level,
}

impl HttpTransportConfig {
    /// Create a new configuration for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_header: None,
            headers: Vec::new(),
            timeout_secs: 30,
            level: Level::Silly,
        }
    }

    /// Set the authorization header
    pub fn auth(mut self, value: impl Into<String>) -> Self {
        self.auth_header = Some(value.into());
        self
    }

    /// Add a custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the least severe level that is still sent
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Sends each entry as a JSON POST body
///
/// Delivery runs on a task spawned onto the current tokio runtime, so
/// [`Transport::log`] returns immediately. Outside a runtime the callback
/// receives [`TransportError::Unavailable`] and nothing is sent.
///
/// # Example
///
/// ```rust,ignore
/// use reqlog_transports::{HttpTransport, HttpTransportConfig};
///
/// let config = HttpTransportConfig::new("https://logs.example.com/ingest")
///     .auth("Bearer my-token")
///     .timeout(5);
///
/// let transport = HttpTransport::new(config)?;
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    config: HttpTransportConfig,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: HttpTransportConfig) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// The transport configuration
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    fn request(&self, entry: &LogEntry) -> reqwest::RequestBuilder {
        let mut request = self.client.post(&self.config.url).json(&entry_json(entry));

        if let Some(ref auth_value) = self.config.auth_header {
            request = request.header("Authorization", auth_value);
        }
        for (name, value) in &self.config.headers {
            request = request.header(name, value);
        }
        request
    }
}

async fn send(request: reqwest::RequestBuilder) -> TransportResult<()> {
    let response = request
        .send()
        .await
        .map_err(|e| TransportError::Http(e.to_string()))?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(TransportError::Http(format!(
            "collector returned status {}",
            response.status()
        )))
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.config.url)
            .field("level", &self.config.level)
            .finish()
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    fn log(&self, entry: LogEntry, callback: LogCallback) {
        if !entry.level.is_enabled_for(self.config.level) {
            callback(Ok(()));
            return;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(url = %self.config.url, "http transport used outside a tokio runtime");
                callback(Err(TransportError::Unavailable(e.to_string())));
                return;
            }
        };

        let request = self.request(&entry);
        let url = self.config.url.clone();
        handle.spawn(async move {
            let result = send(request).await;
            if let Err(ref e) = result {
                tracing::debug!(url = %url, error = %e, "log delivery failed");
            }
            callback(result);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqlog_core::Metadata;
    use serde_json::{json, Map, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn entry(level: Level) -> LogEntry {
        LogEntry::new(level, "HTTP GET /", Metadata::default())
    }

    #[test]
    fn test_http_config() {
        let config = HttpTransportConfig::new("https://logs.example.com/ingest")
            .auth("Bearer token")
            .header("X-Source", "api")
            .timeout(5)
            .level(Level::Warn);

        assert_eq!(config.url, "https://logs.example.com/ingest");
        assert_eq!(config.auth_header, Some("Bearer token".to_string()));
        assert_eq!(config.headers, vec![("X-Source".into(), "api".into())]);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.level, Level::Warn);
    }

    #[test]
    fn test_no_runtime_is_unavailable() {
        let transport = HttpTransport::new(HttpTransportConfig::new("http://127.0.0.1:9/")).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();

        transport.log(
            entry(Level::Info),
            Box::new(move |result| {
                tx.send(matches!(result, Err(TransportError::Unavailable(_))))
                    .unwrap()
            }),
        );

        assert!(rx.recv().unwrap());
    }

    #[test]
    fn test_filtered_level_is_skipped() {
        let transport = HttpTransport::new(
            HttpTransportConfig::new("http://127.0.0.1:9/").level(Level::Error),
        )
        .unwrap();
        let (tx, rx) = std::sync::mpsc::channel();

        // No runtime here, so reaching the network path would report an error.
        transport.log(
            entry(Level::Info),
            Box::new(move |result| tx.send(result.is_ok()).unwrap()),
        );

        assert!(rx.recv().unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_collector_reports_http_error() {
        let transport =
            HttpTransport::new(HttpTransportConfig::new("http://127.0.0.1:9/").timeout(2)).unwrap();
        let (tx, rx) = oneshot::channel();

        transport.log(
            entry(Level::Error),
            Box::new(move |result| {
                let _ = tx.send(matches!(result, Err(TransportError::Http(_))));
            }),
        );

        assert!(rx.await.unwrap());
    }

    /// Accepts one connection, answers 200 and hands back the request body
    async fn collector() -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/ingest", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            let body = loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break text[end + 4..end + 4 + length].to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };

            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await
                .unwrap();
            let _ = tx.send(body);
        });

        (url, rx)
    }

    #[tokio::test]
    async fn test_entry_is_posted_to_collector() {
        let (url, body) = collector().await;
        let transport = HttpTransport::new(
            HttpTransportConfig::new(url)
                .auth("Bearer token")
                .timeout(5),
        )
        .unwrap();

        let mut req = Map::new();
        req.insert("url".into(), json!("/orders"));
        let (tx, rx) = oneshot::channel();
        transport.log(
            LogEntry::new(Level::Info, "HTTP GET /orders", Metadata::request(req)),
            Box::new(move |result| {
                let _ = tx.send(result.map_err(|e| e.to_string()));
            }),
        );

        assert_eq!(rx.await.unwrap(), Ok(()));

        let body = body.await.unwrap();
        assert!(body.contains("\"req\""));
        let posted: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(posted["message"], "HTTP GET /orders");
        assert_eq!(posted["req"]["url"], "/orders");
        assert_eq!(posted["level"], "info");
    }
}
