//! Request transport for the staker daemon client

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::errors::{RpcError, RpcResult};

/// Raw HTTP answer; the client decides what a non-2xx status means
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Delivers one serialised JSON-RPC request and returns the raw answer
pub trait RpcTransport: Send + Sync {
    fn post(
        &self,
        method: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = RpcResult<TransportResponse>> + Send;
}

/// Turn a daemon address into an HTTP endpoint
///
/// `tcp://host:port` is the daemon's listener notation and maps to plain HTTP.
pub fn parse_daemon_address(address: &str) -> RpcResult<Url> {
    let invalid = |reason: String| RpcError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let trimmed = address.trim();
    let normalised = match trimmed.split_once("://") {
        Some(("tcp", rest)) => format!("http://{}", rest),
        Some(("http", _)) | Some(("https", _)) => trimmed.to_string(),
        Some((scheme, _)) => return Err(invalid(format!("unsupported scheme {}", scheme))),
        None => return Err(invalid("missing scheme, expected tcp://host:port".to_string())),
    };

    let url = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

/// reqwest-backed transport sharing one connection pool
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> RpcResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RpcError::Transport {
                method: "connect".to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_error(&self, method: &str, err: reqwest::Error) -> RpcError {
        if err.is_timeout() {
            RpcError::Timeout {
                timeout_seconds: self.timeout.map_or(0, |t| t.as_secs()),
                method: method.to_string(),
            }
        } else {
            RpcError::Transport {
                method: method.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl RpcTransport for HttpTransport {
    async fn post(&self, method: &str, body: Vec<u8>) -> RpcResult<TransportResponse> {
        debug!("POST {} ({} bytes) for {}", self.endpoint, body.len(), method);

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_error(method, e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(method, e))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
