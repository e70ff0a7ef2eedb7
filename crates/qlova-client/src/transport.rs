//! HTTP exchange with the extension under test.
//!
//! Defines the `Transport` async trait so the client can be driven against
//! a real endpoint or an in-process fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::TransportError;

/// One POST-JSON / receive-JSON round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post `body` to `endpoint` with the extra `headers` and return the
    /// decoded response object.
    async fn exchange(
        &self,
        endpoint: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> Result<Value, TransportError>;
}

/// `reqwest`-backed transport. Anything but HTTP 200 with a JSON object
/// body is an error.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(
        &self,
        endpoint: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> Result<Value, TransportError> {
        // `json` sets Content-Type: application/json.
        let mut request = self.client.post(endpoint).json(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                status = status.as_u16(),
                endpoint = %endpoint,
                "Extension returned an error status"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| TransportError::InvalidBody(e.to_string()))?;
        if !value.is_object() {
            return Err(TransportError::InvalidBody(format!(
                "expected a JSON object, got {}",
                value
            )));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        // Reserve a port, then free it so nothing is listening there.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let result = transport
            .exchange(&format!("http://127.0.0.1:{}/", port), &[], &serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }

    #[tokio::test]
    async fn test_invalid_url_is_request_error() {
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let result = transport
            .exchange("not a url", &[], &serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
