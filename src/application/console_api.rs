// Port for the remote console API
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// Failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiFault {
    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },
    /// The request never produced a response.
    #[error("network failure: {0}")]
    Network(String),
    /// The response body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Parse(String),
}

#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Issue one request against `endpoint` (relative to the API base path).
    /// Implementations must not retry.
    async fn call(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<Value>,
    ) -> Result<Value, ApiFault>;
}
