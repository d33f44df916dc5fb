// reqwest-backed implementation of the console API port
use crate::application::console_api::{ApiFault, ConsoleApi, HttpMethod};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpConsoleApi {
    client: reqwest::Client,
    base_url: String,
    base_path: String,
}

impl HttpConsoleApi {
    pub fn new(base_url: String, base_path: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, base_path)
    }

    pub fn with_client(client: reqwest::Client, base_url: String, base_path: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            base_path: normalize_base_path(&base_path),
        }
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, self.base_path, endpoint)
    }
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[async_trait]
impl ConsoleApi for HttpConsoleApi {
    async fn call(&self, endpoint: &str, method: HttpMethod, body: Option<Value>) -> Result<Value, ApiFault> {
        let url = self.build_url(endpoint);

        let request = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiFault::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiFault::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiFault::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiFault::Parse(e.to_string()))
    }
}
