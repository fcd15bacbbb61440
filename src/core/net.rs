// src/core/net.rs
//
// Outbound HTTP for the analysis service. One request per call, bounded by the
// client timeout, no retries. Non-2xx statuses are NOT errors here: callers
// get the status and body and decide what they mean.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::config::consts::ACCEPT_JSON;
use crate::error::{Error, ErrorKind, Result};

/// Status code + raw body of an upstream answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status line as reqwest would print it, e.g. `403 Forbidden`.
    pub fn status_line(&self) -> String {
        match reqwest::StatusCode::from_u16(self.status) {
            Ok(code) => code.to_string(),
            Err(_) => self.status.to_string(),
        }
    }
}

/// The seam between the service and the network. Tests plug in canned replies.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<Reply>;
    fn post_json(&self, url: &str, body: &Value) -> Result<Reply>;
}

/// Blocking reqwest client with the service's timeout and headers baked in.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| Error::with_source(ErrorKind::Config, "Invalid user agent", e))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config, "Failed to build HTTP client", e))?;

        Ok(Self { client })
    }

    fn read(resp: reqwest::blocking::Response) -> Result<Reply> {
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(Reply { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Reply> {
        logd!("Net: GET {url}");
        let resp = self.client.get(url).send()?;
        Self::read(resp)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Reply> {
        logd!("Net: POST {url}");
        let resp = self.client.post(url).json(body).send()?;
        Self::read(resp)
    }
}
