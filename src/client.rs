// src/client.rs
//
// How the row processor reaches the analysis operations: over HTTP against a
// running service, or in-process through `AnalysisService` directly.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use crate::core::net::Transport;
use crate::error::{Error, ErrorKind, Result};
use crate::record::{GitHubProfileRecord, LeetCodeProfileRecord};
use crate::service::{AnalysisService, LeetCodeRequest};

/// One call per identifier. An `Err` means no record came back at all
/// (timeout, refused connection, non-2xx, unreadable body).
pub trait AnalysisClient {
    fn github(&self, login: &str) -> Result<GitHubProfileRecord>;
    fn leetcode(&self, url: &str) -> Result<LeetCodeProfileRecord>;
}

pub struct HttpAnalysisClient {
    base: Url,
    client: Client,
}

impl HttpAnalysisClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| Error::with_source(ErrorKind::Config, format!("Invalid service URL {base_url:?}"), e))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(crate::config::consts::USER_AGENT)
            .build()?;
        Ok(Self { base, client })
    }

    /// Base URL + path segments, each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("Service URL cannot take a path: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn decode<R: DeserializeOwned>(resp: Response) -> Result<R> {
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(Error::new(ErrorKind::Upstream, format!("analysis service answered {status}")));
        }
        serde_json::from_str(&body).map_err(Error::from)
    }
}

impl AnalysisClient for HttpAnalysisClient {
    fn github(&self, login: &str) -> Result<GitHubProfileRecord> {
        let url = self.endpoint(&["analyze", "github", login])?;
        logd!("Client: GET {url}");
        Self::decode(self.client.get(url).send()?)
    }

    fn leetcode(&self, url: &str) -> Result<LeetCodeProfileRecord> {
        let endpoint = self.endpoint(&["analyze", "leetcode", ""])?;
        logd!("Client: POST {endpoint} ({url})");
        let req = LeetCodeRequest { url: s!(url) };
        Self::decode(self.client.post(endpoint).json(&req).send()?)
    }
}

/// In-process: no service hop, the operations never fail outright.
impl<T: Transport> AnalysisClient for AnalysisService<T> {
    fn github(&self, login: &str) -> Result<GitHubProfileRecord> {
        Ok(self.analyze_github(login))
    }

    fn leetcode(&self, url: &str) -> Result<LeetCodeProfileRecord> {
        Ok(self.analyze_leetcode(url))
    }
}
