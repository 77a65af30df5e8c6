use anyhow::{Context, anyhow};
use bytes::Bytes;
use reqwest::{
    Method, StatusCode,
    blocking::Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::Serialize;

use crate::{api, error::ErrorCode};

/// Path polled before any action runs.
const REACHABLE_PATH: &str = "v1/reachable";

/// What came back from a single API call.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// Status 200; the body is left for the caller to decode.
    Success(Bytes),
    /// Any other status, or no response at all.
    Rejected(Vec<ErrorCode>),
}

/// Blocking client bound to one server address. Each call is independent.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new<S: Into<String>>(base_url: S) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Issue one request. `token` is sent as `Authorization: Bearer JWT <token>`.
    pub fn send<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
        method: Method,
        token: Option<&str>,
    ) -> anyhow::Result<Reply> {
        let url = self.url(path);
        tracing::debug!("{method} {url}");

        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            let body = serde_json::to_vec(body).context("Failed to serialize request body")?;
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("Bearer JWT {token}"));
        }

        let res = match req.send() {
            Ok(res) => res,
            Err(e) if e.is_builder() => Err(e).context("Failed to build request")?,
            Err(e) => {
                tracing::debug!("Request to {url} failed: {e}");
                return Ok(Reply::Rejected(vec![ErrorCode::ConnectionFailed]));
            }
        };

        let status = res.status();
        tracing::debug!("{url} responded with {status}");
        let body = res.bytes().context("Failed to read response body")?;
        if status != StatusCode::OK {
            return Ok(Reply::Rejected(api::decode_errors(&body)?));
        }
        Ok(Reply::Success(body))
    }

    /// Check that the management API answers at all before doing anything else.
    pub fn check_reachable(&self) -> anyhow::Result<()> {
        let url = self.url(REACHABLE_PATH);
        tracing::debug!("Checking reachability via {url}");
        let res = self
            .client
            .get(&url)
            .send()
            .context("Management API not reachable")?;
        if res.status() != StatusCode::OK {
            Err(anyhow!(
                "Management API not reachable: status {}",
                res.status()
            ))?;
        }
        Ok(())
    }
}
