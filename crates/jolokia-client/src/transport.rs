//! Single-shot HTTP round trips.
//!
//! The transport knows nothing about Jolokia: it sends a prepared request once
//! and hands back the status and raw body.

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::request::PreparedRequest;

/// Raw agent response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// HTTP transport shared by every call of a client.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    timeout: Option<Duration>,
    credentials: Option<Credentials>,
}

impl Transport {
    /// Build a transport; `timeout` of `None` keeps reqwest's default.
    pub fn new(timeout: Option<Duration>, credentials: Option<Credentials>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("jolokia-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            timeout,
            credentials,
        })
    }

    /// Perform one round trip. Non-2xx statuses are errors.
    pub async fn send(&self, request: &PreparedRequest) -> Result<RawResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending Jolokia request");

        let mut builder = self.http.request(request.method.clone(), &request.url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(creds) = &self.credentials {
            builder = builder.basic_auth(&creds.user, Some(&creds.password));
        }
        if let Some(body) = &request.body {
            let json = serde_json::to_vec(body).map_err(Error::Encode)?;
            tracing::trace!(body = %String::from_utf8_lossy(&json), "Request body");
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(json);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?.to_vec();
        tracing::trace!(status = status.as_u16(), bytes = body.len(), "Received Jolokia response");

        Ok(RawResponse { status, body })
    }
}
