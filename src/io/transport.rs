//! HTTP transport to the Submission API receiver. `Transport` is the seam the
//! pipeline posts through; `HttpTransport` is the blocking reqwest client.
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::core::settings::Credentials;
use crate::core::url::join_url;
use crate::error::{Error, Result};

/// Content type the receiver endpoint is sent for form bodies, XML notwithstanding.
pub const FORM_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    fn post(&self, url: &str, body: &str, credentials: &Credentials) -> Result<HttpReply>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, url: &str, body: &str, credentials: &Credentials) -> Result<HttpReply> {
        (**self).post(url, body, credentials)
    }
}

/// `{base}/a/{project_space}/receiver/`
pub fn receiver_url(base_url: &str, project_space: &str) -> String {
    join_url(base_url, &format!("/a/{project_space}/receiver/"))
}

/// Standard reason phrase for `status`, e.g. `Unprocessable Entity` for 422.
pub fn reason_phrase(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::NetworkTimeout {
                after: self.timeout,
            }
        } else {
            Error::Network(e.to_string())
        }
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: &str, credentials: &Credentials) -> Result<HttpReply> {
        info!("POST {} ({} bytes)", url, body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .body(body.to_owned())
            .send()
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        info!("Receiver answered HTTP {}", status);

        // Non-2xx bodies are never interpreted, so they are not read either.
        let body = if response.status().is_success() {
            response.text().map_err(|e| self.map_error(e))?
        } else {
            String::new()
        };
        debug!("Response body: {}", body);
        Ok(HttpReply { status, body })
    }
}
