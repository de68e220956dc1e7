//! Probe execution.
//!
//! # Responsibilities
//! - Issue exactly one timed GET per target
//! - Map the response, transport error or timeout onto a `CheckRecord`
//!
//! # Design Decisions
//! - The timeout covers the whole fetch, including reading the body for the keyword check
//! - No retries here; the next scheduled pass is the retry
//! - Nothing escapes the prober: every failure becomes a record

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time;
use url::Url;

use crate::config::{ProbeConfig, TargetConfig};
use crate::health::classification::{CheckRecord, Classification};

pub const TIMEOUT_DETAIL: &str = "request timed out";
pub const KEYWORD_MISSING_DETAIL: &str = "keyword missing";

/// Performs a single check of a target.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &TargetConfig, settings: &ProbeConfig) -> CheckRecord;
}

/// HTTP prober backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Send the request and, for successful responses, read the whole body.
    async fn fetch(&self, url: Url) -> Result<(StatusCode, Option<String>), reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = if status.is_success() {
            Some(response.text().await?)
        } else {
            None
        };
        Ok((status, body))
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &TargetConfig, settings: &ProbeConfig) -> CheckRecord {
        let url = match Url::parse(&target.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(target_url = %target.url, error = %e, "Cannot probe target: invalid URL");
                return CheckRecord::failed(Classification::Error, "unexpected error: invalid url");
            }
        };

        let timeout = settings.timeout();
        let started = Instant::now();
        let fetch = self.fetch(url);

        match time::timeout(timeout, fetch).await {
            Ok(Ok((status, body))) => {
                let elapsed = started.elapsed();
                let keyword_found = target
                    .keyword
                    .as_deref()
                    .map(|kw| body.as_deref().is_some_and(|b| b.contains(kw)));
                let (classification, detail) =
                    classify_response(status, elapsed, settings.slow_threshold(), keyword_found);
                if classification == Classification::Error {
                    tracing::warn!(target_url = %target.url, status = %status, detail = ?detail, "Check failed: bad response");
                }
                CheckRecord::new(classification, elapsed, detail)
            }
            Ok(Err(e)) => {
                let record = transport_failure(&e);
                tracing::warn!(target_url = %target.url, error = %e, detail = ?record.detail, "Check failed: transport error");
                record
            }
            Err(_) => {
                tracing::warn!(target_url = %target.url, timeout_secs = timeout.as_secs_f64(), "Check failed: timeout");
                CheckRecord::failed(Classification::Down, TIMEOUT_DETAIL)
            }
        }
    }
}

/// Classify a completed HTTP exchange.
///
/// `keyword_found` is `None` when no keyword is configured.
pub fn classify_response(
    status: StatusCode,
    elapsed: Duration,
    slow_threshold: Duration,
    keyword_found: Option<bool>,
) -> (Classification, Option<String>) {
    if !status.is_success() {
        return (Classification::Error, Some(format!("HTTP {}", status.as_u16())));
    }
    if keyword_found == Some(false) {
        return (Classification::Error, Some(KEYWORD_MISSING_DETAIL.to_string()));
    }
    if elapsed > slow_threshold {
        (Classification::Slow, None)
    } else {
        (Classification::Up, None)
    }
}

/// Map a reqwest failure onto a record.
pub fn transport_failure(err: &reqwest::Error) -> CheckRecord {
    if err.is_timeout() {
        return CheckRecord::failed(Classification::Down, TIMEOUT_DETAIL);
    }
    if err.is_builder() {
        return CheckRecord::failed(Classification::Error, "unexpected error: request build failed");
    }
    CheckRecord::failed(
        Classification::Down,
        format!("network error: {}", transport_category(err)),
    )
}

fn transport_category(err: &reqwest::Error) -> &'static str {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return "connection refused";
            }
        }
        if cause.to_string().starts_with("dns error") {
            return "dns resolution failed";
        }
        source = cause.source();
    }

    if err.is_connect() {
        "connection failed"
    } else if err.is_redirect() {
        "redirect loop"
    } else if err.is_body() || err.is_decode() {
        "body read failed"
    } else if err.is_request() {
        "request failed"
    } else {
        "transport failure"
    }
}
