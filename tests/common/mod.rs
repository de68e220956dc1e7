//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use statuswatch::config::{ProbeConfig, TargetConfig};
use statuswatch::notifications::{Notifier, NotifierError, TransitionEvent};
use statuswatch::health::Prober;
use statuswatch::{CheckRecord, Classification};

/// What the mock target answers with.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockResponse {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Start a mock HTTP target on an ephemeral port.
///
/// `f` receives the zero-based request number.
pub async fn start_target<F>(f: F) -> SocketAddr
where
    F: Fn(usize) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let counter = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let response = f(n);
                        tokio::time::sleep(response.delay).await;

                        let reason = match response.status {
                            200 => "OK",
                            404 => "Not Found",
                            500 => "Internal Server Error",
                            503 => "Service Unavailable",
                            _ => "Unknown",
                        };
                        let raw = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.status,
                            reason,
                            response.body.len(),
                            response.body
                        );
                        let _ = socket.write_all(raw.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock target that always gives the same answer.
pub async fn start_fixed_target(response: MockResponse) -> SocketAddr {
    start_target(move |_| response.clone()).await
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") && buf.len() < 16 * 1024 {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Prober that replays a fixed script of outcomes per target URL.
///
/// Once a target's script runs out it keeps returning `Up`.
#[derive(Default)]
pub struct ScriptedProber {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
}

pub enum Scripted {
    Record(CheckRecord),
    Panic,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, url: &str, outcomes: impl IntoIterator<Item = Scripted>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), outcomes.into_iter().collect());
        self
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, target: &TargetConfig, _settings: &ProbeConfig) -> CheckRecord {
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&target.url)
            .and_then(|q| q.pop_front());
        match next {
            Some(Scripted::Record(record)) => record,
            Some(Scripted::Panic) => panic!("scripted probe panic for {}", target.url),
            None => up(0.1),
        }
    }
}

/// Prober whose every check takes `delay` before reporting `Up`.
pub struct SlowProber {
    pub delay: Duration,
}

#[async_trait]
impl Prober for SlowProber {
    async fn probe(&self, _target: &TargetConfig, _settings: &ProbeConfig) -> CheckRecord {
        tokio::time::sleep(self.delay).await;
        up(0.1)
    }
}

pub fn up(latency_secs: f64) -> CheckRecord {
    CheckRecord::new(Classification::Up, Duration::from_secs_f64(latency_secs), None)
}

pub fn slow(latency_secs: f64) -> CheckRecord {
    CheckRecord::new(Classification::Slow, Duration::from_secs_f64(latency_secs), None)
}

pub fn down() -> CheckRecord {
    CheckRecord::failed(Classification::Down, "request timed out")
}

/// Notifier that keeps every event it was handed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<TransitionEvent>>,
    pub alerts_only: bool,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn alerts_only() -> Self {
        Self {
            alerts_only: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn take(&self) -> Vec<TransitionEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    fn wants(&self, event: &TransitionEvent) -> bool {
        !self.alerts_only || event.is_alert_flip()
    }

    async fn notify(&self, event: &TransitionEvent) -> Result<(), NotifierError> {
        if self.fail {
            return Err(NotifierError::Rejected(500));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
