//! Test doubles and common utilities for contract tests
//!
//! - [`MockRegistrar`]: an axum server on `127.0.0.1:0` that answers
//!   `/nic/update` and records every request it sees
//! - [`CountingUpdater`]: an `Updater` with no network, for clock-controlled tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use noip_core::{Error, Result, Updater};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A request as the mock registrar received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Raw query string, still encoded
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

impl RecordedRequest {
    /// Decoded query pairs in wire order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query.as_deref().unwrap_or_default().as_bytes())
            .into_owned()
            .collect()
    }

    /// Decoded value of `key`, if present
    pub fn param(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[derive(Clone)]
struct RegistrarState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    body: Arc<String>,
    delay: Duration,
}

async fn nic_update(
    State(state): State<RegistrarState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        query,
        authorization: header_str(header::AUTHORIZATION),
        user_agent: header_str(header::USER_AGENT),
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (state.status, state.body.to_string())
}

/// Mock dynupdate endpoint that shuts down when dropped
pub struct MockRegistrar {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl MockRegistrar {
    /// Answer every request with `200 OK` and `body`
    pub async fn start(body: &str) -> Self {
        Self::start_with(StatusCode::OK, body, Duration::ZERO).await
    }

    /// Answer every request with `status` and `body`
    pub async fn start_with_status(status: StatusCode, body: &str) -> Self {
        Self::start_with(status, body, Duration::ZERO).await
    }

    /// Answer every request after `delay`
    pub async fn start_with_delay(body: &str, delay: Duration) -> Self {
        Self::start_with(StatusCode::OK, body, delay).await
    }

    async fn start_with(status: StatusCode, body: &str, delay: Duration) -> Self {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock registrar");
        let addr = listener.local_addr().expect("mock registrar address");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = RegistrarState {
            requests: Arc::clone(&requests),
            status,
            body: Arc::new(body.to_string()),
            delay,
        };

        let router = Router::new()
            .route("/nic/update", get(nic_update))
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Endpoint URL to hand to `NoIpClient::with_endpoint`
    pub fn endpoint(&self) -> String {
        format!("http://{}/nic/update", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Drop for MockRegistrar {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// An endpoint on a port nothing listens on
pub async fn refused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway address");
    drop(listener);
    format!("http://{}/nic/update", addr)
}

/// An Updater that counts calls and never touches the network
pub struct CountingUpdater {
    hostname: String,
    calls: Arc<AtomicUsize>,
    latency: Duration,
    fail: bool,
}

impl CountingUpdater {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            latency: Duration::ZERO,
            fail: false,
        }
    }

    /// Take `latency` (on the tokio clock) to answer each update
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every update with a transport error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Shared counter of started update calls
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Updater for CountingUpdater {
    async fn update(&self) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.fail {
            Err(Error::transport(format!("simulated failure #{}", call)))
        } else {
            Ok(format!("good 203.0.113.{}", call))
        }
    }

    fn hostname(&self) -> &str {
        &self.hostname
    }
}

/// Read a shared call counter
pub fn count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}
