// # no-ip Client
//
// Client state and the single authenticated update call.
//
// ## API Reference
//
// ```http
// GET /nic/update?hostname=home.ddns.net&myip=203.0.113.5
// Host: dynupdate.no-ip.com
// Authorization: Basic <base64(user:pass)>
// User-Agent: <useragent>
// ```
//
// The response body is plaintext, see `response` for the vocabulary. This
// client returns it verbatim and never inspects the HTTP status code.
//
// ## Security
//
// - The password NEVER appears in logs or `Debug` output
// - Credentials travel only in the `Authorization` header, never in the URL

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::{Url, form_urlencoded};

use crate::error::{Error, Result};
use crate::response::UpdateResponse;
use crate::scheduler::{SchedulerHandle, UpdateScheduler};
use crate::traits::Updater;

/// dynupdate API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://dynupdate.no-ip.com/nic/update";

/// User agent sent when the caller does not supply one
pub const DEFAULT_USER_AGENT: &str = "unprofession-al/noip/v1.0 maintainer@domain.com";

/// Client for the no-ip dynamic DNS update API
///
/// Everything that identifies the update (credentials, query parameters,
/// user agent) is fixed at construction. The client can be shared freely
/// across tasks behind an `Arc`; nothing in it is mutated after
/// [`NoIpClient::new`] and the optional builder methods.
pub struct NoIpClient {
    user: String,

    /// ⚠️ NEVER log this value
    pass: String,

    hostname: String,

    /// Query parameters in wire order
    params: Vec<(&'static str, String)>,

    useragent: String,

    endpoint: String,

    /// Per-request timeout; `None` waits indefinitely
    timeout: Option<Duration>,

    http: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for NoIpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoIpClient")
            .field("user", &self.user)
            .field("pass", &"<REDACTED>")
            .field("params", &self.params)
            .field("useragent", &self.useragent)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NoIpClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `user`, `pass`: account credentials for Basic authentication
    /// - `hostname`: the hostname to update, passed through unvalidated
    /// - `myip`: address to register; empty omits the `myip` parameter so
    ///   the registrar uses the request's source address
    /// - `useragent`: empty selects [`DEFAULT_USER_AGENT`]
    ///
    /// Performs no I/O and returns no error.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client's TLS backend cannot be initialized, as
    /// `reqwest::Client::new` does.
    pub fn new(
        user: impl Into<String>,
        pass: impl Into<String>,
        hostname: impl Into<String>,
        myip: impl Into<String>,
        useragent: impl Into<String>,
    ) -> Self {
        let hostname = hostname.into();
        let myip = myip.into();

        let mut params = vec![("hostname", hostname.clone())];
        if !myip.is_empty() {
            params.push(("myip", myip));
        }

        let useragent = useragent.into();
        let useragent = if useragent.is_empty() {
            DEFAULT_USER_AGENT.to_string()
        } else {
            useragent
        };

        Self {
            user: user.into(),
            pass: pass.into(),
            hostname,
            params,
            useragent,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            http: reqwest::Client::new(),
        }
    }

    /// Send updates to a different endpoint (dyndns2-compatible registrars, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Bound every update request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The fixed address sent as `myip`, if any
    pub fn myip(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == "myip")
            .map(|(_, value)| value.as_str())
    }

    /// The user agent sent on every request (after default substitution)
    pub fn useragent(&self) -> &str {
        &self.useragent
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query parameters in the order they are encoded
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Form-urlencoded query string, e.g. `hostname=home.ddns.net&myip=203.0.113.5`
    pub fn encoded_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter().map(|(key, value)| (*key, value.as_str())))
            .finish()
    }

    /// Full URL of the update request
    ///
    /// # Errors
    ///
    /// [`Error::Request`] if the endpoint is not an absolute http(s) URL.
    pub fn update_url(&self) -> Result<Url> {
        let mut url = parse_endpoint(&self.endpoint)?;
        url.set_query(Some(&self.encoded_query()));
        Ok(url)
    }

    /// Perform one update and return the response body verbatim
    ///
    /// The HTTP status is not inspected: a `401` with body `badauth` is an
    /// `Ok("badauth")`. No retry happens inside this call.
    ///
    /// # Errors
    ///
    /// - [`Error::Request`]: the request could not be built
    /// - [`Error::Transport`]: DNS, connect, TLS, timeout or body read failure
    pub async fn update(&self) -> Result<String> {
        let url = self.update_url()?;

        debug!(hostname = %self.hostname, "Sending update request: {}", url);

        let mut request = self
            .http
            .get(url)
            .basic_auth(&self.user, Some(&self.pass))
            .header(USER_AGENT, &self.useragent);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                Error::request(format!("Failed to build request: {}", e))
            } else {
                Error::transport(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        debug!(
            hostname = %self.hostname,
            status = %status,
            "Update response: {}",
            body.trim_end()
        );

        Ok(body)
    }

    /// Perform one update and classify the response body
    ///
    /// Same transport semantics as [`NoIpClient::update`]; an unexpected body
    /// is still `Ok`, with [`crate::UpdateStatus::Unknown`].
    pub async fn update_response(&self) -> Result<UpdateResponse> {
        let body = self.update().await?;
        Ok(UpdateResponse::parse(&body))
    }

    /// Start updating every `interval_secs` seconds on a background task
    ///
    /// With `log` set, each outcome is written through `tracing`; otherwise
    /// outcomes are discarded. The first update fires immediately. Must be
    /// called from within a tokio runtime.
    ///
    /// Calling this twice starts two independent loops.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `interval_secs` is zero.
    pub fn run(self: &Arc<Self>, interval_secs: u64, log: bool) -> Result<SchedulerHandle> {
        let updater: Arc<dyn Updater> = Arc::clone(self) as Arc<dyn Updater>;
        let scheduler = UpdateScheduler::new(updater, interval_secs)?.with_logging(log);
        Ok(scheduler.spawn())
    }
}

/// Parse an update endpoint, accepting only absolute http(s) URLs with a host
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::request(format!(
            "Unsupported endpoint scheme '{}': {}",
            url.scheme(),
            endpoint
        )));
    }
    if url.host().is_none() {
        return Err(Error::request(format!("Endpoint has no host: {}", endpoint)));
    }

    Ok(url)
}

#[async_trait]
impl Updater for NoIpClient {
    async fn update(&self) -> Result<String> {
        NoIpClient::update(self).await
    }

    fn hostname(&self) -> &str {
        &self.hostname
    }
}
