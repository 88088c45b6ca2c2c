//! Configuration types for the no-ip client
//!
//! The library itself reads no files and no environment; these structures
//! are for embedders and the `noipd` daemon, which fill them from their own
//! sources and call [`ClientConfig::validate`] before building a client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client::{DEFAULT_ENDPOINT, NoIpClient, parse_endpoint};

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Account username (or email)
    pub user: String,

    /// Account password
    pub pass: String,

    /// Hostname to keep updated
    pub hostname: String,

    /// Fixed address to register; `None` lets the registrar use the source address
    #[serde(default)]
    pub myip: Option<String>,

    /// User agent; `None` selects the library default
    #[serde(default)]
    pub useragent: Option<String>,

    /// Update endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds; `None` waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("user", &self.user)
            .field("pass", &"<REDACTED>")
            .field("hostname", &self.hostname)
            .field("myip", &self.myip)
            .field("useragent", &self.useragent)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with defaults for everything optional
    pub fn new(
        user: impl Into<String>,
        pass: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
            hostname: hostname.into(),
            myip: None,
            useragent: None,
            endpoint: default_endpoint(),
            timeout_secs: None,
        }
    }

    /// Set a fixed address
    pub fn with_myip(mut self, myip: impl Into<String>) -> Self {
        self.myip = Some(myip.into());
        self
    }

    /// Set the user agent
    pub fn with_useragent(mut self, useragent: impl Into<String>) -> Self {
        self.useragent = Some(useragent.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.user.is_empty() {
            return Err(crate::Error::config("Username cannot be empty"));
        }
        if self.pass.is_empty() {
            return Err(crate::Error::config("Password cannot be empty"));
        }
        if self.hostname.is_empty() {
            return Err(crate::Error::config("Hostname cannot be empty"));
        }
        if let Err(e) = parse_endpoint(&self.endpoint) {
            return Err(crate::Error::config(format!(
                "Endpoint must be an absolute HTTP or HTTPS URL. Got '{}': {}",
                self.endpoint, e
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }

        Ok(())
    }

    /// Build a client from this configuration
    ///
    /// Does not validate; call [`ClientConfig::validate`] first.
    pub fn build(&self) -> NoIpClient {
        let client = NoIpClient::new(
            self.user.clone(),
            self.pass.clone(),
            self.hostname.clone(),
            self.myip.clone().unwrap_or_default(),
            self.useragent.clone().unwrap_or_default(),
        )
        .with_endpoint(self.endpoint.clone());

        match self.timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => client,
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between the end of one update and the start of the next
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Log each outcome
    #[serde(default = "default_log")]
    pub log: bool,
}

impl SchedulerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Update interval must be > 0"));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            log: default_log(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_interval_secs() -> u64 {
    300
}

fn default_log() -> bool {
    true
}
