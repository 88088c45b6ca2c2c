// # noipd - no-ip update daemon
//
// A THIN integration layer over `noip-core`. All update and scheduling logic
// lives in the library; this binary only:
// 1. Reads configuration from environment variables
// 2. Initializes tracing and the runtime
// 3. Starts the update scheduler
// 4. Stops it on SIGTERM/SIGINT
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Account
// - `NOIP_USER`: Account username (required)
// - `NOIP_PASS`: Account password (required)
// - `NOIP_HOSTNAME`: Hostname to update (required)
//
// ### Request
// - `NOIP_MYIP`: Fixed address to register (default: let the registrar detect it)
// - `NOIP_USERAGENT`: User agent (default: library default)
// - `NOIP_ENDPOINT`: Update endpoint (default: https://dynupdate.no-ip.com/nic/update)
// - `NOIP_TIMEOUT_SECS`: Per-request timeout (default: none)
//
// ### Scheduler
// - `NOIP_INTERVAL_SECS`: Seconds between updates (default: 300)
// - `NOIP_LOG`: Log every outcome, true/false (default: true)
// - `NOIP_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export NOIP_USER=alice
// export NOIP_PASS=s3cr3t
// export NOIP_HOSTNAME=home.ddns.net
// export NOIP_INTERVAL_SECS=600
//
// noipd
// ```

use anyhow::Result;
use noip_core::{ClientConfig, SchedulerConfig};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum NoipExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<NoipExitCode> for ExitCode {
    fn from(code: NoipExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Daemon configuration
struct Config {
    client: ClientConfig,
    scheduler: SchedulerConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} is required. Set it via: export {}=...", key, key))
        };
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mut client = ClientConfig::new(
            required("NOIP_USER")?,
            required("NOIP_PASS")?,
            required("NOIP_HOSTNAME")?,
        );
        client.myip = non_empty("NOIP_MYIP");
        client.useragent = non_empty("NOIP_USERAGENT");
        if let Some(endpoint) = non_empty("NOIP_ENDPOINT") {
            client.endpoint = endpoint;
        }
        client.timeout_secs = non_empty("NOIP_TIMEOUT_SECS")
            .map(|s| s.parse())
            .transpose()
            .map_err(|e| anyhow::anyhow!("NOIP_TIMEOUT_SECS must be a whole number: {}", e))?;

        let mut scheduler = SchedulerConfig::default();
        if let Some(interval) = non_empty("NOIP_INTERVAL_SECS") {
            scheduler.interval_secs = interval
                .parse()
                .map_err(|e| anyhow::anyhow!("NOIP_INTERVAL_SECS must be a whole number: {}", e))?;
        }
        if let Some(log) = non_empty("NOIP_LOG") {
            scheduler.log = parse_bool(&log)
                .ok_or_else(|| anyhow::anyhow!("NOIP_LOG must be true or false. Got: {}", log))?;
        }

        Ok(Self {
            client,
            scheduler,
            log_level: non_empty("NOIP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.client.validate()?;
        self.scheduler.validate()?;

        if self.client.endpoint.starts_with("http://") {
            eprintln!(
                "WARNING: NOIP_ENDPOINT uses HTTP (not HTTPS). \
                Credentials will be sent in clear text."
            );
        }

        if parse_level(&self.log_level).is_none() {
            anyhow::bail!(
                "NOIP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return NoipExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return NoipExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = parse_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return NoipExitCode::ConfigError.into();
    }

    info!("Starting noipd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return NoipExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            NoipExitCode::RuntimeError
        } else {
            NoipExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon until a shutdown signal arrives
async fn run_daemon(config: Config) -> Result<()> {
    let client = Arc::new(config.client.build());

    info!("Managing hostname: {}", client.hostname());
    info!(
        "Update interval: {}s, endpoint: {}",
        config.scheduler.interval_secs,
        client.endpoint()
    );
    if let Some(myip) = client.myip() {
        info!("Registering fixed address: {}", myip);
    }

    let handle = client.run(config.scheduler.interval_secs, config.scheduler.log)?;

    let signal = wait_for_shutdown_signal().await?;
    info!("Received shutdown signal: {}", signal);

    handle.shutdown().await;
    info!("Shutting down daemon");

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
