// # noip-core
//
// Client library for the no-ip.com dynamic DNS update API.
//
// ## Architecture Overview
//
// - **NoIpClient**: immutable client state (credentials, hostname, optional
//   fixed IP, user agent) and the single authenticated update call
// - **Updater**: trait for "perform one update", implemented by `NoIpClient`
// - **UpdateObserver**: trait receiving the outcome of every scheduler tick
// - **UpdateScheduler**: fixed-interval update loop on a spawned task,
//   controlled through a `SchedulerHandle`
// - **UpdateResponse**: classification of the plaintext response vocabulary
//
// ## Usage
//
// ```rust,ignore
// use std::sync::Arc;
// use noip_core::NoIpClient;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = Arc::new(NoIpClient::new("user", "pass", "home.ddns.net", "", ""));
//
//     // Update every five minutes, logging each outcome
//     let handle = client.run(300, true)?;
//
//     tokio::signal::ctrl_c().await?;
//     handle.shutdown().await;
//     Ok(())
// }
// ```

pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod scheduler;
pub mod traits;

// Re-export core types for convenience
pub use client::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, NoIpClient};
pub use config::{ClientConfig, SchedulerConfig};
pub use error::{Error, Result};
pub use response::{UpdateResponse, UpdateStatus};
pub use scheduler::{SchedulerHandle, UpdateScheduler};
pub use traits::{
    ChannelObserver, LogObserver, SilentObserver, UpdateObserver, UpdateOutcome, Updater,
};
