//! Minimal embedding example for noip-core
//!
//! Runs the update loop inside an application that owns its lifecycle and
//! consumes outcomes as a stream instead of log lines.
//!
//! ```bash
//! NOIP_USER=alice NOIP_PASS=s3cr3t NOIP_HOSTNAME=home.ddns.net cargo run -p embedded_usage
//! ```
//!
//! Without credentials it talks to a registrar that does not exist, which
//! shows the failure path: every tick reports an error and the loop carries on.

use noip_core::{ChannelObserver, NoIpClient, UpdateOutcome, UpdateScheduler, Updater};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> noip_core::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Embedded noip-core Example ===\n");

    let var = |key: &str| std::env::var(key).unwrap_or_default();
    let mut client = NoIpClient::new(
        var("NOIP_USER"),
        var("NOIP_PASS"),
        var("NOIP_HOSTNAME"),
        var("NOIP_MYIP"),
        "noip-embedded-example/0.1 maintainer@domain.com",
    )
    .with_timeout(Duration::from_secs(10));

    if client.user().is_empty() {
        client = client.with_endpoint("http://127.0.0.1:9/nic/update");
    }

    println!("1. Update URL: {}", client.update_url()?);

    // Outcomes arrive on a stream; the application decides what they mean
    let (observer, mut outcomes) = ChannelObserver::new(16);
    let updater: Arc<dyn Updater> = Arc::new(client);

    println!("2. Starting scheduler (every 2s)...");
    let handle = UpdateScheduler::new(updater, 2)?
        .with_observer(Arc::new(observer))
        .spawn();

    for _ in 0..3 {
        match outcomes.next().await {
            Some(UpdateOutcome::Completed { tick, body, .. }) => {
                let response = noip_core::UpdateResponse::parse(&body);
                println!("[Tick {}] {} ({})", tick, body.trim_end(), response.status);
            }
            Some(UpdateOutcome::Failed { tick, error, .. }) => {
                println!("[Tick {}] failed: {}", tick, error);
            }
            None => break,
        }
    }

    println!("\n3. Stopping scheduler...");
    handle.shutdown().await;

    println!("4. Scheduler stopped cleanly.");
    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- Scheduler lifecycle is fully controlled by the application");
    println!("- Outcomes are delivered to an injected observer");
    println!("- Failures never stop the loop");

    Ok(())
}
