// # Updater Trait
//
// Defines the single "perform one update" operation the scheduler repeats.
//
// ## Implementations
//
// - `NoIpClient`: authenticated GET against the dynupdate endpoint
// - Test doubles in `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use noip_core::Updater;
//
// async fn once(updater: &dyn Updater) -> noip_core::Result<()> {
//     let body = updater.update().await?;
//     println!("{}: {}", updater.hostname(), body);
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for "perform one update" implementations
///
/// # Thread Safety
///
/// Implementations are shared with a spawned scheduler task and must be
/// `Send + Sync`.
///
/// # Contract
///
/// - Exactly one attempt per call. Repetition is owned by `UpdateScheduler`.
/// - The response body is returned verbatim, whatever it says.
/// - Failure to build or execute the request is an `Err`.
#[async_trait]
pub trait Updater: Send + Sync {
    /// Perform one update and return the raw response body
    async fn update(&self) -> Result<String, crate::Error>;

    /// The hostname this updater keeps current (for logging and outcomes)
    fn hostname(&self) -> &str;
}
