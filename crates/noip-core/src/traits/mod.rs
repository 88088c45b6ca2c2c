//! Core traits for the no-ip client
//!
//! This module defines the seams between the scheduler and what it drives.
//!
//! - [`Updater`]: Perform one update against the registrar
//! - [`UpdateObserver`]: Receive the outcome of every scheduler tick

pub mod observer;
pub mod updater;

pub use observer::{ChannelObserver, LogObserver, SilentObserver, UpdateObserver, UpdateOutcome};
pub use updater::Updater;
