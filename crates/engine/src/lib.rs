//! `engine` crate: trigger a run, watch it to a terminal state, and
//! deliver the result to the caller's callback.

pub mod error;
pub mod models;
pub mod payload;
pub mod watcher;

pub use error::EngineError;
pub use models::{CallbackPayload, DeliveryStatus, JobMetadata, JobRequest, PayloadOutput};
pub use watcher::{Submission, Watcher, WatcherConfig};

#[cfg(test)]
mod watcher_tests;
