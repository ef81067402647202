//! `runs` crate: the external background-job system.
//!
//! The watcher talks to the job pipeline only through [`RunClient`].
//! [`TriggerClient`] is the Trigger.dev implementation; [`mock::MockRunClient`]
//! scripts run statuses for tests.

pub mod error;
pub mod mock;
pub mod status;
pub mod traits;
pub mod trigger;

pub use error::RunError;
pub use status::RunStatus;
pub use traits::{PollOptions, RunClient, RunOutcome, TriggeredRun};
pub use trigger::TriggerClient;
