//! `webhook` crate: delivering JSON results to caller-supplied URLs.
//!
//! [`Delivery`] wraps a [`Transport`] with a bounded, linearly backed-off
//! retry loop.  [`HttpTransport`] does the real POST; [`mock::MockTransport`]
//! scripts attempt outcomes for tests.

pub mod error;
pub mod mock;
pub mod retry;
pub mod transport;

pub use error::{AttemptError, DeliveryError};
pub use retry::{Delivery, RetryPolicy};
pub use transport::{CallbackTarget, HttpTransport, Transport, API_KEY_HEADER};
