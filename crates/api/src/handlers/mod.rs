//! Request handlers.

pub mod health;
pub mod jobs;

use engine::Watcher;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub watcher: Watcher,
}

impl AppState {
    pub fn new(watcher: Watcher) -> Self {
        Self { watcher }
    }
}
