//! Pipeline configuration shared by `serve` and `run`.
//!
//! Every option can come from a flag or the environment (a `.env` file is
//! loaded first).
//!
//! | Env Var                  | Default                   |
//! |--------------------------|---------------------------|
//! | `TRIGGER_API_URL`        | `https://api.trigger.dev` |
//! | `TRIGGER_SECRET_KEY`     | required                  |
//! | `TRIGGER_TASK_ID`        | required                  |
//! | `POLL_INTERVAL_MS`       | `2000`                    |
//! | `POLL_TIMEOUT_SECS`      | `3600`                    |
//! | `CALLBACK_MAX_ATTEMPTS`  | `3`                       |
//! | `CALLBACK_BASE_DELAY_MS` | `1000`                    |

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;

use engine::{Watcher, WatcherConfig};
use runs::{PollOptions, TriggerClient};
use webhook::{HttpTransport, RetryPolicy};

#[derive(Debug, Clone, Args)]
pub struct PipelineArgs {
    /// Base URL of the job system API.
    #[arg(long, env = "TRIGGER_API_URL", default_value = runs::trigger::DEFAULT_API_URL)]
    pub trigger_api_url: String,

    /// Secret key used to authenticate with the job system.
    #[arg(long, env = "TRIGGER_SECRET_KEY", hide_env_values = true)]
    pub trigger_secret_key: String,

    /// Task identifier to trigger.
    #[arg(long, env = "TRIGGER_TASK_ID")]
    pub task_id: String,

    /// Milliseconds between two status reads.
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Seconds to wait for a run before reporting it as failed.
    #[arg(long, env = "POLL_TIMEOUT_SECS", default_value_t = 3600)]
    pub poll_timeout_secs: u64,

    /// Callback attempts, including the first.
    #[arg(long, env = "CALLBACK_MAX_ATTEMPTS", default_value_t = 3)]
    pub callback_max_attempts: u32,

    /// Backoff unit; the wait after attempt n is n times this.
    #[arg(long, env = "CALLBACK_BASE_DELAY_MS", default_value_t = 1000)]
    pub callback_base_delay_ms: u64,
}

impl PipelineArgs {
    pub fn watcher_config(&self) -> WatcherConfig {
        WatcherConfig {
            task_id: self.task_id.clone(),
            poll: PollOptions {
                interval: Duration::from_millis(self.poll_interval_ms),
                timeout: Duration::from_secs(self.poll_timeout_secs),
                ..PollOptions::default()
            },
            retry: RetryPolicy {
                max_attempts: self.callback_max_attempts,
                base_delay: Duration::from_millis(self.callback_base_delay_ms),
            },
        }
    }

    /// Build a watcher backed by the real job system and HTTP callbacks.
    pub fn watcher(&self) -> anyhow::Result<Watcher> {
        let runs = TriggerClient::new(&self.trigger_api_url, &self.trigger_secret_key)
            .context("failed to build job system client")?;
        let transport = HttpTransport::new().context("failed to build callback HTTP client")?;
        Ok(Watcher::new(Arc::new(runs), Arc::new(transport), self.watcher_config()))
    }
}
