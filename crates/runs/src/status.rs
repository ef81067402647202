//! Run statuses as reported by the job API.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a run.
///
/// Statuses this crate does not know are kept verbatim in `Other` and
/// treated as non-terminal, so a new upstream status never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    WaitingForDeploy,
    Delayed,
    Queued,
    Executing,
    Reattempting,
    Frozen,
    Completed,
    Canceled,
    Failed,
    Crashed,
    Interrupted,
    SystemFailure,
    Expired,
    TimedOut,
    Other(String),
}

impl RunStatus {
    /// The run will not progress further.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::Canceled
                | Self::Failed
                | Self::Crashed
                | Self::Interrupted
                | Self::SystemFailure
                | Self::Expired
                | Self::TimedOut
        )
    }

    /// Only `COMPLETED` counts as success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::WaitingForDeploy => "WAITING_FOR_DEPLOY",
            Self::Delayed          => "DELAYED",
            Self::Queued           => "QUEUED",
            Self::Executing        => "EXECUTING",
            Self::Reattempting     => "REATTEMPTING",
            Self::Frozen           => "FROZEN",
            Self::Completed        => "COMPLETED",
            Self::Canceled         => "CANCELED",
            Self::Failed           => "FAILED",
            Self::Crashed          => "CRASHED",
            Self::Interrupted      => "INTERRUPTED",
            Self::SystemFailure    => "SYSTEM_FAILURE",
            Self::Expired          => "EXPIRED",
            Self::TimedOut         => "TIMED_OUT",
            Self::Other(s)         => s,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        match s {
            "WAITING_FOR_DEPLOY" => Self::WaitingForDeploy,
            "DELAYED"            => Self::Delayed,
            "QUEUED"             => Self::Queued,
            "EXECUTING"          => Self::Executing,
            "REATTEMPTING"       => Self::Reattempting,
            "FROZEN"             => Self::Frozen,
            "COMPLETED"          => Self::Completed,
            "CANCELED"           => Self::Canceled,
            "FAILED"             => Self::Failed,
            "CRASHED"            => Self::Crashed,
            "INTERRUPTED"        => Self::Interrupted,
            "SYSTEM_FAILURE"     => Self::SystemFailure,
            "EXPIRED"            => Self::Expired,
            "TIMED_OUT"          => Self::TimedOut,
            other                => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for RunStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.as_str().to_owned()
    }
}
