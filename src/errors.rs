//! Test Runner Error Hierarchy
//!
//! Every fatal condition of a run surfaces as one of these variants after the
//! cluster has been torn down. A user command returning non-zero is not an
//! error: its exit code is forwarded as data.

use std::path::PathBuf;
use std::process::ExitStatus;

use config::ConfigError;

use crate::Role;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A working directory that must be fresh already exists
    #[error("environment already exists (at least partially): {}", .path.display())]
    EnvironmentConflict { path: PathBuf },

    /// The OS refused to start a required executable
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Space provisioning through the admin client failed
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// A member never started accepting connections
    #[error("{role}{ordinal} at {address} is not accepting connections")]
    NotReady {
        role: Role,
        ordinal: usize,
        address: String,
    },

    /// A member exited while the cluster was being brought up
    #[error("{role}{ordinal} exited during bring-up with {status} (see {})", .log.display())]
    ProcessExited {
        role: Role,
        ordinal: usize,
        status: ExitStatus,
        log: PathBuf,
    },

    /// The user command template could not be resolved
    #[error("cannot substitute {template:?}: {reason}")]
    Template { template: String, reason: String },

    /// Configuration source failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration validation failures
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A shutdown signal arrived before the run finished
    #[error("interrupted by {0}")]
    Interrupted(&'static str),

    /// Retry budget of a readiness task exhausted
    #[error("{0}")]
    RetryTaskFailed(String),

    #[error("task timed out")]
    RetryTimeoutError,
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The admin tool could not be started
    #[error("failed to run admin tool {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The coordinator rejected the request
    #[error("add-space rejected ({status}): {stderr}")]
    Rejected { status: ExitStatus, stderr: String },
}
