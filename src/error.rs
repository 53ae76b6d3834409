use std::io;
use thiserror::Error;

/// Why a single process could not be read.
///
/// The first three variants are the expected outcome of racing a live
/// process table and are dropped by the sampler. `Unexpected` is not.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("process {0} no longer exists")]
    NoSuchProcess(u32),

    #[error("access denied reading process {0}")]
    AccessDenied(u32),

    #[error("process {0} is in an unreadable state")]
    UnreadableState(u32),

    #[error("unexpected failure reading process {pid}: {reason}")]
    Unexpected { pid: u32, reason: String },
}

impl ProcessError {
    /// True for failures that only mean "skip this process".
    pub fn is_skippable(&self) -> bool {
        !matches!(self, ProcessError::Unexpected { .. })
    }
}

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("failed to enumerate processes: {0}")]
    Enumeration(String),

    #[error("sampling aborted: {0}")]
    Sampling(ProcessError),

    #[error("snapshot is empty but at least one row was required")]
    EmptyInput,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to spawn refresh worker: {0}")]
    WorkerSpawn(io::Error),

    #[error("refresh worker exited without reporting a result")]
    WorkerLost,

    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
