use crate::error::{ProcessError, Result};
use crate::model::ProcessRecord;

/// Access to the OS process table.
///
/// `list_processes` is cheap and may race with processes exiting;
/// `read_metrics` is where that race shows up, as a `ProcessError`.
pub trait ProcessSnapshotSource: Send + Sync {
    type Handle: Send;

    fn list_processes(&self) -> Result<Vec<Self::Handle>>;

    /// Read every metric for one process in a single pass.
    fn read_metrics(&self, handle: &Self::Handle) -> std::result::Result<ProcessRecord, ProcessError>;
}
