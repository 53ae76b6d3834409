use crate::backend::ProcessSnapshotSource;
use crate::error::{MonitorError, Result};
use crate::model::ProcessRecord;

/// Turns a process table into records, dropping processes that vanish,
/// deny access or are zombies while being read.
pub struct ProcessSampler<S> {
    source: S,
}

impl<S: ProcessSnapshotSource> ProcessSampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// One full scan. Order of the returned records is unspecified.
    pub fn sample(&self) -> Result<Vec<ProcessRecord>> {
        let handles = self.source.list_processes()?;
        let mut records = Vec::with_capacity(handles.len());
        let mut skipped = 0usize;

        for handle in &handles {
            match self.source.read_metrics(handle) {
                Ok(record) if record.pid == 0 => {}
                Ok(record) => records.push(record),
                Err(e) if e.is_skippable() => {
                    log::trace!("Skipping process: {}", e);
                    skipped += 1;
                }
                Err(e) => return Err(MonitorError::Sampling(e)),
            }
        }

        log::debug!(
            "Sampled {} processes ({} listed, {} skipped)",
            records.len(),
            handles.len(),
            skipped
        );
        Ok(records)
    }
}
