#![allow(dead_code)]

use chrono::{Local, TimeZone};
use process_monitor::backend::ProcessSnapshotSource;
use process_monitor::model::{ProcessRecord, ProcessStatus};
use process_monitor::{MonitorError, ProcessError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn record(pid: u32, name: &str, memory: u64) -> ProcessRecord {
    ProcessRecord {
        pid,
        name: name.to_string(),
        username: "tester".to_string(),
        create_time: Local.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).single().unwrap(),
        cpu_usage_percent: 0.5,
        affinity_core_count: 2,
        status: ProcessStatus::Running,
        niceness: 0,
        memory_usage_bytes: memory,
        io_read_bytes: 1024,
        io_write_bytes: 1253656,
        thread_count: 3,
    }
}

/// A process table scripted per test.
pub struct FakeSource {
    entries: Vec<std::result::Result<ProcessRecord, ProcessError>>,
    fail_listing: Arc<AtomicBool>,
    panic_on_list: bool,
    gate: Option<flume::Receiver<()>>,
}

impl FakeSource {
    pub fn new(entries: Vec<std::result::Result<ProcessRecord, ProcessError>>) -> Self {
        Self {
            entries,
            fail_listing: Arc::new(AtomicBool::new(false)),
            panic_on_list: false,
            gate: None,
        }
    }

    /// Listing blocks until a message arrives on the returned sender.
    pub fn gated(mut self) -> (Self, flume::Sender<()>) {
        let (tx, rx) = flume::unbounded();
        self.gate = Some(rx);
        (self, tx)
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_list = true;
        self
    }

    /// Flip to make listing fail on later scans.
    pub fn failure_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_listing)
    }
}

impl ProcessSnapshotSource for FakeSource {
    type Handle = usize;

    fn list_processes(&self) -> Result<Vec<usize>> {
        if let Some(gate) = &self.gate {
            let _ = gate.recv();
        }
        if self.panic_on_list {
            panic!("process table exploded");
        }
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(MonitorError::Enumeration("/proc unavailable".into()));
        }
        Ok((0..self.entries.len()).collect())
    }

    fn read_metrics(&self, handle: &usize) -> std::result::Result<ProcessRecord, ProcessError> {
        self.entries[*handle].clone()
    }
}
