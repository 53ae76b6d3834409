use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::Column;

/// Scheduler state as reported in `/proc/<pid>/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessStatus {
    Running,
    Sleeping,
    DiskSleep,
    Zombie,
    Stopped,
    TracingStop,
    Dead,
    Idle,
    WakeKill,
    Waking,
    Parked,
    Unknown,
}

impl ProcessStatus {
    pub fn from_state_char(state: char) -> Self {
        match state {
            'R' => ProcessStatus::Running,
            'S' => ProcessStatus::Sleeping,
            'D' => ProcessStatus::DiskSleep,
            'Z' => ProcessStatus::Zombie,
            'T' => ProcessStatus::Stopped,
            't' => ProcessStatus::TracingStop,
            'X' | 'x' => ProcessStatus::Dead,
            'I' => ProcessStatus::Idle,
            'K' => ProcessStatus::WakeKill,
            'W' => ProcessStatus::Waking,
            'P' => ProcessStatus::Parked,
            _ => ProcessStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Running => "running",
            ProcessStatus::Sleeping => "sleeping",
            ProcessStatus::DiskSleep => "disk-sleep",
            ProcessStatus::Zombie => "zombie",
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::TracingStop => "tracing-stop",
            ProcessStatus::Dead => "dead",
            ProcessStatus::Idle => "idle",
            ProcessStatus::WakeKill => "wake-kill",
            ProcessStatus::Waking => "waking",
            ProcessStatus::Parked => "parked",
            ProcessStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything read about one process in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub username: String,
    pub create_time: DateTime<Local>,
    /// Percent of one core over the sampling interval.
    pub cpu_usage_percent: f32,
    pub affinity_core_count: usize,
    pub status: ProcessStatus,
    pub niceness: i32,
    /// Unique set size: private pages only.
    pub memory_usage_bytes: u64,
    pub io_read_bytes: u64,
    pub io_write_bytes: u64,
    pub thread_count: u64,
}

impl ProcessRecord {
    /// Order two records by the raw value behind `column`.
    pub fn compare_by(&self, other: &Self, column: Column) -> Ordering {
        match column {
            Column::Name => self.name.cmp(&other.name),
            Column::Username => self.username.cmp(&other.username),
            Column::CpuUsagePercent => self.cpu_usage_percent.total_cmp(&other.cpu_usage_percent),
            Column::MemoryUsageBytes => self.memory_usage_bytes.cmp(&other.memory_usage_bytes),
            Column::IoReadBytes => self.io_read_bytes.cmp(&other.io_read_bytes),
            Column::IoWriteBytes => self.io_write_bytes.cmp(&other.io_write_bytes),
            Column::Status => self.status.as_str().cmp(other.status.as_str()),
            Column::CreateTime => self.create_time.cmp(&other.create_time),
            Column::Niceness => self.niceness.cmp(&other.niceness),
            Column::ThreadCount => self.thread_count.cmp(&other.thread_count),
            Column::AffinityCoreCount => self.affinity_core_count.cmp(&other.affinity_core_count),
        }
    }
}
