use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MonitorError;

/// A displayable field of a process record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    Username,
    CpuUsagePercent,
    MemoryUsageBytes,
    IoReadBytes,
    IoWriteBytes,
    Status,
    CreateTime,
    Niceness,
    ThreadCount,
    AffinityCoreCount,
}

impl Column {
    /// Every column: the display order, then the fields it leaves out.
    pub const ALL: [Column; 11] = [
        Column::Name,
        Column::CpuUsagePercent,
        Column::MemoryUsageBytes,
        Column::IoReadBytes,
        Column::IoWriteBytes,
        Column::Status,
        Column::CreateTime,
        Column::Niceness,
        Column::ThreadCount,
        Column::AffinityCoreCount,
        Column::Username,
    ];

    /// Order used by the table when no projection was asked for.
    pub const DEFAULT_DISPLAY: [Column; 10] = [
        Column::Name,
        Column::CpuUsagePercent,
        Column::MemoryUsageBytes,
        Column::IoReadBytes,
        Column::IoWriteBytes,
        Column::Status,
        Column::CreateTime,
        Column::Niceness,
        Column::ThreadCount,
        Column::AffinityCoreCount,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Username => "username",
            Column::CpuUsagePercent => "cpu_usage_percent",
            Column::MemoryUsageBytes => "memory_usage_bytes",
            Column::IoReadBytes => "io_read_bytes",
            Column::IoWriteBytes => "io_write_bytes",
            Column::Status => "status",
            Column::CreateTime => "create_time",
            Column::Niceness => "niceness",
            Column::ThreadCount => "thread_count",
            Column::AffinityCoreCount => "affinity_core_count",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Username => "User",
            Column::CpuUsagePercent => "CPU %",
            Column::MemoryUsageBytes => "Memory",
            Column::IoReadBytes => "Read",
            Column::IoWriteBytes => "Write",
            Column::Status => "Status",
            Column::CreateTime => "Started",
            Column::Niceness => "Nice",
            Column::ThreadCount => "Threads",
            Column::AffinityCoreCount => "Cores",
        }
    }

    pub fn is_byte_size(&self) -> bool {
        matches!(
            self,
            Column::MemoryUsageBytes | Column::IoReadBytes | Column::IoWriteBytes
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| MonitorError::UnknownColumn(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_keys() {
        for column in Column::ALL {
            assert_eq!(column.key().parse::<Column>().unwrap(), column);
        }
        assert!(matches!(
            "vram".parse::<Column>(),
            Err(MonitorError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_default_display_skips_username() {
        assert!(!Column::DEFAULT_DISPLAY.contains(&Column::Username));
        assert_eq!(Column::DEFAULT_DISPLAY[0], Column::Name);
        assert_eq!(Column::DEFAULT_DISPLAY[9], Column::AffinityCoreCount);
    }

    #[test]
    fn test_all_starts_with_display_order() {
        assert_eq!(&Column::ALL[..10], &Column::DEFAULT_DISPLAY[..]);
        assert_eq!(Column::ALL[10], Column::Username);
    }
}
