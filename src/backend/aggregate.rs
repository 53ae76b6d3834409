use std::collections::HashMap;

use crate::error::{MonitorError, Result};
use crate::model::{Column, ProcessRecord, Snapshot, SnapshotRow};
use crate::util::{format_byte_size, format_percent, format_timestamp};

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub sort_column: Column,
    pub descending: bool,
    /// Projection in display order. `None` keeps every column.
    pub columns: Option<Vec<Column>>,
    /// Case-insensitive substring match on the process name.
    pub name_filter: Option<String>,
    pub require_non_empty: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            sort_column: Column::MemoryUsageBytes,
            descending: true,
            columns: None,
            name_filter: None,
            require_non_empty: false,
        }
    }
}

/// Dedup, filter, sort, project and format records into a snapshot.
pub fn aggregate(records: Vec<ProcessRecord>, options: &AggregateOptions) -> Result<Snapshot> {
    let mut processes = dedup_by_pid(records);

    if let Some(filter) = options.name_filter.as_deref().filter(|f| !f.is_empty()) {
        let needle = filter.to_lowercase();
        processes.retain(|p| p.name.to_lowercase().contains(&needle));
    }

    sort_records(&mut processes, options.sort_column, options.descending);

    if options.require_non_empty && processes.is_empty() {
        return Err(MonitorError::EmptyInput);
    }

    let columns = match &options.columns {
        Some(columns) => columns.clone(),
        None => Column::ALL.to_vec(),
    };

    let rows = processes
        .iter()
        .map(|p| SnapshotRow {
            pid: p.pid,
            cells: columns.iter().map(|c| format_cell(p, *c)).collect(),
        })
        .collect();

    Ok(Snapshot::new(
        columns,
        rows,
        options.sort_column,
        options.descending,
    ))
}

/// Last record seen for a pid wins.
fn dedup_by_pid(records: Vec<ProcessRecord>) -> Vec<ProcessRecord> {
    let mut by_pid: HashMap<u32, ProcessRecord> = HashMap::with_capacity(records.len());
    for record in records {
        by_pid.insert(record.pid, record);
    }
    by_pid.into_values().collect()
}

/// Sort on the raw value; equal keys fall back to ascending pid.
pub fn sort_records(records: &mut [ProcessRecord], column: Column, descending: bool) {
    records.sort_by(|a, b| {
        let by_key = a.compare_by(b, column);
        let by_key = if descending { by_key.reverse() } else { by_key };
        by_key.then(a.pid.cmp(&b.pid))
    });
}

pub fn format_cell(record: &ProcessRecord, column: Column) -> String {
    match column {
        Column::Name => record.name.clone(),
        Column::Username => record.username.clone(),
        Column::CpuUsagePercent => format_percent(record.cpu_usage_percent),
        Column::MemoryUsageBytes => format_byte_size(record.memory_usage_bytes),
        Column::IoReadBytes => format_byte_size(record.io_read_bytes),
        Column::IoWriteBytes => format_byte_size(record.io_write_bytes),
        Column::Status => record.status.to_string(),
        Column::CreateTime => format_timestamp(&record.create_time),
        Column::Niceness => record.niceness.to_string(),
        Column::ThreadCount => record.thread_count.to_string(),
        Column::AffinityCoreCount => record.affinity_core_count.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProcessStatus;
    use chrono::{Local, TimeZone};

    fn record(pid: u32, name: &str, memory: u64) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            username: "alice".to_string(),
            create_time: Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).single().unwrap(),
            cpu_usage_percent: 0.0,
            affinity_core_count: 4,
            status: ProcessStatus::Sleeping,
            niceness: 0,
            memory_usage_bytes: memory,
            io_read_bytes: 2048,
            io_write_bytes: 0,
            thread_count: 1,
        }
    }

    #[test]
    fn test_default_sort_is_memory_descending() {
        let records = vec![record(1, "a", 100), record(2, "b", 300), record(3, "c", 200)];
        let snapshot = aggregate(records, &AggregateOptions::default()).unwrap();
        assert_eq!(snapshot.pids(), vec![2, 3, 1]);
        assert_eq!(snapshot.sort_column(), Column::MemoryUsageBytes);
        assert!(snapshot.descending());
    }

    #[test]
    fn test_ties_break_on_ascending_pid() {
        let records = vec![record(9, "x", 50), record(3, "y", 50), record(5, "z", 50)];
        let snapshot = aggregate(records.clone(), &AggregateOptions::default()).unwrap();
        assert_eq!(snapshot.pids(), vec![3, 5, 9]);

        let ascending = AggregateOptions {
            descending: false,
            ..Default::default()
        };
        let snapshot = aggregate(records, &ascending).unwrap();
        assert_eq!(snapshot.pids(), vec![3, 5, 9]);
    }

    #[test]
    fn test_duplicate_pid_last_seen_wins() {
        let records = vec![record(4, "old", 10), record(5, "other", 20), record(4, "new", 30)];
        let snapshot = aggregate(records, &AggregateOptions::default()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.cell(4, Column::Name), Some("new"));
        assert_eq!(snapshot.pids(), vec![4, 5]);
    }

    #[test]
    fn test_projection_keeps_requested_order() {
        let options = AggregateOptions {
            columns: Some(vec![Column::MemoryUsageBytes, Column::Name]),
            ..Default::default()
        };
        let snapshot = aggregate(vec![record(1, "init", 1253656)], &options).unwrap();
        assert_eq!(snapshot.columns(), &[Column::MemoryUsageBytes, Column::Name]);
        assert_eq!(snapshot.rows()[0].cells, vec!["1.20MB".to_string(), "init".to_string()]);
        assert_eq!(snapshot.cell(1, Column::Status), None);
    }

    #[test]
    fn test_no_projection_keeps_all_columns_formatted() {
        let snapshot = aggregate(vec![record(1, "init", 1024)], &AggregateOptions::default()).unwrap();
        assert_eq!(snapshot.columns(), &Column::ALL[..]);
        assert_eq!(&snapshot.columns()[..10], &Column::DEFAULT_DISPLAY[..]);
        assert_eq!(snapshot.cell(1, Column::MemoryUsageBytes), Some("1.00KB"));
        assert_eq!(snapshot.cell(1, Column::IoReadBytes), Some("2.00KB"));
        assert_eq!(snapshot.cell(1, Column::IoWriteBytes), Some("0.00B"));
        assert_eq!(snapshot.cell(1, Column::CreateTime), Some("2024-05-06 07:08:09"));
        assert_eq!(snapshot.cell(1, Column::Status), Some("sleeping"));
    }

    #[test]
    fn test_sorting_happens_before_formatting() {
        // "900.00B" sorts above "1.00KB" as text but not as bytes
        let records = vec![record(1, "small", 900), record(2, "big", 1024)];
        let snapshot = aggregate(records, &AggregateOptions::default()).unwrap();
        assert_eq!(snapshot.pids(), vec![2, 1]);
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let options = AggregateOptions {
            sort_column: Column::Name,
            descending: false,
            ..Default::default()
        };
        let records = vec![record(1, "zsh", 1), record(2, "bash", 1), record(3, "fish", 1)];
        let snapshot = aggregate(records, &options).unwrap();
        assert_eq!(snapshot.pids(), vec![2, 3, 1]);
    }

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let options = AggregateOptions {
            name_filter: Some("FOX".to_string()),
            ..Default::default()
        };
        let records = vec![record(1, "firefox", 1), record(2, "bash", 1)];
        let snapshot = aggregate(records, &options).unwrap();
        assert_eq!(snapshot.pids(), vec![1]);
    }

    #[test]
    fn test_empty_input() {
        let snapshot = aggregate(Vec::new(), &AggregateOptions::default()).unwrap();
        assert!(snapshot.is_empty());

        let strict = AggregateOptions {
            require_non_empty: true,
            ..Default::default()
        };
        assert!(matches!(aggregate(Vec::new(), &strict), Err(MonitorError::EmptyInput)));
    }

    #[test]
    fn test_filter_to_nothing_with_required_rows_fails() {
        let options = AggregateOptions {
            name_filter: Some("nomatch".to_string()),
            require_non_empty: true,
            ..Default::default()
        };
        assert!(matches!(
            aggregate(vec![record(1, "bash", 1)], &options),
            Err(MonitorError::EmptyInput)
        ));
    }
}
