use chrono::{DateTime, Local};
use serde::Serialize;

use super::Column;

/// One process as it will be displayed: display strings in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub pid: u32,
    pub cells: Vec<String>,
}

/// The result of one refresh cycle. Built once, never updated.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    columns: Vec<Column>,
    rows: Vec<SnapshotRow>,
    sort_column: Column,
    descending: bool,
    taken_at: DateTime<Local>,
}

impl Snapshot {
    pub(crate) fn new(
        columns: Vec<Column>,
        rows: Vec<SnapshotRow>,
        sort_column: Column,
        descending: bool,
    ) -> Self {
        Self {
            columns,
            rows,
            sort_column,
            descending,
            taken_at: Local::now(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn sort_column(&self) -> Column {
        self.sort_column
    }

    pub fn descending(&self) -> bool {
        self.descending
    }

    pub fn taken_at(&self) -> DateTime<Local> {
        self.taken_at
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn pids(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.pid).collect()
    }

    pub fn row(&self, pid: u32) -> Option<&SnapshotRow> {
        self.rows.iter().find(|r| r.pid == pid)
    }

    /// Display string of `column` for `pid`, if both are present.
    pub fn cell(&self, pid: u32, column: Column) -> Option<&str> {
        let idx = self.columns.iter().position(|c| *c == column)?;
        self.row(pid)
            .and_then(|r| r.cells.get(idx))
            .map(String::as_str)
    }
}
