//! Periodic, non-blocking snapshots of the local process table.
//!
//! A [`backend::ProcessSampler`] reads every process through a
//! [`backend::ProcessSnapshotSource`], [`backend::aggregate()`] turns the
//! records into a sorted and formatted [`model::Snapshot`], and a
//! [`backend::RefreshController`] runs both on a worker thread and hands
//! the result back to the thread that owns it.

pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod ui;
pub mod util;

pub use error::{MonitorError, ProcessError, Result};
