mod column;
mod process_record;
mod snapshot;

pub use column::Column;
pub use process_record::{ProcessRecord, ProcessStatus};
pub use snapshot::{Snapshot, SnapshotRow};
