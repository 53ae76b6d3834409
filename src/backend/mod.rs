pub mod aggregate;
mod collector;
#[cfg(target_os = "linux")]
mod process;
mod sampler;
mod source;

pub use aggregate::{aggregate, AggregateOptions};
pub use collector::{RefreshController, RefreshOutcome, RefreshState};
#[cfg(target_os = "linux")]
pub use process::LinuxProcessSource;
pub use sampler::ProcessSampler;
pub use source::ProcessSnapshotSource;
