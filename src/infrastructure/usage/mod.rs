//! Usage recorder implementations

mod in_memory;
mod tracing_recorder;

pub use in_memory::{InMemoryUsageRecorder, UsageTotals};
pub use tracing_recorder::TracingUsageRecorder;
