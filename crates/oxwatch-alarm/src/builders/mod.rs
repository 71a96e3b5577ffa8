//! Domain-specific alarm builders.
//!
//! Each builder fixes the name suffix, comparison operator, missing-data
//! treatment and description of one alarm family, then hands the alarm to
//! the generic [`AlarmFactory`](crate::factory::AlarmFactory). Overrides in
//! the threshold record still win over these defaults.

pub mod anomaly;
pub mod custom;
pub mod error;
pub mod latency;
pub mod queue;
pub mod throughput;
pub mod tps;
pub mod usage;

pub use anomaly::AnomalyDetectingAlarmFactory;
pub use custom::CustomAlarmFactory;
pub use error::{ErrorAlarmFactory, ErrorType};
pub use latency::{LatencyAlarmFactory, LatencyType};
pub use queue::QueueAlarmFactory;
pub use throughput::ThroughputAlarmFactory;
pub use tps::TpsAlarmFactory;
pub use usage::UsageAlarmFactory;

// `["Latency", "P99", extra]` -> `Latency-P99-extra`
fn join_suffix(parts: &[&str], additional: Option<&str>) -> String {
    parts
        .iter()
        .copied()
        .chain(additional)
        .collect::<Vec<_>>()
        .join("-")
}
