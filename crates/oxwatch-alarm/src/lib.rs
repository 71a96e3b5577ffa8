//! Alarm generation.
//!
//! [`AlarmFactory`] turns a metric plus a threshold record into a named
//! [`AlarmDefinition`] and appends it to the session [`AlarmRegistry`].
//! The [`builders`] encode per-domain defaults (latency, errors, usage,
//! queues, TPS, custom and anomaly alarms) on top of the generic factory.
//! Composite alarms are built from registry queries and are never
//! registered themselves.

pub mod action;
pub mod annotation;
pub mod builders;
pub mod comparison;
pub mod composite;
pub mod defaults;
pub mod definition;
pub mod factory;
pub mod naming;
pub mod registry;
pub mod threshold;


pub use action::{AlarmAction, AlarmActions};
pub use comparison::{ComparisonOperator, TreatMissingData};
pub use composite::{AddCompositeAlarmProps, AlarmRule, AlarmState, CompositeAlarmDefinition};
pub use defaults::{ActionsEnabled, AlarmDefaults};
pub use definition::AlarmDefinition;
pub use factory::{AddAlarmProps, AlarmFactory};
pub use registry::AlarmRegistry;
pub use threshold::{CustomAlarmThreshold, ThresholdSpec};
