//! Session layer of the oxwatch monitoring engine.
//!
//! [`MonitoringFacade`] owns the global defaults and the alarm registry of
//! one assembly pass. Resource monitorings ([`ApiEndpointMonitoring`],
//! [`CustomMonitoring`]) are built against its [`MonitoringScope`] and
//! contribute dashboard widgets plus alarms.

pub mod api;
pub mod config;
pub mod custom;
pub mod facade;
pub mod monitoring;
pub mod scope;

pub use api::{ApiEndpointMonitoring, ApiEndpointMonitoringProps};
pub use config::FacadeConfig;
pub use custom::{
    CustomMetric, CustomMetricEntry, CustomMetricGroup, CustomMetricSearch, CustomMetricWithAlarm,
    CustomMetricWithAnomalyDetection, CustomMonitoring, CustomMonitoringProps,
};
pub use facade::MonitoringFacade;
pub use monitoring::Monitoring;
pub use scope::MonitoringScope;
