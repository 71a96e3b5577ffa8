use crate::config::FacadeConfig;
use oxwatch_alarm::{AlarmDefaults, AlarmFactory, AlarmRegistry};
use oxwatch_metric::{MetricDefaults, MetricFactory};

/// What every monitoring of one facade shares: the read-only defaults and
/// the session alarm registry.
#[derive(Debug, Clone)]
pub struct MonitoringScope {
    metric_defaults: MetricDefaults,
    alarm_defaults: AlarmDefaults,
    registry: AlarmRegistry,
}

impl MonitoringScope {
    pub fn new(config: FacadeConfig) -> Self {
        Self {
            metric_defaults: config.metric_defaults,
            alarm_defaults: config.alarm_defaults,
            registry: AlarmRegistry::new(),
        }
    }

    pub fn metric_defaults(&self) -> &MetricDefaults {
        &self.metric_defaults
    }

    pub fn alarm_defaults(&self) -> &AlarmDefaults {
        &self.alarm_defaults
    }

    pub fn registry(&self) -> &AlarmRegistry {
        &self.registry
    }

    pub fn create_metric_factory(&self) -> MetricFactory {
        MetricFactory::new(self.metric_defaults.clone())
    }

    /// Alarm factory whose alarms are named `<global>-<local_prefix>-...`
    /// and recorded in the session registry.
    pub fn create_alarm_factory(&self, local_prefix: &str) -> AlarmFactory {
        AlarmFactory::new(
            self.alarm_defaults.clone(),
            local_prefix,
            self.registry.clone(),
        )
        .with_metric_factory(self.create_metric_factory())
    }
}
