use oxwatch_alarm::AlarmDefaults;
use oxwatch_metric::MetricDefaults;
use serde::{Deserialize, Serialize};

/// Session-wide defaults for one [`crate::MonitoringFacade`].
///
/// ```toml
/// [metric_defaults]
/// namespace = "Orders"
/// period_secs = 300
///
/// [alarm_defaults]
/// alarm_name_prefix = "Prod"
/// actions_enabled = true
/// datapoints_to_alarm = 3
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacadeConfig {
    #[serde(default)]
    pub metric_defaults: MetricDefaults,
    #[serde(default)]
    pub alarm_defaults: AlarmDefaults,
}

// ---- Loading ----

impl FacadeConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let alarm = &self.alarm_defaults;
        if alarm.datapoints_to_alarm == Some(0) {
            anyhow::bail!("alarm_defaults.datapoints_to_alarm must be at least 1");
        }
        if let (Some(datapoints), Some(periods)) = (alarm.datapoints_to_alarm, alarm.evaluation_periods) {
            if periods < datapoints {
                anyhow::bail!(
                    "alarm_defaults.evaluation_periods ({periods}) must not be lower than datapoints_to_alarm ({datapoints})"
                );
            }
        }
        if self.metric_defaults.period.num_seconds() <= 0 {
            anyhow::bail!("metric_defaults.period_secs must be positive");
        }
        Ok(())
    }
}
