mod common;

use anyhow::{anyhow, Result};
use common::{init_tracing, write_config};
use oxwatch_alarm::threshold::MinTpsThreshold;
use oxwatch_alarm::ActionsEnabled;
use oxwatch_facade::{ApiEndpointMonitoringProps, FacadeConfig, MonitoringFacade};

const CONFIG: &str = r#"
[metric_defaults]
namespace = "Shop"
period_secs = 60

[alarm_defaults]
alarm_name_prefix = "Prod"
datapoints_to_alarm = 2

[alarm_defaults.actions_enabled]
Critical = true
"#;

#[test]
fn load_defaults_from_toml() -> Result<()> {
    let (_dir, path) = write_config(CONFIG)?;
    let config = FacadeConfig::load(&path)?;

    assert_eq!(config.metric_defaults.namespace.as_deref(), Some("Shop"));
    assert_eq!(config.metric_defaults.period.num_seconds(), 60);
    assert_eq!(config.alarm_defaults.alarm_name_prefix, "Prod");
    assert!(matches!(
        config.alarm_defaults.actions_enabled,
        ActionsEnabled::PerDisambiguator(ref flags) if flags.get("Critical") == Some(&true)
    ));
    assert!(config.alarm_defaults.use_default_dedupe_for_latency);
    Ok(())
}

#[test]
fn loaded_defaults_drive_alarms() -> Result<()> {
    init_tracing();
    let (_dir, path) = write_config(CONFIG)?;
    let mut facade = MonitoringFacade::from_config_file(&path)?;

    let mut props = ApiEndpointMonitoringProps::new("Checkout");
    for disambiguator in ["Critical", "Warning"] {
        props
            .add_low_tps_alarm
            .insert(disambiguator.to_string(), MinTpsThreshold::new(1.0));
    }
    facade.monitor_api_endpoint(props)?;

    let critical = facade
        .created_alarms_with_disambiguator("Critical")
        .pop()
        .ok_or_else(|| anyhow!("critical alarm missing"))?;
    assert_eq!(critical.alarm_name, "Prod-Checkout-prod-MinTPS-Critical");
    assert!(critical.actions_enabled);
    assert_eq!((critical.datapoints_to_alarm, critical.evaluation_periods), (2, 2));
    assert_eq!(critical.metric.period().num_seconds(), 60);

    let warning = facade
        .created_alarms_with_disambiguator("Warning")
        .pop()
        .ok_or_else(|| anyhow!("warning alarm missing"))?;
    assert!(!warning.actions_enabled);
    Ok(())
}

#[test]
fn inconsistent_evaluation_window_is_rejected() -> Result<()> {
    let (_dir, path) = write_config(
        r#"
[alarm_defaults]
datapoints_to_alarm = 3
evaluation_periods = 2
"#,
    )?;
    let err = FacadeConfig::load(&path)
        .err()
        .ok_or_else(|| anyhow!("config should be rejected"))?;
    assert!(err.to_string().contains("evaluation_periods"));
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    assert!(FacadeConfig::load("/nonexistent/oxwatch/facade.toml").is_err());
}

#[test]
fn empty_file_uses_defaults() -> Result<()> {
    let (_dir, path) = write_config("")?;
    let config = FacadeConfig::load(&path)?;
    assert_eq!(config.metric_defaults.period.num_seconds(), 300);
    assert_eq!(config.alarm_defaults.actions_enabled, ActionsEnabled::All(false));
    Ok(())
}
