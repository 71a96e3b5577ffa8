mod common;

use anyhow::{anyhow, Result};
use chrono::Duration;
use common::facade_with_prefix;
use oxwatch_alarm::builders::LatencyType;
use oxwatch_alarm::threshold::{LatencyThreshold, MinTpsThreshold};
use oxwatch_alarm::{AddCompositeAlarmProps, CustomAlarmThreshold};
use oxwatch_common::error::MonitoringError;
use oxwatch_common::naming::UserProvidedNames;
use oxwatch_facade::{ApiEndpointMonitoringProps, MonitoringFacade};

const TAG: &str = "critical-path";

fn tagged() -> CustomAlarmThreshold {
    CustomAlarmThreshold {
        custom_tags: vec![TAG.to_string()],
        ..CustomAlarmThreshold::default()
    }
}

fn facade() -> Result<MonitoringFacade> {
    let mut facade = facade_with_prefix("Test");
    let mut props = ApiEndpointMonitoringProps {
        names: UserProvidedNames {
            alarm_friendly_name: Some("Orders".to_string()),
            ..UserProvidedNames::default()
        },
        ..ApiEndpointMonitoringProps::new("Orders")
    }
    .with_latency_alarm(
        LatencyType::P99,
        "Critical",
        LatencyThreshold {
            common: tagged(),
            ..LatencyThreshold::new(Duration::milliseconds(800))
        },
    )
    .with_latency_alarm(
        LatencyType::P90,
        "Warning",
        LatencyThreshold::new(Duration::milliseconds(400)),
    );
    props.add_low_tps_alarm.insert(
        "Critical".to_string(),
        MinTpsThreshold::new(1.0).with_common(tagged()),
    );
    facade.monitor_api_endpoint(props)?;
    Ok(facade)
}

#[test]
fn composite_over_tag_is_not_registered() -> Result<()> {
    let facade = facade()?;
    let before = facade.created_alarms().len();

    let composite = facade
        .create_composite_alarm_using_tag(TAG, None)?
        .ok_or_else(|| anyhow!("tagged alarms should yield a composite"))?;
    assert_eq!(
        composite.matched_alarm_names.len(),
        facade.created_alarms_with_tag(TAG).len()
    );
    assert_eq!(composite.matched_alarm_names.len(), 2);
    assert_eq!(composite.alarm_name, "Test-Composite-Tag-critical-path");
    assert_eq!(composite.disambiguator.as_deref(), Some(TAG));
    assert!(composite.alarm_rule.to_string().contains(" OR "));

    // asking again neither nests nor grows the registry
    let again = facade
        .create_composite_alarm_using_tag(TAG, None)?
        .ok_or_else(|| anyhow!("composite should be repeatable"))?;
    assert_eq!(again, composite);
    assert_eq!(facade.created_alarms().len(), before);
    assert!(facade
        .created_alarms()
        .iter()
        .all(|a| a.alarm_name != composite.alarm_name));
    Ok(())
}

#[test]
fn unknown_tag_or_disambiguator_yields_nothing() -> Result<()> {
    let facade = facade()?;
    assert!(facade.create_composite_alarm_using_tag("unknown", None)?.is_none());
    assert!(facade
        .create_composite_alarm_using_disambiguator("Info", None)?
        .is_none());
    Ok(())
}

#[test]
fn composite_over_disambiguator() -> Result<()> {
    let facade = facade()?;
    let composite = facade
        .create_composite_alarm_using_disambiguator(
            "Critical",
            Some(AddCompositeAlarmProps {
                alarm_description: Some("Orders is down".to_string()),
                ..AddCompositeAlarmProps::default()
            }),
        )?
        .ok_or_else(|| anyhow!("critical alarms should yield a composite"))?;

    assert_eq!(composite.alarm_name, "Test-Composite-Critical");
    assert_eq!(composite.alarm_description, "Orders is down");
    assert_eq!(
        composite.matched_alarm_names,
        vec![
            "Test-Orders-Latency-P99-Critical".to_string(),
            "Test-Orders-MinTPS-Critical".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn tag_and_disambiguator_composites_get_distinct_names() -> Result<()> {
    let facade = facade()?;
    let by_tag = facade
        .create_composite_alarm_using_tag(TAG, None)?
        .ok_or_else(|| anyhow!("tagged alarms should yield a composite"))?;
    let by_disambiguator = facade
        .create_composite_alarm_using_disambiguator(
            "Critical",
            Some(AddCompositeAlarmProps {
                disambiguator: Some(TAG.to_string()),
                ..AddCompositeAlarmProps::default()
            }),
        )?
        .ok_or_else(|| anyhow!("critical alarms should yield a composite"))?;
    assert_eq!(by_disambiguator.alarm_name, "Test-Composite-critical-path");
    assert_ne!(by_tag.alarm_name, by_disambiguator.alarm_name);

    let err = facade
        .create_composite_alarm_using_disambiguator(
            "Critical",
            Some(AddCompositeAlarmProps {
                alarm_name_suffix: Some("Tag".to_string()),
                disambiguator: Some(TAG.to_string()),
                ..AddCompositeAlarmProps::default()
            }),
        )
        .err()
        .ok_or_else(|| anyhow!("a second query under the same name should fail"))?;
    assert!(matches!(
        err,
        MonitoringError::DuplicateAlarmName { name } if name == "Test-Composite-Tag-critical-path"
    ));
    Ok(())
}
