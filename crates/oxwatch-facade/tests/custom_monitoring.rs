mod common;

use anyhow::{anyhow, Result};
use common::facade_with_prefix;
use oxwatch_alarm::threshold::{AnomalyDetectionThreshold, CustomThreshold};
use oxwatch_alarm::ComparisonOperator;
use oxwatch_common::error::MonitoringError;
use oxwatch_common::naming::UserProvidedNames;
use oxwatch_common::statistic::Statistic;
use oxwatch_common::strings::hash_for_expression_id;
use oxwatch_facade::{
    CustomMetric, CustomMetricEntry, CustomMetricGroup, CustomMonitoringProps, MonitoringFacade,
};
use oxwatch_metric::factory::MetricOptions;
use oxwatch_metric::MetricReference;
use oxwatch_widget::AxisPosition;
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn shop_metric(facade: &MonitoringFacade, name: &str) -> Result<MetricReference> {
    Ok(facade.scope().create_metric_factory().create_metric(
        name,
        Statistic::Sum,
        MetricOptions::new().with_namespace("Shop").with_label(name),
    )?)
}

fn shop_props(metric_groups: Vec<CustomMetricGroup>) -> CustomMonitoringProps {
    CustomMonitoringProps {
        names: UserProvidedNames {
            human_readable_name: Some("Shop".to_string()),
            alarm_friendly_name: Some("Shop".to_string()),
            ..UserProvidedNames::default()
        },
        description: Some("Checkout funnel".to_string()),
        metric_groups,
        ..CustomMonitoringProps::default()
    }
}

fn rendered(facade: &MonitoringFacade) -> Result<Vec<Value>> {
    let dashboard = facade.dashboard_json()?;
    dashboard["widgets"]
        .as_array()
        .cloned()
        .ok_or_else(|| anyhow!("widgets should be an array"))
}

#[test]
fn alarm_and_anomaly_band_on_one_entry_is_rejected() -> Result<()> {
    let facade = facade_with_prefix("Test");
    let entry = CustomMetricEntry {
        alarm_friendly_name: Some("Orders".to_string()),
        add_alarm: Some(BTreeMap::from([(
            "Critical".to_string(),
            CustomThreshold::new(100.0, ComparisonOperator::GreaterThanThreshold),
        )])),
        anomaly_detection_standard_deviation_to_render: Some(2.0),
        ..CustomMetricEntry::new(shop_metric(&facade, "Orders")?)
    };

    let err = CustomMetric::try_from(entry)
        .err()
        .ok_or_else(|| anyhow!("entry should be rejected"))?;
    assert!(matches!(err, MonitoringError::AlarmWithAnomalyDetection { .. }));
    Ok(())
}

#[test]
fn static_and_anomaly_alarms_on_one_entry_are_rejected() -> Result<()> {
    let facade = facade_with_prefix("Test");
    let entry = CustomMetricEntry {
        alarm_friendly_name: Some("Orders".to_string()),
        add_alarm: Some(BTreeMap::from([(
            "Critical".to_string(),
            CustomThreshold::new(100.0, ComparisonOperator::GreaterThanThreshold),
        )])),
        add_alarm_on_anomaly: Some(BTreeMap::from([(
            "Warning".to_string(),
            AnomalyDetectionThreshold::new(3.0, true, false),
        )])),
        ..CustomMetricEntry::new(shop_metric(&facade, "Orders")?)
    };

    let err = CustomMetric::try_from(entry)
        .err()
        .ok_or_else(|| anyhow!("entry should be rejected"))?;
    assert!(matches!(err, MonitoringError::AlarmWithAnomalyDetection { .. }));
    Ok(())
}

#[test]
fn anomaly_alarm_without_rendered_band_is_rejected() -> Result<()> {
    let facade = facade_with_prefix("Test");
    let entry = CustomMetricEntry {
        alarm_friendly_name: Some("Requests".to_string()),
        add_alarm_on_anomaly: Some(BTreeMap::from([(
            "Warning".to_string(),
            AnomalyDetectionThreshold::new(3.0, true, false),
        )])),
        ..CustomMetricEntry::new(shop_metric(&facade, "Requests")?)
    };

    let err = CustomMetric::try_from(entry)
        .err()
        .ok_or_else(|| anyhow!("entry should be rejected"))?;
    assert!(matches!(err, MonitoringError::InvalidConfig(message) if message.contains("anomaly_detection_standard_deviation_to_render")));
    Ok(())
}

#[test]
fn alarm_threshold_is_annotated_on_its_axis() -> Result<()> {
    let mut facade = facade_with_prefix("Test");
    let orders = CustomMetric::try_from(CustomMetricEntry {
        alarm_friendly_name: Some("Orders".to_string()),
        add_alarm: Some(BTreeMap::from([(
            "Critical".to_string(),
            CustomThreshold::new(100.0, ComparisonOperator::GreaterThanThreshold),
        )])),
        position: Some(AxisPosition::Right),
        ..CustomMetricEntry::new(shop_metric(&facade, "Orders")?)
    })?;
    let carts = CustomMetric::from(shop_metric(&facade, "Carts")?);
    facade.monitor_custom(shop_props(vec![CustomMetricGroup::new(
        "Checkout",
        vec![carts, orders],
    )]))?;

    let alarms = facade.created_alarms();
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].alarm_name, "Test-Shop-Orders-Critical");

    let widgets = rendered(&facade)?;
    assert_eq!(widgets.len(), 3);
    assert_eq!(widgets[1]["properties"]["markdown"], "Checkout funnel");
    let graph = &widgets[2];
    assert_eq!(graph["width"], 24);
    assert_eq!(
        graph["properties"]["annotations"]["horizontal"],
        json!([{ "value": 100.0, "label": "Critical", "yAxis": "right" }])
    );
    assert_eq!(graph["properties"]["metrics"][1][2]["yAxis"], "right");
    Ok(())
}

#[test]
fn single_anomaly_metric_renders_linked_band() -> Result<()> {
    let mut facade = facade_with_prefix("Test");
    let requests = CustomMetric::try_from(CustomMetricEntry {
        alarm_friendly_name: Some("Requests".to_string()),
        anomaly_detection_standard_deviation_to_render: Some(2.0),
        add_alarm_on_anomaly: Some(BTreeMap::from([(
            "Warning".to_string(),
            AnomalyDetectionThreshold::new(3.0, true, false),
        )])),
        ..CustomMetricEntry::new(shop_metric(&facade, "Requests")?)
    })?;
    facade.monitor_custom(shop_props(vec![CustomMetricGroup::new(
        "Requests",
        vec![requests],
    )]))?;

    let alarms = facade.created_alarms();
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].comparison_operator, ComparisonOperator::GreaterThanUpperThreshold);
    assert_eq!(alarms[0].threshold, None);
    assert_eq!(
        alarms[0].threshold_metric_id,
        Some(format!("alarm_{}_band", hash_for_expression_id("Requests_Warning")))
    );

    let widgets = rendered(&facade)?;
    let graph = &widgets[2];
    assert_eq!(graph["properties"]["title"], "Requests (alarms with stdev 3)");
    let render_id = format!("anomaly_{}", hash_for_expression_id("Requests"));
    let metrics = &graph["properties"]["metrics"];
    assert_eq!(
        metrics[0][0]["expression"],
        format!("ANOMALY_DETECTION_BAND({render_id},2)")
    );
    assert_eq!(metrics[0][0]["id"], format!("{render_id}_band"));
    assert_eq!(metrics[1][2]["id"], render_id);
    assert_eq!(metrics[1][2]["visible"], true);
    Ok(())
}

#[test]
fn anomaly_alarm_needs_a_band_side() -> Result<()> {
    let mut facade = facade_with_prefix("Test");
    let requests = CustomMetric::try_from(CustomMetricEntry {
        alarm_friendly_name: Some("Requests".to_string()),
        anomaly_detection_standard_deviation_to_render: Some(2.0),
        add_alarm_on_anomaly: Some(BTreeMap::from([(
            "Warning".to_string(),
            AnomalyDetectionThreshold::new(3.0, false, false),
        )])),
        ..CustomMetricEntry::new(shop_metric(&facade, "Requests")?)
    })?;

    let err = facade
        .monitor_custom(shop_props(vec![CustomMetricGroup::new("Requests", vec![requests])]))
        .err()
        .ok_or_else(|| anyhow!("alarm without band side should fail"))?;
    assert!(matches!(err, MonitoringError::AnomalyBandSideMissing { .. }));
    Ok(())
}

#[test]
fn groups_tile_one_row_and_summary_filters() -> Result<()> {
    let mut facade = facade_with_prefix("Test");
    let mut groups = Vec::new();
    for name in ["Carts", "Orders", "Payments"] {
        groups.push(CustomMetricGroup::new(
            name,
            vec![CustomMetric::from(shop_metric(&facade, name)?)],
        ));
    }
    groups[1].add_to_summary_dashboard = Some(true);
    facade.monitor_custom(shop_props(groups))?;

    let widths: Vec<u32> = facade.widgets().iter().skip(2).map(|w| w.width()).collect();
    assert_eq!(widths, vec![8, 8, 8]);

    let summary = facade.summary_widgets();
    assert_eq!(summary.len(), 2);
    let graph = summary[1].to_json()?;
    assert_eq!(graph["properties"]["title"], "Orders");
    assert_eq!((graph["width"].as_u64(), graph["height"].as_u64()), (Some(24), Some(6)));
    Ok(())
}

#[test]
fn group_without_summary_members_renders_nothing() -> Result<()> {
    let mut facade = facade_with_prefix("Test");
    let carts = CustomMetric::from(shop_metric(&facade, "Carts")?);
    facade.monitor_custom(shop_props(vec![CustomMetricGroup::new("Carts", vec![carts])]))?;

    assert!(facade.summary_widgets().is_empty());
    assert_eq!(facade.widgets().len(), 3);
    Ok(())
}
