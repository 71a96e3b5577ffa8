use crate::factory::{AnomalyOptions, MathOptions, MetricOptions, RateOptions, SearchOptions};
use crate::{MathKind, MetricDefaults, MetricFactory, MetricReference, RateComputationMethod};
use chrono::Duration;
use oxwatch_common::error::MonitoringError;
use oxwatch_common::statistic::Statistic;
use std::collections::BTreeMap;

fn factory() -> MetricFactory {
    MetricFactory::new(MetricDefaults::default().with_namespace("Orders"))
}

fn requests(factory: &MetricFactory) -> MetricReference {
    factory
        .create_metric(
            "Requests",
            Statistic::Sum,
            MetricOptions::new()
                .with_label("Requests")
                .with_dimension("ApiName", "Orders"),
        )
        .unwrap()
}

fn expression_of(metric: &MetricReference) -> &str {
    match metric {
        MetricReference::Math(m) => &m.expression,
        other => panic!("expected a math expression, got {other:?}"),
    }
}

#[test]
fn create_metric_applies_defaults() {
    let factory = MetricFactory::new(MetricDefaults {
        region: Some("eu-west-1".to_string()),
        ..MetricDefaults::default().with_namespace("Orders")
    });
    let metric = requests(&factory);

    let MetricReference::Raw(raw) = &metric else {
        panic!("expected raw metric");
    };
    assert_eq!(raw.namespace, "Orders");
    assert_eq!(raw.period, Duration::minutes(5));
    assert_eq!(raw.region.as_deref(), Some("eu-west-1"));
    assert_eq!(raw.dimensions.get("ApiName").map(String::as_str), Some("Orders"));
}

#[test]
fn missing_namespace_is_an_error() {
    let factory = MetricFactory::default();
    let err = factory
        .create_metric("Requests", Statistic::Sum, MetricOptions::new())
        .unwrap_err();
    assert!(matches!(err, MonitoringError::MissingNamespace { .. }));
}

#[test]
fn namespace_override_beats_explicit_namespace() {
    let factory = MetricFactory::new(MetricDefaults {
        namespace_override: Some("Private".to_string()),
        ..MetricDefaults::default()
    });
    let metric = factory
        .create_metric(
            "Latency",
            Statistic::P99,
            MetricOptions::new().with_namespace("AWS/ApiGateway"),
        )
        .unwrap();
    assert_eq!(metric.namespaces(), vec!["Private"]);

    let foreign = MetricFactory::default()
        .create_metric(
            "Latency",
            Statistic::P99,
            MetricOptions::new().with_namespace("AWS/ApiGateway"),
        )
        .unwrap();
    assert_eq!(
        factory.adapt_metric_preserving_period(&foreign).namespaces(),
        vec!["Private"]
    );
}

#[test]
fn period_is_clamped_to_backend_minimum() {
    let factory = MetricFactory::new(MetricDefaults {
        period: Duration::minutes(1),
        minimum_periods: BTreeMap::from([("AWS/S3".to_string(), 86400)]),
        ..MetricDefaults::default().with_namespace("Orders")
    });

    let fast = factory
        .create_metric("Requests", Statistic::Sum, MetricOptions::new())
        .unwrap();
    assert_eq!(fast.period(), Duration::minutes(1));

    let slow = factory
        .create_metric(
            "BucketSizeBytes",
            Statistic::Average,
            MetricOptions::new().with_namespace("AWS/S3"),
        )
        .unwrap();
    assert_eq!(slow.period(), Duration::days(1));
}

#[test]
fn math_operands_share_the_expression_period() {
    let factory = factory();
    let errors = factory
        .create_metric(
            "Errors",
            Statistic::Sum,
            MetricOptions::new().with_period(Duration::minutes(1)),
        )
        .unwrap();
    let total = requests(&factory);

    let ratio = factory
        .create_metric_math(
            "100 * (errors / total)",
            BTreeMap::from([("errors".to_string(), errors), ("total".to_string(), total)]),
            "Error %",
            MathOptions {
                period: Some(Duration::minutes(10)),
                ..MathOptions::default()
            },
        )
        .unwrap();

    let MetricReference::Math(math) = &ratio else {
        panic!("expected math");
    };
    assert!(math
        .using_metrics
        .values()
        .all(|operand| operand.period() == Duration::minutes(10)));
}

#[test]
fn math_rejects_undeclared_and_invalid_ids() {
    let factory = factory();
    let metric = requests(&factory);

    let err = factory
        .create_metric_math(
            "m1 + m2",
            BTreeMap::from([("m1".to_string(), metric.clone())]),
            "Sum",
            MathOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, MonitoringError::UndeclaredOperand { ref id, .. } if id == "m2"));

    let err = factory
        .create_metric_math(
            "M1",
            BTreeMap::from([("M1".to_string(), metric)]),
            "Sum",
            MathOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, MonitoringError::InvalidExpressionId { .. }));
}

#[test]
fn search_expression_format() {
    let factory = factory();
    let search = factory
        .create_metric_search(
            "MetricName=\"CPUUtilization\"",
            BTreeMap::from([
                ("AutoScalingGroupName".to_string(), Some("web".to_string())),
                ("InstanceId".to_string(), None),
            ]),
            Statistic::Average,
            SearchOptions {
                namespace: Some("AWS/EC2".to_string()),
                ..SearchOptions::default()
            },
        )
        .unwrap();

    let MetricReference::Search(s) = &search else {
        panic!("expected search");
    };
    assert_eq!(
        s.expression(),
        "SEARCH('{AWS/EC2,AutoScalingGroupName,InstanceId} AutoScalingGroupName=\"web\" MetricName=\"CPUUtilization\"', 'Average', 300)"
    );
    assert_eq!(search.label(), Some(" "));
    assert!(search.is_search());
}

#[test]
fn rate_per_second_fills_gaps_when_requested() {
    let factory = factory();
    let metric = requests(&factory);

    let filled = factory
        .to_rate(
            &metric,
            RateComputationMethod::PerSecond,
            RateOptions {
                fill_with_zeroes: true,
                ..RateOptions::default()
            },
        )
        .unwrap();
    assert_eq!(expression_of(&filled), "FILL(m1,0) / PERIOD(m1)");
    assert_eq!(filled.label(), Some("TPS"));

    let sparse = factory
        .to_rate(&metric, RateComputationMethod::PerSecond, RateOptions::default())
        .unwrap();
    assert_eq!(expression_of(&sparse), "m1 / PERIOD(m1)");
}

#[test]
fn rate_per_minute_with_stats_label() {
    let factory = factory();
    let metric = requests(&factory).with_label("Errors");

    let rate = factory
        .to_rate(
            &metric,
            RateComputationMethod::PerMinute,
            RateOptions {
                add_stats_to_label: true,
                expression_id: Some("errors".to_string()),
                fill_with_zeroes: false,
            },
        )
        .unwrap();
    assert_eq!(expression_of(&rate), "(60 * errors) / PERIOD(errors)");
    assert_eq!(
        rate.label(),
        Some("Errors/m (min: ${MIN}, max: ${MAX}, avg: ${AVG})")
    );
}

#[test]
fn rate_average_relabels_without_math_unless_filling() {
    let factory = factory();
    let metric = requests(&factory);

    let avg = factory
        .to_rate(&metric, RateComputationMethod::Average, RateOptions::default())
        .unwrap();
    let MetricReference::Raw(raw) = &avg else {
        panic!("expected raw metric");
    };
    assert_eq!(raw.statistic, Statistic::Average);
    assert_eq!(avg.label(), Some("Requests (avg)"));

    let filled = factory
        .to_rate(
            &metric,
            RateComputationMethod::Average,
            RateOptions {
                fill_with_zeroes: true,
                ..RateOptions::default()
            },
        )
        .unwrap();
    assert_eq!(expression_of(&filled), "FILL(m1,0)");
}

#[test]
fn anomaly_band_expression() {
    let factory = factory();
    let metric = requests(&factory);

    let band = factory
        .create_metric_anomaly_detection(
            &metric,
            2.0,
            "Expected (stdev = 2)",
            AnomalyOptions {
                expression_id: Some("anomaly_abc".to_string()),
                ..AnomalyOptions::default()
            },
        )
        .unwrap();

    assert_eq!(expression_of(&band), "ANOMALY_DETECTION_BAND(anomaly_abc,2)");
    let math = band.anomaly_band().unwrap();
    assert_eq!(math.evaluated_id(), Some("anomaly_abc"));
    assert!(matches!(math.kind, MathKind::AnomalyBand { standard_deviations } if standard_deviations == 2.0));
}

#[test]
fn scaling_factors() {
    let factory = factory();
    let metric = requests(&factory);

    assert_eq!(factory.multiply_metric(&metric, 1.0, "Same", None).unwrap(), metric);
    let percent = factory.multiply_metric(&metric, 100.0, "Percent", None).unwrap();
    assert_eq!(expression_of(&percent), "m1 * 100");
    let per_k = factory.divide_metric(&metric, 1000.0, "Per k", Some("req")).unwrap();
    assert_eq!(expression_of(&per_k), "req / 1000");

    assert!(matches!(
        factory.multiply_metric(&metric, 0.5, "Half", None),
        Err(MonitoringError::InvalidScalingFactor { .. })
    ));
    for factor in [f64::NAN, f64::INFINITY] {
        assert!(matches!(
            factory.divide_metric(&metric, factor, "Broken", None),
            Err(MonitoringError::InvalidScalingFactor { .. })
        ));
    }
}

#[test]
fn with_overrides_return_new_values() {
    let factory = factory();
    let metric = requests(&factory);
    let relabeled = metric.with_label("Calls").with_period(Duration::minutes(1));

    assert_eq!(metric.label(), Some("Requests"));
    assert_eq!(metric.period(), Duration::minutes(5));
    assert_eq!(relabeled.label(), Some("Calls"));
    assert_eq!(relabeled.period(), Duration::minutes(1));
}

#[test]
fn defaults_load_from_toml() {
    let defaults: MetricDefaults = toml::from_str(
        r#"
namespace = "Orders"
period_secs = 60

[minimum_periods]
"AWS/S3" = 86400
"#,
    )
    .unwrap();

    assert_eq!(defaults.period, Duration::minutes(1));
    assert_eq!(defaults.minimum_period("AWS/S3"), Some(Duration::days(1)));
    assert!(defaults.namespace_override.is_none());
}
