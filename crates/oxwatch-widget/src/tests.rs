use crate::{GraphWidget, GraphWidgetType, TextWidget, Widget, YAxis};
use oxwatch_common::annotation::HorizontalAnnotation;
use oxwatch_common::error::MonitoringError;
use oxwatch_common::statistic::Statistic;
use oxwatch_metric::factory::{AnomalyOptions, MathOptions, MetricOptions};
use oxwatch_metric::{MetricDefaults, MetricFactory, MetricReference};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn factory() -> MetricFactory {
    MetricFactory::new(MetricDefaults::default().with_namespace("AWS/ApiGateway"))
}

fn metric(factory: &MetricFactory, name: &str) -> MetricReference {
    factory
        .create_metric(
            name,
            Statistic::Sum,
            MetricOptions::new()
                .with_label(name)
                .with_dimension("ApiName", "Orders"),
        )
        .unwrap()
}

fn metrics_of(widget: &Value) -> &Vec<Value> {
    widget["properties"]["metrics"].as_array().unwrap()
}

#[test]
fn raw_metric_entry() {
    let factory = factory();
    let widget = GraphWidget::new(GraphWidgetType::Line, "Requests")
        .with_left(vec![metric(&factory, "Count")])
        .to_json()
        .unwrap();

    assert_eq!(widget["type"], "metric");
    assert_eq!(widget["width"], 24);
    assert_eq!(widget["height"], 5);
    assert_eq!(widget["properties"]["view"], "timeSeries");
    assert_eq!(
        metrics_of(&widget)[0],
        json!(["AWS/ApiGateway", "Count", "ApiName", "Orders", {"stat": "Sum", "label": "Count", "period": 300}])
    );
    assert!(widget["properties"].get("annotations").is_none());
    assert!(widget["properties"].get("setPeriodToTimeRange").is_none());
}

#[test]
fn math_operands_are_hidden_after_visible_series() {
    let factory = factory();
    let errors = factory
        .create_metric_math(
            "100 * (e / r)",
            BTreeMap::from([
                ("e".to_string(), metric(&factory, "5XXError")),
                ("r".to_string(), metric(&factory, "Count")),
            ]),
            "Fault rate",
            MathOptions::default(),
        )
        .unwrap();
    let widget = GraphWidget::new(GraphWidgetType::Line, "Faults")
        .with_left(vec![errors])
        .with_right(vec![metric(&factory, "Count")])
        .to_json()
        .unwrap();

    let metrics = metrics_of(&widget);
    assert_eq!(metrics.len(), 4);
    assert_eq!(metrics[0][0]["expression"], "100 * (e / r)");
    assert_eq!(metrics[1][4]["yAxis"], "right");
    for (entry, id) in metrics[2..].iter().zip(["e", "r"]) {
        let options = &entry[4];
        assert_eq!(options["id"], id);
        assert_eq!(options["visible"], false);
        assert!(options.get("yAxis").is_none());
    }
}

#[test]
fn shared_operand_is_rendered_once() {
    let factory = factory();
    let count = metric(&factory, "Count");
    let math = |expression: &str| {
        factory
            .create_metric_math(
                expression,
                BTreeMap::from([("m1".to_string(), count.clone())]),
                expression,
                MathOptions::default(),
            )
            .unwrap()
    };
    let widget = GraphWidget::new(GraphWidgetType::Line, "Rates")
        .with_left(vec![math("m1 / 60"), math("m1 * 2")])
        .to_json()
        .unwrap();

    assert_eq!(metrics_of(&widget).len(), 3);
}

#[test]
fn conflicting_operand_id_is_rejected() {
    let factory = factory();
    let using = |name: &str| {
        factory
            .create_metric_math(
                "m1 / 60",
                BTreeMap::from([("m1".to_string(), metric(&factory, name))]),
                name,
                MathOptions::default(),
            )
            .unwrap()
    };
    let err = GraphWidget::new(GraphWidgetType::Line, "Rates")
        .with_left(vec![using("Count"), using("4XXError")])
        .to_json()
        .unwrap_err();

    assert!(matches!(
        err,
        MonitoringError::DuplicateExpressionId { ref id, ref widget } if id == "m1" && widget == "Rates"
    ));
}

#[test]
fn anomaly_band_links_band_to_evaluated_series() {
    let factory = factory();
    let band = factory
        .create_metric_anomaly_detection(
            &metric(&factory, "Count"),
            2.0,
            "Expected (stdev = 2)",
            AnomalyOptions {
                expression_id: Some("anomaly_abc".to_string()),
                ..AnomalyOptions::default()
            },
        )
        .unwrap();
    let widget = GraphWidget {
        render_anomaly_band: true,
        ..GraphWidget::new(GraphWidgetType::Line, "Requests").with_left(vec![band])
    }
    .to_json()
    .unwrap();

    let metrics = metrics_of(&widget);
    assert_eq!(metrics[0][0]["id"], "anomaly_abc_band");
    assert_eq!(metrics[1][4]["id"], "anomaly_abc");
    assert_eq!(metrics[1][4]["visible"], true);
}

#[test]
fn anomaly_band_requires_band_layout() {
    let factory = factory();
    let err = GraphWidget {
        render_anomaly_band: true,
        ..GraphWidget::new(GraphWidgetType::Line, "Requests").with_left(vec![metric(&factory, "Count")])
    }
    .to_json()
    .unwrap_err();

    assert!(matches!(err, MonitoringError::InvalidWidget(_)));
}

#[test]
fn view_flags() {
    let factory = factory();
    let render = |widget_type| {
        GraphWidget::new(widget_type, "Requests")
            .with_left(vec![metric(&factory, "Count")])
            .to_json()
            .unwrap()
    };

    let stacked = render(GraphWidgetType::StackedArea);
    assert_eq!(stacked["properties"]["view"], "timeSeries");
    assert_eq!(stacked["properties"]["stacked"], true);

    let bar = render(GraphWidgetType::Bar);
    assert_eq!(bar["properties"]["view"], "bar");
    assert_eq!(bar["properties"]["setPeriodToTimeRange"], true);

    let single = render(GraphWidgetType::SingleValue);
    assert_eq!(single["properties"]["view"], "singleValue");
    assert!(single["properties"].get("stacked").is_none());
}

#[test]
fn annotations_and_axes() {
    let factory = factory();
    let widget = GraphWidget {
        right_annotations: vec![HorizontalAnnotation::new(5.0).with_label("Max TPS")],
        ..GraphWidget::new(GraphWidgetType::Line, "Latency")
            .with_left(vec![metric(&factory, "Latency")])
            .with_left_annotations(vec![HorizontalAnnotation::new(330.0).with_label("Warning")])
            .with_left_y_axis(YAxis::time_millis_from_zero())
    }
    .to_json()
    .unwrap();

    let horizontal = widget["properties"]["annotations"]["horizontal"].as_array().unwrap();
    assert_eq!(horizontal[0], json!({"value": 330.0, "label": "Warning"}));
    assert_eq!(horizontal[1]["yAxis"], "right");
    assert!(widget["properties"]["annotations"].get("vertical").is_none());
    assert_eq!(
        widget["properties"]["yAxis"]["left"],
        json!({"min": 0.0, "label": "ms", "showUnits": false})
    );
}

#[test]
fn text_widget_body() {
    let widget = Widget::from(TextWidget::new("Orders are processed here").with_height(2));
    assert_eq!((widget.width(), widget.height()), (24, 2));
    assert_eq!(
        widget.to_json().unwrap(),
        json!({"type": "text", "width": 24, "height": 2, "properties": {"markdown": "Orders are processed here"}})
    );
}
