use crate::axis::{AxisPosition, LegendPosition, YAxis};
use crate::size::{DEFAULT_GRAPH_WIDGET_HEIGHT, FULL_WIDTH};
use oxwatch_common::annotation::{HorizontalAnnotation, VerticalAnnotation};
use oxwatch_common::error::{MonitoringError, Result};
use oxwatch_metric::MetricReference;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

const BAND_ID_SUFFIX: &str = "_band";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphWidgetType {
    #[default]
    Line,
    Bar,
    Pie,
    StackedArea,
    SingleValue,
    Table,
}

impl GraphWidgetType {
    fn view(&self) -> &'static str {
        match self {
            Self::Line | Self::StackedArea => "timeSeries",
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::SingleValue => "singleValue",
            Self::Table => "table",
        }
    }

    // aggregated views make no sense over a sliding period
    fn forces_period_to_time_range(&self) -> bool {
        matches!(self, Self::Bar | Self::Pie)
    }
}

/// A metric graph panel.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphWidget {
    pub widget_type: GraphWidgetType,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub left: Vec<MetricReference>,
    pub right: Vec<MetricReference>,
    pub left_annotations: Vec<HorizontalAnnotation>,
    pub right_annotations: Vec<HorizontalAnnotation>,
    pub vertical_annotations: Vec<VerticalAnnotation>,
    pub left_y_axis: Option<YAxis>,
    pub right_y_axis: Option<YAxis>,
    pub legend_position: Option<LegendPosition>,
    pub set_period_to_time_range: Option<bool>,
    pub region: Option<String>,
    /// Renders the single band metric as a shaded band around its series.
    pub render_anomaly_band: bool,
}

impl Default for GraphWidget {
    fn default() -> Self {
        Self {
            widget_type: GraphWidgetType::default(),
            title: String::new(),
            width: FULL_WIDTH,
            height: DEFAULT_GRAPH_WIDGET_HEIGHT,
            left: Vec::new(),
            right: Vec::new(),
            left_annotations: Vec::new(),
            right_annotations: Vec::new(),
            vertical_annotations: Vec::new(),
            left_y_axis: None,
            right_y_axis: None,
            legend_position: None,
            set_period_to_time_range: None,
            region: None,
            render_anomaly_band: false,
        }
    }
}

impl GraphWidget {
    pub fn new(widget_type: GraphWidgetType, title: impl Into<String>) -> Self {
        Self {
            widget_type,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_left(mut self, metrics: Vec<MetricReference>) -> Self {
        self.left = metrics;
        self
    }

    pub fn with_right(mut self, metrics: Vec<MetricReference>) -> Self {
        self.right = metrics;
        self
    }

    pub fn with_left_annotations(mut self, annotations: Vec<HorizontalAnnotation>) -> Self {
        self.left_annotations = annotations;
        self
    }

    pub fn with_left_y_axis(mut self, axis: YAxis) -> Self {
        self.left_y_axis = Some(axis);
        self
    }

    /// Dashboard body of this widget.
    ///
    /// Fails when one expression id is bound to two different series, or
    /// when the anomaly band layout does not hold.
    pub fn to_json(&self) -> Result<Value> {
        let mut renderer = MetricRenderer::new(&self.title);
        for metric in &self.left {
            renderer.push(metric, AxisPosition::Left)?;
        }
        for metric in &self.right {
            renderer.push(metric, AxisPosition::Right)?;
        }
        let mut metrics = renderer.finish();
        if self.render_anomaly_band {
            link_anomaly_band(&mut metrics)?;
        }

        let mut properties = Map::new();
        properties.insert("view".into(), json!(self.widget_type.view()));
        properties.insert("title".into(), json!(self.title));
        if let Some(region) = &self.region {
            properties.insert("region".into(), json!(region));
        }
        properties.insert("metrics".into(), Value::Array(metrics));
        if let Some(annotations) = self.annotations_json()? {
            properties.insert("annotations".into(), annotations);
        }
        let mut y_axis = Map::new();
        if let Some(axis) = &self.left_y_axis {
            y_axis.insert("left".into(), serde_json::to_value(axis)?);
        }
        if let Some(axis) = &self.right_y_axis {
            y_axis.insert("right".into(), serde_json::to_value(axis)?);
        }
        if !y_axis.is_empty() {
            properties.insert("yAxis".into(), Value::Object(y_axis));
        }
        if let Some(position) = self.legend_position {
            properties.insert("legend".into(), json!({ "position": position }));
        }
        if self.widget_type == GraphWidgetType::StackedArea {
            properties.insert("stacked".into(), json!(true));
        }
        let period_to_time_range = self
            .set_period_to_time_range
            .unwrap_or(self.widget_type.forces_period_to_time_range());
        if period_to_time_range {
            properties.insert("setPeriodToTimeRange".into(), json!(true));
        }

        tracing::debug!(title = %self.title, width = self.width, "Graph widget rendered");
        Ok(json!({
            "type": "metric",
            "width": self.width,
            "height": self.height,
            "properties": Value::Object(properties),
        }))
    }

    fn annotations_json(&self) -> Result<Option<Value>> {
        let mut horizontal = Vec::new();
        for annotation in &self.left_annotations {
            horizontal.push(serde_json::to_value(annotation)?);
        }
        for annotation in &self.right_annotations {
            let mut value = serde_json::to_value(annotation)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("yAxis".into(), json!("right"));
            }
            horizontal.push(value);
        }
        let vertical = self
            .vertical_annotations
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if horizontal.is_empty() && vertical.is_empty() {
            return Ok(None);
        }
        let mut annotations = Map::new();
        if !horizontal.is_empty() {
            annotations.insert("horizontal".into(), Value::Array(horizontal));
        }
        if !vertical.is_empty() {
            annotations.insert("vertical".into(), Value::Array(vertical));
        }
        Ok(Some(Value::Object(annotations)))
    }
}

/// Flattens references into dashboard metric entries. Visible series come
/// first; expression operands follow, hidden and carrying their id.
struct MetricRenderer<'a> {
    widget: &'a str,
    visible: Vec<Value>,
    hidden: Vec<Value>,
    bound: BTreeMap<String, Value>,
}

impl<'a> MetricRenderer<'a> {
    fn new(widget: &'a str) -> Self {
        Self {
            widget,
            visible: Vec::new(),
            hidden: Vec::new(),
            bound: BTreeMap::new(),
        }
    }

    fn push(&mut self, metric: &MetricReference, axis: AxisPosition) -> Result<()> {
        let entry = self.render(metric, None, axis)?;
        self.visible.push(entry);
        Ok(())
    }

    fn finish(self) -> Vec<Value> {
        let mut metrics = self.visible;
        metrics.extend(self.hidden);
        metrics
    }

    // `id` is set for operands, which are rendered hidden.
    fn render(&mut self, metric: &MetricReference, id: Option<&str>, axis: AxisPosition) -> Result<Value> {
        let mut options = Map::new();
        let mut entry = Vec::new();
        match metric {
            MetricReference::Raw(raw) => {
                entry.push(json!(raw.namespace));
                entry.push(json!(raw.metric_name));
                for (key, value) in &raw.dimensions {
                    entry.push(json!(key));
                    entry.push(json!(value));
                }
                options.insert("stat".into(), json!(raw.statistic.as_str()));
            }
            MetricReference::Math(math) => {
                options.insert("expression".into(), json!(math.expression));
                for (operand_id, operand) in &math.using_metrics {
                    let rendered = self.render(operand, Some(operand_id), AxisPosition::Left)?;
                    self.bind(operand_id, rendered)?;
                }
            }
            MetricReference::Search(search) => {
                options.insert("expression".into(), json!(search.expression()));
            }
        }

        if let Some(label) = metric.label() {
            options.insert("label".into(), json!(label));
        }
        if let Some(color) = metric.color() {
            options.insert("color".into(), json!(color));
        }
        options.insert("period".into(), json!(metric.period().num_seconds()));
        if let Some(region) = metric.region() {
            options.insert("region".into(), json!(region));
        }
        if let Some(account) = account_of(metric) {
            options.insert("accountId".into(), json!(account));
        }
        match id {
            Some(id) => {
                options.insert("id".into(), json!(id));
                options.insert("visible".into(), json!(false));
            }
            None if axis == AxisPosition::Right => {
                options.insert("yAxis".into(), json!("right"));
            }
            None => {}
        }

        entry.push(Value::Object(options));
        Ok(Value::Array(entry))
    }

    fn bind(&mut self, id: &str, rendered: Value) -> Result<()> {
        match self.bound.get(id) {
            Some(existing) if *existing == rendered => Ok(()),
            Some(_) => Err(MonitoringError::DuplicateExpressionId {
                id: id.to_string(),
                widget: self.widget.to_string(),
            }),
            None => {
                self.bound.insert(id.to_string(), rendered.clone());
                self.hidden.push(rendered);
                Ok(())
            }
        }
    }
}

fn account_of(metric: &MetricReference) -> Option<&str> {
    match metric {
        MetricReference::Raw(m) => m.account.as_deref(),
        MetricReference::Math(m) => m.account.as_deref(),
        MetricReference::Search(m) => m.account.as_deref(),
    }
}

/// The backend only shades an anomaly band when the band expression is
/// named `<evaluated id>_band` and the evaluated series is visible.
fn link_anomaly_band(metrics: &mut [Value]) -> Result<()> {
    if metrics.len() < 2 {
        return Err(MonitoringError::InvalidWidget(
            "anomaly band widget needs the metric and the anomaly detection math".to_string(),
        ));
    }
    let evaluated_id = metrics[1]
        .as_array()
        .and_then(|entry| entry.last())
        .and_then(|options| options.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| MonitoringError::InvalidWidget("second metric must have an id".to_string()))?;

    let band = metrics[0]
        .as_array_mut()
        .filter(|entry| entry.len() == 1)
        .and_then(|entry| entry[0].as_object_mut())
        .ok_or_else(|| {
            MonitoringError::InvalidWidget("first metric must be a math expression".to_string())
        })?;
    band.insert("id".into(), json!(format!("{evaluated_id}{BAND_ID_SUFFIX}")));

    if let Some(options) = metrics[1]
        .as_array_mut()
        .and_then(|entry| entry.last_mut())
        .and_then(Value::as_object_mut)
    {
        options.insert("visible".into(), json!(true));
    }
    Ok(())
}
