use crate::monitoring::Monitoring;
use crate::scope::MonitoringScope;
use chrono::Duration;
use oxwatch_alarm::builders::{AnomalyDetectingAlarmFactory, CustomAlarmFactory};
use oxwatch_alarm::threshold::{AnomalyDetectionThreshold, CustomThreshold};
use oxwatch_alarm::{AlarmDefinition, AlarmFactory, ThresholdSpec};
use oxwatch_common::annotation::{HorizontalAnnotation, VerticalAnnotation};
use oxwatch_common::error::{MonitoringError, Result};
use oxwatch_common::naming::{NameResolutionInput, NamingStrategy, UserProvidedNames};
use oxwatch_common::statistic::Statistic;
use oxwatch_common::strings::hash_for_expression_id;
use oxwatch_metric::factory::{AnomalyOptions, SearchOptions};
use oxwatch_metric::{MetricFactory, MetricReference};
use oxwatch_widget::size::{
    group_width, DEFAULT_GRAPH_WIDGET_HEIGHT, DEFAULT_SUMMARY_WIDGET_HEIGHT,
};
use oxwatch_widget::{
    AxisPosition, GraphWidget, GraphWidgetType, LegendPosition, MonitoringHeader, TextWidget,
    Widget, YAxis,
};
use std::collections::BTreeMap;

const ANOMALY_ALARM_ID_PREFIX: &str = "alarm_";
const ANOMALY_RENDER_ID_PREFIX: &str = "anomaly_";

#[derive(Debug, Clone)]
pub struct CustomMetricWithAlarm {
    pub metric: MetricReference,
    pub alarm_friendly_name: String,
    pub add_alarm: ThresholdSpec<CustomThreshold>,
    pub position: AxisPosition,
}

#[derive(Debug, Clone)]
pub struct CustomMetricWithAnomalyDetection {
    pub metric: MetricReference,
    /// Overrides the metric period for both the rendered and alarmed bands.
    pub period: Option<Duration>,
    pub alarm_friendly_name: String,
    pub anomaly_detection_standard_deviation_to_render: f64,
    pub add_alarm_on_anomaly: ThresholdSpec<AnomalyDetectionThreshold>,
}

#[derive(Debug, Clone)]
pub struct CustomMetricSearch {
    pub namespace: Option<String>,
    pub search_query: String,
    pub label: Option<String>,
    /// `None` values match any value of the dimension.
    pub dimensions: BTreeMap<String, Option<String>>,
    pub statistic: Statistic,
    pub period: Option<Duration>,
    pub position: AxisPosition,
}

/// One entry of a metric group.
#[derive(Debug, Clone)]
pub enum CustomMetric {
    Plain {
        metric: MetricReference,
        position: AxisPosition,
    },
    Search(CustomMetricSearch),
    WithAlarm(CustomMetricWithAlarm),
    WithAnomaly(CustomMetricWithAnomalyDetection),
}

impl CustomMetric {
    pub fn plain(metric: MetricReference) -> Self {
        Self::Plain {
            metric,
            position: AxisPosition::Left,
        }
    }

    fn position(&self) -> AxisPosition {
        match self {
            Self::Plain { position, .. } => *position,
            Self::Search(search) => search.position,
            Self::WithAlarm(with_alarm) => with_alarm.position,
            Self::WithAnomaly(_) => AxisPosition::Left,
        }
    }
}

impl From<MetricReference> for CustomMetric {
    fn from(metric: MetricReference) -> Self {
        Self::plain(metric)
    }
}

/// Loosely specified metric entry, as read from user input.
///
/// Converting it into a [`CustomMetric`] picks the variant. It rejects an
/// entry mixing a static alarm with anomaly detection, and anomaly alarms
/// without a band to render.
#[derive(Debug, Clone)]
pub struct CustomMetricEntry {
    pub metric: MetricReference,
    pub alarm_friendly_name: Option<String>,
    pub add_alarm: Option<ThresholdSpec<CustomThreshold>>,
    pub anomaly_detection_standard_deviation_to_render: Option<f64>,
    pub add_alarm_on_anomaly: Option<ThresholdSpec<AnomalyDetectionThreshold>>,
    pub period: Option<Duration>,
    pub position: Option<AxisPosition>,
}

impl CustomMetricEntry {
    pub fn new(metric: MetricReference) -> Self {
        Self {
            metric,
            alarm_friendly_name: None,
            add_alarm: None,
            anomaly_detection_standard_deviation_to_render: None,
            add_alarm_on_anomaly: None,
            period: None,
            position: None,
        }
    }
}

impl TryFrom<CustomMetricEntry> for CustomMetric {
    type Error = MonitoringError;

    fn try_from(entry: CustomMetricEntry) -> Result<Self> {
        let position = entry.position.unwrap_or_default();
        let friendly_name = |entry: &CustomMetricEntry| {
            entry.alarm_friendly_name.clone().ok_or_else(|| {
                MonitoringError::MissingName(format!(
                    "alarm_friendly_name is required to alarm on '{}'",
                    entry.metric.describe()
                ))
            })
        };

        let anomaly_requested = entry.anomaly_detection_standard_deviation_to_render.is_some()
            || entry.add_alarm_on_anomaly.is_some();
        if entry.add_alarm.is_some() && anomaly_requested {
            return Err(MonitoringError::AlarmWithAnomalyDetection {
                metric: entry.metric.describe(),
            });
        }

        match (entry.add_alarm.is_some(), entry.anomaly_detection_standard_deviation_to_render) {
            (true, _) => Ok(Self::WithAlarm(CustomMetricWithAlarm {
                alarm_friendly_name: friendly_name(&entry)?,
                metric: entry.metric,
                add_alarm: entry.add_alarm.unwrap_or_default(),
                position,
            })),
            (false, Some(stdev)) => Ok(Self::WithAnomaly(CustomMetricWithAnomalyDetection {
                alarm_friendly_name: friendly_name(&entry)?,
                metric: entry.metric,
                period: entry.period,
                anomaly_detection_standard_deviation_to_render: stdev,
                add_alarm_on_anomaly: entry.add_alarm_on_anomaly.unwrap_or_default(),
            })),
            // anomaly alarms compare against the rendered band
            (false, None) if entry.add_alarm_on_anomaly.is_some() => {
                Err(MonitoringError::InvalidConfig(format!(
                    "anomaly alarms on '{}' need anomaly_detection_standard_deviation_to_render",
                    entry.metric.describe()
                )))
            }
            (false, None) => Ok(Self::Plain {
                metric: entry.metric,
                position,
            }),
        }
    }
}

/// Metrics rendered together in one graph widget.
#[derive(Debug, Clone, Default)]
pub struct CustomMetricGroup {
    pub title: String,
    pub graph_widget_type: GraphWidgetType,
    pub graph_widget_axis: Option<YAxis>,
    pub graph_widget_right_axis: Option<YAxis>,
    pub graph_widget_legend: Option<LegendPosition>,
    pub graph_widget_set_period_to_time_range: Option<bool>,
    pub graph_widget_width: Option<u32>,
    /// Overrides the monitoring-level summary flag for this group.
    pub add_to_summary_dashboard: Option<bool>,
    pub metrics: Vec<CustomMetric>,
    pub horizontal_annotations: Vec<HorizontalAnnotation>,
    pub horizontal_right_annotations: Vec<HorizontalAnnotation>,
    pub vertical_annotations: Vec<VerticalAnnotation>,
}

impl CustomMetricGroup {
    pub fn new(title: impl Into<String>, metrics: Vec<CustomMetric>) -> Self {
        Self {
            title: title.into(),
            metrics,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomMonitoringProps {
    pub names: UserProvidedNames,
    /// Markdown shown below the header on the full dashboard.
    pub description: Option<String>,
    pub description_widget_height: Option<u32>,
    /// Height of every group widget.
    pub height: Option<u32>,
    pub add_to_summary_dashboard: Option<bool>,
    pub metric_groups: Vec<CustomMetricGroup>,
}

/// A group with everything its widget needs, resolved at construction.
#[derive(Debug, Clone)]
struct AnnotatedGroup {
    group: CustomMetricGroup,
    title: String,
    left: Vec<MetricReference>,
    right: Vec<MetricReference>,
    left_annotations: Vec<HorizontalAnnotation>,
    right_annotations: Vec<HorizontalAnnotation>,
    use_anomaly_band_widget: bool,
}

/// Free-form metric groups, each rendered as one graph widget with the
/// thresholds of its alarms drawn as annotations.
#[derive(Debug)]
pub struct CustomMonitoring {
    title: String,
    description: Option<String>,
    description_widget_height: Option<u32>,
    height: Option<u32>,
    add_to_summary_dashboard: bool,
    groups: Vec<AnnotatedGroup>,
    alarms: Vec<AlarmDefinition>,
}

impl CustomMonitoring {
    pub fn new(scope: &MonitoringScope, props: CustomMonitoringProps) -> Result<Self> {
        let naming = NamingStrategy::new(NameResolutionInput::new(props.names.clone()));
        let title = naming.resolve_human_readable_name()?;
        let metric_factory = scope.create_metric_factory();
        let alarm_factory = scope.create_alarm_factory(&naming.resolve_local_alarm_name_prefix()?);

        let mut builder = GroupBuilder {
            metric_factory: &metric_factory,
            alarm_factory: &alarm_factory,
            alarms: Vec::new(),
        };
        let groups = props
            .metric_groups
            .into_iter()
            .map(|group| builder.annotate(group))
            .collect::<Result<Vec<_>>>()?;
        let alarms = builder.alarms;

        tracing::debug!(
            title = %title,
            groups = groups.len(),
            alarms = alarms.len(),
            "Custom monitoring created"
        );
        Ok(Self {
            title,
            description: props.description,
            description_widget_height: props.description_widget_height,
            height: props.height,
            add_to_summary_dashboard: props.add_to_summary_dashboard.unwrap_or(false),
            groups,
            alarms,
        })
    }

    fn all_widgets(&self, summary: bool) -> Vec<Widget> {
        let groups: Vec<&AnnotatedGroup> = self
            .groups
            .iter()
            .filter(|g| {
                !summary
                    || g.group
                        .add_to_summary_dashboard
                        .unwrap_or(self.add_to_summary_dashboard)
            })
            .collect();
        if groups.is_empty() {
            return Vec::new();
        }

        let mut widgets: Vec<Widget> = vec![MonitoringHeader::new(&self.title).to_widget().into()];
        if let (Some(description), false) = (&self.description, summary) {
            let mut text = TextWidget::new(description);
            if let Some(height) = self.description_widget_height {
                text = text.with_height(height);
            }
            widgets.push(text.into());
        }

        let default_height = if summary {
            DEFAULT_SUMMARY_WIDGET_HEIGHT
        } else {
            DEFAULT_GRAPH_WIDGET_HEIGHT
        };
        let height = self.height.unwrap_or(default_height);
        let width = group_width(groups.len());
        widgets.extend(groups.into_iter().map(|g| {
            let group = &g.group;
            Widget::from(GraphWidget {
                widget_type: group.graph_widget_type,
                title: g.title.clone(),
                width: group.graph_widget_width.unwrap_or(width),
                height,
                left: g.left.clone(),
                right: g.right.clone(),
                left_annotations: g.left_annotations.clone(),
                right_annotations: g.right_annotations.clone(),
                vertical_annotations: group.vertical_annotations.clone(),
                left_y_axis: group.graph_widget_axis.clone(),
                right_y_axis: group.graph_widget_right_axis.clone(),
                legend_position: group.graph_widget_legend,
                set_period_to_time_range: group.graph_widget_set_period_to_time_range,
                region: None,
                render_anomaly_band: g.use_anomaly_band_widget,
            })
        }));
        widgets
    }
}

impl Monitoring for CustomMonitoring {
    fn widgets(&self) -> Vec<Widget> {
        self.all_widgets(false)
    }

    fn summary_widgets(&self) -> Vec<Widget> {
        self.all_widgets(true)
    }

    fn created_alarms(&self) -> &[AlarmDefinition] {
        &self.alarms
    }
}

struct GroupBuilder<'a> {
    metric_factory: &'a MetricFactory,
    alarm_factory: &'a AlarmFactory,
    alarms: Vec<AlarmDefinition>,
}

impl GroupBuilder<'_> {
    fn annotate(&mut self, group: CustomMetricGroup) -> Result<AnnotatedGroup> {
        let mut left_annotations = group.horizontal_annotations.clone();
        let mut right_annotations = group.horizontal_right_annotations.clone();
        let mut title_addons = Vec::new();

        for metric in &group.metrics {
            match metric {
                CustomMetric::WithAlarm(with_alarm) => {
                    let target = match with_alarm.position {
                        AxisPosition::Left => &mut left_annotations,
                        AxisPosition::Right => &mut right_annotations,
                    };
                    self.add_alarms(with_alarm, target)?;
                }
                CustomMetric::WithAnomaly(with_anomaly) => {
                    if let Some(addon) = self.add_anomaly_alarms(with_anomaly)? {
                        title_addons.push(addon);
                    }
                }
                CustomMetric::Plain { .. } | CustomMetric::Search(_) => {}
            }
        }

        let mut left = Vec::new();
        let mut right = Vec::new();
        for metric in &group.metrics {
            let rendered = self.to_metric(metric)?;
            match metric.position() {
                AxisPosition::Left => left.push(rendered),
                AxisPosition::Right => right.push(rendered),
            }
        }

        let title = if title_addons.is_empty() {
            group.title.clone()
        } else {
            format!("{} ({})", group.title, title_addons.join(", "))
        };
        let use_anomaly_band_widget = group.metrics.len() == 1
            && matches!(group.metrics.first(), Some(CustomMetric::WithAnomaly(_)));

        Ok(AnnotatedGroup {
            group,
            title,
            left,
            right,
            left_annotations,
            right_annotations,
            use_anomaly_band_widget,
        })
    }

    fn add_alarms(
        &mut self,
        metric: &CustomMetricWithAlarm,
        annotations: &mut Vec<HorizontalAnnotation>,
    ) -> Result<()> {
        let custom = CustomAlarmFactory::new(self.alarm_factory);
        for (disambiguator, threshold) in &metric.add_alarm {
            let alarm = custom.add_custom_alarm(
                &metric.metric,
                &metric.alarm_friendly_name,
                disambiguator,
                threshold,
            )?;
            annotations.extend(alarm.annotation.clone());
            self.alarms.push(alarm);
        }
        Ok(())
    }

    // Bands are drawn by the widget itself, so these alarms add no
    // annotation; the title lists the alarmed widths instead.
    fn add_anomaly_alarms(&mut self, metric: &CustomMetricWithAnomalyDetection) -> Result<Option<String>> {
        let anomaly = AnomalyDetectingAlarmFactory::new(self.alarm_factory);
        let mut standard_deviations = Vec::new();

        for (disambiguator, threshold) in &metric.add_alarm_on_anomaly {
            let stdev = threshold.standard_deviation_for_alarm;
            let id = format!(
                "{ANOMALY_ALARM_ID_PREFIX}{}",
                hash_for_expression_id(&format!("{}_{disambiguator}", metric.alarm_friendly_name))
            );
            let band = self.metric_factory.create_metric_anomaly_detection(
                &self.metric_factory.adapt_metric_preserving_period(&metric.metric),
                stdev,
                &format!("Band (stdev {stdev})"),
                AnomalyOptions {
                    expression_id: Some(id),
                    period: Some(metric.period.unwrap_or(metric.metric.period())),
                    ..AnomalyOptions::default()
                },
            )?;
            let alarm = anomaly.add_alarm_when_out_of_band(
                &band,
                &metric.alarm_friendly_name,
                disambiguator,
                threshold,
            )?;
            self.alarms.push(alarm);
            standard_deviations.push(stdev);
        }

        if standard_deviations.is_empty() {
            return Ok(None);
        }
        standard_deviations.sort_by(f64::total_cmp);
        standard_deviations.dedup();
        let rendered: Vec<String> = standard_deviations.iter().map(f64::to_string).collect();
        Ok(Some(format!("alarms with stdev {}", rendered.join(", "))))
    }

    fn to_metric(&self, metric: &CustomMetric) -> Result<MetricReference> {
        let factory = self.metric_factory;
        match metric {
            CustomMetric::Plain { metric, .. } => Ok(factory.adapt_metric_preserving_period(metric)),
            CustomMetric::WithAlarm(with_alarm) => {
                Ok(factory.adapt_metric_preserving_period(&with_alarm.metric))
            }
            CustomMetric::WithAnomaly(with_anomaly) => {
                let stdev = with_anomaly.anomaly_detection_standard_deviation_to_render;
                factory.create_metric_anomaly_detection(
                    &with_anomaly.metric,
                    stdev,
                    &format!("Expected (stdev = {stdev})"),
                    AnomalyOptions {
                        expression_id: Some(format!(
                            "{ANOMALY_RENDER_ID_PREFIX}{}",
                            hash_for_expression_id(&with_anomaly.alarm_friendly_name)
                        )),
                        period: Some(with_anomaly.period.unwrap_or(with_anomaly.metric.period())),
                        ..AnomalyOptions::default()
                    },
                )
            }
            CustomMetric::Search(search) => factory.create_metric_search(
                &search.search_query,
                search.dimensions.clone(),
                search.statistic,
                SearchOptions {
                    namespace: search.namespace.clone(),
                    label: search.label.clone(),
                    period: search.period,
                    ..SearchOptions::default()
                },
            ),
        }
    }
}
