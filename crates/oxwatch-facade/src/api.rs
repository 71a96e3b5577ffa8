use crate::monitoring::Monitoring;
use crate::scope::MonitoringScope;
use oxwatch_alarm::builders::{ErrorAlarmFactory, ErrorType, LatencyAlarmFactory, LatencyType, TpsAlarmFactory};
use oxwatch_alarm::threshold::{
    ErrorCountThreshold, ErrorRateThreshold, LatencyThreshold, MaxTpsThreshold, MinTpsThreshold,
};
use oxwatch_alarm::{AlarmDefinition, ThresholdSpec};
use oxwatch_common::annotation::HorizontalAnnotation;
use oxwatch_common::error::Result;
use oxwatch_common::naming::{NameResolutionInput, NamingStrategy, UserProvidedNames};
use oxwatch_common::statistic::Statistic;
use oxwatch_metric::factory::{MetricOptions, RateOptions};
use oxwatch_metric::{MetricFactory, MetricReference, RateComputationMethod};
use oxwatch_widget::size::{
    DEFAULT_GRAPH_WIDGET_HEIGHT, DEFAULT_SUMMARY_WIDGET_HEIGHT, QUARTER_WIDTH, THIRD_WIDTH,
};
use oxwatch_widget::{GraphWidget, GraphWidgetType, MonitoringHeader, Widget, YAxis};
use std::collections::{BTreeMap, BTreeSet};

const NAMESPACE: &str = "AWS/ApiGateway";
const DEFAULT_STAGE: &str = "prod";
const FAMILY: &str = "API Gateway Endpoint";
const DEFAULT_LATENCY_TYPES_TO_RENDER: [LatencyType; 3] =
    [LatencyType::P50, LatencyType::P90, LatencyType::P99];

#[derive(Debug, Clone, Default)]
pub struct ApiEndpointMonitoringProps {
    pub names: UserProvidedNames,
    pub api_name: String,
    /// Defaults to `prod`.
    pub api_stage: Option<String>,
    pub api_method: Option<String>,
    pub api_resource: Option<String>,
    /// Defaults to true.
    pub fill_tps_with_zeroes: Option<bool>,
    /// Used for the error and fault rates.
    pub rate_computation_method: RateComputationMethod,
    pub latency_alarms: BTreeMap<LatencyType, ThresholdSpec<LatencyThreshold>>,
    pub add_4xx_error_count_alarm: ThresholdSpec<ErrorCountThreshold>,
    pub add_4xx_error_rate_alarm: ThresholdSpec<ErrorRateThreshold>,
    pub add_5xx_fault_count_alarm: ThresholdSpec<ErrorCountThreshold>,
    pub add_5xx_fault_rate_alarm: ThresholdSpec<ErrorRateThreshold>,
    pub add_low_tps_alarm: ThresholdSpec<MinTpsThreshold>,
    pub add_high_tps_alarm: ThresholdSpec<MaxTpsThreshold>,
    /// Defaults to P50, P90 and P99. Alarmed latency types are always added.
    pub latency_types_to_render: Option<Vec<LatencyType>>,
}

impl ApiEndpointMonitoringProps {
    pub fn new(api_name: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            ..Self::default()
        }
    }

    pub fn with_latency_alarm(
        mut self,
        latency_type: LatencyType,
        disambiguator: impl Into<String>,
        threshold: LatencyThreshold,
    ) -> Self {
        self.latency_alarms
            .entry(latency_type)
            .or_default()
            .insert(disambiguator.into(), threshold);
        self
    }

    fn name_parts(&self) -> Vec<&str> {
        let mut parts = vec![
            self.api_name.as_str(),
            self.api_stage.as_deref().unwrap_or(DEFAULT_STAGE),
        ];
        parts.extend(self.api_method.as_deref());
        parts.extend(self.api_resource.as_deref());
        parts
    }

    fn dimensions(&self) -> BTreeMap<String, String> {
        let mut dimensions = BTreeMap::from([
            ("ApiName".to_string(), self.api_name.clone()),
            (
                "Stage".to_string(),
                self.api_stage.as_deref().unwrap_or(DEFAULT_STAGE).to_string(),
            ),
        ]);
        if let Some(method) = &self.api_method {
            dimensions.insert("Method".to_string(), method.clone());
        }
        if let Some(resource) = &self.api_resource {
            dimensions.insert("Resource".to_string(), resource.clone());
        }
        dimensions
    }
}

/// Series of one API Gateway endpoint.
struct ApiMetrics<'a> {
    factory: &'a MetricFactory,
    dimensions: BTreeMap<String, String>,
}

impl ApiMetrics<'_> {
    fn metric(&self, name: &str, statistic: Statistic, label: &str) -> Result<MetricReference> {
        let mut options = MetricOptions::new()
            .with_namespace(NAMESPACE)
            .with_label(label);
        options.dimensions = self.dimensions.clone();
        self.factory.create_metric(name, statistic, options)
    }

    fn tps(&self, fill_with_zeroes: bool) -> Result<MetricReference> {
        self.factory.to_rate(
            &self.metric("Count", Statistic::Sum, "Count")?,
            RateComputationMethod::PerSecond,
            RateOptions {
                add_stats_to_label: false,
                expression_id: Some("requests".to_string()),
                fill_with_zeroes,
            },
        )
    }

    fn error_4xx_count(&self) -> Result<MetricReference> {
        self.metric("4XXError", Statistic::Sum, "4XX Error")
    }

    fn fault_5xx_count(&self) -> Result<MetricReference> {
        self.metric("5XXError", Statistic::Sum, "5XX Fault")
    }

    fn rate(&self, count: &MetricReference, method: RateComputationMethod, id: &str) -> Result<MetricReference> {
        self.factory.to_rate(
            count,
            method,
            RateOptions {
                add_stats_to_label: false,
                expression_id: Some(id.to_string()),
                fill_with_zeroes: false,
            },
        )
    }

    fn latency_millis(&self, latency_type: LatencyType) -> Result<MetricReference> {
        self.metric("Latency", latency_type.statistic(), &latency_type.label())
    }
}

/// Latency, error, fault and TPS monitoring of one API endpoint.
#[derive(Debug)]
pub struct ApiEndpointMonitoring {
    title: String,
    tps: MetricReference,
    error_4xx_count: MetricReference,
    error_4xx_rate: MetricReference,
    fault_5xx_count: MetricReference,
    fault_5xx_rate: MetricReference,
    latency: BTreeMap<LatencyType, MetricReference>,
    tps_annotations: Vec<HorizontalAnnotation>,
    latency_annotations: Vec<HorizontalAnnotation>,
    error_count_annotations: Vec<HorizontalAnnotation>,
    error_rate_annotations: Vec<HorizontalAnnotation>,
    alarms: Vec<AlarmDefinition>,
}

impl ApiEndpointMonitoring {
    pub fn new(scope: &MonitoringScope, props: ApiEndpointMonitoringProps) -> Result<Self> {
        let parts = props.name_parts();
        let fallback_name: String = parts
            .join("-")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        let names = UserProvidedNames {
            human_readable_name: props
                .names
                .human_readable_name
                .clone()
                .or_else(|| Some(parts.join(" "))),
            ..props.names.clone()
        };
        let naming = NamingStrategy::new(NameResolutionInput::new(names).with_fallback_name(fallback_name));
        let title = naming.resolve_human_readable_name()?;

        let metric_factory = scope.create_metric_factory();
        let alarm_factory = scope.create_alarm_factory(&naming.resolve_local_alarm_name_prefix()?);
        let error_alarms = ErrorAlarmFactory::new(&alarm_factory);
        let latency_alarms = LatencyAlarmFactory::new(&alarm_factory);
        let tps_alarms = TpsAlarmFactory::new(&alarm_factory);

        let metrics = ApiMetrics {
            factory: &metric_factory,
            dimensions: props.dimensions(),
        };
        let method = props.rate_computation_method;
        let error_4xx_count = metrics.error_4xx_count()?;
        let fault_5xx_count = metrics.fault_5xx_count()?;
        let mut monitoring = Self {
            title,
            tps: metrics.tps(props.fill_tps_with_zeroes.unwrap_or(true))?,
            error_4xx_rate: metrics.rate(&error_4xx_count, method, "errors")?,
            fault_5xx_rate: metrics.rate(&fault_5xx_count, method, "faults")?,
            error_4xx_count,
            fault_5xx_count,
            latency: BTreeMap::new(),
            tps_annotations: Vec::new(),
            latency_annotations: Vec::new(),
            error_count_annotations: Vec::new(),
            error_rate_annotations: Vec::new(),
            alarms: Vec::new(),
        };

        let mut rendered: BTreeSet<LatencyType> = props
            .latency_types_to_render
            .as_deref()
            .unwrap_or(&DEFAULT_LATENCY_TYPES_TO_RENDER)
            .iter()
            .copied()
            .collect();
        rendered.extend(props.latency_alarms.keys().copied());
        for latency_type in rendered {
            monitoring
                .latency
                .insert(latency_type, metrics.latency_millis(latency_type)?);
        }

        for (latency_type, spec) in &props.latency_alarms {
            let Some(metric) = monitoring.latency.get(latency_type).cloned() else {
                continue;
            };
            for (disambiguator, threshold) in spec {
                let alarm =
                    latency_alarms.add_latency_alarm(&metric, *latency_type, threshold, disambiguator, None)?;
                monitoring.record(alarm, Slot::Latency);
            }
        }
        for (disambiguator, threshold) in &props.add_5xx_fault_count_alarm {
            let alarm = error_alarms.add_error_count_alarm(
                &monitoring.fault_5xx_count,
                ErrorType::Fault,
                threshold,
                disambiguator,
            )?;
            monitoring.record(alarm, Slot::ErrorCount);
        }
        for (disambiguator, threshold) in &props.add_4xx_error_count_alarm {
            let alarm = error_alarms.add_error_count_alarm(
                &monitoring.error_4xx_count,
                ErrorType::Error,
                threshold,
                disambiguator,
            )?;
            monitoring.record(alarm, Slot::ErrorCount);
        }
        for (disambiguator, threshold) in &props.add_4xx_error_rate_alarm {
            let alarm = error_alarms.add_error_rate_alarm(
                &monitoring.error_4xx_rate,
                ErrorType::Error,
                threshold,
                disambiguator,
            )?;
            monitoring.record(alarm, Slot::ErrorRate);
        }
        for (disambiguator, threshold) in &props.add_5xx_fault_rate_alarm {
            let alarm = error_alarms.add_error_rate_alarm(
                &monitoring.fault_5xx_rate,
                ErrorType::Fault,
                threshold,
                disambiguator,
            )?;
            monitoring.record(alarm, Slot::ErrorRate);
        }
        for (disambiguator, threshold) in &props.add_low_tps_alarm {
            let alarm = tps_alarms.add_min_tps_alarm(&monitoring.tps, threshold, disambiguator)?;
            monitoring.record(alarm, Slot::Tps);
        }
        for (disambiguator, threshold) in &props.add_high_tps_alarm {
            let alarm = tps_alarms.add_max_tps_alarm(&monitoring.tps, threshold, disambiguator)?;
            monitoring.record(alarm, Slot::Tps);
        }

        tracing::debug!(
            title = %monitoring.title,
            alarms = monitoring.alarms.len(),
            "API endpoint monitoring created"
        );
        Ok(monitoring)
    }

    fn record(&mut self, alarm: AlarmDefinition, slot: Slot) {
        if let Some(annotation) = &alarm.annotation {
            let annotations = match slot {
                Slot::Tps => &mut self.tps_annotations,
                Slot::Latency => &mut self.latency_annotations,
                Slot::ErrorCount => &mut self.error_count_annotations,
                Slot::ErrorRate => &mut self.error_rate_annotations,
            };
            annotations.push(annotation.clone());
        }
        self.alarms.push(alarm);
    }

    fn header(&self) -> Widget {
        MonitoringHeader::new(&self.title)
            .with_family(FAMILY)
            .to_widget()
            .into()
    }

    fn graph(
        &self,
        title: &str,
        size: (u32, u32),
        left: Vec<MetricReference>,
        axis: YAxis,
        annotations: &[HorizontalAnnotation],
    ) -> Widget {
        GraphWidget::new(GraphWidgetType::Line, title)
            .with_size(size.0, size.1)
            .with_left(left)
            .with_left_y_axis(axis)
            .with_left_annotations(annotations.to_vec())
            .into()
    }

    fn tps_widget(&self, size: (u32, u32)) -> Widget {
        self.graph(
            "TPS",
            size,
            vec![self.tps.clone()],
            YAxis::count_from_zero(),
            &self.tps_annotations,
        )
    }

    fn latency_widget(&self, size: (u32, u32)) -> Widget {
        self.graph(
            "Latency",
            size,
            self.latency.values().cloned().collect(),
            YAxis::time_millis_from_zero(),
            &self.latency_annotations,
        )
    }

    fn error_count_widget(&self, size: (u32, u32)) -> Widget {
        self.graph(
            "Errors",
            size,
            vec![self.error_4xx_count.clone(), self.fault_5xx_count.clone()],
            YAxis::count_from_zero(),
            &self.error_count_annotations,
        )
    }

    fn error_rate_widget(&self, size: (u32, u32)) -> Widget {
        self.graph(
            "Errors (rate)",
            size,
            vec![self.error_4xx_rate.clone(), self.fault_5xx_rate.clone()],
            YAxis::rate_from_zero(),
            &self.error_rate_annotations,
        )
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Tps,
    Latency,
    ErrorCount,
    ErrorRate,
}

impl Monitoring for ApiEndpointMonitoring {
    fn widgets(&self) -> Vec<Widget> {
        let size = (QUARTER_WIDTH, DEFAULT_GRAPH_WIDGET_HEIGHT);
        vec![
            self.header(),
            self.tps_widget(size),
            self.latency_widget(size),
            self.error_count_widget(size),
            self.error_rate_widget(size),
        ]
    }

    fn summary_widgets(&self) -> Vec<Widget> {
        let size = (THIRD_WIDTH, DEFAULT_SUMMARY_WIDGET_HEIGHT);
        vec![
            self.header(),
            self.tps_widget(size),
            self.latency_widget(size),
            self.error_rate_widget(size),
        ]
    }

    fn created_alarms(&self) -> &[AlarmDefinition] {
        &self.alarms
    }
}
