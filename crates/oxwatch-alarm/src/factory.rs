use crate::annotation::{AnnotationInput, AnnotationStrategy, DefaultAnnotationStrategy};
use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::composite::{AddCompositeAlarmProps, AlarmRule, CompositeAlarmDefinition, CompositeOperator};
use crate::defaults::{ActionsEnabled, AlarmDefaults, DEFAULT_DATAPOINTS_TO_ALARM};
use crate::definition::{band_id, AlarmDefinition};
use crate::naming::{AlarmNamingInput, AlarmNamingStrategy, ExtendDedupeString};
use crate::registry::AlarmRegistry;
use crate::threshold::CustomAlarmThreshold;
use oxwatch_common::error::{MonitoringError, Result};
use oxwatch_common::strings::remove_brackets_with_dynamic_labels;
use oxwatch_metric::{MetricFactory, MetricReference};
use std::rc::Rc;

const COMPOSITE_ALARM_NAME_SUFFIX: &str = "Composite";
const COMPOSITE_ALARM_DESCRIPTION: &str = "Composite alarm";
const DESCRIPTION_PART_SEPARATOR: &str = " \r\n";

/// Everything the generic factory needs to create one alarm. Specialised
/// builders fill this in; the embedded [`CustomAlarmThreshold`] carries the
/// caller's overrides, which win over the builder defaults.
#[derive(Debug, Clone)]
pub struct AddAlarmProps {
    pub alarm_name_suffix: String,
    pub disambiguator: Option<String>,
    /// Static threshold. Ignored for anomaly-band metrics.
    pub threshold: Option<f64>,
    pub comparison_operator: ComparisonOperator,
    pub treat_missing_data: TreatMissingData,
    pub alarm_description: String,
    pub alarm_dedupe_string_suffix: Option<String>,
    pub common: CustomAlarmThreshold,
}

impl AddAlarmProps {
    pub fn new(
        alarm_name_suffix: impl Into<String>,
        comparison_operator: ComparisonOperator,
        treat_missing_data: TreatMissingData,
    ) -> Self {
        Self {
            alarm_name_suffix: alarm_name_suffix.into(),
            disambiguator: None,
            threshold: None,
            comparison_operator,
            treat_missing_data,
            alarm_description: String::new(),
            alarm_dedupe_string_suffix: None,
            common: CustomAlarmThreshold::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_disambiguator(mut self, disambiguator: impl Into<String>) -> Self {
        self.disambiguator = Some(disambiguator.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.alarm_description = description.into();
        self
    }

    pub fn with_dedupe_suffix(mut self, suffix: Option<String>) -> Self {
        self.alarm_dedupe_string_suffix = suffix;
        self
    }

    pub fn with_common(mut self, common: &CustomAlarmThreshold) -> Self {
        self.common = common.clone();
        self
    }
}

/// Creates alarms for one monitored resource and records them in the
/// session registry.
#[derive(Clone)]
pub struct AlarmFactory {
    defaults: AlarmDefaults,
    naming: AlarmNamingStrategy,
    registry: AlarmRegistry,
    annotation_strategy: Rc<dyn AnnotationStrategy>,
    metric_factory: MetricFactory,
}

impl std::fmt::Debug for AlarmFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmFactory")
            .field("naming", &self.naming)
            .field("registered", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl AlarmFactory {
    pub fn new(defaults: AlarmDefaults, local_prefix: &str, registry: AlarmRegistry) -> Self {
        let dedupe = ExtendDedupeString::new(
            defaults.dedupe_string_prefix.as_deref(),
            defaults.dedupe_string_suffix.as_deref(),
        );
        let naming = AlarmNamingStrategy::new(
            defaults.alarm_name_prefix.clone(),
            local_prefix,
            Some(Rc::new(dedupe)),
        );
        Self {
            defaults,
            naming,
            registry,
            annotation_strategy: Rc::new(DefaultAnnotationStrategy),
            metric_factory: MetricFactory::default(),
        }
    }

    /// Period overrides of thresholds are clamped with this factory's
    /// minimum reporting periods.
    pub fn with_metric_factory(mut self, metric_factory: MetricFactory) -> Self {
        self.metric_factory = metric_factory;
        self
    }

    pub fn with_annotation_strategy(mut self, strategy: Rc<dyn AnnotationStrategy>) -> Self {
        self.annotation_strategy = strategy;
        self
    }

    pub fn defaults(&self) -> &AlarmDefaults {
        &self.defaults
    }

    pub fn registry(&self) -> &AlarmRegistry {
        &self.registry
    }

    pub fn should_use_default_dedupe_for_error(&self) -> bool {
        self.defaults.use_default_dedupe_for_error
    }

    pub fn should_use_default_dedupe_for_latency(&self) -> bool {
        self.defaults.use_default_dedupe_for_latency
    }

    /// Builds the alarm and appends it to the session registry.
    pub fn add_alarm(&self, metric: &MetricReference, props: AddAlarmProps) -> Result<AlarmDefinition> {
        if metric.is_search() {
            return Err(MonitoringError::SearchMetricAlarm {
                alarm_name_suffix: props.alarm_name_suffix,
            });
        }
        let common = &props.common;
        let comparison_operator = common
            .comparison_operator_override
            .unwrap_or(props.comparison_operator);
        let treat_missing_data = common
            .treat_missing_data_override
            .unwrap_or(props.treat_missing_data);

        let band = metric.anomaly_band();
        if comparison_operator.is_band_operator() != band.is_some() {
            return Err(MonitoringError::InvalidConfig(format!(
                "comparison operator {comparison_operator} cannot be used with metric {}",
                metric.describe()
            )));
        }

        let mut adjusted = match common.period {
            Some(period) => {
                metric.with_period(self.metric_factory.clamp_period(&metric.namespaces(), period))
            }
            None => metric.clone(),
        };
        // widgets cannot render dynamic labels in annotations
        if let Some(label) = adjusted.label().map(remove_brackets_with_dynamic_labels) {
            adjusted = adjusted.with_label(label);
        }

        let naming_input = AlarmNamingInput {
            alarm_name_suffix: &props.alarm_name_suffix,
            disambiguator: props.disambiguator.as_deref(),
            alarm_name_override: common.alarm_name_override.as_deref(),
            dedupe_string_override: common.dedupe_string_override.as_deref(),
            alarm_dedupe_string_suffix: props.alarm_dedupe_string_suffix.as_deref(),
        };
        let alarm_name = self.naming.name(&naming_input);
        let alarm_label = self.naming.widget_label(&naming_input);
        let dedupe_string = self.naming.dedupe_string(&naming_input);
        let alarm_description = self.generate_description(
            &props.alarm_description,
            common.alarm_description_override.as_deref(),
            common.runbook_link.as_deref(),
            common.documentation_link.as_deref(),
        );

        let datapoints_to_alarm = common
            .datapoints_to_alarm
            .or(self.defaults.datapoints_to_alarm)
            .unwrap_or(DEFAULT_DATAPOINTS_TO_ALARM);
        let evaluation_periods = common
            .evaluation_periods
            .or(self.defaults.evaluation_periods)
            .unwrap_or(datapoints_to_alarm);
        if evaluation_periods < datapoints_to_alarm {
            return Err(MonitoringError::InvalidEvaluationWindow {
                alarm_name,
                evaluation_periods,
                datapoints_to_alarm,
            });
        }

        let actions_enabled =
            self.determine_actions_enabled(common.actions_enabled, props.disambiguator.as_deref());
        let actions = common
            .action_override
            .as_ref()
            .or(self.defaults.action.as_ref())
            .map(|action| action.resolve())
            .unwrap_or_default();

        let (threshold, threshold_metric_id, annotation) = match band {
            Some(band) => {
                let evaluated_id = band.evaluated_id().unwrap_or("m1");
                (None, Some(band_id(evaluated_id)), None)
            }
            None => {
                let threshold = props.threshold.ok_or_else(|| {
                    MonitoringError::InvalidConfig(format!("alarm {alarm_name} has no threshold"))
                })?;
                let annotation = self.annotation_strategy.create_annotation(&AnnotationInput {
                    alarm_name: &alarm_name,
                    alarm_label: &alarm_label,
                    metric: &adjusted,
                    comparison_operator,
                    threshold,
                    datapoints_to_alarm,
                    evaluation_periods,
                    disambiguator: props.disambiguator.as_deref(),
                    dedupe_string: dedupe_string.as_deref(),
                    fill_alarm_range: common.fill_alarm_range,
                    override_color: common.override_annotation_color.as_deref(),
                    override_label: common.override_annotation_label.as_deref(),
                    override_visibility: common.override_annotation_visibility,
                });
                (Some(threshold), None, Some(annotation))
            }
        };

        let alarm = AlarmDefinition {
            alarm_name,
            alarm_name_suffix: props.alarm_name_suffix.clone(),
            alarm_label,
            alarm_description,
            metric: adjusted,
            comparison_operator,
            threshold,
            threshold_metric_id,
            datapoints_to_alarm,
            evaluation_periods,
            treat_missing_data,
            evaluate_low_sample_count_percentile: common
                .evaluate_low_sample_count_percentile
                .unwrap_or(true),
            actions_enabled,
            actions,
            dedupe_string,
            disambiguator: props.disambiguator.clone(),
            custom_tags: common.custom_tags.clone(),
            custom_params: common.custom_params.clone(),
            annotation,
        };

        self.registry.register(alarm.clone())?;
        tracing::debug!(
            alarm_name = %alarm.alarm_name,
            alarm_name_suffix = %alarm.alarm_name_suffix,
            disambiguator = ?alarm.disambiguator,
            "Alarm registered"
        );
        Ok(alarm)
    }

    /// Combines `alarms` into one composite alarm. Returns `None` for an
    /// empty input. The composite is not added to the registry.
    pub fn add_composite_alarm(
        &self,
        alarms: &[AlarmDefinition],
        props: &AddCompositeAlarmProps,
    ) -> Option<CompositeAlarmDefinition> {
        if alarms.is_empty() {
            tracing::warn!(
                disambiguator = ?props.disambiguator,
                "No alarms matched, skipping composite alarm"
            );
            return None;
        }

        let naming_input = AlarmNamingInput {
            alarm_name_suffix: props
                .alarm_name_suffix
                .as_deref()
                .unwrap_or(COMPOSITE_ALARM_NAME_SUFFIX),
            disambiguator: props.disambiguator.as_deref(),
            alarm_name_override: props.alarm_name_override.as_deref(),
            dedupe_string_override: props.dedupe_string_override.as_deref(),
            alarm_dedupe_string_suffix: None,
        };
        let alarm_name = self.naming.name(&naming_input);
        let alarm_description = self.generate_description(
            props
                .alarm_description
                .as_deref()
                .unwrap_or(COMPOSITE_ALARM_DESCRIPTION),
            props.alarm_description_override.as_deref(),
            props.runbook_link.as_deref(),
            props.documentation_link.as_deref(),
        );
        let rules: Vec<AlarmRule> = alarms.iter().map(AlarmDefinition::rule_when_alarming).collect();
        let alarm_rule = match props.composite_operator {
            CompositeOperator::Or => AlarmRule::any_of(rules),
            CompositeOperator::And => AlarmRule::all_of(rules),
        };
        let actions = props
            .action_override
            .as_ref()
            .or(self.defaults.action.as_ref())
            .map(|action| action.resolve())
            .unwrap_or_default();

        let composite = CompositeAlarmDefinition {
            alarm_name,
            alarm_description,
            alarm_rule,
            actions_enabled: self
                .determine_actions_enabled(props.actions_enabled, props.disambiguator.as_deref()),
            actions,
            dedupe_string: self.naming.dedupe_string(&naming_input),
            disambiguator: props.disambiguator.clone(),
            matched_alarm_names: alarms.iter().map(|a| a.alarm_name.clone()).collect(),
        };
        tracing::debug!(
            alarm_name = %composite.alarm_name,
            matched = composite.matched_alarm_names.len(),
            "Composite alarm built"
        );
        Some(composite)
    }

    // ---- internals ----

    fn determine_actions_enabled(&self, actions_enabled: Option<bool>, disambiguator: Option<&str>) -> bool {
        if let Some(enabled) = actions_enabled {
            return enabled;
        }
        match (&self.defaults.actions_enabled, disambiguator) {
            (ActionsEnabled::All(enabled), _) => *enabled,
            (ActionsEnabled::PerDisambiguator(map), Some(d)) => map.get(d).copied().unwrap_or(false),
            (ActionsEnabled::PerDisambiguator(_), None) => false,
        }
    }

    fn generate_description(
        &self,
        description: &str,
        description_override: Option<&str>,
        runbook_link: Option<&str>,
        documentation_link: Option<&str>,
    ) -> String {
        let mut parts = vec![description_override.unwrap_or(description).to_string()];
        if let Some(link) = runbook_link.or(self.defaults.runbook_link.as_deref()) {
            parts.push(format!("Runbook: {link}"));
        }
        if let Some(link) = documentation_link.or(self.defaults.documentation_link.as_deref()) {
            parts.push(format!("Documentation: {link}"));
        }
        parts.join(DESCRIPTION_PART_SEPARATOR)
    }
}
