use crate::action::AlarmActions;
use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::composite::{AlarmRule, AlarmState};
use oxwatch_common::annotation::HorizontalAnnotation;
use oxwatch_common::error::Result;
use oxwatch_metric::{MetricReference, RawMetric};
use serde::Serialize;
use std::collections::BTreeMap;

const BAND_ID_SUFFIX: &str = "_band";

/// A generated alarm rule, ready for the backend materializer.
///
/// Never mutated after the alarm factory returns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmDefinition {
    pub alarm_name: String,
    pub alarm_name_suffix: String,
    /// Short label for widgets (no global prefix).
    pub alarm_label: String,
    pub alarm_description: String,
    pub metric: MetricReference,
    pub comparison_operator: ComparisonOperator,
    /// Static threshold; absent for anomaly-band alarms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Id of the band expression an anomaly alarm compares against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_metric_id: Option<String>,
    pub datapoints_to_alarm: u32,
    pub evaluation_periods: u32,
    pub treat_missing_data: TreatMissingData,
    pub evaluate_low_sample_count_percentile: bool,
    pub actions_enabled: bool,
    pub actions: AlarmActions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedupe_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disambiguator: Option<String>,
    pub custom_tags: Vec<String>,
    pub custom_params: BTreeMap<String, serde_json::Value>,
    /// Threshold line for widgets; band alarms draw the band instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<HorizontalAnnotation>,
}

/// One entry of the query list an alarm is evaluated over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricQuery {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<RawMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub return_data: bool,
}

impl AlarmDefinition {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.custom_tags.iter().any(|t| t == tag)
    }

    pub fn rule_when(&self, state: AlarmState) -> AlarmRule {
        AlarmRule::from_alarm(self.alarm_name.clone(), state)
    }

    pub fn rule_when_alarming(&self) -> AlarmRule {
        self.rule_when(AlarmState::Alarm)
    }

    /// Human-readable condition, e.g. `greater than 330`.
    pub fn condition(&self) -> String {
        match self.threshold {
            Some(threshold) => format!("{} {threshold}", self.comparison_operator.describe()),
            None => self.comparison_operator.describe().to_string(),
        }
    }

    /// Queries the backend evaluates. Only the alarmed series returns data,
    /// except for band alarms where the band is returned as well.
    pub fn metric_queries(&self) -> Vec<MetricQuery> {
        let mut queries = Vec::new();
        match &self.metric {
            MetricReference::Raw(raw) => queries.push(raw_query("m1", raw, true)),
            MetricReference::Math(math) => match math.evaluated_id() {
                Some(evaluated_id) => {
                    for (id, operand) in &math.using_metrics {
                        push_operand(&mut queries, id, operand, id == evaluated_id);
                    }
                    queries.push(MetricQuery {
                        id: band_id(evaluated_id),
                        metric: None,
                        expression: Some(math.expression.clone()),
                        label: math.label.clone(),
                        return_data: true,
                    });
                }
                None => {
                    let id = unused_id("expr", &math.using_metrics);
                    queries.push(MetricQuery {
                        id,
                        metric: None,
                        expression: Some(math.expression.clone()),
                        label: math.label.clone(),
                        return_data: true,
                    });
                    for (id, operand) in &math.using_metrics {
                        push_operand(&mut queries, id, operand, false);
                    }
                }
            },
            // rejected by the alarm factory
            MetricReference::Search(_) => {}
        }
        queries
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Id under which the band of `evaluated_id` is queried.
pub fn band_id(evaluated_id: &str) -> String {
    format!("{evaluated_id}{BAND_ID_SUFFIX}")
}

fn raw_query(id: &str, raw: &RawMetric, return_data: bool) -> MetricQuery {
    MetricQuery {
        id: id.to_string(),
        metric: Some(raw.clone()),
        expression: None,
        label: raw.label.clone(),
        return_data,
    }
}

fn push_operand(queries: &mut Vec<MetricQuery>, id: &str, operand: &MetricReference, return_data: bool) {
    match operand {
        MetricReference::Raw(raw) => queries.push(raw_query(id, raw, return_data)),
        MetricReference::Math(math) => {
            queries.push(MetricQuery {
                id: id.to_string(),
                metric: None,
                expression: Some(math.expression.clone()),
                label: math.label.clone(),
                return_data,
            });
            for (nested_id, nested) in &math.using_metrics {
                push_operand(queries, nested_id, nested, false);
            }
        }
        MetricReference::Search(search) => queries.push(MetricQuery {
            id: id.to_string(),
            metric: None,
            expression: Some(search.expression()),
            label: Some(search.label.clone()),
            return_data,
        }),
    }
}

fn unused_id(base: &str, taken: &BTreeMap<String, MetricReference>) -> String {
    if !taken.contains_key(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken.contains_key(candidate))
        .unwrap_or_else(|| base.to_string())
}
