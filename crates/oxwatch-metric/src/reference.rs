use chrono::Duration;
use oxwatch_common::duration;
use oxwatch_common::statistic::Statistic;
use serde::Serialize;
use std::collections::BTreeMap;

/// Handle to a time series.
///
/// References are immutable: the `with_*` methods return modified copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricReference {
    Raw(RawMetric),
    Math(MathExpression),
    Search(SearchExpression),
}

/// A named series published by a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMetric {
    pub metric_name: String,
    pub namespace: String,
    pub dimensions: BTreeMap<String, String>,
    pub statistic: Statistic,
    #[serde(with = "duration::secs", rename = "period_secs")]
    pub period: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MathKind {
    Plain,
    /// `ANOMALY_DETECTION_BAND` over the single operand.
    AnomalyBand { standard_deviations: f64 },
}

/// A metric-math expression over named operands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MathExpression {
    pub expression: String,
    pub using_metrics: BTreeMap<String, MetricReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(with = "duration::secs", rename = "period_secs")]
    pub period: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub kind: MathKind,
}

impl MathExpression {
    /// Id of the series an anomaly band is computed for.
    pub fn evaluated_id(&self) -> Option<&str> {
        match self.kind {
            MathKind::AnomalyBand { .. } => self.using_metrics.keys().next().map(String::as_str),
            MathKind::Plain => None,
        }
    }
}

/// A dynamic aggregate over every series matching a dimension template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchExpression {
    pub namespace: String,
    /// Every key of the template, including keys matching any value.
    pub dimension_keys: Vec<String>,
    /// Keys with a concrete value to filter on.
    pub dimension_filter: BTreeMap<String, String>,
    pub query: String,
    pub statistic: Statistic,
    pub label: String,
    #[serde(with = "duration::secs", rename = "period_secs")]
    pub period: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl SearchExpression {
    /// `SEARCH('{Namespace,Key} Key="value" query', 'stat', period)`
    pub fn expression(&self) -> String {
        let schema = std::iter::once(self.namespace.as_str())
            .chain(self.dimension_keys.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",");
        let filter = self
            .dimension_filter
            .iter()
            .map(|(key, value)| format!("{key}=\"{value}\""))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "SEARCH('{{{schema}}} {filter} {}', '{}', {})",
            self.query,
            self.statistic,
            self.period.num_seconds()
        )
    }
}

impl MetricReference {
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Raw(m) => m.label.as_deref(),
            Self::Math(m) => m.label.as_deref(),
            Self::Search(m) => Some(m.label.as_str()),
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            Self::Raw(m) => m.color.as_deref(),
            Self::Math(m) => m.color.as_deref(),
            Self::Search(_) => None,
        }
    }

    pub fn period(&self) -> Duration {
        match self {
            Self::Raw(m) => m.period,
            Self::Math(m) => m.period,
            Self::Search(m) => m.period,
        }
    }

    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Raw(m) => m.region.as_deref(),
            Self::Math(m) => m.region.as_deref(),
            Self::Search(m) => m.region.as_deref(),
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }

    pub fn anomaly_band(&self) -> Option<&MathExpression> {
        match self {
            Self::Math(m) if matches!(m.kind, MathKind::AnomalyBand { .. }) => Some(m),
            _ => None,
        }
    }

    /// Short human-readable identification for error messages and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Raw(m) => format!("{}/{}", m.namespace, m.metric_name),
            Self::Math(m) => m.expression.clone(),
            Self::Search(m) => m.expression(),
        }
    }

    /// Every namespace of a raw series reachable from this reference.
    pub fn namespaces(&self) -> Vec<&str> {
        match self {
            Self::Raw(m) => vec![m.namespace.as_str()],
            Self::Math(m) => m
                .using_metrics
                .values()
                .flat_map(MetricReference::namespaces)
                .collect(),
            Self::Search(m) => vec![m.namespace.as_str()],
        }
    }

    pub fn with_label(&self, label: impl Into<String>) -> Self {
        let label = label.into();
        let mut copy = self.clone();
        match &mut copy {
            Self::Raw(m) => m.label = Some(label),
            Self::Math(m) => m.label = Some(label),
            Self::Search(m) => m.label = label,
        }
        copy
    }

    pub fn with_color(&self, color: impl Into<String>) -> Self {
        let color = color.into();
        let mut copy = self.clone();
        match &mut copy {
            Self::Raw(m) => m.color = Some(color),
            Self::Math(m) => m.color = Some(color),
            Self::Search(_) => {}
        }
        copy
    }

    /// Copy with a new period; math operands follow so they stay aligned.
    pub fn with_period(&self, period: Duration) -> Self {
        match self {
            Self::Raw(m) => Self::Raw(RawMetric {
                period,
                ..m.clone()
            }),
            Self::Math(m) => Self::Math(MathExpression {
                period,
                using_metrics: m
                    .using_metrics
                    .iter()
                    .map(|(id, operand)| (id.clone(), operand.with_period(period)))
                    .collect(),
                ..m.clone()
            }),
            Self::Search(m) => Self::Search(SearchExpression {
                period,
                ..m.clone()
            }),
        }
    }

    pub fn with_region(&self, region: impl Into<String>) -> Self {
        let region = Some(region.into());
        let mut copy = self.clone();
        match &mut copy {
            Self::Raw(m) => m.region = region,
            Self::Math(m) => m.region = region,
            Self::Search(m) => m.region = region,
        }
        copy
    }

    /// Only raw series carry a statistic; other shapes are returned unchanged.
    pub fn with_statistic(&self, statistic: Statistic) -> Self {
        match self {
            Self::Raw(m) => Self::Raw(RawMetric {
                statistic,
                ..m.clone()
            }),
            other => other.clone(),
        }
    }

    /// Copy with every raw series moved into `namespace`.
    pub fn with_namespace(&self, namespace: &str) -> Self {
        match self {
            Self::Raw(m) => Self::Raw(RawMetric {
                namespace: namespace.to_string(),
                ..m.clone()
            }),
            Self::Math(m) => Self::Math(MathExpression {
                using_metrics: m
                    .using_metrics
                    .iter()
                    .map(|(id, operand)| (id.clone(), operand.with_namespace(namespace)))
                    .collect(),
                ..m.clone()
            }),
            Self::Search(m) => Self::Search(SearchExpression {
                namespace: namespace.to_string(),
                ..m.clone()
            }),
        }
    }
}
