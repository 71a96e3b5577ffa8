use crate::defaults::MetricDefaults;
use crate::expression::{validate_expression_id, validate_math};
use crate::rate::RateComputationMethod;
use crate::reference::{MathExpression, MathKind, MetricReference, RawMetric, SearchExpression};
use chrono::Duration;
use oxwatch_common::error::{MonitoringError, Result};
use oxwatch_common::statistic::Statistic;
use oxwatch_common::strings;
use std::collections::BTreeMap;

const DEFAULT_EXPRESSION_ID: &str = "m1";
const TPS_LABEL_SOURCES: [&str; 3] = ["Requests", "Invocations", "Transactions"];

/// Optional fields of a raw metric; unset fields fall back to the defaults.
#[derive(Debug, Clone, Default)]
pub struct MetricOptions {
    pub label: Option<String>,
    pub dimensions: BTreeMap<String, String>,
    pub color: Option<String>,
    pub namespace: Option<String>,
    pub period: Option<Duration>,
    pub region: Option<String>,
    pub account: Option<String>,
}

impl MetricOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_dimension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(key.into(), value.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Optional fields of a math expression.
#[derive(Debug, Clone, Default)]
pub struct MathOptions {
    pub color: Option<String>,
    pub period: Option<Duration>,
    pub region: Option<String>,
    pub account: Option<String>,
}

/// Optional fields of a search expression.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub namespace: Option<String>,
    pub label: Option<String>,
    pub period: Option<Duration>,
    pub region: Option<String>,
    pub account: Option<String>,
}

/// Optional fields of an anomaly-detection band.
#[derive(Debug, Clone, Default)]
pub struct AnomalyOptions {
    pub color: Option<String>,
    /// Id bound to the evaluated metric; defaults to `m1`.
    pub expression_id: Option<String>,
    pub period: Option<Duration>,
    pub region: Option<String>,
    pub account: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RateOptions {
    /// Appends `(min: ${MIN}, max: ${MAX}, avg: ${AVG})` to the label.
    pub add_stats_to_label: bool,
    /// Id bound to the source metric; defaults to `m1`.
    pub expression_id: Option<String>,
    /// Gaps in the source become zero instead of staying absent.
    pub fill_with_zeroes: bool,
}

/// Builds [`MetricReference`]s, resolving unset fields through the
/// session defaults.
#[derive(Debug, Clone, Default)]
pub struct MetricFactory {
    defaults: MetricDefaults,
}

impl MetricFactory {
    pub fn new(defaults: MetricDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &MetricDefaults {
        &self.defaults
    }

    pub fn create_metric(
        &self,
        metric_name: &str,
        statistic: Statistic,
        options: MetricOptions,
    ) -> Result<MetricReference> {
        let namespace = self.namespace_with_fallback(options.namespace.as_deref(), metric_name)?;
        let period = self.clamp_period(&[namespace.as_str()], self.resolve_period(options.period));

        Ok(MetricReference::Raw(RawMetric {
            metric_name: metric_name.to_string(),
            namespace,
            dimensions: options.dimensions,
            statistic,
            period,
            label: options.label,
            color: options.color,
            region: options.region.or_else(|| self.defaults.region.clone()),
            account: options.account.or_else(|| self.defaults.account.clone()),
        }))
    }

    /// Math expression over `using_metrics`. Every operand is re-periodized
    /// to the expression period so all series stay time-aligned.
    pub fn create_metric_math(
        &self,
        expression: &str,
        using_metrics: BTreeMap<String, MetricReference>,
        label: &str,
        options: MathOptions,
    ) -> Result<MetricReference> {
        self.build_math(expression, using_metrics, label, options, MathKind::Plain)
    }

    pub fn create_metric_search(
        &self,
        query: &str,
        dimensions: BTreeMap<String, Option<String>>,
        statistic: Statistic,
        options: SearchOptions,
    ) -> Result<MetricReference> {
        let namespace = self.namespace_with_fallback(options.namespace.as_deref(), query)?;
        let period = self.clamp_period(&[namespace.as_str()], self.resolve_period(options.period));

        let dimension_keys = dimensions.keys().cloned().collect();
        let dimension_filter = dimensions
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();

        Ok(MetricReference::Search(SearchExpression {
            namespace,
            dimension_keys,
            dimension_filter,
            query: query.to_string(),
            statistic,
            // the backend rejects empty labels on expressions
            label: options.label.unwrap_or_else(|| " ".to_string()),
            period,
            region: options.region.or_else(|| self.defaults.region.clone()),
            account: options.account.or_else(|| self.defaults.account.clone()),
        }))
    }

    /// Expected-value band `standard_deviations` wide around `metric`.
    pub fn create_metric_anomaly_detection(
        &self,
        metric: &MetricReference,
        standard_deviations: f64,
        label: &str,
        options: AnomalyOptions,
    ) -> Result<MetricReference> {
        let id = options
            .expression_id
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPRESSION_ID.to_string());
        validate_expression_id(&id)?;

        let expression = format!("ANOMALY_DETECTION_BAND({id},{standard_deviations})");
        let using_metrics = BTreeMap::from([(id, metric.clone())]);
        self.build_math(
            &expression,
            using_metrics,
            label,
            MathOptions {
                color: options.color,
                period: options.period,
                region: options.region,
                account: options.account,
            },
            MathKind::AnomalyBand {
                standard_deviations,
            },
        )
    }

    /// Applies the default period and the namespace override to a metric
    /// built outside this factory.
    pub fn adapt_metric(&self, metric: &MetricReference) -> MetricReference {
        self.adapt_metric_preserving_period(metric)
            .with_period(self.defaults.period)
    }

    /// Applies only the namespace override, keeping the metric's period.
    pub fn adapt_metric_preserving_period(&self, metric: &MetricReference) -> MetricReference {
        match &self.defaults.namespace_override {
            Some(namespace) => metric.with_namespace(namespace),
            None => metric.clone(),
        }
    }

    /// Scales a metric up, e.g. a 0-1 ratio into a percentage.
    pub fn multiply_metric(
        &self,
        metric: &MetricReference,
        multiplier: f64,
        label: &str,
        expression_id: Option<&str>,
    ) -> Result<MetricReference> {
        self.scale_metric(metric, "multiplier", '*', multiplier, label, expression_id)
    }

    pub fn divide_metric(
        &self,
        metric: &MetricReference,
        divisor: f64,
        label: &str,
        expression_id: Option<&str>,
    ) -> Result<MetricReference> {
        self.scale_metric(metric, "divisor", '/', divisor, label, expression_id)
    }

    /// Converts a count metric into a rate.
    ///
    /// With `fill_with_zeroes` the numerator becomes `FILL(id,0)`, so the
    /// rate reads zero wherever the source has no datapoint. Without it the
    /// gaps stay absent.
    pub fn to_rate(
        &self,
        metric: &MetricReference,
        method: RateComputationMethod,
        options: RateOptions,
    ) -> Result<MetricReference> {
        let id = options
            .expression_id
            .unwrap_or_else(|| DEFAULT_EXPRESSION_ID.to_string());
        let label_prefix = metric.label().unwrap_or("Rate").to_string();

        let mut stats = Vec::new();
        if options.add_stats_to_label {
            stats.push("min: ${MIN}");
            stats.push("max: ${MAX}");
            if method != RateComputationMethod::Average {
                stats.push("avg: ${AVG}");
            }
        }
        let label_appendix = if stats.is_empty() {
            String::new()
        } else {
            format!(" ({})", stats.join(", "))
        };
        let numerator = if options.fill_with_zeroes {
            format!("FILL({id},0)")
        } else {
            id.clone()
        };
        let math_options = MathOptions {
            color: metric.color().map(str::to_string),
            period: Some(metric.period()),
            ..MathOptions::default()
        };

        let Some(seconds) = method.seconds_per_unit() else {
            let avg_label = format!("{label_prefix} (avg){label_appendix}");
            let avg_metric = metric
                .with_label(avg_label.as_str())
                .with_statistic(Statistic::Average);
            if !options.fill_with_zeroes {
                return Ok(avg_metric);
            }
            return self.create_metric_math(
                &numerator,
                BTreeMap::from([(id, avg_metric)]),
                &avg_label,
                math_options,
            );
        };

        let expression = if seconds == 1 {
            format!("{numerator} / PERIOD({id})")
        } else {
            format!("({seconds} * {numerator}) / PERIOD({id})")
        };
        let label = if method == RateComputationMethod::PerSecond
            && TPS_LABEL_SOURCES.contains(&label_prefix.as_str())
        {
            format!("TPS{label_appendix}")
        } else {
            format!("{label_prefix}/{}{label_appendix}", method.label_unit())
        };

        self.create_metric_math(
            &expression,
            BTreeMap::from([(id, metric.clone())]),
            &label,
            math_options,
        )
    }

    /// Namespace precedence: session override, then the explicit value,
    /// then the default namespace.
    pub fn namespace_with_fallback(&self, namespace: Option<&str>, metric: &str) -> Result<String> {
        self.defaults
            .namespace_override
            .as_deref()
            .or(namespace)
            .or(self.defaults.namespace.as_deref())
            .map(str::to_string)
            .ok_or_else(|| MonitoringError::MissingNamespace {
                metric: metric.to_string(),
            })
    }

    pub fn sanitize_metric_expression_id_suffix(&self, id: &str) -> String {
        strings::sanitize_expression_id_suffix(id)
    }

    // ---- internals ----

    fn resolve_period(&self, period: Option<Duration>) -> Duration {
        period.unwrap_or(self.defaults.period)
    }

    /// Raises `period` to the largest minimum reporting period of the given
    /// namespaces.
    pub fn clamp_period(&self, namespaces: &[&str], period: Duration) -> Duration {
        let minimum = namespaces
            .iter()
            .filter_map(|ns| self.defaults.minimum_period(ns))
            .max();
        match minimum {
            Some(min) if period < min => {
                tracing::warn!(
                    requested_secs = period.num_seconds(),
                    minimum_secs = min.num_seconds(),
                    "Metric period below the supported reporting frequency, clamping"
                );
                min
            }
            _ => period,
        }
    }

    fn build_math(
        &self,
        expression: &str,
        using_metrics: BTreeMap<String, MetricReference>,
        label: &str,
        options: MathOptions,
        kind: MathKind,
    ) -> Result<MetricReference> {
        validate_math(expression, &using_metrics)?;

        let namespaces: Vec<&str> = using_metrics
            .values()
            .flat_map(MetricReference::namespaces)
            .collect();
        let period = self.clamp_period(&namespaces, self.resolve_period(options.period));
        let using_metrics = using_metrics
            .iter()
            .map(|(id, operand)| (id.clone(), operand.with_period(period)))
            .collect();

        Ok(MetricReference::Math(MathExpression {
            expression: expression.to_string(),
            using_metrics,
            label: Some(label.to_string()),
            color: options.color,
            period,
            region: options.region.or_else(|| self.defaults.region.clone()),
            account: options.account.or_else(|| self.defaults.account.clone()),
            kind,
        }))
    }

    fn scale_metric(
        &self,
        metric: &MetricReference,
        operation: &'static str,
        operator: char,
        factor: f64,
        label: &str,
        expression_id: Option<&str>,
    ) -> Result<MetricReference> {
        if !factor.is_finite() || factor < 1.0 {
            return Err(MonitoringError::InvalidScalingFactor { operation, factor });
        }
        if factor == 1.0 {
            return Ok(metric.clone());
        }
        let id = expression_id.unwrap_or(DEFAULT_EXPRESSION_ID);
        self.create_metric_math(
            &format!("{id} {operator} {factor}"),
            BTreeMap::from([(id.to_string(), metric.clone())]),
            label,
            MathOptions {
                color: metric.color().map(str::to_string),
                period: Some(metric.period()),
                ..MathOptions::default()
            },
        )
    }
}
