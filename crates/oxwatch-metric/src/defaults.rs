use chrono::Duration;
use oxwatch_common::duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Session-wide defaults applied by [`crate::MetricFactory`].
///
/// Read-only once the owning facade is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefaults {
    /// Namespace used when a metric does not name one.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Redirects every metric of the session into this namespace, even
    /// metrics that name their own.
    #[serde(default)]
    pub namespace_override: Option<String>,
    #[serde(
        default = "duration::default_period",
        with = "duration::secs",
        rename = "period_secs"
    )]
    pub period: Duration,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    /// Namespace -> smallest period (seconds) the backend reports at.
    #[serde(default)]
    pub minimum_periods: BTreeMap<String, u32>,
}

impl Default for MetricDefaults {
    fn default() -> Self {
        Self {
            namespace: None,
            namespace_override: None,
            period: duration::default_period(),
            region: None,
            account: None,
            minimum_periods: BTreeMap::new(),
        }
    }
}

impl MetricDefaults {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn minimum_period(&self, namespace: &str) -> Option<Duration> {
        self.minimum_periods
            .get(namespace)
            .map(|secs| Duration::seconds(i64::from(*secs)))
    }
}
