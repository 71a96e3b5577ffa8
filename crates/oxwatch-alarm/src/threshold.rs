//! Threshold records accepted by the alarm builders.
//!
//! Every record embeds [`CustomAlarmThreshold`], the overridable fields
//! shared by all alarms, next to the value specific to its builder.

use crate::action::AlarmAction;
use crate::comparison::{ComparisonOperator, TreatMissingData};
use chrono::Duration;
use oxwatch_common::duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Disambiguator (e.g. `"Warning"`, `"Critical"`) -> threshold.
pub type ThresholdSpec<T> = BTreeMap<String, T>;

/// Fields every threshold may override. Unset fields resolve through the
/// alarm defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomAlarmThreshold {
    /// Replaces the default action for this alarm.
    pub action_override: Option<AlarmAction>,
    pub dedupe_string_override: Option<String>,
    /// Used verbatim as the alarm name.
    pub alarm_name_override: Option<String>,
    pub alarm_description_override: Option<String>,
    pub custom_tags: Vec<String>,
    pub custom_params: BTreeMap<String, serde_json::Value>,
    pub comparison_operator_override: Option<ComparisonOperator>,
    pub treat_missing_data_override: Option<TreatMissingData>,
    /// Percentile alarms evaluate low sample counts unless this is false.
    pub evaluate_low_sample_count_percentile: Option<bool>,
    pub actions_enabled: Option<bool>,
    pub datapoints_to_alarm: Option<u32>,
    pub evaluation_periods: Option<u32>,
    /// Re-periods the metric before alarming on it.
    #[serde(with = "duration::option_secs", rename = "period_secs")]
    pub period: Option<Duration>,
    pub documentation_link: Option<String>,
    pub runbook_link: Option<String>,
    /// Shades the alarming side of the annotation.
    pub fill_alarm_range: bool,
    pub override_annotation_color: Option<String>,
    pub override_annotation_label: Option<String>,
    pub override_annotation_visibility: Option<bool>,
}

macro_rules! threshold {
    ($(#[$meta:meta])* $name:ident { $field:ident }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub $field: f64,
            #[serde(flatten)]
            pub common: CustomAlarmThreshold,
        }

        impl $name {
            pub fn new($field: f64) -> Self {
                Self {
                    $field,
                    common: CustomAlarmThreshold::default(),
                }
            }

            pub fn with_common(mut self, common: CustomAlarmThreshold) -> Self {
                self.common = common;
                self
            }
        }
    };
}

threshold!(ErrorCountThreshold { max_error_count });
threshold!(ErrorRateThreshold { max_error_rate });
threshold!(
    /// Maximum usage in percent (0-100).
    UsageThreshold { max_usage_percent }
);
threshold!(MinUsageCountThreshold { min_count });
threshold!(MaxUsageCountThreshold { max_count });
threshold!(MinMessageCountThreshold { min_message_count });
threshold!(MaxMessageCountThreshold { max_message_count });
threshold!(MaxMessageAgeThreshold { max_age_in_seconds });
threshold!(MinIncomingMessagesCountThreshold { min_incoming_messages_count });
threshold!(MaxIncomingMessagesCountThreshold { max_incoming_messages_count });
threshold!(MinTpsThreshold { min_tps });
threshold!(MaxTpsThreshold { max_tps });
threshold!(MinProcessedBytesThreshold { min_processed_bytes });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyThreshold {
    #[serde(with = "duration::millis", rename = "max_latency_ms")]
    pub max_latency: Duration,
    #[serde(flatten)]
    pub common: CustomAlarmThreshold,
}

impl LatencyThreshold {
    pub fn new(max_latency: Duration) -> Self {
        Self {
            max_latency,
            common: CustomAlarmThreshold::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationThreshold {
    #[serde(with = "duration::millis", rename = "max_duration_ms")]
    pub max_duration: Duration,
    #[serde(flatten)]
    pub common: CustomAlarmThreshold,
}

impl DurationThreshold {
    pub fn new(max_duration: Duration) -> Self {
        Self {
            max_duration,
            common: CustomAlarmThreshold::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxTimeToDrainThreshold {
    #[serde(with = "duration::secs", rename = "max_time_to_drain_secs")]
    pub max_time_to_drain: Duration,
    #[serde(flatten)]
    pub common: CustomAlarmThreshold,
}

impl MaxTimeToDrainThreshold {
    pub fn new(max_time_to_drain: Duration) -> Self {
        Self {
            max_time_to_drain,
            common: CustomAlarmThreshold::default(),
        }
    }
}

/// A static threshold with a caller-chosen operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomThreshold {
    pub threshold: f64,
    pub comparison_operator: ComparisonOperator,
    #[serde(default)]
    pub dedupe_string: Option<String>,
    #[serde(default)]
    pub additional_description: Option<String>,
    #[serde(flatten)]
    pub common: CustomAlarmThreshold,
}

impl CustomThreshold {
    pub fn new(threshold: f64, comparison_operator: ComparisonOperator) -> Self {
        Self {
            threshold,
            comparison_operator,
            dedupe_string: None,
            additional_description: None,
            common: CustomAlarmThreshold::default(),
        }
    }
}

/// Alarm on the value leaving an anomaly-detection band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDetectionThreshold {
    pub standard_deviation_for_alarm: f64,
    #[serde(default)]
    pub alarm_when_above_the_band: bool,
    #[serde(default)]
    pub alarm_when_below_the_band: bool,
    #[serde(default)]
    pub additional_description: Option<String>,
    #[serde(flatten)]
    pub common: CustomAlarmThreshold,
}

impl AnomalyDetectionThreshold {
    pub fn new(standard_deviation_for_alarm: f64, above: bool, below: bool) -> Self {
        Self {
            standard_deviation_for_alarm,
            alarm_when_above_the_band: above,
            alarm_when_below_the_band: below,
            additional_description: None,
            common: CustomAlarmThreshold::default(),
        }
    }
}
