use crate::action::AlarmAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_DATAPOINTS_TO_ALARM: u32 = 3;

/// Either one flag for every alarm, or a flag per disambiguator
/// (missing disambiguators are disabled).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionsEnabled {
    All(bool),
    PerDisambiguator(BTreeMap<String, bool>),
}

impl Default for ActionsEnabled {
    fn default() -> Self {
        Self::All(false)
    }
}

/// Session-wide alarm defaults, read-only once the facade is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmDefaults {
    /// Global prefix of every alarm name.
    #[serde(default)]
    pub alarm_name_prefix: String,
    #[serde(default)]
    pub actions_enabled: ActionsEnabled,
    /// Action used when a threshold has no override.
    #[serde(default)]
    pub action: Option<AlarmAction>,
    #[serde(default)]
    pub datapoints_to_alarm: Option<u32>,
    /// Defaults to the resolved datapoints to alarm.
    #[serde(default)]
    pub evaluation_periods: Option<u32>,
    #[serde(default)]
    pub documentation_link: Option<String>,
    #[serde(default)]
    pub runbook_link: Option<String>,
    /// Error-family alarms share one dedupe string ("AnyError").
    #[serde(default = "default_true")]
    pub use_default_dedupe_for_error: bool,
    /// Latency-family alarms share one dedupe string ("AnyLatency").
    #[serde(default = "default_true")]
    pub use_default_dedupe_for_latency: bool,
    #[serde(default)]
    pub dedupe_string_prefix: Option<String>,
    #[serde(default)]
    pub dedupe_string_suffix: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for AlarmDefaults {
    fn default() -> Self {
        Self {
            alarm_name_prefix: String::new(),
            actions_enabled: ActionsEnabled::default(),
            action: None,
            datapoints_to_alarm: None,
            evaluation_periods: None,
            documentation_link: None,
            runbook_link: None,
            use_default_dedupe_for_error: true,
            use_default_dedupe_for_latency: true,
            dedupe_string_prefix: None,
            dedupe_string_suffix: None,
        }
    }
}

impl AlarmDefaults {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            alarm_name_prefix: prefix.into(),
            ..Self::default()
        }
    }
}
