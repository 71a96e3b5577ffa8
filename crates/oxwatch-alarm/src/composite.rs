use crate::action::{AlarmAction, AlarmActions};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmState {
    Alarm,
    Ok,
    InsufficientData,
}

impl std::fmt::Display for AlarmState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alarm => write!(f, "ALARM"),
            Self::Ok => write!(f, "OK"),
            Self::InsufficientData => write!(f, "INSUFFICIENT_DATA"),
        }
    }
}

/// Boolean rule over alarm states, rendered in the backend's
/// composite-alarm rule syntax.
///
/// # Examples
///
/// ```
/// use oxwatch_alarm::composite::{AlarmRule, AlarmState};
///
/// let rule = AlarmRule::any_of(vec![
///     AlarmRule::from_alarm("a", AlarmState::Alarm),
///     AlarmRule::from_alarm("b", AlarmState::Alarm),
/// ]);
/// assert_eq!(rule.to_string(), r#"(ALARM("a") OR ALARM("b"))"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AlarmRule {
    State { alarm_name: String, state: AlarmState },
    AnyOf(Vec<AlarmRule>),
    AllOf(Vec<AlarmRule>),
}

impl AlarmRule {
    pub fn from_alarm(alarm_name: impl Into<String>, state: AlarmState) -> Self {
        Self::State {
            alarm_name: alarm_name.into(),
            state,
        }
    }

    pub fn any_of(rules: Vec<AlarmRule>) -> Self {
        Self::AnyOf(rules)
    }

    pub fn all_of(rules: Vec<AlarmRule>) -> Self {
        Self::AllOf(rules)
    }
}

impl std::fmt::Display for AlarmRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (rules, joiner) = match self {
            Self::State { alarm_name, state } => return write!(f, "{state}(\"{alarm_name}\")"),
            Self::AnyOf(rules) => (rules, " OR "),
            Self::AllOf(rules) => (rules, " AND "),
        };
        let rendered: Vec<String> = rules.iter().map(ToString::to_string).collect();
        write!(f, "({})", rendered.join(joiner))
    }
}

impl Serialize for AlarmRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompositeOperator {
    #[default]
    Or,
    And,
}

/// Options for a composite alarm; the name suffix defaults to `Composite`.
#[derive(Debug, Clone, Default)]
pub struct AddCompositeAlarmProps {
    pub disambiguator: Option<String>,
    pub alarm_name_suffix: Option<String>,
    pub alarm_name_override: Option<String>,
    pub dedupe_string_override: Option<String>,
    pub alarm_description: Option<String>,
    pub alarm_description_override: Option<String>,
    pub runbook_link: Option<String>,
    pub documentation_link: Option<String>,
    pub actions_enabled: Option<bool>,
    pub action_override: Option<AlarmAction>,
    pub composite_operator: CompositeOperator,
}

/// A named alarm whose state combines previously created alarms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeAlarmDefinition {
    pub alarm_name: String,
    pub alarm_description: String,
    pub alarm_rule: AlarmRule,
    pub actions_enabled: bool,
    pub actions: AlarmActions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedupe_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disambiguator: Option<String>,
    pub matched_alarm_names: Vec<String>,
}
