use serde::{Deserialize, Serialize};

/// What happens when an alarm changes state.
///
/// Targets are opaque strings (topic or function identifiers) that the
/// backend materializer resolves.
///
/// # Examples
///
/// ```
/// use oxwatch_alarm::action::AlarmAction;
///
/// let action = AlarmAction::notify("ops-topic");
/// let actions = action.resolve();
/// assert_eq!(actions.alarm_actions, vec!["ops-topic".to_string()]);
/// assert!(actions.ok_actions.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlarmAction {
    #[default]
    Noop,
    Notify {
        #[serde(default)]
        on_alarm: Vec<String>,
        #[serde(default)]
        on_ok: Vec<String>,
        #[serde(default)]
        on_insufficient_data: Vec<String>,
    },
    /// Applied in order.
    Multiple { actions: Vec<AlarmAction> },
}

/// Action targets per alarm state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlarmActions {
    pub alarm_actions: Vec<String>,
    pub ok_actions: Vec<String>,
    pub insufficient_data_actions: Vec<String>,
}

impl AlarmAction {
    /// Notifies `target` when the alarm fires.
    pub fn notify(target: impl Into<String>) -> Self {
        Self::Notify {
            on_alarm: vec![target.into()],
            on_ok: Vec::new(),
            on_insufficient_data: Vec::new(),
        }
    }

    /// Flattens the strategy into per-state targets. Targets keep their
    /// first-seen order and appear once per state.
    pub fn resolve(&self) -> AlarmActions {
        let mut actions = AlarmActions::default();
        self.collect_into(&mut actions);
        actions
    }

    fn collect_into(&self, actions: &mut AlarmActions) {
        match self {
            Self::Noop => {}
            Self::Notify {
                on_alarm,
                on_ok,
                on_insufficient_data,
            } => {
                push_distinct(&mut actions.alarm_actions, on_alarm);
                push_distinct(&mut actions.ok_actions, on_ok);
                push_distinct(&mut actions.insufficient_data_actions, on_insufficient_data);
            }
            Self::Multiple { actions: nested } => {
                for action in nested {
                    action.collect_into(actions);
                }
            }
        }
    }
}

fn push_distinct(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}
