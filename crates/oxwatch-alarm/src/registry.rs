use crate::definition::AlarmDefinition;
use oxwatch_common::error::{MonitoringError, Result};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Default)]
struct RegistryState {
    alarms: Vec<AlarmDefinition>,
    names: HashSet<String>,
}

/// Ordered record of every alarm created during one monitoring session.
///
/// Cloning yields another handle to the same session; the registry is not
/// meant to cross threads. It only grows, and composite alarms are never
/// added to it.
#[derive(Debug, Clone, Default)]
pub struct AlarmRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl AlarmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `alarm`, failing if its name is already taken in the session.
    pub fn register(&self, alarm: AlarmDefinition) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.names.insert(alarm.alarm_name.clone()) {
            return Err(MonitoringError::DuplicateAlarmName {
                name: alarm.alarm_name,
            });
        }
        state.alarms.push(alarm);
        Ok(())
    }

    pub fn created_alarms(&self) -> Vec<AlarmDefinition> {
        self.state.borrow().alarms.clone()
    }

    pub fn created_alarms_with_tag(&self, tag: &str) -> Vec<AlarmDefinition> {
        self.filtered(|alarm| alarm.has_tag(tag))
    }

    pub fn created_alarms_with_disambiguator(&self, disambiguator: &str) -> Vec<AlarmDefinition> {
        self.filtered(|alarm| alarm.disambiguator.as_deref() == Some(disambiguator))
    }

    /// Alarms whose name matches a glob such as `Test-*-Critical`.
    pub fn created_alarms_matching(&self, pattern: &str) -> Vec<AlarmDefinition> {
        self.filtered(|alarm| pattern == "*" || glob_match::glob_match(pattern, &alarm.alarm_name))
    }

    pub fn contains(&self, alarm_name: &str) -> bool {
        self.state.borrow().names.contains(alarm_name)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filtered(&self, keep: impl Fn(&AlarmDefinition) -> bool) -> Vec<AlarmDefinition> {
        self.state
            .borrow()
            .alarms
            .iter()
            .filter(|alarm| keep(alarm))
            .cloned()
            .collect()
    }
}
