use oxwatch_common::strings::sanitize_alarm_name;
use std::rc::Rc;

const ALARM_NAME_PART_SEPARATOR: &str = "-";
const ALARM_LABEL_PART_SEPARATOR: &str = " ";

/// Post-processes dedupe strings before they are attached to an alarm.
pub trait DedupeStringProcessor {
    fn process_dedupe_string(&self, dedupe_string: &str) -> String;

    fn process_dedupe_string_override(&self, dedupe_string: &str) -> String;
}

/// Wraps every dedupe string with a fixed prefix and suffix.
#[derive(Debug, Clone, Default)]
pub struct ExtendDedupeString {
    prefix: String,
    suffix: String,
}

impl ExtendDedupeString {
    pub fn new(prefix: Option<&str>, suffix: Option<&str>) -> Self {
        Self {
            prefix: prefix.unwrap_or_default().to_string(),
            suffix: suffix.unwrap_or_default().to_string(),
        }
    }
}

impl DedupeStringProcessor for ExtendDedupeString {
    fn process_dedupe_string(&self, dedupe_string: &str) -> String {
        format!("{}{dedupe_string}{}", self.prefix, self.suffix)
    }

    fn process_dedupe_string_override(&self, dedupe_string: &str) -> String {
        format!("{}{dedupe_string}{}", self.prefix, self.suffix)
    }
}

/// Inputs that determine an alarm's name, label and dedupe string.
#[derive(Debug, Clone, Default)]
pub struct AlarmNamingInput<'a> {
    pub alarm_name_suffix: &'a str,
    pub disambiguator: Option<&'a str>,
    pub alarm_name_override: Option<&'a str>,
    pub dedupe_string_override: Option<&'a str>,
    pub alarm_dedupe_string_suffix: Option<&'a str>,
}

/// Derives alarm names from the global prefix (per facade) and the local
/// prefix (per monitored resource).
#[derive(Clone)]
pub struct AlarmNamingStrategy {
    global_prefix: String,
    local_prefix: String,
    dedupe: Rc<dyn DedupeStringProcessor>,
}

impl std::fmt::Debug for AlarmNamingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmNamingStrategy")
            .field("global_prefix", &self.global_prefix)
            .field("local_prefix", &self.local_prefix)
            .finish_non_exhaustive()
    }
}

impl AlarmNamingStrategy {
    pub fn new(
        global_prefix: impl Into<String>,
        local_prefix: impl Into<String>,
        dedupe: Option<Rc<dyn DedupeStringProcessor>>,
    ) -> Self {
        Self {
            global_prefix: global_prefix.into(),
            local_prefix: local_prefix.into(),
            dedupe: dedupe.unwrap_or_else(|| Rc::new(ExtendDedupeString::default())),
        }
    }

    pub fn local_prefix(&self) -> &str {
        &self.local_prefix
    }

    /// `global-local-suffix[-disambiguator]`, sanitized. An override is
    /// used verbatim.
    pub fn name(&self, input: &AlarmNamingInput<'_>) -> String {
        if let Some(name) = input.alarm_name_override {
            return name.to_string();
        }
        let mut parts = vec![
            self.global_prefix.as_str(),
            self.local_prefix.as_str(),
            input.alarm_name_suffix,
        ];
        parts.extend(input.disambiguator);
        sanitize_alarm_name(&join_distinct(&parts, ALARM_NAME_PART_SEPARATOR))
    }

    /// Shorter label for widgets; leaves out the global prefix.
    pub fn widget_label(&self, input: &AlarmNamingInput<'_>) -> String {
        let mut parts = vec![self.local_prefix.as_str(), input.alarm_name_suffix];
        parts.extend(input.disambiguator);
        join_distinct(&parts, ALARM_LABEL_PART_SEPARATOR)
    }

    /// Alarms sharing a dedupe string are grouped by the notification
    /// backend. The disambiguator is not part of it: a warning and a
    /// critical alarm on one metric report the same issue.
    pub fn dedupe_string(&self, input: &AlarmNamingInput<'_>) -> Option<String> {
        if let Some(dedupe) = input.dedupe_string_override {
            return Some(self.dedupe.process_dedupe_string_override(dedupe));
        }
        let suffix = input.alarm_dedupe_string_suffix?;
        let parts = [
            self.global_prefix.as_str(),
            self.local_prefix.as_str(),
            suffix,
        ];
        Some(
            self.dedupe
                .process_dedupe_string(&join_distinct(&parts, ALARM_NAME_PART_SEPARATOR)),
        )
    }
}

// Drops empty parts and repeats of an earlier part.
fn join_distinct(parts: &[&str], separator: &str) -> String {
    let mut distinct: Vec<&str> = Vec::with_capacity(parts.len());
    for part in parts {
        if !part.is_empty() && !distinct.contains(part) {
            distinct.push(part);
        }
    }
    distinct.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(suffix: &'a str, disambiguator: Option<&'a str>) -> AlarmNamingInput<'a> {
        AlarmNamingInput {
            alarm_name_suffix: suffix,
            disambiguator,
            ..AlarmNamingInput::default()
        }
    }

    #[test]
    fn name_joins_distinct_parts() {
        let naming = AlarmNamingStrategy::new("Test", "DummyApi", None);
        assert_eq!(
            naming.name(&input("Latency-P99", Some("Warning"))),
            "Test-DummyApi-Latency-P99-Warning"
        );
        assert_eq!(naming.name(&input("DummyApi", None)), "Test-DummyApi");
        assert_eq!(
            naming.widget_label(&input("Latency-P99", Some("Warning"))),
            "DummyApi Latency-P99 Warning"
        );
    }

    #[test]
    fn override_is_used_verbatim() {
        let naming = AlarmNamingStrategy::new("Test", "DummyApi", None);
        let mut named = input("Latency", Some("Warning"));
        named.alarm_name_override = Some("my custom alarm");
        assert_eq!(naming.name(&named), "my custom alarm");
    }

    #[test]
    fn dedupe_string_resolution() {
        let naming = AlarmNamingStrategy::new(
            "Test",
            "DummyApi",
            Some(Rc::new(ExtendDedupeString::new(Some("["), Some("]")))),
        );

        assert_eq!(naming.dedupe_string(&input("Latency", Some("Warning"))), None);

        let mut with_suffix = input("Latency", Some("Warning"));
        with_suffix.alarm_dedupe_string_suffix = Some("AnyLatency");
        assert_eq!(
            naming.dedupe_string(&with_suffix).as_deref(),
            Some("[Test-DummyApi-AnyLatency]")
        );

        with_suffix.dedupe_string_override = Some("custom");
        assert_eq!(naming.dedupe_string(&with_suffix).as_deref(), Some("[custom]"));
    }
}
