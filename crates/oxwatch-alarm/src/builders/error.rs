use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::definition::AlarmDefinition;
use crate::factory::{AddAlarmProps, AlarmFactory};
use crate::threshold::{CustomAlarmThreshold, ErrorCountThreshold, ErrorRateThreshold};
use oxwatch_common::error::Result;
use oxwatch_metric::MetricReference;
use serde::{Deserialize, Serialize};

const DEFAULT_ERROR_DEDUPE: &str = "AnyError";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    Fault,
    Error,
    SystemError,
    UserError,
    Failure,
    Aborted,
    Throttled,
    TimedOut,
    ReadError,
    WriteError,
    Expired,
    Killed,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fault => "Fault",
            Self::Error => "Error",
            Self::SystemError => "SystemError",
            Self::UserError => "UserError",
            Self::Failure => "Failure",
            Self::Aborted => "Aborted",
            Self::Throttled => "Throttled",
            Self::TimedOut => "TimedOut",
            Self::ReadError => "ReadError",
            Self::WriteError => "WriteError",
            Self::Expired => "Expired",
            Self::Killed => "Killed",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error and fault count/rate alarms. Every error-family alarm of a
/// resource shares the `AnyError` dedupe string unless disabled in the
/// alarm defaults.
#[derive(Debug, Clone, Copy)]
pub struct ErrorAlarmFactory<'a> {
    alarm_factory: &'a AlarmFactory,
}

impl<'a> ErrorAlarmFactory<'a> {
    pub fn new(alarm_factory: &'a AlarmFactory) -> Self {
        Self { alarm_factory }
    }

    pub fn add_error_count_alarm(
        &self,
        metric: &MetricReference,
        error_type: ErrorType,
        props: &ErrorCountThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let suffix = format!("{error_type}-Count");
        self.add(
            metric,
            suffix,
            props.max_error_count,
            format!("{error_type} count is too high."),
            disambiguator,
            &props.common,
        )
    }

    pub fn add_error_rate_alarm(
        &self,
        metric: &MetricReference,
        error_type: ErrorType,
        props: &ErrorRateThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let suffix = format!("{error_type}-Rate");
        self.add(
            metric,
            suffix,
            props.max_error_rate,
            format!("{error_type} rate is too high."),
            disambiguator,
            &props.common,
        )
    }

    fn add(
        &self,
        metric: &MetricReference,
        suffix: String,
        threshold: f64,
        description: String,
        disambiguator: &str,
        common: &CustomAlarmThreshold,
    ) -> Result<AlarmDefinition> {
        let dedupe = if self.alarm_factory.should_use_default_dedupe_for_error() {
            DEFAULT_ERROR_DEDUPE.to_string()
        } else {
            suffix.clone()
        };
        let props = AddAlarmProps::new(
            suffix,
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::NotBreaching,
        )
        .with_threshold(threshold)
        .with_disambiguator(disambiguator)
        .with_description(description)
        .with_dedupe_suffix(Some(dedupe))
        .with_common(common);
        self.alarm_factory.add_alarm(metric, props)
    }
}
