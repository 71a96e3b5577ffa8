use crate::comparison::TreatMissingData;
use crate::definition::AlarmDefinition;
use crate::factory::{AddAlarmProps, AlarmFactory};
use crate::threshold::CustomThreshold;
use oxwatch_common::error::Result;
use oxwatch_metric::MetricReference;

/// Static-threshold alarm where the caller picks operator and suffix.
#[derive(Debug, Clone, Copy)]
pub struct CustomAlarmFactory<'a> {
    alarm_factory: &'a AlarmFactory,
}

impl<'a> CustomAlarmFactory<'a> {
    pub fn new(alarm_factory: &'a AlarmFactory) -> Self {
        Self { alarm_factory }
    }

    pub fn add_custom_alarm(
        &self,
        metric: &MetricReference,
        alarm_name_suffix: &str,
        disambiguator: &str,
        props: &CustomThreshold,
    ) -> Result<AlarmDefinition> {
        let description = props
            .additional_description
            .clone()
            .unwrap_or_else(|| format!("Threshold of {} has been breached.", props.threshold));
        let props = AddAlarmProps::new(
            alarm_name_suffix,
            props.comparison_operator,
            TreatMissingData::Missing,
        )
        .with_threshold(props.threshold)
        .with_description(description)
        .with_dedupe_suffix(props.dedupe_string.clone())
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }
}
