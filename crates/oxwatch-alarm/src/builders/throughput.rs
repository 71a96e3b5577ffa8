use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::definition::AlarmDefinition;
use crate::factory::{AddAlarmProps, AlarmFactory};
use crate::threshold::MinProcessedBytesThreshold;
use oxwatch_common::error::Result;
use oxwatch_metric::MetricReference;

#[derive(Debug, Clone, Copy)]
pub struct ThroughputAlarmFactory<'a> {
    alarm_factory: &'a AlarmFactory,
}

impl<'a> ThroughputAlarmFactory<'a> {
    pub fn new(alarm_factory: &'a AlarmFactory) -> Self {
        Self { alarm_factory }
    }

    pub fn add_min_processed_bytes_alarm(
        &self,
        metric: &MetricReference,
        props: &MinProcessedBytesThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Processed-Bytes-Min",
            ComparisonOperator::LessThanThreshold,
            TreatMissingData::NotBreaching,
        )
        .with_threshold(props.min_processed_bytes)
        .with_description("Minimum number of processed bytes is too low.")
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }
}
