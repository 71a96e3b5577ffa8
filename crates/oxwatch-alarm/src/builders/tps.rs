use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::definition::AlarmDefinition;
use crate::factory::{AddAlarmProps, AlarmFactory};
use crate::threshold::{MaxTpsThreshold, MinTpsThreshold};
use oxwatch_common::error::Result;
use oxwatch_metric::MetricReference;

#[derive(Debug, Clone, Copy)]
pub struct TpsAlarmFactory<'a> {
    alarm_factory: &'a AlarmFactory,
}

impl<'a> TpsAlarmFactory<'a> {
    pub fn new(alarm_factory: &'a AlarmFactory) -> Self {
        Self { alarm_factory }
    }

    pub fn add_min_tps_alarm(
        &self,
        metric: &MetricReference,
        props: &MinTpsThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "MinTPS",
            ComparisonOperator::LessThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.min_tps)
        .with_description("TPS is too low.")
        .with_dedupe_suffix(Some("Tps-Min".to_string()))
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }

    pub fn add_max_tps_alarm(
        &self,
        metric: &MetricReference,
        props: &MaxTpsThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "MaxTPS",
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.max_tps)
        .with_description("TPS is too high.")
        .with_dedupe_suffix(Some("Tps-Max".to_string()))
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }
}
