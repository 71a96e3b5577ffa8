use super::join_suffix;
use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::definition::AlarmDefinition;
use crate::factory::{AddAlarmProps, AlarmFactory};
use crate::threshold::{MaxUsageCountThreshold, MinUsageCountThreshold, UsageThreshold};
use oxwatch_common::error::Result;
use oxwatch_metric::MetricReference;

/// Capacity alarms: absolute counts and usage percentages.
#[derive(Debug, Clone, Copy)]
pub struct UsageAlarmFactory<'a> {
    alarm_factory: &'a AlarmFactory,
}

impl<'a> UsageAlarmFactory<'a> {
    pub fn new(alarm_factory: &'a AlarmFactory) -> Self {
        Self { alarm_factory }
    }

    pub fn add_max_count_alarm(
        &self,
        metric: &MetricReference,
        props: &MaxUsageCountThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Max-Usage-Count",
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.max_count)
        .with_description("The count is too high.")
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }

    pub fn add_min_count_alarm(
        &self,
        metric: &MetricReference,
        props: &MinUsageCountThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Min-Usage-Count",
            ComparisonOperator::LessThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.min_count)
        .with_description("The count is too low.")
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }

    pub fn add_max_cpu_usage_percent_alarm(
        &self,
        metric: &MetricReference,
        props: &UsageThreshold,
        disambiguator: &str,
        additional_suffix: Option<&str>,
    ) -> Result<AlarmDefinition> {
        self.add_max_percent(
            metric,
            join_suffix(&["CPU-Usage"], additional_suffix),
            "The CPU usage is too high.",
            props,
            disambiguator,
        )
    }

    pub fn add_max_memory_usage_percent_alarm(
        &self,
        metric: &MetricReference,
        props: &UsageThreshold,
        disambiguator: &str,
        additional_suffix: Option<&str>,
    ) -> Result<AlarmDefinition> {
        self.add_max_percent(
            metric,
            join_suffix(&["Memory-Usage"], additional_suffix),
            "The memory usage is too high.",
            props,
            disambiguator,
        )
    }

    pub fn add_max_disk_usage_percent_alarm(
        &self,
        metric: &MetricReference,
        props: &UsageThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        self.add_max_percent(
            metric,
            "Disk-Usage".to_string(),
            "The disk usage is too high.",
            props,
            disambiguator,
        )
    }

    pub fn add_max_heap_memory_after_gc_usage_percent_alarm(
        &self,
        metric: &MetricReference,
        props: &UsageThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        self.add_max_percent(
            metric,
            "HeapMemoryAfterGC-Usage".to_string(),
            "The heap memory after GC usage is too high.",
            props,
            disambiguator,
        )
    }

    fn add_max_percent(
        &self,
        metric: &MetricReference,
        suffix: String,
        description: &str,
        props: &UsageThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            suffix,
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.max_usage_percent)
        .with_description(description)
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }
}
