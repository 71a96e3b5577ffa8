use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::definition::AlarmDefinition;
use crate::factory::{AddAlarmProps, AlarmFactory};
use crate::threshold::{
    MaxIncomingMessagesCountThreshold, MaxMessageAgeThreshold, MaxMessageCountThreshold,
    MaxTimeToDrainThreshold, MinIncomingMessagesCountThreshold, MinMessageCountThreshold,
};
use oxwatch_common::error::Result;
use oxwatch_metric::MetricReference;

const MESSAGE_COUNT_DEDUPE: &str = "AnyQueueMessageCount";

/// Queue depth, age and drain-time alarms.
#[derive(Debug, Clone, Copy)]
pub struct QueueAlarmFactory<'a> {
    alarm_factory: &'a AlarmFactory,
}

impl<'a> QueueAlarmFactory<'a> {
    pub fn new(alarm_factory: &'a AlarmFactory) -> Self {
        Self { alarm_factory }
    }

    pub fn add_min_queue_message_count_alarm(
        &self,
        metric: &MetricReference,
        props: &MinMessageCountThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Queue-Message-Count-Min",
            ComparisonOperator::LessThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.min_message_count)
        .with_description("Number of messages in the queue is too low.")
        .with_dedupe_suffix(Some(MESSAGE_COUNT_DEDUPE.to_string()))
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }

    pub fn add_max_queue_message_count_alarm(
        &self,
        metric: &MetricReference,
        props: &MaxMessageCountThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Queue-Message-Count-Max",
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.max_message_count)
        .with_description("Number of messages in the queue is too high.")
        .with_dedupe_suffix(Some(MESSAGE_COUNT_DEDUPE.to_string()))
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }

    pub fn add_max_queue_message_age_alarm(
        &self,
        metric: &MetricReference,
        props: &MaxMessageAgeThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Queue-Message-Age-Max",
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.max_age_in_seconds)
        .with_description("Age of the oldest message in the queue is too high.")
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }

    /// Threshold in seconds.
    pub fn add_max_queue_time_to_drain_messages_alarm(
        &self,
        metric: &MetricReference,
        props: &MaxTimeToDrainThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Queue-TimeToDrain-Max",
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::NotBreaching,
        )
        .with_threshold(props.max_time_to_drain.num_seconds() as f64)
        .with_description("Time to drain messages in the queue is too high.")
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }

    pub fn add_min_queue_incoming_messages_count_alarm(
        &self,
        metric: &MetricReference,
        props: &MinIncomingMessagesCountThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Queue-Incoming-Messages-Count-Min",
            ComparisonOperator::LessThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.min_incoming_messages_count)
        .with_description("Number of incoming messages into the queue is too low.")
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }

    pub fn add_max_queue_incoming_messages_count_alarm(
        &self,
        metric: &MetricReference,
        props: &MaxIncomingMessagesCountThreshold,
        disambiguator: &str,
    ) -> Result<AlarmDefinition> {
        let props = AddAlarmProps::new(
            "Queue-Incoming-Messages-Count-Max",
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::Missing,
        )
        .with_threshold(props.max_incoming_messages_count)
        .with_description("Number of incoming messages into the queue is too high.")
        .with_disambiguator(disambiguator)
        .with_common(&props.common);
        self.alarm_factory.add_alarm(metric, props)
    }
}
