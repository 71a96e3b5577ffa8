use crate::api::{ApiEndpointMonitoring, ApiEndpointMonitoringProps};
use crate::config::FacadeConfig;
use crate::custom::{CustomMonitoring, CustomMonitoringProps};
use crate::monitoring::Monitoring;
use crate::scope::MonitoringScope;
use oxwatch_alarm::{AddCompositeAlarmProps, AlarmDefinition, CompositeAlarmDefinition};
use oxwatch_common::error::{MonitoringError, Result};
use oxwatch_widget::{render_widgets, Widget};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

const COMPOSITE_LOCAL_PREFIX: &str = "Composite";
const TAG_COMPOSITE_NAME_SUFFIX: &str = "Tag";

/// Which registry query a composite alarm was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CompositeSelector {
    Tag(String),
    Disambiguator(String),
}

/// Entry point of one monitoring session.
///
/// Each `monitor_*` call adds a dashboard segment and records its alarms
/// in the session registry. Composite alarms are derived from that
/// registry on demand and never added back to it. Repeating a composite
/// request returns the same alarm; two different queries resolving to one
/// name are rejected.
///
/// # Examples
///
/// ```
/// use oxwatch_facade::{ApiEndpointMonitoringProps, FacadeConfig, MonitoringFacade};
/// use oxwatch_alarm::threshold::MinTpsThreshold;
///
/// let mut facade = MonitoringFacade::new(FacadeConfig::default());
/// let mut props = ApiEndpointMonitoringProps::new("Orders");
/// props
///     .add_low_tps_alarm
///     .insert("Critical".to_string(), MinTpsThreshold::new(1.0));
/// facade.monitor_api_endpoint(props).unwrap();
///
/// assert_eq!(facade.created_alarms().len(), 1);
/// assert_eq!(facade.created_alarms()[0].alarm_name, "Orders-prod-MinTPS-Critical");
/// ```
#[derive(Debug)]
pub struct MonitoringFacade {
    scope: MonitoringScope,
    segments: Vec<Box<dyn Monitoring>>,
    composite_names: RefCell<BTreeMap<String, CompositeSelector>>,
}

impl MonitoringFacade {
    pub fn new(config: FacadeConfig) -> Self {
        tracing::info!(
            alarm_name_prefix = %config.alarm_defaults.alarm_name_prefix,
            namespace = ?config.metric_defaults.namespace,
            period_secs = config.metric_defaults.period.num_seconds(),
            "Monitoring facade configured"
        );
        Self {
            scope: MonitoringScope::new(config),
            segments: Vec::new(),
            composite_names: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn from_config_file(path: &str) -> anyhow::Result<Self> {
        let config = FacadeConfig::load(path)?;
        Ok(Self::new(config))
    }

    pub fn scope(&self) -> &MonitoringScope {
        &self.scope
    }

    pub fn add_segment(&mut self, segment: impl Monitoring + 'static) -> &mut Self {
        self.segments.push(Box::new(segment));
        self
    }

    pub fn monitor_api_endpoint(&mut self, props: ApiEndpointMonitoringProps) -> Result<&mut Self> {
        let monitoring = ApiEndpointMonitoring::new(&self.scope, props)?;
        Ok(self.add_segment(monitoring))
    }

    pub fn monitor_custom(&mut self, props: CustomMonitoringProps) -> Result<&mut Self> {
        let monitoring = CustomMonitoring::new(&self.scope, props)?;
        Ok(self.add_segment(monitoring))
    }

    pub fn segments(&self) -> &[Box<dyn Monitoring>] {
        &self.segments
    }

    // ---- Alarms ----

    /// Every alarm created in this session, in creation order.
    pub fn created_alarms(&self) -> Vec<AlarmDefinition> {
        self.scope.registry().created_alarms()
    }

    pub fn created_alarms_with_tag(&self, tag: &str) -> Vec<AlarmDefinition> {
        self.scope.registry().created_alarms_with_tag(tag)
    }

    pub fn created_alarms_with_disambiguator(&self, disambiguator: &str) -> Vec<AlarmDefinition> {
        self.scope
            .registry()
            .created_alarms_with_disambiguator(disambiguator)
    }

    /// OR of every alarm tagged `tag`, or `None` when no alarm carries it.
    /// The disambiguator defaults to the tag, and the name carries a `Tag`
    /// suffix unless one is given.
    pub fn create_composite_alarm_using_tag(
        &self,
        tag: &str,
        props: Option<AddCompositeAlarmProps>,
    ) -> Result<Option<CompositeAlarmDefinition>> {
        let alarms = self.created_alarms_with_tag(tag);
        let mut props = props.unwrap_or_default();
        props
            .alarm_name_suffix
            .get_or_insert_with(|| TAG_COMPOSITE_NAME_SUFFIX.to_string());
        self.create_composite_alarm(&alarms, CompositeSelector::Tag(tag.to_string()), props)
    }

    /// OR of every alarm with `disambiguator`, or `None` when there is none.
    pub fn create_composite_alarm_using_disambiguator(
        &self,
        disambiguator: &str,
        props: Option<AddCompositeAlarmProps>,
    ) -> Result<Option<CompositeAlarmDefinition>> {
        let alarms = self.created_alarms_with_disambiguator(disambiguator);
        self.create_composite_alarm(
            &alarms,
            CompositeSelector::Disambiguator(disambiguator.to_string()),
            props.unwrap_or_default(),
        )
    }

    fn create_composite_alarm(
        &self,
        alarms: &[AlarmDefinition],
        selector: CompositeSelector,
        mut props: AddCompositeAlarmProps,
    ) -> Result<Option<CompositeAlarmDefinition>> {
        let default_disambiguator = match &selector {
            CompositeSelector::Tag(value) | CompositeSelector::Disambiguator(value) => value,
        };
        props
            .disambiguator
            .get_or_insert_with(|| default_disambiguator.clone());
        let Some(composite) = self
            .scope
            .create_alarm_factory(COMPOSITE_LOCAL_PREFIX)
            .add_composite_alarm(alarms, &props)
        else {
            return Ok(None);
        };

        let name = &composite.alarm_name;
        let registry = self.scope.registry();
        if registry.created_alarms().iter().any(|a| &a.alarm_name == name) {
            return Err(MonitoringError::DuplicateAlarmName { name: name.clone() });
        }
        match self.composite_names.borrow_mut().entry(name.clone()) {
            Entry::Occupied(issued) if *issued.get() != selector => {
                return Err(MonitoringError::DuplicateAlarmName { name: name.clone() });
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(selector);
            }
        }
        Ok(Some(composite))
    }

    // ---- Dashboards ----

    pub fn widgets(&self) -> Vec<Widget> {
        self.segments.iter().flat_map(|s| s.widgets()).collect()
    }

    pub fn summary_widgets(&self) -> Vec<Widget> {
        self.segments.iter().flat_map(|s| s.summary_widgets()).collect()
    }

    /// Dashboard body with every segment's widgets, in segment order.
    pub fn dashboard_json(&self) -> Result<Value> {
        Ok(json!({ "widgets": render_widgets(&self.widgets())? }))
    }

    pub fn summary_dashboard_json(&self) -> Result<Value> {
        Ok(json!({ "widgets": render_widgets(&self.summary_widgets())? }))
    }
}
