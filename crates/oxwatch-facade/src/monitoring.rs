use oxwatch_alarm::AlarmDefinition;
use oxwatch_widget::Widget;

/// One monitored resource: its dashboard segment and the alarms it created.
pub trait Monitoring: std::fmt::Debug {
    fn widgets(&self) -> Vec<Widget>;

    /// Condensed widgets for the summary dashboard. Empty by default.
    fn summary_widgets(&self) -> Vec<Widget> {
        Vec::new()
    }

    fn created_alarms(&self) -> &[AlarmDefinition];
}
