//! Dashboard widgets.
//!
//! [`GraphWidget`] renders metric references into the dashboard metric
//! array, hoisting expression operands as hidden entries. [`TextWidget`]
//! and [`MonitoringHeader`] cover markdown panels. Sizes are expressed in
//! grid units, see [`size`].

pub mod axis;
pub mod graph;
pub mod size;
pub mod text;
pub mod widget;

#[cfg(test)]
mod tests;

pub use axis::{AxisPosition, LegendPosition, YAxis};
pub use graph::{GraphWidget, GraphWidgetType};
pub use text::{header_widget, HeaderLevel, MonitoringHeader, TextWidget};
pub use widget::{render_widgets, Widget};
