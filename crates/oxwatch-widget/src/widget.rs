use crate::graph::GraphWidget;
use crate::text::TextWidget;
use oxwatch_common::error::Result;
use serde_json::Value;

/// Any panel that can be placed on a dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Graph(GraphWidget),
    Text(TextWidget),
}

impl Widget {
    pub fn width(&self) -> u32 {
        match self {
            Self::Graph(w) => w.width,
            Self::Text(w) => w.width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Graph(w) => w.height,
            Self::Text(w) => w.height,
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        match self {
            Self::Graph(w) => w.to_json(),
            Self::Text(w) => Ok(w.to_json()),
        }
    }
}

impl From<GraphWidget> for Widget {
    fn from(widget: GraphWidget) -> Self {
        Self::Graph(widget)
    }
}

impl From<TextWidget> for Widget {
    fn from(widget: TextWidget) -> Self {
        Self::Text(widget)
    }
}

/// Renders widgets in order into a dashboard body array.
pub fn render_widgets(widgets: &[Widget]) -> Result<Vec<Value>> {
    widgets.iter().map(Widget::to_json).collect()
}
