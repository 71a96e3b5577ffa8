use serde::{Deserialize, Serialize};

/// Which side of a horizontal annotation line gets shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    None,
    Above,
    Below,
}

/// Which side of a vertical annotation line gets shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalShading {
    None,
    Before,
    After,
}

/// A threshold line drawn across a graph widget.
///
/// Alarm builders produce one of these per alarm so the widget showing the
/// alarmed metric can render the threshold next to the series.
///
/// # Examples
///
/// ```
/// use oxwatch_common::annotation::HorizontalAnnotation;
///
/// let annotation = HorizontalAnnotation::new(330.0).with_label("Warning");
/// assert_eq!(annotation.label.as_deref(), Some("Warning"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalAnnotation {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Shading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl HorizontalAnnotation {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            label: None,
            color: None,
            fill: None,
            visible: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_fill(mut self, fill: Shading) -> Self {
        self.fill = Some(fill);
        self
    }
}

/// A marker at a point in time (ISO-8601 date string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalAnnotation {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<VerticalShading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}
