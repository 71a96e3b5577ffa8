use serde::{Deserialize, Serialize};

/// Which side of a graph a series (and its annotations) is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Bottom,
    Right,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub show_units: bool,
}

impl YAxis {
    fn from_zero(label: &str) -> Self {
        Self {
            min: Some(0.0),
            max: None,
            label: Some(label.to_string()),
            show_units: false,
        }
    }

    pub fn percentage_from_zero() -> Self {
        Self::from_zero("%")
    }

    pub fn percentage_from_zero_to_hundred() -> Self {
        Self {
            max: Some(100.0),
            ..Self::from_zero("%")
        }
    }

    pub fn time_millis_from_zero() -> Self {
        Self::from_zero("ms")
    }

    pub fn time_seconds_from_zero() -> Self {
        Self::from_zero("sec")
    }

    pub fn count_from_zero() -> Self {
        Self::from_zero("Count")
    }

    pub fn rate_from_zero() -> Self {
        Self::from_zero("Rate")
    }

    pub fn boolean_from_zero_to_one() -> Self {
        Self {
            max: Some(1.0),
            ..Self::from_zero("1 = True")
        }
    }
}
