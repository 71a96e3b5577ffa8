use crate::comparison::ComparisonOperator;
use oxwatch_common::annotation::HorizontalAnnotation;
use oxwatch_metric::MetricReference;

/// Everything an annotation strategy may look at.
#[derive(Debug, Clone)]
pub struct AnnotationInput<'a> {
    pub alarm_name: &'a str,
    pub alarm_label: &'a str,
    pub metric: &'a MetricReference,
    pub comparison_operator: ComparisonOperator,
    pub threshold: f64,
    pub datapoints_to_alarm: u32,
    pub evaluation_periods: u32,
    pub disambiguator: Option<&'a str>,
    pub dedupe_string: Option<&'a str>,
    pub fill_alarm_range: bool,
    pub override_color: Option<&'a str>,
    pub override_label: Option<&'a str>,
    pub override_visibility: Option<bool>,
}

/// Produces the threshold line drawn for an alarm.
///
/// Implementors provide [`AnnotationStrategy::base_annotation`]; the
/// provided [`AnnotationStrategy::create_annotation`] then applies range
/// shading and the per-alarm color, label and visibility overrides.
pub trait AnnotationStrategy {
    fn base_annotation(&self, input: &AnnotationInput<'_>) -> HorizontalAnnotation;

    fn create_annotation(&self, input: &AnnotationInput<'_>) -> HorizontalAnnotation {
        let mut annotation = self.base_annotation(input);
        if input.fill_alarm_range {
            annotation.fill = input.comparison_operator.alarming_range_shade();
        }
        if let Some(color) = input.override_color {
            annotation.color = Some(color.to_string());
        }
        if let Some(label) = input.override_label {
            annotation.label = Some(label.to_string());
        }
        if let Some(visible) = input.override_visibility {
            annotation.visible = Some(visible);
        }
        annotation
    }
}

/// `{ value: threshold, label: disambiguator }`, falling back to the
/// alarm's widget label when there is no disambiguator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAnnotationStrategy;

impl AnnotationStrategy for DefaultAnnotationStrategy {
    fn base_annotation(&self, input: &AnnotationInput<'_>) -> HorizontalAnnotation {
        let label = input.disambiguator.unwrap_or(input.alarm_label);
        HorizontalAnnotation::new(input.threshold).with_label(label)
    }
}
