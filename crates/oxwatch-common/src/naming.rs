use crate::error::{MonitoringError, Result};
use crate::strings::{is_alarm_friendly, sanitize_alarm_friendly_name};
use serde::{Deserialize, Serialize};

/// A resource handle that can supply a fallback name.
///
/// Implemented by whatever object a monitoring is attached to; the
/// returned id only needs to be unique within its parent scope.
pub trait NamedConstruct {
    fn construct_id(&self) -> &str;
}

/// Names the user may provide explicitly for one monitoring section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProvidedNames {
    #[serde(default)]
    pub human_readable_name: Option<String>,
    #[serde(default)]
    pub alarm_friendly_name: Option<String>,
    /// Replaces the alarm-friendly name in generated alarm names only.
    #[serde(default)]
    pub local_alarm_name_prefix_override: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NameResolutionInput {
    pub names: UserProvidedNames,
    /// Id read from the bound [`NamedConstruct`], if any.
    pub named_construct: Option<String>,
    pub fallback_construct_name: Option<String>,
}

impl NameResolutionInput {
    pub fn new(names: UserProvidedNames) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }

    pub fn with_construct(mut self, construct: &dyn NamedConstruct) -> Self {
        self.named_construct = Some(construct.construct_id().to_string());
        self
    }

    pub fn with_fallback_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_construct_name = Some(name.into());
        self
    }
}

/// Resolves the section title and the alarm-friendly name of a monitoring.
///
/// Title: explicit human-readable name, then the bound construct id, then
/// the fallback construct name, then the explicit alarm-friendly name.
/// Alarm-friendly name: explicit alarm-friendly name, then the bound
/// construct id, then the fallback construct name. Every candidate for the
/// alarm-friendly name is sanitized and skipped when nothing survives.
///
/// # Examples
///
/// ```
/// use oxwatch_common::naming::{NameResolutionInput, NamingStrategy, UserProvidedNames};
///
/// let input = NameResolutionInput::new(UserProvidedNames::default())
///     .with_fallback_name("orders api/prod");
/// let naming = NamingStrategy::new(input);
/// assert_eq!(naming.resolve_human_readable_name().unwrap(), "orders api/prod");
/// assert_eq!(naming.resolve_alarm_friendly_name().unwrap(), "orders-api-prod");
/// ```
#[derive(Debug, Clone)]
pub struct NamingStrategy {
    input: NameResolutionInput,
}

impl NamingStrategy {
    pub fn new(input: NameResolutionInput) -> Self {
        Self { input }
    }

    /// Title for widget-only call sites, which tolerate a missing name.
    pub fn try_human_readable_name(&self) -> Option<String> {
        [
            self.input.names.human_readable_name.as_deref(),
            self.input.named_construct.as_deref(),
            self.input.fallback_construct_name.as_deref(),
            self.input.names.alarm_friendly_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
        .map(str::to_string)
    }

    pub fn resolve_human_readable_name(&self) -> Result<String> {
        self.try_human_readable_name()
            .ok_or_else(|| self.missing_name_error())
    }

    pub fn resolve_alarm_friendly_name(&self) -> Result<String> {
        let candidates = [
            self.input.names.alarm_friendly_name.as_deref(),
            self.input.named_construct.as_deref(),
            self.input.fallback_construct_name.as_deref(),
        ];

        for candidate in candidates.into_iter().flatten() {
            if is_alarm_friendly(candidate) {
                return Ok(candidate.to_string());
            }
            let sanitized = sanitize_alarm_friendly_name(candidate);
            if !sanitized.is_empty() {
                tracing::warn!(
                    original = candidate,
                    sanitized = %sanitized,
                    "Alarm-friendly name contained illegal characters"
                );
                return Ok(sanitized);
            }
        }

        Err(self.missing_name_error())
    }

    /// Local prefix used for alarm names; the override wins over the
    /// alarm-friendly name.
    pub fn resolve_local_alarm_name_prefix(&self) -> Result<String> {
        match self.input.names.local_alarm_name_prefix_override.as_deref() {
            Some(prefix) if !prefix.trim().is_empty() => Ok(prefix.to_string()),
            _ => self.resolve_alarm_friendly_name(),
        }
    }

    fn missing_name_error(&self) -> MonitoringError {
        MonitoringError::MissingName(
            "provide alarm_friendly_name, human_readable_name, or a named construct as a fallback"
                .to_string(),
        )
    }
}
