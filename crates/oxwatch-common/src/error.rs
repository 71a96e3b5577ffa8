/// Configuration errors raised while assembling alarms and widgets.
///
/// Every variant is raised synchronously by the call that detected the
/// misconfiguration. None of them is recoverable by the engine: the caller is
/// expected to abort the whole assembly so that the problem surfaces before
/// anything is deployed.
///
/// # Examples
///
/// ```rust
/// use oxwatch_common::error::MonitoringError;
///
/// let err = MonitoringError::DuplicateAlarmName {
///     name: "Test-Api-Latency-P99-Warning".to_string(),
/// };
/// assert!(err.to_string().contains("Test-Api-Latency-P99-Warning"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum MonitoringError {
    /// Neither an explicit name nor any fallback source produced a usable name.
    #[error("Naming: insufficient information to name the alarms and/or monitoring section: {0}")]
    MissingName(String),

    /// No namespace was given and the global metric defaults have none either.
    #[error("Metric: no namespace defined for metric '{metric}', specify it in the metric defaults")]
    MissingNamespace { metric: String },

    /// Math expression references an identifier that is not one of its operands.
    #[error("Metric: expression '{expression}' references undeclared operand '{id}'")]
    UndeclaredOperand { id: String, expression: String },

    /// An expression identifier does not start with a lowercase letter or
    /// contains characters outside `[a-zA-Z0-9_]`.
    #[error("Metric: invalid expression id '{id}'")]
    InvalidExpressionId { id: String },

    /// `multiply_metric` / `divide_metric` called with a factor below one.
    #[error("Metric: {operation} factor must be greater than one (got {factor})")]
    InvalidScalingFactor { operation: &'static str, factor: f64 },

    /// Two alarms in one session resolved to the same name.
    #[error("Alarm: an alarm named '{name}' already exists in this session")]
    DuplicateAlarmName { name: String },

    /// Search expressions cannot be the target of an alarm.
    #[error("Alarm: alarming on search queries is not supported (alarm suffix '{alarm_name_suffix}')")]
    SearchMetricAlarm { alarm_name_suffix: String },

    /// An anomaly alarm asked for neither side of the band.
    #[error("Alarm: anomaly alarm '{disambiguator}' must alarm when the value is above or below the band, or both")]
    AnomalyBandSideMissing { disambiguator: String },

    /// A metric group entry requested both a regular alarm and an anomaly band.
    #[error("Alarm: metric '{metric}' cannot carry both a regular alarm and an anomaly detection band")]
    AlarmWithAnomalyDetection { metric: String },

    /// `evaluation_periods` resolved to fewer periods than `datapoints_to_alarm`.
    #[error("Alarm: evaluation periods ({evaluation_periods}) must be greater than or equal to datapoints to alarm ({datapoints_to_alarm}) for {alarm_name}")]
    InvalidEvaluationWindow {
        alarm_name: String,
        evaluation_periods: u32,
        datapoints_to_alarm: u32,
    },

    /// One expression id was bound to two different series within a widget.
    #[error("Widget: expression id '{id}' is bound to different metrics in widget '{widget}'")]
    DuplicateExpressionId { id: String, widget: String },

    /// The rendered widget does not have the shape a post-processing step expects.
    #[error("Widget: {0}")]
    InvalidWidget(String),

    /// A configuration value is out of range or inconsistent.
    #[error("Config: {0}")]
    InvalidConfig(String),

    /// JSON serialization failed while rendering a definition.
    #[error("Monitoring: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed while loading defaults.
    #[error("Monitoring: TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reading a configuration file failed.
    #[error("Monitoring: I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` alias for engine operations.
pub type Result<T> = std::result::Result<T, MonitoringError>;
