#![allow(dead_code)]

use anyhow::Result;
use oxwatch_alarm::AlarmDefaults;
use oxwatch_facade::{FacadeConfig, MonitoringFacade};
use oxwatch_metric::MetricDefaults;
use serde_json::Value;
use std::sync::OnceLock;
use tempfile::TempDir;

pub fn init_tracing() {
    static TRACING_INIT: OnceLock<()> = OnceLock::new();
    TRACING_INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("oxwatch=debug"))
            .with_test_writer()
            .try_init();
    });
}

pub fn config_with_prefix(prefix: &str) -> FacadeConfig {
    FacadeConfig {
        metric_defaults: MetricDefaults::default(),
        alarm_defaults: AlarmDefaults::with_prefix(prefix),
    }
}

pub fn facade_with_prefix(prefix: &str) -> MonitoringFacade {
    init_tracing();
    MonitoringFacade::new(config_with_prefix(prefix))
}

/// Writes `contents` to `facade.toml` inside a fresh temp dir. Keep the
/// returned dir alive while the path is in use.
pub fn write_config(contents: &str) -> Result<(TempDir, String)> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("facade.toml");
    std::fs::write(&path, contents)?;
    let path = path.to_string_lossy().into_owned();
    Ok((temp_dir, path))
}

/// Rendered graph widget with the given title.
pub fn find_widget<'a>(widgets: &'a [Value], title: &str) -> Option<&'a Value> {
    widgets
        .iter()
        .find(|w| w["properties"]["title"].as_str() == Some(title))
}
