//! Shared building blocks for the oxwatch monitoring engine.
//!
//! Holds the error taxonomy, metric statistics, threshold annotations,
//! naming resolution and the string helpers used to derive identifiers
//! that the backend accepts.

pub mod annotation;
pub mod duration;
pub mod error;
pub mod naming;
pub mod statistic;
pub mod strings;

#[cfg(test)]
mod tests;

pub use error::{MonitoringError, Result};
