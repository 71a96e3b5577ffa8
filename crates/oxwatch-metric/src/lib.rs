//! Time-series references and the factory that builds them.
//!
//! A [`MetricReference`] is either a raw named series, a math expression
//! over other references (including anomaly-detection bands) or a search
//! expression aggregating every series that matches a dimension template.
//! [`factory::MetricFactory`] applies the session-wide defaults for
//! namespace, period, region and account when references are created.

pub mod defaults;
pub mod expression;
pub mod factory;
pub mod rate;
pub mod reference;

#[cfg(test)]
mod tests;

pub use defaults::MetricDefaults;
pub use factory::MetricFactory;
pub use rate::RateComputationMethod;
pub use reference::{MathExpression, MathKind, MetricReference, RawMetric, SearchExpression};
