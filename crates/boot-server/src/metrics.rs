//! Prometheus metrics

use crate::error::ServerError;
use crate::observer::{MatchObserver, MatchOutcome};
use boot_model::LabelSet;
use prometheus::{IntCounterVec, Opts, Registry, TextEncoder};

/// Counts match outcomes per endpoint and exposes them in Prometheus format.
#[derive(Clone)]
pub struct MetricsObserver {
    registry: Registry,
    outcomes: IntCounterVec,
}

impl MetricsObserver {
    pub fn new() -> Result<Self, ServerError> {
        let registry = Registry::new();
        let outcomes = IntCounterVec::new(
            Opts::new(
                "bootd_match_outcomes_total",
                "Boot config selection outcomes by endpoint",
            ),
            &["endpoint", "outcome"],
        )?;
        registry.register(Box::new(outcomes.clone()))?;
        Ok(Self { registry, outcomes })
    }

    /// Number of outcomes recorded for `endpoint` with `outcome` label.
    #[must_use]
    pub fn count(&self, endpoint: &str, outcome: &str) -> u64 {
        self.outcomes.with_label_values(&[endpoint, outcome]).get()
    }

    /// Content type of [`MetricsObserver::render`] output
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    /// Renders all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, ServerError> {
        let mut buf = String::new();
        TextEncoder::new().encode_utf8(&self.registry.gather(), &mut buf)?;
        Ok(buf)
    }
}

impl MatchObserver for MetricsObserver {
    fn observe(&self, endpoint: &str, _labels: &LabelSet, outcome: MatchOutcome<'_>) {
        self.outcomes
            .with_label_values(&[endpoint, outcome.label()])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boot_core::CoreError;

    #[test]
    fn test_counts_and_renders() {
        let metrics = MetricsObserver::new().unwrap();
        metrics.observe("grub", &LabelSet::new(), MatchOutcome::Failed(&CoreError::NoMatch));
        metrics.observe("grub", &LabelSet::new(), MatchOutcome::Failed(&CoreError::NoMatch));

        assert_eq!(metrics.count("grub", "no_match"), 2);
        assert_eq!(metrics.count("ipxe", "no_match"), 0);

        let text = metrics.render().unwrap();
        assert!(text.contains("bootd_match_outcomes_total{endpoint=\"grub\",outcome=\"no_match\"} 2"));
    }
}
