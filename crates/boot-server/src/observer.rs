//! Match observers
//!
//! Selection and rendering stay free of side effects. The transport reports
//! every outcome to a [`MatchObserver`] instead, which decides how to log or
//! count it.

use boot_core::CoreError;
use boot_model::{Group, LabelSet};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Result of selecting (and rendering) a boot configuration for a request.
#[derive(Debug, Clone, Copy)]
pub enum MatchOutcome<'a> {
    /// A group matched and its profile was served
    Matched(&'a Group),
    /// Selection or rendering failed
    Failed(&'a CoreError),
}

impl MatchOutcome<'_> {
    /// Short outcome label for logs and metrics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::Matched(_) => "matched",
            MatchOutcome::Failed(CoreError::NoMatch) => "no_match",
            MatchOutcome::Failed(CoreError::Unsupported { .. }) => "unsupported",
            MatchOutcome::Failed(CoreError::ProfileNotFound(_) | CoreError::GroupNotFound(_)) => {
                "dangling_reference"
            }
            MatchOutcome::Failed(_) => "error",
        }
    }
}

/// Receives match outcomes from the transport.
pub trait MatchObserver: Send + Sync {
    /// Called once per selection request on `endpoint`.
    fn observe(&self, endpoint: &str, labels: &LabelSet, outcome: MatchOutcome<'_>);
}

/// Logs match outcomes.
///
/// Matches log at debug, no-match and unsupported boot modes at info and
/// dangling references at warn. Only template and storage faults log at error.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn observe(&self, endpoint: &str, labels: &LabelSet, outcome: MatchOutcome<'_>) {
        match outcome {
            MatchOutcome::Matched(group) => {
                debug!(endpoint, %labels, group = %group.id, profile = %group.profile, "Matched group");
            }
            MatchOutcome::Failed(err) if err.is_expected() => {
                info!(endpoint, %labels, "{}", err);
            }
            MatchOutcome::Failed(err) if err.is_not_found() => {
                tracing::warn!(endpoint, %labels, "Group references missing entity: {}", err);
            }
            MatchOutcome::Failed(err) => {
                error!(endpoint, %labels, "Failed to serve boot config: {}", err);
            }
        }
    }
}

/// Forwards outcomes to several observers.
#[derive(Clone, Default)]
pub struct Observers {
    observers: Vec<Arc<dyn MatchObserver>>,
}

impl Observers {
    pub fn new(observers: Vec<Arc<dyn MatchObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn MatchObserver>) {
        self.observers.push(observer);
    }
}

impl MatchObserver for Observers {
    fn observe(&self, endpoint: &str, labels: &LabelSet, outcome: MatchOutcome<'_>) {
        for observer in &self.observers {
            observer.observe(endpoint, labels, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boot_core::Protocol;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl MatchObserver for Recorder {
        fn observe(&self, endpoint: &str, _labels: &LabelSet, outcome: MatchOutcome<'_>) {
            self.0.lock().unwrap().push(format!("{endpoint}:{}", outcome.label()));
        }
    }

    #[test]
    fn test_outcome_labels() {
        let group = Group::default();
        assert_eq!(MatchOutcome::Matched(&group).label(), "matched");
        assert_eq!(MatchOutcome::Failed(&CoreError::NoMatch).label(), "no_match");
        let unsupported = CoreError::Unsupported {
            protocol: Protocol::Grub,
            reason: "chain".to_string(),
        };
        assert_eq!(MatchOutcome::Failed(&unsupported).label(), "unsupported");
        let dangling = CoreError::ProfileNotFound("p".to_string());
        assert_eq!(MatchOutcome::Failed(&dangling).label(), "dangling_reference");
        let template = CoreError::Template("bad".to_string());
        assert_eq!(MatchOutcome::Failed(&template).label(), "error");
    }

    #[test]
    fn test_fan_out() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let mut observers = Observers::new(vec![first.clone()]);
        observers.push(second.clone());
        observers.push(Arc::new(TracingObserver));

        observers.observe("ipxe", &LabelSet::new(), MatchOutcome::Failed(&CoreError::NoMatch));

        assert_eq!(*first.0.lock().unwrap(), vec!["ipxe:no_match"]);
        assert_eq!(*second.0.lock().unwrap(), vec!["ipxe:no_match"]);
    }
}
