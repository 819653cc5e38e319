//! Client configuration

use crate::error::ClientError;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Boot client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server endpoints as `host:port`, tried in order
    pub endpoints: Vec<String>,
    /// Per-request timeout, including connecting
    pub timeout: Duration,
}

impl Config {
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks that there is at least one endpoint and every endpoint is `host:port`.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.endpoints.is_empty() {
            return Err(ClientError::NoEndpoints);
        }
        self.endpoints
            .iter()
            .try_for_each(|endpoint| validate_endpoint(endpoint))
    }
}

/// Checks that `endpoint` is a `host:port` pair without a scheme.
pub fn validate_endpoint(endpoint: &str) -> Result<(), ClientError> {
    let invalid = |reason| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    if endpoint.contains("://") {
        return Err(invalid("endpoints must not include a scheme"));
    }
    let Some((host, port)) = endpoint.rsplit_once(':') else {
        return Err(invalid("missing port"));
    };
    if host.is_empty() || host.contains('/') {
        return Err(invalid("missing host"));
    }
    match port.parse::<u16>() {
        Ok(port) if port > 0 => Ok(()),
        _ => Err(invalid("invalid port")),
    }
}
