use std::collections::BTreeMap;

use archmodel_core_types::Sensitive;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::validation::validate_health_check;

pub const DEFAULT_HEALTH_CHECK_INTERVAL_SECONDS: i64 = 60;
pub const DEFAULT_HEALTH_CHECK_TIMEOUT_MILLISECONDS: i64 = 0;

/// HTTP health check attached to a software system or container instance
///
/// Stored for downstream tooling; nothing in this crate polls it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpHealthCheck {
    pub name: String,
    pub url: String,
    /// Polling interval in seconds
    pub interval: i64,
    /// Timeout in milliseconds
    pub timeout: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Sensitive<String>>,
}

impl HttpHealthCheck {
    /// Build a validated health check
    ///
    /// # Errors
    /// Returns `InvalidHealthCheck` or `InvalidUrl`; see
    /// [`validate_health_check`] for the order of checks.
    pub fn new(name: &str, url: &str, interval: i64, timeout: i64) -> Result<Self> {
        validate_health_check(name, url, interval, timeout)?;
        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            interval,
            timeout,
            headers: BTreeMap::new(),
        })
    }

    /// Add a request header; the value is redacted in debug output
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .insert(name.into(), Sensitive::new(value.into()));
    }
}
