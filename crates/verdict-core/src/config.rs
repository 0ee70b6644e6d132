//! Engine configuration.
//!
//! Configuration is validated at load time, with defaults that reproduce the
//! observed behavior of the engine: enclosing-node hooks only and case
//! failures that never change the exit status.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerdictError};
use crate::suite::HookScope;

/// How case failures affect the run's exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Failures are logged only; the run exits 0.
    #[default]
    LogOnly,
    /// Any failed case makes the run exit 1.
    FailRun,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Which groups contribute hooks to a running case.
    #[serde(default)]
    pub hook_scope: HookScope,

    /// Exit status policy for failed cases.
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Print human-readable report lines to stdout.
    #[serde(default = "default_console")]
    pub console: bool,

    /// Default `tracing` filter directive used by the logging setup.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_console() -> bool {
    true
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hook_scope: HookScope::default(),
            failure_policy: FailurePolicy::default(),
            console: default_console(),
            log_filter: default_log_filter(),
        }
    }
}

impl EngineConfig {
    /// Sets the hook scope.
    #[must_use]
    pub const fn with_hook_scope(mut self, scope: HookScope) -> Self {
        self.hook_scope = scope;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the log filter is empty or cannot be parsed.
    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            return Err(VerdictError::config("log_filter cannot be empty"));
        }
        tracing_subscriber::EnvFilter::try_new(&self.log_filter)
            .map_err(|e| VerdictError::config(format!("invalid log_filter: {e}")))?;
        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    /// Returns an error if the text cannot be parsed or fails validation.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| VerdictError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| VerdictError::config(format!("failed to read config: {e}")))?;
        Self::from_toml(&content)
    }
}
