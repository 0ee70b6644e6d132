//! Aggregate outcome of a run.

use crate::config::FailurePolicy;

/// A case that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    /// Group path and case name joined with `" > "`.
    pub path: String,
    /// Failure message.
    pub message: String,
}

/// Pass/fail tally of every case the engine ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    passed: usize,
    failures: Vec<CaseFailure>,
    policy: FailurePolicy,
}

impl RunSummary {
    /// Creates an empty summary governed by `policy`.
    #[must_use]
    pub const fn new(policy: FailurePolicy) -> Self {
        Self {
            passed: 0,
            failures: Vec::new(),
            policy,
        }
    }

    /// Records a passing case.
    pub fn record_pass(&mut self) {
        self.passed += 1;
    }

    /// Records a failing case.
    pub fn record_failure(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.failures.push(CaseFailure {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Number of passing cases.
    #[must_use]
    pub const fn passed(&self) -> usize {
        self.passed
    }

    /// Number of failing cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Total cases run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.failures.len()
    }

    /// Failure records in the order they happened.
    #[must_use]
    pub fn failures(&self) -> &[CaseFailure] {
        &self.failures
    }

    /// Returns true if no case failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit status for this run under its failure policy.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.policy {
            FailurePolicy::LogOnly => 0,
            FailurePolicy::FailRun => i32::from(!self.is_success()),
        }
    }
}
