//! Suite tree nodes and lifecycle hook phases.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A registered lifecycle hook.
pub type Hook = Box<dyn FnMut() -> Result<()>>;

/// Phase a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookPhase {
    /// Pre-group hook.
    BeforeAll,
    /// Post-group hook.
    AfterAll,
    /// Pre-case hook.
    BeforeEach,
    /// Post-case hook.
    AfterEach,
}

impl HookPhase {
    /// All phases in declaration order.
    pub const ALL: [Self; 4] = [
        Self::BeforeAll,
        Self::AfterAll,
        Self::BeforeEach,
        Self::AfterEach,
    ];

    /// Returns the phase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BeforeAll => "before-all",
            Self::AfterAll => "after-all",
            Self::BeforeEach => "before-each",
            Self::AfterEach => "after-each",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::BeforeAll => 0,
            Self::AfterAll => 1,
            Self::BeforeEach => 2,
            Self::AfterEach => 3,
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which nodes contribute hooks when a case runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookScope {
    /// Only the immediately enclosing group's hooks fire.
    #[default]
    Enclosing,
    /// Pre-case hooks fire root to leaf, post-case hooks leaf to root.
    AncestorChain,
}

/// One group in the suite tree.
///
/// A node accepts registrations while it sits on the engine's context stack
/// (its body is executing). Popping it closes the node; because cases run
/// eagerly, a closed child is not retained.
pub struct SuiteNode {
    name: String,
    cases: Vec<String>,
    hooks: [Vec<Hook>; 4],
}

impl SuiteNode {
    /// Name of the implicit root node.
    pub const ROOT: &'static str = "ROOT";

    /// Creates an empty node.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            hooks: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Creates the root node.
    #[must_use]
    pub fn root() -> Self {
        Self::new(Self::ROOT)
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the cases declared on this node, in execution order.
    #[must_use]
    pub fn cases(&self) -> &[String] {
        &self.cases
    }

    /// Records a declared case.
    pub fn push_case(&mut self, name: impl Into<String>) {
        self.cases.push(name.into());
    }

    /// Appends a hook. No dedup, no removal.
    pub fn add_hook(&mut self, phase: HookPhase, hook: Hook) {
        self.hooks[phase.index()].push(hook);
    }

    /// Number of hooks registered for a phase.
    #[must_use]
    pub fn hook_count(&self, phase: HookPhase) -> usize {
        self.hooks[phase.index()].len()
    }

    /// Runs every hook of `phase` in registration order, stopping at the
    /// first failure.
    ///
    /// # Errors
    /// Returns [`VerdictError::Hook`](crate::VerdictError::Hook) wrapping the
    /// first hook failure.
    pub fn run_hooks(&mut self, phase: HookPhase) -> Result<()> {
        for hook in &mut self.hooks[phase.index()] {
            hook().map_err(|e| match e {
                hook_err @ crate::VerdictError::Hook { .. } => hook_err,
                other => crate::VerdictError::hook(phase, other.to_string()),
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for SuiteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteNode")
            .field("name", &self.name)
            .field("cases", &self.cases)
            .field("before_all", &self.hook_count(HookPhase::BeforeAll))
            .field("after_all", &self.hook_count(HookPhase::AfterAll))
            .field("before_each", &self.hook_count(HookPhase::BeforeEach))
            .field("after_each", &self.hook_count(HookPhase::AfterEach))
            .finish()
    }
}
