// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # verdict-core
//!
//! Suite engine for the Verdict test-authoring framework.
//!
//! This crate provides:
//!
//! - [`Engine`] for declaring groups, cases and lifecycle hooks
//! - [`HookPhase`] and [`HookScope`] for hook registration and scoping
//! - [`Reporter`] implementations for labelled pass/fail output
//! - [`RunSummary`] for the aggregate outcome and exit status
//! - [`VerdictError`], the error taxonomy shared by mocks and assertions
//!
//! Execution is eager: a group's body runs when the group is declared, and a
//! case runs when it is declared.
//!
//! ## Example
//!
//! ```rust
//! use verdict_core::{Engine, HookPhase, NullReporter, VerdictError};
//!
//! let mut engine = Engine::builder().with_reporter(NullReporter).build()?;
//! engine.define_group("arithmetic", |e| {
//!     e.add_hook(HookPhase::BeforeEach, || Ok(()));
//!     e.define_case("adds", || {
//!         if 1 + 1 == 2 { Ok(()) } else { Err(VerdictError::failure("math broke")) }
//!     })
//! })?;
//! assert_eq!(engine.finish().passed(), 1);
//! # Ok::<(), VerdictError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod suite;
pub mod summary;

pub use config::{EngineConfig, FailurePolicy};
pub use engine::{Engine, EngineBuilder};
pub use error::{Result, VerdictError};
pub use report::{ConsoleReporter, Event, MemoryReporter, NullReporter, Reporter};
pub use suite::{Hook, HookPhase, HookScope, SuiteNode};
pub use summary::{CaseFailure, RunSummary};
