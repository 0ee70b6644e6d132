// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Verdict: a minimal test-authoring engine.
//!
//! Declare nested groups, cases and lifecycle hooks on an [`Engine`], stand
//! in collaborators with call-recording [`Mock`]s, and check outcomes with
//! fluent, negatable judgments. Cases run the moment they are declared.
//!
//! # Quick Start
//!
//! ```rust
//! use verdict::prelude::*;
//!
//! let mut engine = Engine::builder().with_reporter(NullReporter).build()?;
//! engine.define_group("checkout", |e| {
//!     let cart = Mock::new();
//!     cart.set_return(150.0);
//!     e.define_case("totals the cart", move || {
//!         judge(cart.call(args![])).to_equal(150.0)?;
//!         judge(cart).to_have_been_called_times(1)
//!     })
//! })?;
//! assert!(engine.finish().is_success());
//! # Ok::<(), VerdictError>(())
//! ```

pub use verdict_assert as assert;
pub use verdict_core as core;
pub use verdict_mock as mock;

pub mod dialect;
pub mod logging;

/// Prelude module for common imports.
pub mod prelude {
    pub use verdict_assert::{Assertion, judge};
    pub use verdict_core::{
        Engine, EngineConfig, FailurePolicy, HookPhase, HookScope, MemoryReporter, NullReporter,
        Result, RunSummary, VerdictError,
    };
    pub use verdict_mock::{Host, Mock, Reply, SpyHost, Value, args, json};
}
