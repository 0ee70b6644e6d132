// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # verdict-assert
//!
//! Fluent, negatable judgments for the Verdict test engine.
//!
//! [`judge`] wraps an actual value; [`Assertion::not`] flips the judgment.
//! Judgments return [`verdict_core::Result`], so case bodies chain them with
//! `?`. Mock judgments inspect a [`verdict_mock::Mock`]'s call log and
//! reject anything that is not a mock. Judge an owned handle: clones share
//! one call log, and a borrowed `&Mock` is not `'static`, so the mock
//! judgments do not accept it.
//!
//! ## Example
//!
//! ```rust
//! use verdict_assert::judge;
//! use verdict_mock::{Mock, args, json};
//!
//! let db = Mock::new();
//! db.call(args![json!({"name": "Alice"})]);
//!
//! judge(db.clone()).to_have_been_called_times(1)?;
//! judge(db).to_have_been_called_with(args![json!({"name": "Alice"})])?;
//! judge(json!({"a": 1, "b": 2})).to_equal(json!({"b": 2, "a": 1}))?;
//! judge(1).not().to_be(2)?;
//! # Ok::<(), verdict_core::VerdictError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assertion;
pub mod capture;
pub mod equality;
pub mod truthy;

pub use assertion::{Assertion, judge};
pub use capture::Captured;
pub use equality::{canonical_encoding, structurally_equal, to_json};
pub use truthy::is_truthy;
