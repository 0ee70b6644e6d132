// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # verdict-mock
//!
//! Record-and-replay mocks for the Verdict test engine.
//!
//! - [`Mock`]: a shared recorder with an append-only call log and one active
//!   response [`Strategy`] (fixed value, deferred value, or delegate)
//! - [`Reply`]: the result of an invocation, ready now or awaitable
//! - [`SpyHost`] / [`Host`]: objects whose methods can be spied on
//!
//! ## Example
//!
//! ```rust
//! use verdict_mock::{Mock, args};
//!
//! let cart = Mock::new();
//! cart.set_return(150.0);
//! assert_eq!(cart.call(args![]), 150.0);
//! assert_eq!(cart.call_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod mock;
pub mod reply;
pub mod spy;

pub use mock::{Delegate, Mock, Strategy, delegate};
pub use reply::Reply;
pub use serde_json::{Value, json};
pub use spy::{Host, SpyHost};

/// Builds an argument list for [`Mock::invoke`]. Each argument goes through
/// [`json!`], so literals, serializable values and `json!` objects mix freely.
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::json!($arg)),+]
    };
}
