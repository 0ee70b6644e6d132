//! Alternative vocabularies over the same primitives.
//!
//! Each dialect is a naming table and nothing more: every alias forwards to
//! exactly one canonical operation on [`Engine`](verdict_core::Engine),
//! [`Mock`](verdict_mock::Mock) or [`Assertion`](verdict_assert::Assertion).
//!
//! | Canonical | Classic | Narrative | Mathematical | Imperative |
//! |-----------|---------|-----------|--------------|------------|
//! | `define_group` | `describe` | `intend`, `story` | `axiom` | `ensure`, `suite` |
//! | `define_case` | `it`, `test` | `detail`, `scenario` | `proof` | `check`, `verify` |
//! | before-all hook | `before_all` | `background` | `postulate` | `init_all` |
//! | after-all hook | `after_all` | `cleanup` | `conclude` | `dispose_all` |
//! | before-each hook | `before_each` | `before` | `given` | `reset` |
//! | after-each hook | `after_each` | | | |
//! | `judge` | `expect` | `to` | `implies` | `that` |
//! | `to_be` | | `be` | `is` | |
//! | `to_be_truthy` | | | | `is_ok` |
//! | `to_match` | | | | `matches` |
//! | `to_have_property` | | `have` | | |
//! | `to_have_been_called` | | `was_called` | `was_evaluated` | `triggered` |
//! | `to_have_been_called_with` | | `received` | `applied_to` | `called_with` |
//! | `to_have_been_called_times` | | `called_times` | `evaluated_times` | `triggered_count` |
//! | `Mock::new` | `fn_mock` | `dummy`, `stand_in` | `arbitrary` | `stub`, `mock` |
//! | `Mock::spy` | `spy_on` | `watch`, `shadow` | `monitor` | `inspect`, `spy` |
//! | `set_return` | `mock_return_value` | `responds_with` | `yields` | `force_return` |
//! | `set_resolved` | `mock_resolved_value` | `eventually_gives` | `converges_to` | `resolve_with` |
//! | `set_implementation` | `mock_implementation` | `acts_like` | `derive` | `executes` |
//!
//! Dialects import independently; bring one into scope per test file.

pub mod classic;
pub mod imperative;
pub mod math;
pub mod narrative;
