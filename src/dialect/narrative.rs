//! `intend` / `detail` / `to`: tests read as a story.

use std::any::Any;
use std::fmt;
use std::future::Future;

use serde::Serialize;
use verdict_assert::Assertion;
use verdict_core::{Engine, HookPhase, Result};
use verdict_mock::{Mock, Reply, SpyHost, Value};

pub use verdict_assert::judge as to;

/// Structure and lifecycle names.
pub trait Narrative {
    /// Declares a group.
    ///
    /// # Errors
    /// See [`Engine::define_group`].
    fn intend<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>;

    /// Declares a group.
    ///
    /// # Errors
    /// See [`Engine::define_group`].
    fn story<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>;

    /// Declares a case.
    ///
    /// # Errors
    /// See [`Engine::define_case`].
    fn detail<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>;

    /// Declares a case.
    ///
    /// # Errors
    /// See [`Engine::define_case`].
    fn scenario<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>;

    /// Declares an asynchronous case.
    ///
    /// # Errors
    /// See [`Engine::define_case_async`].
    fn detail_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>;

    /// Registers a before-all hook.
    fn background<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers an after-all hook.
    fn cleanup<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers a before-each hook.
    fn before<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);
}

impl Narrative for Engine {
    fn intend<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>,
    {
        self.define_group(name, body)
    }

    fn story<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>,
    {
        self.define_group(name, body)
    }

    fn detail<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.define_case(name, body)
    }

    fn scenario<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.define_case(name, body)
    }

    fn detail_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.define_case_async(name, body)
    }

    fn background<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::BeforeAll, hook);
    }

    fn cleanup<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::AfterAll, hook);
    }

    fn before<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::BeforeEach, hook);
    }
}

/// A new actor.
#[must_use]
pub fn dummy() -> Mock {
    Mock::new()
}

/// A new actor.
#[must_use]
pub fn stand_in() -> Mock {
    Mock::new()
}

/// Spies on `host`'s method `name`.
pub fn watch<H: SpyHost + ?Sized>(host: &mut H, name: &str) -> Mock {
    Mock::spy(host, name)
}

/// Spies on `host`'s method `name`.
pub fn shadow<H: SpyHost + ?Sized>(host: &mut H, name: &str) -> Mock {
    Mock::spy(host, name)
}

/// Mock configuration names.
pub trait NarrativeMock {
    /// Fixed return value.
    fn responds_with(&self, value: impl Into<Value>) -> &Self;

    /// Deferred return value.
    fn eventually_gives(&self, value: impl Into<Value>) -> &Self;

    /// Delegate implementation.
    fn acts_like<F, R>(&self, f: F) -> &Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>;
}

impl NarrativeMock for Mock {
    fn responds_with(&self, value: impl Into<Value>) -> &Self {
        self.set_return(value);
        self
    }

    fn eventually_gives(&self, value: impl Into<Value>) -> &Self {
        self.set_resolved(value);
        self
    }

    fn acts_like<F, R>(&self, f: F) -> &Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.set_implementation(f);
        self
    }
}

/// Judgment names.
pub trait NarrativeJudgments<T> {
    /// Identity.
    ///
    /// # Errors
    /// See [`Assertion::to_be`].
    fn be(&self, expected: T) -> Result<()>
    where
        T: PartialEq + fmt::Debug;

    /// Property presence.
    ///
    /// # Errors
    /// See [`Assertion::to_have_property`].
    fn have(&self, name: &str) -> Result<()>
    where
        T: Serialize;

    /// The mock was invoked.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called`].
    fn was_called(&self) -> Result<()>
    where
        T: Any;

    /// Some call received exactly these arguments.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called_with`].
    fn received(&self, args: Vec<Value>) -> Result<()>
    where
        T: Any;

    /// The mock was invoked exactly `times` times.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called_times`].
    fn called_times(&self, times: usize) -> Result<()>
    where
        T: Any;
}

impl<T> NarrativeJudgments<T> for Assertion<T> {
    fn be(&self, expected: T) -> Result<()>
    where
        T: PartialEq + fmt::Debug,
    {
        self.to_be(expected)
    }

    fn have(&self, name: &str) -> Result<()>
    where
        T: Serialize,
    {
        self.to_have_property(name)
    }

    fn was_called(&self) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called()
    }

    fn received(&self, args: Vec<Value>) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called_with(args)
    }

    fn called_times(&self, times: usize) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called_times(times)
    }
}
