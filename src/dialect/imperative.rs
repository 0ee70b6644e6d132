//! `ensure` / `check` / `that`.

use std::any::Any;
use std::future::Future;

use regex::Regex;
use serde::Serialize;
use verdict_assert::Assertion;
use verdict_core::{Engine, HookPhase, Result};
use verdict_mock::{Mock, Reply, SpyHost, Value};

pub use verdict_assert::judge as that;

/// Structure and lifecycle names.
pub trait Imperative {
    /// Declares a group.
    ///
    /// # Errors
    /// See [`Engine::define_group`].
    fn ensure<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>;

    /// Declares a group.
    ///
    /// # Errors
    /// See [`Engine::define_group`].
    fn suite<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>;

    /// Declares a case.
    ///
    /// # Errors
    /// See [`Engine::define_case`].
    fn check<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>;

    /// Declares a case.
    ///
    /// # Errors
    /// See [`Engine::define_case`].
    fn verify<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>;

    /// Declares an asynchronous case.
    ///
    /// # Errors
    /// See [`Engine::define_case_async`].
    fn check_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>;

    /// Registers a before-all hook.
    fn init_all<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers an after-all hook.
    fn dispose_all<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers a before-each hook.
    fn reset<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);
}

impl Imperative for Engine {
    fn ensure<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>,
    {
        self.define_group(name, body)
    }

    fn suite<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>,
    {
        self.define_group(name, body)
    }

    fn check<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.define_case(name, body)
    }

    fn verify<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.define_case(name, body)
    }

    fn check_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.define_case_async(name, body)
    }

    fn init_all<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::BeforeAll, hook);
    }

    fn dispose_all<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::AfterAll, hook);
    }

    fn reset<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::BeforeEach, hook);
    }
}

/// A new stub.
#[must_use]
pub fn stub() -> Mock {
    Mock::new()
}

/// A new mock.
#[must_use]
pub fn mock() -> Mock {
    Mock::new()
}

/// Spies on `host`'s method `name`.
pub fn inspect<H: SpyHost + ?Sized>(host: &mut H, name: &str) -> Mock {
    Mock::spy(host, name)
}

/// Spies on `host`'s method `name`.
pub fn spy<H: SpyHost + ?Sized>(host: &mut H, name: &str) -> Mock {
    Mock::spy(host, name)
}

/// Mock configuration names.
pub trait ImperativeMock {
    /// Fixed return value.
    fn force_return(&self, value: impl Into<Value>) -> &Self;

    /// Deferred return value.
    fn resolve_with(&self, value: impl Into<Value>) -> &Self;

    /// Delegate implementation.
    fn executes<F, R>(&self, f: F) -> &Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>;
}

impl ImperativeMock for Mock {
    fn force_return(&self, value: impl Into<Value>) -> &Self {
        self.set_return(value);
        self
    }

    fn resolve_with(&self, value: impl Into<Value>) -> &Self {
        self.set_resolved(value);
        self
    }

    fn executes<F, R>(&self, f: F) -> &Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.set_implementation(f);
        self
    }
}

/// Judgment names.
pub trait ImperativeJudgments<T> {
    /// Truthiness.
    ///
    /// # Errors
    /// See [`Assertion::to_be_truthy`].
    fn is_ok(&self) -> Result<()>
    where
        T: Serialize;

    /// Pattern match.
    ///
    /// # Errors
    /// See [`Assertion::to_match`].
    fn matches(&self, pattern: &Regex) -> Result<()>
    where
        T: Serialize;

    /// The mock was triggered.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called`].
    fn triggered(&self) -> Result<()>
    where
        T: Any;

    /// Some call received exactly these arguments.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called_with`].
    fn called_with(&self, args: Vec<Value>) -> Result<()>
    where
        T: Any;

    /// The mock was triggered exactly `times` times.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called_times`].
    fn triggered_count(&self, times: usize) -> Result<()>
    where
        T: Any;
}

impl<T> ImperativeJudgments<T> for Assertion<T> {
    fn is_ok(&self) -> Result<()>
    where
        T: Serialize,
    {
        self.to_be_truthy()
    }

    fn matches(&self, pattern: &Regex) -> Result<()>
    where
        T: Serialize,
    {
        self.to_match(pattern)
    }

    fn triggered(&self) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called()
    }

    fn called_with(&self, args: Vec<Value>) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called_with(args)
    }

    fn triggered_count(&self, times: usize) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called_times(times)
    }
}
