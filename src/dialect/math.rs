//! `axiom` / `proof` / `implies`.

use std::any::Any;
use std::fmt;
use std::future::Future;

use verdict_assert::Assertion;
use verdict_core::{Engine, HookPhase, Result};
use verdict_mock::{Mock, Reply, SpyHost, Value};

pub use verdict_assert::judge as implies;

/// Structure and lifecycle names.
pub trait Mathematical {
    /// Declares a group.
    ///
    /// # Errors
    /// See [`Engine::define_group`].
    fn axiom<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>;

    /// Declares a case.
    ///
    /// # Errors
    /// See [`Engine::define_case`].
    fn proof<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>;

    /// Declares an asynchronous case.
    ///
    /// # Errors
    /// See [`Engine::define_case_async`].
    fn proof_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>;

    /// Registers a before-all hook.
    fn postulate<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers an after-all hook.
    fn conclude<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers a before-each hook.
    fn given<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);
}

impl Mathematical for Engine {
    fn axiom<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>,
    {
        self.define_group(name, body)
    }

    fn proof<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.define_case(name, body)
    }

    fn proof_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.define_case_async(name, body)
    }

    fn postulate<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::BeforeAll, hook);
    }

    fn conclude<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::AfterAll, hook);
    }

    fn given<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::BeforeEach, hook);
    }
}

/// An unconstrained function.
#[must_use]
pub fn arbitrary() -> Mock {
    Mock::new()
}

/// A function defined by `f`, with its applications recorded.
pub fn lambda<F, R>(f: F) -> Mock
where
    F: Fn(&[Value]) -> R + Send + Sync + 'static,
    R: Into<Reply>,
{
    Mock::with_implementation(f)
}

/// Observes `host`'s method `name`.
pub fn monitor<H: SpyHost + ?Sized>(host: &mut H, name: &str) -> Mock {
    Mock::spy(host, name)
}

/// Mock configuration names.
pub trait MathMock {
    /// Fixed return value.
    fn yields(&self, value: impl Into<Value>) -> &Self;

    /// Deferred return value.
    fn converges_to(&self, value: impl Into<Value>) -> &Self;

    /// Delegate implementation.
    fn derive<F, R>(&self, f: F) -> &Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>;
}

impl MathMock for Mock {
    fn yields(&self, value: impl Into<Value>) -> &Self {
        self.set_return(value);
        self
    }

    fn converges_to(&self, value: impl Into<Value>) -> &Self {
        self.set_resolved(value);
        self
    }

    fn derive<F, R>(&self, f: F) -> &Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.set_implementation(f);
        self
    }
}

/// Judgment names.
pub trait MathJudgments<T> {
    /// Identity.
    ///
    /// # Errors
    /// See [`Assertion::to_be`].
    fn is(&self, expected: T) -> Result<()>
    where
        T: PartialEq + fmt::Debug;

    /// The function was evaluated.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called`].
    fn was_evaluated(&self) -> Result<()>
    where
        T: Any;

    /// The function was applied to exactly these arguments.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called_with`].
    fn applied_to(&self, args: Vec<Value>) -> Result<()>
    where
        T: Any;

    /// The function was evaluated exactly `times` times.
    ///
    /// # Errors
    /// See [`Assertion::to_have_been_called_times`].
    fn evaluated_times(&self, times: usize) -> Result<()>
    where
        T: Any;
}

impl<T> MathJudgments<T> for Assertion<T> {
    fn is(&self, expected: T) -> Result<()>
    where
        T: PartialEq + fmt::Debug,
    {
        self.to_be(expected)
    }

    fn was_evaluated(&self) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called()
    }

    fn applied_to(&self, args: Vec<Value>) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called_with(args)
    }

    fn evaluated_times(&self, times: usize) -> Result<()>
    where
        T: Any,
    {
        self.to_have_been_called_times(times)
    }
}
