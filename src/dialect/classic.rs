//! `describe` / `it` / `expect`.

use std::future::Future;

use verdict_core::{Engine, HookPhase, Result};
use verdict_mock::{Mock, Reply, SpyHost, Value};

pub use verdict_assert::judge as expect;

/// Structure and lifecycle names.
pub trait Classic {
    /// Declares a group.
    ///
    /// # Errors
    /// See [`Engine::define_group`].
    fn describe<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>;

    /// Declares a case.
    ///
    /// # Errors
    /// See [`Engine::define_case`].
    fn it<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>;

    /// Declares a case.
    ///
    /// # Errors
    /// See [`Engine::define_case`].
    fn test<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>;

    /// Declares an asynchronous case.
    ///
    /// # Errors
    /// See [`Engine::define_case_async`].
    fn it_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>;

    /// Registers a before-all hook.
    fn before_all<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers an after-all hook.
    fn after_all<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers a before-each hook.
    fn before_each<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);

    /// Registers an after-each hook.
    fn after_each<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F);
}

impl Classic for Engine {
    fn describe<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Engine) -> Result<()>,
    {
        self.define_group(name, body)
    }

    fn it<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.define_case(name, body)
    }

    fn test<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.define_case(name, body)
    }

    fn it_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.define_case_async(name, body)
    }

    fn before_all<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::BeforeAll, hook);
    }

    fn after_all<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::AfterAll, hook);
    }

    fn before_each<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::BeforeEach, hook);
    }

    fn after_each<F: FnMut() -> Result<()> + 'static>(&mut self, hook: F) {
        self.add_hook(HookPhase::AfterEach, hook);
    }
}

/// `jest.fn()`.
#[must_use]
pub fn fn_mock() -> Mock {
    Mock::new()
}

/// `jest.spyOn(host, name)`.
pub fn spy_on<H: SpyHost + ?Sized>(host: &mut H, name: &str) -> Mock {
    Mock::spy(host, name)
}

/// Mock configuration names.
pub trait ClassicMock {
    /// Fixed return value.
    fn mock_return_value(&self, value: impl Into<Value>) -> &Self;

    /// Deferred return value.
    fn mock_resolved_value(&self, value: impl Into<Value>) -> &Self;

    /// Delegate implementation.
    fn mock_implementation<F, R>(&self, f: F) -> &Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>;
}

impl ClassicMock for Mock {
    fn mock_return_value(&self, value: impl Into<Value>) -> &Self {
        self.set_return(value);
        self
    }

    fn mock_resolved_value(&self, value: impl Into<Value>) -> &Self {
        self.set_resolved(value);
        self
    }

    fn mock_implementation<F, R>(&self, f: F) -> &Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.set_implementation(f);
        self
    }
}
