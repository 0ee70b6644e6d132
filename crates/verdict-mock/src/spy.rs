//! Spies over host objects.
//!
//! A spy replaces a named method on a host with a forwarding delegate that
//! records into a [`Mock`]. The replaced method is captured as the mock's
//! original implementation and answers calls until the mock is configured.
//! The host is never restored.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::mock::{Delegate, Mock, delegate};
use crate::reply::Reply;

/// An object whose named methods can be looked up and replaced.
pub trait SpyHost {
    /// Returns the current implementation of `name`, if the host has one.
    fn method(&self, name: &str) -> Option<Delegate>;

    /// Installs `implementation` under `name`, replacing any previous one.
    fn install(&mut self, name: &str, implementation: Delegate);
}

impl Mock {
    /// Replaces `host`'s method `name` with a recording mock and returns it.
    ///
    /// The previous method becomes the mock's original implementation. A host
    /// without that method still receives the mock, which then answers
    /// `Value::Null` until configured.
    pub fn spy<H: SpyHost + ?Sized>(host: &mut H, name: &str) -> Self {
        let original = host.method(name);
        tracing::debug!(method = name, captured = original.is_some(), "installing spy");
        let mock = Self::with_original(original).named(name);
        host.install(name, mock.as_delegate());
        mock
    }
}

/// A dynamic object with named methods.
#[derive(Clone, Default)]
pub struct Host {
    methods: HashMap<String, Delegate>,
}

impl Host {
    /// Creates an object with no methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method<F, R>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.methods.insert(name.into(), delegate(f));
        self
    }

    /// Returns true if the object has a method called `name`.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Calls a method, or returns `None` if the object has no such method.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Option<Reply> {
        self.methods.get(name).map(|f| f(&args))
    }

    /// Calls a method and returns its synchronous value; `Value::Null` when
    /// the method is missing.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Value {
        self.invoke(name, args).map_or(Value::Null, Reply::value)
    }
}

impl SpyHost for Host {
    fn method(&self, name: &str) -> Option<Delegate> {
        self.methods.get(name).cloned()
    }

    fn install(&mut self, name: &str, implementation: Delegate) {
        self.methods.insert(name.to_string(), implementation);
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.methods.keys().collect();
        names.sort();
        f.debug_struct("Host").field("methods", &names).finish()
    }
}
