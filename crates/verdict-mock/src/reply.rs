//! Results produced by invoking a mock.

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

/// What a mock invocation produced: a value now, or a pending computation.
pub enum Reply {
    /// Synchronous result.
    Ready(Value),
    /// Pending computation that settles to a value.
    Deferred(BoxFuture<'static, Value>),
}

impl Reply {
    /// Creates a synchronous reply.
    pub fn ready(value: impl Into<Value>) -> Self {
        Self::Ready(value.into())
    }

    /// Creates a pending reply that resolves to `value` when awaited.
    pub fn resolved(value: impl Into<Value>) -> Self {
        Self::Deferred(futures::future::ready(value.into()).boxed())
    }

    /// Wraps an arbitrary future.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Value> + Send + 'static,
    {
        Self::Deferred(future.boxed())
    }

    /// Returns true if the reply must be awaited.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// The synchronous value. A pending reply is not a value and yields
    /// `Value::Null`; await it instead.
    #[must_use]
    pub fn value(self) -> Value {
        match self {
            Self::Ready(value) => value,
            Self::Deferred(_) => Value::Null,
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Ready(value)
    }
}

impl IntoFuture for Reply {
    type Output = Value;
    type IntoFuture = BoxFuture<'static, Value>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Self::Ready(value) => futures::future::ready(value).boxed(),
            Self::Deferred(future) => future,
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
