//! The call-recording mock.
//!
//! A [`Mock`] is a shared handle onto one recorder: an append-only call log
//! plus the active response [`Strategy`]. Clones observe and mutate the same
//! recorder, so the code under test and the assertions that inspect it can
//! each hold their own handle.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::reply::Reply;

/// A substitutable procedure: receives the call's arguments, produces a reply.
pub type Delegate = Arc<dyn Fn(&[Value]) -> Reply + Send + Sync>;

/// Wraps a closure as a [`Delegate`].
pub fn delegate<F, R>(f: F) -> Delegate
where
    F: Fn(&[Value]) -> R + Send + Sync + 'static,
    R: Into<Reply>,
{
    Arc::new(move |args: &[Value]| f(args).into())
}

/// The active response policy of a mock.
#[derive(Clone)]
pub enum Strategy {
    /// Return this value synchronously.
    Fixed(Value),
    /// Return a pending computation resolving to this value.
    Deferred(Value),
    /// Call this procedure with the invocation's arguments.
    Delegate(Delegate),
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::Deferred(v) => f.debug_tuple("Deferred").field(v).finish(),
            Self::Delegate(_) => f.write_str("Delegate(..)"),
        }
    }
}

#[derive(Default)]
struct Recorder {
    name: Option<String>,
    calls: Vec<Vec<Value>>,
    strategy: Option<Strategy>,
    original: Option<Delegate>,
}

/// A mock or spy handle. Cheap to clone; all clones share one call log.
#[derive(Clone, Default)]
pub struct Mock {
    inner: Arc<Mutex<Recorder>>,
}

impl Mock {
    /// Creates a mock with no strategy. Invoking it returns `Value::Null`
    /// until it is configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose initial strategy is `f`.
    pub fn with_implementation<F, R>(f: F) -> Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let mock = Self::new();
        mock.set_implementation(f);
        mock
    }

    /// Creates a mock that falls back to `original` until configured.
    #[must_use]
    pub fn with_original(original: Option<Delegate>) -> Self {
        let mock = Self::new();
        mock.inner.lock().original = original;
        mock
    }

    /// Attaches a display name used in logs.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Self {
        self.inner.lock().name = Some(name.into());
        self
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.inner.lock().name.clone()
    }

    /// Records the call, then answers according to the active strategy.
    ///
    /// Without a strategy the captured original implementation answers; a
    /// mock with neither returns `Value::Null`.
    pub fn invoke(&self, args: Vec<Value>) -> Reply {
        let (strategy, original) = {
            let mut recorder = self.inner.lock();
            tracing::trace!(
                mock = recorder.name.as_deref().unwrap_or("<anonymous>"),
                call = recorder.calls.len() + 1,
                ?args,
                "mock invoked"
            );
            recorder.calls.push(args.clone());
            (recorder.strategy.clone(), recorder.original.clone())
        };

        match (strategy, original) {
            (Some(Strategy::Fixed(value)), _) => Reply::Ready(value),
            (Some(Strategy::Deferred(value)), _) => Reply::resolved(value),
            (Some(Strategy::Delegate(f)), _) | (None, Some(f)) => f(&args),
            (None, None) => Reply::Ready(Value::Null),
        }
    }

    /// Invokes the mock and returns the synchronous value.
    ///
    /// See [`Reply::value`] for deferred strategies.
    pub fn call(&self, args: Vec<Value>) -> Value {
        self.invoke(args).value()
    }

    /// Answer every later call with `value`.
    pub fn set_return(&self, value: impl Into<Value>) {
        self.set_strategy(Strategy::Fixed(value.into()));
    }

    /// Answer every later call with a pending computation resolving to `value`.
    pub fn set_resolved(&self, value: impl Into<Value>) {
        self.set_strategy(Strategy::Deferred(value.into()));
    }

    /// Answer every later call by calling `f`.
    pub fn set_implementation<F, R>(&self, f: F)
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        self.set_strategy(Strategy::Delegate(delegate(f)));
    }

    /// Replaces the active strategy. Earlier configuration is discarded.
    pub fn set_strategy(&self, strategy: Strategy) {
        let mut recorder = self.inner.lock();
        tracing::debug!(
            mock = recorder.name.as_deref().unwrap_or("<anonymous>"),
            ?strategy,
            "mock configured"
        );
        recorder.strategy = Some(strategy);
    }

    /// The active strategy, if one was configured.
    #[must_use]
    pub fn strategy(&self) -> Option<Strategy> {
        self.inner.lock().strategy.clone()
    }

    /// Returns true if the mock wraps a captured original implementation.
    #[must_use]
    pub fn has_original(&self) -> bool {
        self.inner.lock().original.is_some()
    }

    /// Every recorded argument list, in invocation order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.inner.lock().calls.clone()
    }

    /// Number of recorded invocations.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }

    /// Arguments of the most recent invocation.
    #[must_use]
    pub fn last_call(&self) -> Option<Vec<Value>> {
        self.inner.lock().calls.last().cloned()
    }

    /// Returns true if some recorded call has exactly these arguments.
    ///
    /// Comparison is plain `Value` equality; assertions apply structural
    /// equality instead.
    #[must_use]
    pub fn was_called_with(&self, args: &[Value]) -> bool {
        self.inner.lock().calls.iter().any(|call| call == args)
    }

    /// Returns true if both handles share one recorder.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Wraps this mock as a delegate that forwards to [`Mock::invoke`].
    #[must_use]
    pub fn as_delegate(&self) -> Delegate {
        let forward = self.clone();
        Arc::new(move |args: &[Value]| forward.invoke(args.to_vec()))
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recorder = self.inner.lock();
        f.debug_struct("Mock")
            .field("name", &recorder.name)
            .field("calls", &recorder.calls.len())
            .field("strategy", &recorder.strategy)
            .field("original", &recorder.original.is_some())
            .finish()
    }
}
