//! The suite engine.
//!
//! Registration is eager: declaring a group runs its body immediately, and
//! declaring a case runs it immediately under hook wrapping. The engine keeps
//! an explicit stack of open groups; the top of the stack (or the root when
//! the stack is empty) is the current node that receives registrations.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::report::{ConsoleReporter, Event, NullReporter, Reporter};
use crate::suite::{HookPhase, HookScope, SuiteNode};
use crate::summary::RunSummary;

/// Test-authoring engine.
pub struct Engine {
    root: SuiteNode,
    stack: Vec<SuiteNode>,
    config: EngineConfig,
    reporter: Box<dyn Reporter>,
    runtime: tokio::runtime::Runtime,
    summary: RunSummary,
}

impl Engine {
    /// Creates a new engine builder.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Creates an engine with default settings.
    ///
    /// # Errors
    /// Returns an error if the async runtime cannot be created.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Declares a group and runs its body immediately.
    ///
    /// The new group is current while `body` executes. The previous current
    /// node is restored on every exit path, including an error return or a
    /// panic in `body`; both are passed on to the caller afterwards.
    /// Declaring a group does not fire its before-all or after-all hooks.
    ///
    /// # Errors
    /// Returns whatever `body` returns, which includes hook errors raised by
    /// cases declared inside it.
    pub fn define_group<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let name = name.into();
        let depth = self.stack.len() + 1;
        tracing::info!(group = %name, depth, "declaring group");
        self.emit(Event::Group {
            name: name.clone(),
            depth,
        });

        self.stack.push(SuiteNode::new(name));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut *self)));
        if let Some(node) = self.stack.pop() {
            tracing::debug!(
                group = %node.name(),
                cases = node.cases().len(),
                before_all = node.hook_count(HookPhase::BeforeAll),
                after_all = node.hook_count(HookPhase::AfterAll),
                "group closed"
            );
        }

        match outcome {
            Ok(result) => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "group declaration failed");
                }
                result
            }
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Declares a case and runs it immediately.
    ///
    /// Before-each hooks run first, then the body. A body that returns an
    /// error or panics is reported as FAIL and the after-each hooks are
    /// skipped; after a passing body the after-each hooks run and then PASS
    /// is reported.
    ///
    /// # Errors
    /// Only hook failures are returned. Body failures are recorded in the
    /// run summary and never propagate.
    pub fn define_case<F>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        let name = name.into();
        self.open_case(&name)?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(body));
        self.settle_case(&name, outcome)
    }

    /// Declares a case whose body is asynchronous and runs it to completion
    /// on the engine's single-threaded runtime before returning.
    ///
    /// Must not be called from inside another tokio runtime.
    ///
    /// # Errors
    /// Only hook failures are returned, as with [`Engine::define_case`].
    pub fn define_case_async<F, Fut>(&mut self, name: impl Into<String>, body: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let name = name.into();
        self.open_case(&name)?;
        let outcome = self
            .runtime
            .block_on(AssertUnwindSafe(async move { body().await }).catch_unwind());
        self.settle_case(&name, outcome)
    }

    /// Appends a hook to the current node.
    pub fn add_hook<F>(&mut self, phase: HookPhase, hook: F)
    where
        F: FnMut() -> Result<()> + 'static,
    {
        let node = self.current_mut();
        tracing::debug!(group = %node.name(), %phase, "hook registered");
        node.add_hook(phase, Box::new(hook));
    }

    /// Nesting depth of the current node. The root is depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Name of the current node.
    #[must_use]
    pub fn current_group(&self) -> &str {
        self.current().name()
    }

    /// Number of hooks the current node holds for `phase`.
    #[must_use]
    pub fn hook_count(&self, phase: HookPhase) -> usize {
        self.current().hook_count(phase)
    }

    /// Cases declared directly on the current node, in order.
    #[must_use]
    pub fn declared_cases(&self) -> &[String] {
        self.current().cases()
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tally of the cases run so far.
    #[must_use]
    pub const fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Consumes the engine and returns the final tally.
    #[must_use]
    pub fn finish(self) -> RunSummary {
        tracing::info!(
            passed = self.summary.passed(),
            failed = self.summary.failed(),
            "run finished"
        );
        self.summary
    }

    fn current(&self) -> &SuiteNode {
        self.stack.last().unwrap_or(&self.root)
    }

    fn current_mut(&mut self) -> &mut SuiteNode {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn emit(&mut self, event: Event) {
        self.reporter.report(&event);
    }

    fn case_path(&self, name: &str) -> String {
        self.stack
            .iter()
            .map(SuiteNode::name)
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join(" > ")
    }

    fn open_case(&mut self, name: &str) -> Result<()> {
        let depth = self.depth();
        tracing::info!(case = %name, depth, "declaring case");
        self.current_mut().push_case(name);
        self.emit(Event::Case {
            name: name.to_string(),
            depth,
        });
        self.fire(HookPhase::BeforeEach)
    }

    fn settle_case(
        &mut self,
        name: &str,
        outcome: std::thread::Result<Result<()>>,
    ) -> Result<()> {
        let depth = self.depth();
        let path = self.case_path(name);
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };

        match failure {
            None => {
                self.fire(HookPhase::AfterEach)?;
                tracing::info!(case = %path, "case passed");
                self.summary.record_pass();
                self.emit(Event::Pass {
                    name: name.to_string(),
                    depth,
                });
                Ok(())
            }
            Some(message) => {
                tracing::warn!(case = %path, %message, "case failed");
                self.summary.record_failure(path, message.clone());
                self.emit(Event::Fail {
                    name: name.to_string(),
                    depth,
                    message,
                });
                Ok(())
            }
        }
    }

    fn fire(&mut self, phase: HookPhase) -> Result<()> {
        match self.config.hook_scope {
            HookScope::Enclosing => self.current_mut().run_hooks(phase),
            HookScope::AncestorChain => {
                let mut chain: Vec<&mut SuiteNode> = std::iter::once(&mut self.root)
                    .chain(self.stack.iter_mut())
                    .collect();
                if phase == HookPhase::AfterEach {
                    chain.reverse();
                }
                for node in chain {
                    node.run_hooks(phase)?;
                }
                Ok(())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "case panicked".to_string()
    }
}

/// Builder for [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    config: Option<EngineConfig>,
    reporter: Option<Box<dyn Reporter>>,
}

impl EngineBuilder {
    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the reporter. Overrides the console choice made by the config.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the async runtime
    /// cannot be created.
    pub fn build(self) -> Result<Engine> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = self.reporter.unwrap_or_else(|| {
            if config.console {
                Box::new(ConsoleReporter::stdout())
            } else {
                Box::new(NullReporter)
            }
        });

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;

        Ok(Engine {
            root: SuiteNode::root(),
            stack: Vec::new(),
            summary: RunSummary::new(config.failure_policy),
            config,
            reporter,
            runtime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use crate::error::VerdictError;
    use crate::report::MemoryReporter;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    fn engine_with(scope: HookScope) -> (Engine, MemoryReporter) {
        let reporter = MemoryReporter::new();
        let engine = Engine::builder()
            .with_config(EngineConfig::default().with_hook_scope(scope))
            .with_reporter(reporter.clone())
            .build()
            .unwrap();
        (engine, reporter)
    }

    fn engine() -> (Engine, MemoryReporter) {
        engine_with(HookScope::Enclosing)
    }

    #[test]
    fn test_builder_defaults() {
        let engine = Engine::builder()
            .with_reporter(NullReporter)
            .build()
            .unwrap();
        assert_eq!(engine.depth(), 0);
        assert_eq!(engine.current_group(), SuiteNode::ROOT);
        assert_eq!(engine.config().hook_scope, HookScope::Enclosing);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.log_filter = String::new();
        assert!(Engine::builder().with_config(config).build().is_err());
    }

    #[test]
    fn test_group_is_current_while_body_runs() {
        let (mut engine, _) = engine();
        engine
            .define_group("outer", |e| {
                assert_eq!(e.current_group(), "outer");
                assert_eq!(e.depth(), 1);
                e.define_group("inner", |e| {
                    assert_eq!(e.current_group(), "inner");
                    assert_eq!(e.depth(), 2);
                    Ok(())
                })?;
                assert_eq!(e.current_group(), "outer");
                Ok(())
            })
            .unwrap();
        assert_eq!(engine.current_group(), SuiteNode::ROOT);
    }

    #[test]
    fn test_group_error_restores_current_and_propagates() {
        let (mut engine, _) = engine();
        let err = engine
            .define_group("broken", |_| Err(VerdictError::failure("bad declaration")))
            .unwrap_err();
        assert!(err.to_string().contains("bad declaration"));
        assert_eq!(engine.depth(), 0);
        assert_eq!(engine.current_group(), SuiteNode::ROOT);
    }

    #[test]
    fn test_group_panic_restores_current_and_resumes() {
        let (mut engine, _) = engine();
        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            let _ = engine.define_group("explodes", |_| panic!("declaration panic"));
        }));
        assert!(caught.is_err());
        assert_eq!(engine.depth(), 0);
        assert_eq!(engine.current_group(), SuiteNode::ROOT);
    }

    #[test]
    fn test_cases_run_eagerly_in_declaration_order() {
        let (mut engine, reporter) = engine();
        let order = Rc::new(RefCell::new(Vec::new()));
        engine
            .define_group("G", |e| {
                for name in ["one", "two", "three"] {
                    let case_order = Rc::clone(&order);
                    e.define_case(name, move || {
                        case_order.borrow_mut().push(name);
                        Ok(())
                    })?;
                    assert_eq!(order.borrow().last(), Some(&name));
                }
                assert_eq!(e.declared_cases(), ["one", "two", "three"]);
                Ok(())
            })
            .unwrap();
        assert_eq!(*order.borrow(), vec!["one", "two", "three"]);
        assert_eq!(reporter.passed(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_failing_case_is_isolated() {
        let (mut engine, reporter) = engine();
        engine
            .define_group("G", |e| {
                e.define_case("fails", || Err(VerdictError::failure("boom")))?;
                e.define_case("panics", || panic!("kaboom"))?;
                e.define_case("passes", || Ok(()))
            })
            .unwrap();

        assert_eq!(
            reporter.failed(),
            vec![
                ("fails".to_string(), "boom".to_string()),
                ("panics".to_string(), "kaboom".to_string()),
            ]
        );
        assert_eq!(reporter.passed(), vec!["passes"]);
        let summary = engine.finish();
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.failures()[0].path, "G > fails");
    }

    #[test]
    fn test_before_each_resets_state_per_case() {
        let (mut engine, reporter) = engine();
        let counter = Rc::new(RefCell::new(7));
        engine
            .define_group("G", |e| {
                let reset = Rc::clone(&counter);
                e.add_hook(HookPhase::BeforeEach, move || {
                    *reset.borrow_mut() = 0;
                    Ok(())
                });
                for name in ["first", "second"] {
                    let counter = Rc::clone(&counter);
                    e.define_case(name, move || {
                        let seen = *counter.borrow();
                        *counter.borrow_mut() += 1;
                        if seen == 0 {
                            Ok(())
                        } else {
                            Err(VerdictError::failure(format!("counter was {seen}")))
                        }
                    })?;
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(reporter.passed(), vec!["first", "second"]);
    }

    #[test]
    fn test_after_each_skipped_on_failure() {
        let (mut engine, _) = engine();
        let teardowns = Rc::new(RefCell::new(0));
        engine
            .define_group("G", |e| {
                let t = Rc::clone(&teardowns);
                e.add_hook(HookPhase::AfterEach, move || {
                    *t.borrow_mut() += 1;
                    Ok(())
                });
                e.define_case("passes", || Ok(()))?;
                e.define_case("fails", || Err(VerdictError::failure("no")))
            })
            .unwrap();
        assert_eq!(*teardowns.borrow(), 1);
    }

    #[test]
    fn test_after_each_error_withholds_pass() {
        let (mut engine, reporter) = engine();
        let err = engine
            .define_group("G", |e| {
                e.add_hook(HookPhase::AfterEach, || {
                    Err(VerdictError::failure("teardown broke"))
                });
                e.define_case("passes", || Ok(()))
            })
            .unwrap_err();
        assert!(matches!(
            err,
            VerdictError::Hook {
                phase: HookPhase::AfterEach,
                ..
            }
        ));
        assert!(reporter.passed().is_empty());
        assert_eq!(engine.summary().passed(), 0);
    }

    #[test]
    fn test_hooks_do_not_leak_to_sibling_groups() {
        let (mut engine, _) = engine();
        let fired = Rc::new(RefCell::new(0));
        engine
            .define_group("G1", |e| {
                let f = Rc::clone(&fired);
                e.add_hook(HookPhase::BeforeEach, move || {
                    *f.borrow_mut() += 1;
                    Ok(())
                });
                e.define_case("in G1", || Ok(()))
            })
            .unwrap();
        engine
            .define_group("G2", |e| {
                assert_eq!(e.hook_count(HookPhase::BeforeEach), 0);
                e.define_case("in G2", || Ok(()))
            })
            .unwrap();
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_enclosing_scope_ignores_parent_hooks() {
        let (mut engine, _) = engine();
        let fired = Rc::new(RefCell::new(0));
        engine
            .define_group("parent", |e| {
                let f = Rc::clone(&fired);
                e.add_hook(HookPhase::BeforeEach, move || {
                    *f.borrow_mut() += 1;
                    Ok(())
                });
                e.define_group("child", |e| e.define_case("nested", || Ok(())))
            })
            .unwrap();
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn test_ancestor_chain_scope_orders_hooks() {
        let (mut engine, _) = engine_with(HookScope::AncestorChain);
        let log = Rc::new(RefCell::new(Vec::new()));
        fn hook(
            log: &Rc<RefCell<Vec<&'static str>>>,
            tag: &'static str,
        ) -> impl FnMut() -> Result<()> + 'static {
            let log = Rc::clone(log);
            move || {
                log.borrow_mut().push(tag);
                Ok(())
            }
        }
        engine
            .define_group("parent", |e| {
                e.add_hook(HookPhase::BeforeEach, hook(&log, "parent before"));
                e.add_hook(HookPhase::AfterEach, hook(&log, "parent after"));
                e.define_group("child", |e| {
                    e.add_hook(HookPhase::BeforeEach, hook(&log, "child before"));
                    e.add_hook(HookPhase::AfterEach, hook(&log, "child after"));
                    e.define_case("nested", || Ok(()))
                })
            })
            .unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["parent before", "child before", "child after", "parent after"]
        );
    }

    #[test]
    fn test_before_each_error_propagates_and_skips_body() {
        let (mut engine, reporter) = engine();
        let ran = Rc::new(RefCell::new(false));
        let body_ran = Rc::clone(&ran);
        let err = engine
            .define_group("G", |e| {
                e.add_hook(HookPhase::BeforeEach, || {
                    Err(VerdictError::failure("fixture unavailable"))
                });
                e.define_case("never runs", move || {
                    *body_ran.borrow_mut() = true;
                    Ok(())
                })
            })
            .unwrap_err();
        assert!(matches!(
            err,
            VerdictError::Hook {
                phase: HookPhase::BeforeEach,
                ..
            }
        ));
        assert!(!*ran.borrow());
        assert!(reporter.failed().is_empty());
        assert_eq!(engine.depth(), 0);
    }

    #[test]
    fn test_group_hooks_are_recorded_not_fired() {
        let (mut engine, _) = engine();
        let fired = Rc::new(RefCell::new(0));
        engine
            .define_group("G", |e| {
                let f = Rc::clone(&fired);
                e.add_hook(HookPhase::BeforeAll, move || {
                    *f.borrow_mut() += 1;
                    Ok(())
                });
                e.add_hook(HookPhase::AfterAll, || Ok(()));
                assert_eq!(e.hook_count(HookPhase::BeforeAll), 1);
                assert_eq!(e.hook_count(HookPhase::AfterAll), 1);
                e.define_case("c", || Ok(()))
            })
            .unwrap();
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn test_root_level_case_uses_root_hooks() {
        let (mut engine, reporter) = engine();
        let fired = Rc::new(RefCell::new(0));
        let f = Rc::clone(&fired);
        engine.add_hook(HookPhase::BeforeEach, move || {
            *f.borrow_mut() += 1;
            Ok(())
        });
        engine.define_case("top level", || Ok(())).unwrap();
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(reporter.passed(), vec!["top level"]);
        assert_eq!(engine.summary().failures().len(), 0);
    }

    #[test]
    fn test_async_case_is_awaited() {
        let (mut engine, reporter) = engine();
        engine
            .define_case_async("sleeps then passes", || async {
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                Ok(())
            })
            .unwrap();
        engine
            .define_case_async("rejects", || async {
                tokio::task::yield_now().await;
                Err(VerdictError::failure("rejected"))
            })
            .unwrap();
        assert_eq!(reporter.passed(), vec!["sleeps then passes"]);
        assert_eq!(
            reporter.failed(),
            vec![("rejects".to_string(), "rejected".to_string())]
        );
    }

    #[test]
    fn test_async_case_panic_is_isolated() {
        let (mut engine, reporter) = engine();
        engine
            .define_case_async("panics", || async { panic!("async kaboom") })
            .unwrap();
        engine.define_case("still runs", || Ok(())).unwrap();
        assert_eq!(reporter.failed()[0].1, "async kaboom");
        assert_eq!(reporter.passed(), vec!["still runs"]);
    }

    #[test]
    fn test_event_stream_order() {
        let (mut engine, reporter) = engine();
        engine
            .define_group("G", |e| e.define_case("c", || Ok(())))
            .unwrap();
        assert_eq!(
            reporter.events(),
            vec![
                Event::Group {
                    name: "G".into(),
                    depth: 1
                },
                Event::Case {
                    name: "c".into(),
                    depth: 1
                },
                Event::Pass {
                    name: "c".into(),
                    depth: 1
                },
            ]
        );
    }

    #[test]
    fn test_fail_run_policy_exit_code() {
        let mut engine = Engine::builder()
            .with_config(EngineConfig::default().with_failure_policy(FailurePolicy::FailRun))
            .with_reporter(NullReporter)
            .build()
            .unwrap();
        engine
            .define_case("fails", || Err(VerdictError::failure("x")))
            .unwrap();
        assert_eq!(engine.finish().exit_code(), 1);
    }

    #[test]
    fn test_log_only_policy_exit_code() {
        let (mut engine, _) = engine();
        engine
            .define_case("fails", || Err(VerdictError::failure("x")))
            .unwrap();
        assert_eq!(engine.finish().exit_code(), 0);
    }

    #[derive(Clone, Default)]
    struct LogCapture(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_case_declaration_is_traced() {
        let (mut engine, _) = engine();
        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            engine
                .define_group("G", |e| e.define_case("traced", || Ok(())))
                .unwrap();
        });
        let log = String::from_utf8(capture.0.lock().clone()).unwrap();
        assert!(log.contains("declaring group"));
        assert!(log.contains("declaring case"));
        assert!(log.contains("traced"));
        assert!(log.contains("case passed"));
    }

    proptest! {
        #[test]
        fn prop_every_case_is_reported_once_in_order(outcomes in prop::collection::vec(any::<bool>(), 0..12)) {
            let (mut engine, reporter) = engine();
            engine
                .define_group("G", |e| {
                    for (i, pass) in outcomes.iter().copied().enumerate() {
                        e.define_case(format!("case {i}"), move || {
                            if pass {
                                Ok(())
                            } else {
                                Err(VerdictError::failure(format!("case {i} failed")))
                            }
                        })?;
                    }
                    Ok(())
                })
                .unwrap();

            let expected_passed: Vec<String> = outcomes
                .iter()
                .enumerate()
                .filter(|(_, pass)| **pass)
                .map(|(i, _)| format!("case {i}"))
                .collect();
            prop_assert_eq!(reporter.passed(), expected_passed);

            let verdicts: Vec<String> = reporter
                .events()
                .iter()
                .filter(|e| matches!(e, Event::Pass { .. } | Event::Fail { .. }))
                .map(|e| e.name().to_string())
                .collect();
            let declared: Vec<String> = (0..outcomes.len()).map(|i| format!("case {i}")).collect();
            prop_assert_eq!(verdicts, declared);

            let summary = engine.finish();
            prop_assert_eq!(summary.total(), outcomes.len());
            prop_assert_eq!(summary.failed(), outcomes.iter().filter(|p| !**p).count());
        }
    }
}
