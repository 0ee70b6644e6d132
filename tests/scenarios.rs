//! End-to-end scenarios driven through the public API.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use verdict::dialect::narrative::{Narrative, NarrativeJudgments, NarrativeMock, stand_in, to};
use verdict::prelude::*;

fn engine() -> (Engine, MemoryReporter) {
    let reporter = MemoryReporter::new();
    let engine = Engine::builder()
        .with_reporter(reporter.clone())
        .build()
        .unwrap();
    (engine, reporter)
}

#[test]
fn before_each_resets_counter_for_every_case() {
    let (mut engine, reporter) = engine();
    let counter = Rc::new(Cell::new(41));

    engine
        .define_group("G", |e| {
            let reset = Rc::clone(&counter);
            e.add_hook(HookPhase::BeforeEach, move || {
                reset.set(0);
                Ok(())
            });
            for name in ["first sees zero", "second sees zero"] {
                let counter = Rc::clone(&counter);
                e.define_case(name, move || {
                    judge(counter.get()).to_be(0)?;
                    counter.set(counter.get() + 1);
                    Ok(())
                })?;
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(reporter.passed(), vec!["first sees zero", "second sees zero"]);
    assert!(reporter.failed().is_empty());
}

#[test]
fn fixed_value_mock_is_recorded_and_inspectable() {
    let (mut engine, reporter) = engine();
    let recorder = stand_in();
    recorder.responds_with(150.0);

    let returned = recorder.call(args![]);
    assert_eq!(returned, json!(150.0));

    let r = recorder.clone();
    engine
        .define_case("was called", move || to(r).was_called())
        .unwrap();
    let r = recorder.clone();
    engine
        .define_case("received nothing", move || to(r).received(args![]))
        .unwrap();
    let r = recorder.clone();
    engine
        .define_case("called twice", move || to(r).called_times(2))
        .unwrap();

    assert_eq!(reporter.passed(), vec!["was called", "received nothing"]);
    let failed = reporter.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, "called twice");
    assert!(failed[0].1.contains("got 1"), "message was {}", failed[0].1);
}

#[test]
fn spy_configuration_overrides_captured_original() {
    let mut gateway = Host::new().with_method("process", |_: &[Value]| json!(true));
    let spy = Mock::spy(&mut gateway, "process");
    spy.set_return(false);

    assert_eq!(gateway.call("process", args![100]), json!(false));
    judge(spy.clone()).to_have_been_called_with(args![100]).unwrap();
}

#[test]
fn throwing_case_fails_alone() {
    let (mut engine, reporter) = engine();
    engine
        .define_group("isolation", |e| {
            e.define_case("throws", || Err(VerdictError::failure("synchronous error")))?;
            e.define_case("sibling", || judge(true).to_be(true))
        })
        .unwrap();

    assert_eq!(
        reporter.failed(),
        vec![("throws".to_string(), "synchronous error".to_string())]
    );
    assert_eq!(reporter.passed(), vec!["sibling"]);
}

#[test]
fn hooks_stay_inside_their_group() {
    let (mut engine, _) = engine();
    let fired_in_g2 = Rc::new(Cell::new(0));

    engine
        .define_group("G1", |e| {
            let fired = Rc::clone(&fired_in_g2);
            e.add_hook(HookPhase::BeforeEach, move || {
                fired.set(fired.get() + 1);
                Ok(())
            });
            Ok(())
        })
        .unwrap();
    engine
        .define_group("G2", |e| {
            e.define_case("one", || Ok(()))?;
            e.define_case("two", || Ok(()))
        })
        .unwrap();

    assert_eq!(fired_in_g2.get(), 0);
}

#[test]
fn last_configuration_wins() {
    let mock = Mock::new();
    mock.set_return("v");
    mock.set_implementation(|args: &[Value]| json!(args.len()));
    assert_eq!(mock.call(args![1, 2, 3]), json!(3));
    mock.set_return("v2");
    assert_eq!(mock.call(args![1, 2, 3]), json!("v2"));
}

#[test]
fn assertion_failure_carries_negation_state() {
    let mock = Mock::new();
    let err = judge(mock).not().to_have_been_called_times(0).unwrap_err();
    assert_eq!(err.negated(), Some(true));
    assert!(err.to_string().starts_with("[NOT] "));
}

#[test]
fn deferred_reply_is_awaited_by_async_case() {
    let (mut engine, reporter) = engine();
    let service = Mock::new();
    service.set_resolved(json!({"status": "sent"}));

    let s = service.clone();
    engine
        .define_case_async("awaits the mock", move || async move {
            let reply = s.invoke(args!["hello"]);
            judge(reply.is_pending()).to_be(true)?;
            judge(reply.await).to_equal(json!({"status": "sent"}))
        })
        .unwrap();

    assert_eq!(reporter.passed(), vec!["awaits the mock"]);
    assert_eq!(service.call_count(), 1);
}

#[test]
fn purchase_story() {
    let (mut engine, reporter) = engine();

    engine
        .intend("user purchase journey", |e| {
            let cart = stand_in();
            let payment_gateway = stand_in();
            let notifications = stand_in();

            let (c, g) = (cart.clone(), payment_gateway.clone());
            e.before(move || {
                c.responds_with(150.0);
                g.responds_with(true);
                Ok(())
            });

            let (c, g, n) = (
                cart.clone(),
                payment_gateway.clone(),
                notifications.clone(),
            );
            e.detail("customer completes the purchase", move || {
                let total = c.call(args![]);
                let approved = g.call(args![total.clone()]);
                if approved == json!(true) {
                    n.call(args!["purchase approved"]);
                }
                to(c).was_called()?;
                to(g).received(args![total])?;
                to(n).received(args!["purchase approved"])
            })?;

            let (g, n) = (payment_gateway.clone(), notifications.clone());
            e.detail("payment is declined", move || {
                g.responds_with(false);
                let approved = g.call(args![100]);
                to(approved).be(json!(false))?;
                to(n).called_times(1)
            })
        })
        .unwrap();

    engine
        .intend("member onboarding", |e| {
            let database = stand_in();
            e.detail("saves a default profile", move || {
                let user = json!({"name": "Alice", "email": "alice@wonder.land"});
                database.call(args![user.clone()]);
                to(database).received(args![user])
            })
        })
        .unwrap();

    assert_eq!(
        reporter.passed(),
        vec![
            "customer completes the purchase",
            "payment is declined",
            "saves a default profile"
        ]
    );
    assert!(engine.finish().is_success());
}

proptest! {
    #[test]
    fn negation_is_the_complement_of_to_be(x in -5i32..5, y in -5i32..5) {
        let plain = judge(x).to_be(y).is_ok();
        let negated = judge(x).not().to_be(y).is_ok();
        prop_assert_ne!(plain, negated);
    }

    #[test]
    fn negation_is_the_complement_of_call_count(calls in 0usize..6, expected in 0usize..6) {
        let mock = Mock::new();
        for _ in 0..calls {
            mock.call(args![]);
        }
        let plain = judge(mock.clone()).to_have_been_called_times(expected).is_ok();
        let negated = judge(mock).not().to_have_been_called_times(expected).is_ok();
        prop_assert_ne!(plain, negated);
        prop_assert_eq!(plain, calls == expected);
    }
}
