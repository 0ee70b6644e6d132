// Demos are allowed to use expect/unwrap for simplicity
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Narrative Dialect Demo
//!
//! A purchase journey and an onboarding story written with the narrative
//! vocabulary, reported through the console reporter.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example narrative
//!
//! # Use a TOML config (hook_scope, failure_policy, console, log_filter)
//! cargo run --example narrative -- --config verdict.toml
//!
//! # Verbose engine logs
//! RUST_LOG=debug cargo run --example narrative
//! ```

use verdict::dialect::narrative::{Narrative, NarrativeJudgments, NarrativeMock, stand_in, to, watch};
use verdict::prelude::*;

fn purchase_journey(engine: &mut Engine) -> Result<()> {
    engine.intend("User purchase journey", |e| {
        let cart = stand_in().named("cart");
        let payment_gateway = stand_in().named("payment_gateway");
        let notifications = stand_in().named("notifications");

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
        e.detail("The customer completes the purchase", move || {
            let total = c.call(args![]);
            if g.call(args![total.clone()]) == json!(true) {
                n.call(args!["Purchase approved!"]);
            }

            to(c).was_called()?;
            to(g).received(args![total])?;
            to(n).received(args!["Purchase approved!"])
        })?;

        let (g, n) = (payment_gateway.clone(), notifications.clone());
        e.detail("The system handles a declined payment", move || {
            g.responds_with(false);
            let success = g.call(args![100]);

            to(success).be(json!(false))?;
            // Still one notification from the previous story beat.
            to(n).called_times(1)
        })
    })
}

fn onboarding(engine: &mut Engine) -> Result<()> {
    engine.intend("Onboarding new members", |e| {
        let mut database = Host::new().with_method("save", |_: &[Value]| json!({"id": 1}));
        let save = watch(&mut database, "save");

        e.detail("Creates a default profile on sign-up", move || {
            let new_user = json!({"name": "Alice", "email": "alice@wonder.land"});
            let stored = database.call("save", args![new_user.clone()]);

            to(stored).be(json!({"id": 1}))?;
            to(save).received(args![new_user])
        })
    })
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args.get(i + 1).expect("--config requires a path");
            EngineConfig::load(path).expect("failed to load config")
        }
        None => EngineConfig::default(),
    };

    if let Err(e) = verdict::logging::init(&config) {
        eprintln!("logging disabled: {e}");
    }

    let mut engine = Engine::builder()
        .with_config(config)
        .build()
        .expect("failed to build engine");

    for story in [purchase_journey, onboarding] {
        if let Err(e) = story(&mut engine) {
            eprintln!("Fatal Error: {e}");
            std::process::exit(1);
        }
    }

    let summary = engine.finish();
    println!(
        "\n{} passed, {} failed",
        summary.passed(),
        summary.failed()
    );
    std::process::exit(summary.exit_code());
}
