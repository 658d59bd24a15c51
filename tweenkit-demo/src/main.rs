use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::{bail, Result};
use tokio::task::LocalSet;
use tweenkit::prelude::*;

mod scenarios;
mod stage;

use scenarios::{Scenario, SharedEngine};
use stage::Stage;

/// Replays the demo screen's buttons headlessly, printing the view models
/// after each one. Pass scenario names to run a subset.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tweenkit::init_logging();

    let mut selected = Vec::new();
    for name in std::env::args().skip(1) {
        match Scenario::from_name(&name) {
            Some(scenario) => selected.push(scenario),
            None => bail!(
                "unknown scenario {name:?}; expected one of: {}",
                Scenario::ALL.map(|s| s.name()).join(", ")
            ),
        }
    }
    if selected.is_empty() {
        selected = Scenario::ALL.to_vec();
    }

    // the engine is !Send: keep every task on this thread
    LocalSet::new().run_until(run(selected)).await
}

async fn run(scenarios: Vec<Scenario>) -> Result<()> {
    let engine: SharedEngine = Rc::new(RefCell::new(TweenEngine::with_profile(
        EngineProfile::Balanced,
    )));
    let stage = Stage::new()?;

    let frame_loop = tokio::task::spawn_local(drive(engine.clone()));

    for scenario in scenarios {
        log::info!("> {}", scenario.name());
        scenario.run(&engine, &stage).await?;
        println!("{}:\n{}", scenario.name(), stage);
    }

    frame_loop.abort();
    log::info!("{:?}", engine.borrow());
    Ok(())
}

/// Host frame loop: one `update` per target frame interval.
async fn drive(engine: SharedEngine) {
    let frame_ms = engine.borrow().options().frame.target_frame_duration_ms();
    let mut interval = tokio::time::interval(Duration::from_secs_f64(frame_ms / 1000.0));
    loop {
        interval.tick().await;
        engine.borrow_mut().update();
    }
}
