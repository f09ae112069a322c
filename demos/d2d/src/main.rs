//! d2d: one base station, two terminals, one on/off flow.
//!
//! Both terminals attach to the cell at t=0 and receive a best-effort
//! default bearer.  From t=1 to t=10 the second terminal sends one 512-byte
//! packet per second to the first.  After the run every device's PHY cache
//! is printed.
//!
//! ```text
//! cargo run -p d2d                      # built-in scenario
//! cargo run -p d2d -- my-scenario.toml  # scenario file
//! RUST_LOG=debug cargo run -p d2d       # per-transition / per-packet logs
//! ```

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ran_phy::Direction;
use ran_sim::{ScenarioConfig, TracingObserver};

// ── Scenario ──────────────────────────────────────────────────────────────────

const SCENARIO_TOML: &str = r#"
seed            = 1
base_stations   = 1
terminals       = 2
discovery_delay = 0.010
attach_delay    = 0.015
stop_time       = 10.0
default_bearer  = "best-effort"

[[flows]]
source      = 1
dest        = 0
start       = 1.0
stop        = 10.0
on          = { constant = 1.0 }
off         = { constant = 0.0 }
packet_size = 512
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => ScenarioConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => ScenarioConfig::from_toml_str(SCENARIO_TOML).context("parsing built-in scenario")?,
    };
    info!(
        base_stations = scenario.base_stations,
        terminals = scenario.terminals,
        flows = scenario.flows.len(),
        seed = scenario.seed,
        "scenario loaded"
    );

    let mut sim = scenario.build()?;

    println!("Terminal link addresses:");
    for (i, terminal) in sim.terminals().into_iter().enumerate() {
        let device = sim.world.topology.device(terminal)?;
        println!("  T{}  {}  {}", i + 1, device.id, device.address);
    }

    let started = Instant::now();
    let mut observer = TracingObserver::new();
    let stats = sim.run(&mut observer)?;
    let wall = started.elapsed();

    println!();
    println!("PHY caches:");
    for device in sim.world.topology.devices() {
        println!("[{}] {}", device.role, sim.dump(device.id));
    }

    println!();
    println!("Summary:");
    println!("  Events executed : {}", stats.executed);
    println!("  Final time      : {}", stats.last_time);
    for terminal in sim.terminals() {
        println!(
            "  {:<16}: {} tx / {} rx, state {}",
            terminal.to_string(),
            sim.world.phy.count(terminal, Direction::Tx),
            sim.world.phy.count(terminal, Direction::Rx),
            sim.attach_state(terminal),
        );
    }
    for flow in sim.world.traffic.all_stats() {
        println!(
            "  {:<16}: {} -> {}, {} sent, {}",
            flow.flow.to_string(),
            flow.source,
            flow.dest,
            flow.sent,
            flow.state,
        );
    }
    println!("  Wall time       : {:.3} ms", wall.as_secs_f64() * 1e3);

    let summary = sim.destroy();
    info!(packets = summary.packets_sent, dropped = summary.events_dropped, "done");
    Ok(())
}
