/*!
 * Memory Pool Simulator - Headless Runner
 *
 * Loads a JSON array of task descriptions, drives the simulation on a
 * wall-clock tick until every task has finished or timed out, then prints
 * a JSON summary of task states and pool usage.
 *
 * Usage: memsim [scenario.json]
 */

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use mempool_sim::{
    enqueue_all, init_tracing, load_specs, Collector, MemoryManager, Payload, RunSummary,
    SimulationConfig, SimulationManager, TickDriver,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = SimulationConfig::from_env().context("invalid configuration")?;
    info!(
        total_memory = config.total_memory,
        tick_interval_ms = config.tick_interval_ms,
        max_ticks = config.max_ticks,
        "Memory pool simulator starting"
    );

    let specs = match std::env::args().nth(1) {
        Some(path) => load_specs(Path::new(&path))?,
        None => {
            warn!("No scenario file given, running with an empty queue");
            Vec::new()
        }
    };

    let collector = Arc::new(Collector::new());
    let memory = MemoryManager::with_capacity(config.total_memory)?
        .with_collector(Arc::clone(&collector));
    let sim = SimulationManager::new(memory).with_collector(Arc::clone(&collector));

    let enqueued = enqueue_all(&sim, specs)?;

    // Mirror scheduler events into the log
    let mut events = collector.subscribe();
    let event_log = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event.payload {
                Payload::TaskStarted { task } => info!(task = %task, "started"),
                Payload::TaskFinished { task } => info!(task = %task, "finished"),
                Payload::TaskTimedOut { task } => info!(task = %task, "timed out"),
                Payload::TickAdvanced { tick } => debug!(tick, "tick"),
                Payload::MemoryChanged { kind, block, .. } => {
                    debug!(%kind, block = ?block, "memory changed")
                }
            }
        }
    });

    let driver = TickDriver::from_config(sim.clone(), &config).stop_when_idle(true);
    let shutdown = driver.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping after the current tick");
            shutdown.shutdown();
        }
    });

    let outcome = driver.run(config.max_ticks).await;

    let summary = RunSummary::collect(&sim, config, outcome, enqueued.rejected);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    let stream = collector.stats();
    info!(
        produced = stream.events_produced,
        dropped = stream.events_dropped,
        "Simulation complete"
    );
    event_log.abort();

    Ok(())
}
