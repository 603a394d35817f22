use crate::state::AppState;
use anyhow::Result;
use farmsense_simulator::{SimulationParams, Simulator, TickReport};
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Drives the simulator on a fixed period and re-evaluates the critical
/// selection after each tick.
pub struct SimulationScheduler {
    state: AppState,
    simulator: Simulator,
    tick_secs: u64,
}

impl SimulationScheduler {
    pub fn new(state: AppState, params: SimulationParams, tick_secs: u64) -> Self {
        let simulator = Simulator::new(state.store.clone(), params);
        Self {
            state,
            simulator,
            tick_secs: tick_secs.max(1),
        }
    }

    pub async fn run(&self) {
        tracing::info!(
            tick_secs = self.tick_secs,
            mode = %self.simulator.params().mode,
            stable_count = self.simulator.params().stable_count,
            "Simulation scheduler started"
        );

        let mut tick = interval(Duration::from_secs(self.tick_secs));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            if let Err(e) = self.run_once().await {
                tracing::error!(error = %e, "Simulation tick failed");
            }
        }
    }

    /// One simulation step followed by a selector evaluation.
    pub async fn run_once(&self) -> Result<TickReport> {
        let report = self.simulator.tick().await?;

        let records = self.state.store.list_animals().await?;
        let critical_id = self.state.evaluate_critical(&records);

        if !report.failures.is_empty() {
            tracing::warn!(
                failed = report.failures.len(),
                updated = report.updated.len(),
                "Simulation tick completed with failures"
            );
        }
        tracing::debug!(
            updated = report.updated.len(),
            stable = report.stable.len(),
            critical_id = critical_id.as_deref().unwrap_or("-"),
            "Simulation tick applied"
        );
        Ok(report)
    }
}
