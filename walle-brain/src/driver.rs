//! Tick driver: repeats machine steps and applies the fault policy

use crate::machine::BehaviorStateMachine;
use crate::state::BehaviorState;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use walle_core::{RestartPolicy, WalleConfig};

/// What happened during one driver tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick completed; the machine is now in this state
    Advanced(BehaviorState),
    /// A camera failed; the tick was aborted and the restart policy applied
    SensorFault,
    /// A host signal was missing or unreadable; the state is retried next tick
    SignalFault,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriverStats {
    pub ticks: u64,
    pub transitions: u64,
    pub sensor_faults: u64,
    pub signal_faults: u64,
}

pub struct Driver {
    machine: BehaviorStateMachine,
    restart_policy: RestartPolicy,
    startup_delay: Duration,
    max_ticks: Option<u64>,
    stats: DriverStats,
}

impl Driver {
    pub fn new(config: &WalleConfig, machine: BehaviorStateMachine) -> Self {
        Self {
            machine,
            restart_policy: config.restart_policy,
            startup_delay: Duration::from_millis(config.startup_delay_ms),
            max_ticks: config.max_ticks,
            stats: DriverStats::default(),
        }
    }

    pub fn machine(&self) -> &BehaviorStateMachine {
        &self.machine
    }

    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    /// Stop the motors. Call this after abandoning a [`Driver::run`] future,
    /// which may have been dropped mid-maneuver.
    pub fn halt(&mut self) {
        info!("Halting in {}", self.machine.current());
        self.machine.halt();
    }

    /// Run one machine step and handle its failure, if any
    pub async fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;
        let before = self.machine.current();

        match self.machine.step().await {
            Ok(next) => {
                if next != before {
                    self.stats.transitions += 1;
                }
                TickOutcome::Advanced(next)
            }
            Err(e) if e.is_sensor_fault() => {
                self.stats.sensor_faults += 1;
                error!("Tick aborted in {}: {}", before, e);
                self.machine.halt();
                if self.restart_policy == RestartPolicy::ResetToPatrol {
                    self.machine.reset();
                }
                TickOutcome::SensorFault
            }
            Err(e) => {
                self.stats.signal_faults += 1;
                warn!("Decision cycle stopped in {}: {}", before, e);
                TickOutcome::SignalFault
            }
        }
    }

    /// Wait out the startup delay, then tick until `max_ticks` is reached
    /// (forever when unset)
    pub async fn run(&mut self) -> DriverStats {
        if !self.startup_delay.is_zero() {
            sleep(self.startup_delay).await;
        }

        info!("Controller started in {}", self.machine.current());
        while self.max_ticks.map_or(true, |max| self.stats.ticks < max) {
            self.tick().await;
        }

        self.machine.halt();
        info!(
            "Controller stopped after {} ticks ({} transitions, {} sensor faults, {} signal faults)",
            self.stats.ticks,
            self.stats.transitions,
            self.stats.sensor_faults,
            self.stats.signal_faults
        );
        self.stats.clone()
    }
}
