//! Simulated vital-sign drift for the animal records in the store.
//!
//! [`perturb::perturb`] computes one bounded random step for a single
//! record; [`simulator::Simulator`] applies a step to every non-stable
//! record once per tick and reports per-record outcomes.

pub mod perturb;
pub mod simulator;

#[cfg(test)]
mod tests;

pub use perturb::{perturb, PerturbMode, SimulationParams, VitalBounds};
pub use simulator::{choose_stable_ids, Simulator, TickFailure, TickReport};
