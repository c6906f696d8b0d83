//! Simulated annealing for multi-way number partitioning.
//!
//! The state is a total assignment of items to groups. A move transfers one
//! item to a random group; the energy is the spread between the heaviest and
//! the lightest group. Worsening moves are accepted by the Metropolis
//! criterion under a hyperbolically decaying temperature, and the best
//! assignment ever seen is kept as the answer.
//!
//! [`Annealer`] is the step-wise core. [`AnnealRunner`] drives it until a
//! perfect partition, a step budget, or an external cancellation flag.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Johnson, Aragon, McGeoch & Schevon (1991), "Optimization by Simulated
//!   Annealing: An Experimental Evaluation; Part II, Graph Coloring and
//!   Number Partitioning"

mod annealer;
mod config;
mod runner;

pub use annealer::{spread, Annealer, UNEVALUATED};
pub use config::{AnnealConfig, MovePool};
pub use runner::{AnnealResult, AnnealRunner, StopReason};
