//! Annealing driver loop.

use super::annealer::Annealer;
use super::config::AnnealConfig;
use crate::instance::Instance;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use u_numflow::random::create_rng;

/// Why the driver loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// A perfectly balanced partition was found.
    Balanced,
    /// The cancellation flag was raised.
    Cancelled,
    /// `max_steps` was reached.
    StepLimit,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// Item weights, largest first. `best_assignment` is indexed alike.
    pub items: Vec<u64>,

    pub group_count: usize,

    /// Group of each item in the best partition found.
    pub best_assignment: Vec<usize>,

    /// Spread of the best partition.
    pub best_energy: u64,

    /// Step at which the best partition was found.
    pub best_step: usize,

    /// Total number of steps executed.
    pub steps: usize,

    /// Temperature of the last step.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    pub stop_reason: StopReason,

    /// Seed the run used, drawn at random when the config had none.
    pub seed: u64,

    /// Best energy sampled every `report_interval` steps.
    pub energy_history: Vec<u64>,
}

impl AnnealResult {
    pub fn cancelled(&self) -> bool {
        self.stop_reason == StopReason::Cancelled
    }
}

/// Executes the annealing loop until balance, cancellation or step budget.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs the annealer.
    ///
    /// Without a step budget the loop only ends on a perfect partition; use
    /// [`run_with_cancel`](Self::run_with_cancel) for instances that may
    /// have none.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_numpart::anneal::{AnnealConfig, AnnealRunner, StopReason};
    /// use u_numpart::Instance;
    ///
    /// // Snake seeding gives {8, 5, 4} and {7, 6, 2}: spread 2.
    /// let instance = Instance::new(2, vec![8, 7, 6, 5, 4, 2]).unwrap();
    /// let config = AnnealConfig::default()
    ///     .with_initial_temperature(10.0)
    ///     .with_max_steps(50_000)
    ///     .with_seed(42);
    ///
    /// let result = AnnealRunner::run(instance, &config);
    /// assert!(result.best_energy <= 2);
    /// if result.stop_reason == StopReason::Balanced {
    ///     assert_eq!(result.best_energy, 0);
    /// }
    /// ```
    pub fn run(instance: Instance, config: &AnnealConfig) -> AnnealResult {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs the annealer with an optional cancellation token.
    ///
    /// The flag is checked between steps; a step in progress always
    /// completes.
    pub fn run_with_cancel(
        instance: Instance,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AnnealResult {
        config.validate().expect("invalid AnnealConfig");

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        debug!("annealing with seed {seed}, config {config:?}");

        let mut annealer = Annealer::with_config(instance, config);
        annealer.initialize();

        let mut energy_history = vec![annealer.best_energy()];

        let stop_reason = loop {
            if annealer.done() {
                break StopReason::Balanced;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break StopReason::Cancelled;
                }
            }
            if config.max_steps > 0 && annealer.current_step() >= config.max_steps {
                break StopReason::StepLimit;
            }

            annealer.step(&mut rng);

            let step = annealer.current_step();
            if config.report_interval > 0 && step.is_multiple_of(config.report_interval) {
                info!(
                    "step {step}: energy {}, best {}, temperature {:.3}",
                    annealer.current_energy(),
                    annealer.best_energy(),
                    annealer.temperature()
                );
                energy_history.push(annealer.best_energy());
            }
        };

        if energy_history.last() != Some(&annealer.best_energy()) {
            energy_history.push(annealer.best_energy());
        }

        info!(
            "stopped after {} steps ({stop_reason:?}), best energy {} at step {}",
            annealer.current_step(),
            annealer.best_energy(),
            annealer.best_step()
        );

        AnnealResult {
            items: annealer.items().to_vec(),
            group_count: annealer.group_count(),
            best_assignment: annealer.best_assignment().to_vec(),
            best_energy: annealer.best_energy(),
            best_step: annealer.best_step(),
            steps: annealer.current_step(),
            final_temperature: annealer.temperature(),
            accepted_moves: annealer.accepted_moves(),
            improving_moves: annealer.improving_moves(),
            stop_reason,
            seed,
            energy_history,
        }
    }
}
