//! The stateful partitioning annealer.
//!
//! # Algorithm
//!
//! 1. Seed: deal the items (largest first) into groups in snake order
//!    `0, 1, .., M-1, M-1, .., 1, 0, 0, 1, ..`
//! 2. Each step:
//!    a. Compute `T = T0 / (1 + k * step)`
//!    b. Move one random item to a random group, updating two group sums
//!    c. Energy is the spread `max(sum) - min(sum)`
//!    d. Metropolis: keep the move if the spread did not grow, otherwise keep
//!    it with probability `exp(-delta / T)`, else undo it
//!    e. Snapshot the assignment if the spread is a new strict minimum
//!
//! The annealer has no notion of cancellation or iteration limits. The
//! caller decides when to stop, usually with [`AnnealRunner`](super::AnnealRunner).

use super::config::{temperature, AnnealConfig, MovePool};
use crate::instance::Instance;
use log::{debug, trace};
use rand::Rng;

/// Energy of a state that has not been evaluated yet.
pub const UNEVALUATED: u64 = u64::MAX;

/// Spread of the group sums: `max - min`, in one pass.
///
/// # Examples
///
/// ```
/// use u_numpart::anneal::spread;
///
/// assert_eq!(spread(&[7, 3, 5]), 4);
/// assert_eq!(spread(&[9]), 0);
/// ```
pub fn spread(sums: &[u64]) -> u64 {
    let (lo, hi) = sums
        .iter()
        .fold((u64::MAX, u64::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    hi.saturating_sub(lo)
}

/// A single-item transfer from one group to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Move {
    pub item: usize,
    pub from: usize,
    pub to: usize,
}

impl Move {
    fn reversed(self) -> Self {
        Move {
            item: self.item,
            from: self.to,
            to: self.from,
        }
    }
}

/// Simulated-annealing state for one partitioning instance.
///
/// All mutation goes through [`initialize`](Self::initialize),
/// [`set_initial_temperature`](Self::set_initial_temperature) and
/// [`step`](Self::step). Everything else is a read-only query.
///
/// # Examples
///
/// ```
/// use u_numpart::{Annealer, Instance};
///
/// let instance = Instance::new(2, vec![1, 2, 3, 4]).unwrap();
/// let mut annealer = Annealer::new(instance);
/// annealer.initialize();
///
/// // 4 and 1 go to group 0, 3 and 2 to group 1.
/// assert_eq!(annealer.group_sums(), &[5, 5]);
/// assert!(annealer.done());
/// assert_eq!(annealer.best_energy(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Annealer {
    items: Vec<u64>,
    group_count: usize,

    assignment: Vec<usize>,
    group_sums: Vec<u64>,
    energy: u64,

    best_assignment: Vec<usize>,
    best_energy: u64,
    best_step: usize,

    step: usize,
    initial_temperature: f64,
    decay: f64,
    temperature: f64,
    move_pool: MovePool,
    initialized: bool,

    accepted_moves: usize,
    improving_moves: usize,
}

impl Annealer {
    /// Loads an instance with default temperature parameters.
    ///
    /// Until [`initialize`](Self::initialize) runs, every item sits in
    /// group 0 and both energies hold the [`UNEVALUATED`] sentinel.
    pub fn new(instance: Instance) -> Self {
        Self::with_config(instance, &AnnealConfig::default())
    }

    /// Loads an instance, taking `T0`, `k` and the move pool from `config`.
    ///
    /// The config is not validated here; see [`AnnealConfig::validate`].
    pub fn with_config(instance: Instance, config: &AnnealConfig) -> Self {
        let group_count = instance.group_count();
        let total = instance.total_weight();
        let items = instance.items().to_vec();
        let n = items.len();

        let mut group_sums = vec![0; group_count];
        group_sums[0] = total;

        Self {
            items,
            group_count,
            assignment: vec![0; n],
            group_sums,
            energy: UNEVALUATED,
            best_assignment: vec![0; n],
            best_energy: UNEVALUATED,
            best_step: 0,
            step: 0,
            initial_temperature: config.initial_temperature,
            decay: config.decay,
            temperature: config.initial_temperature,
            move_pool: config.move_pool,
            initialized: false,
            accepted_moves: 0,
            improving_moves: 0,
        }
    }

    /// Loads raw weights.
    ///
    /// # Panics
    ///
    /// Panics if `group_count` is zero or exceeds the number of weights.
    /// Use [`Instance::new`] to handle these cases as errors.
    pub fn from_weights(group_count: usize, weights: Vec<u64>) -> Self {
        match Instance::new(group_count, weights) {
            Ok(instance) => Self::new(instance),
            Err(err) => panic!("invalid partitioning instance: {err}"),
        }
    }

    /// Sets `T0`. Takes effect from the next step.
    ///
    /// # Panics
    ///
    /// Panics if `t0` is not a positive finite number.
    pub fn set_initial_temperature(&mut self, t0: f64) {
        assert!(
            t0.is_finite() && t0 > 0.0,
            "initial temperature must be positive and finite, got {t0}"
        );
        self.initial_temperature = t0;
        self.temperature = temperature(t0, self.decay, self.step);
    }

    /// Seeds the snake assignment and resets counters and best tracking.
    pub fn initialize(&mut self) {
        let m = self.group_count;

        self.group_sums.fill(0);
        for (i, &weight) in self.items.iter().enumerate() {
            let group = snake_group(i, m);
            self.assignment[i] = group;
            self.group_sums[group] += weight;
        }

        self.energy = spread(&self.group_sums);
        self.best_energy = self.energy;
        self.best_assignment.copy_from_slice(&self.assignment);
        self.best_step = 0;

        self.step = 0;
        self.temperature = self.initial_temperature;
        self.accepted_moves = 0;
        self.improving_moves = 0;
        self.initialized = true;

        debug!(
            "seeded {} items into {} groups, energy {}",
            self.items.len(),
            m,
            self.energy
        );
    }

    /// Performs one annealing step.
    ///
    /// Initializes first if [`initialize`](Self::initialize) was never
    /// called. A step cannot fail.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        if !self.initialized {
            self.initialize();
        }

        self.temperature = temperature(self.initial_temperature, self.decay, self.step);

        let mv = self.propose(rng);
        let before = self.energy;
        self.apply(mv);
        let after = spread(&self.group_sums);

        // Metropolis acceptance criterion
        let accept = if after <= before {
            true
        } else {
            let delta = (after - before) as f64;
            let probability = (-delta / self.temperature).exp();
            rng.random_range(0.0..1.0) < probability
        };

        if accept {
            self.energy = after;
            self.accepted_moves += 1;
            if after < before {
                self.improving_moves += 1;
            }
        } else {
            self.undo(mv);
        }

        self.step += 1;

        if self.energy < self.best_energy {
            self.best_energy = self.energy;
            self.best_assignment.copy_from_slice(&self.assignment);
            self.best_step = self.step;
            trace!("step {}: new best energy {}", self.step, self.energy);
        }
    }

    /// True iff the current partition is perfectly balanced.
    pub fn done(&self) -> bool {
        self.energy == 0
    }

    /// Number of completed steps since the last initialization.
    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn current_energy(&self) -> u64 {
        self.energy
    }

    pub fn best_energy(&self) -> u64 {
        self.best_energy
    }

    /// Best assignment seen so far, indexed like [`items`](Self::items).
    pub fn best_assignment(&self) -> &[usize] {
        &self.best_assignment
    }

    /// Step count at which the best assignment was recorded.
    pub fn best_step(&self) -> usize {
        self.best_step
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Item weights, largest first.
    pub fn items(&self) -> &[u64] {
        &self.items
    }

    /// Current group of each item.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    pub fn group_sums(&self) -> &[u64] {
        &self.group_sums
    }

    /// Temperature used by the most recent step.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    /// Accepted moves since initialization, improving ones included.
    pub fn accepted_moves(&self) -> usize {
        self.accepted_moves
    }

    /// Moves that strictly lowered the energy.
    pub fn improving_moves(&self) -> usize {
        self.improving_moves
    }

    /// Draws a random move from the eligible item pool.
    pub(crate) fn propose<R: Rng>(&self, rng: &mut R) -> Move {
        let n = self.items.len();
        let m = self.group_count;
        let first = match self.move_pool {
            MovePool::SkipSeeds if n > m => m,
            _ => 0,
        };
        let item = rng.random_range(first..n);
        let to = rng.random_range(0..m);
        Move {
            item,
            from: self.assignment[item],
            to,
        }
    }

    /// Transfers `mv.item` from `mv.from` to `mv.to`. O(1).
    pub(crate) fn apply(&mut self, mv: Move) {
        debug_assert_eq!(self.assignment[mv.item], mv.from);
        let weight = self.items[mv.item];
        self.group_sums[mv.from] -= weight;
        self.group_sums[mv.to] += weight;
        self.assignment[mv.item] = mv.to;
    }

    pub(crate) fn undo(&mut self, mv: Move) {
        self.apply(mv.reversed());
    }
}

/// Group of the `i`-th item under snake seeding over `m` groups.
fn snake_group(i: usize, m: usize) -> usize {
    let offset = i % m;
    if (i / m) % 2 == 0 {
        offset
    } else {
        m - 1 - offset
    }
}
