//! Annealing configuration and the temperature schedule.

/// Which items the move generator may pick.
///
/// After snake seeding the `M` largest items sit one per group. `SkipSeeds`
/// leaves them in place and only moves the remaining items; `All` lets
/// every item move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovePool {
    /// Items `M..N`. Falls back to all items when `N == M`.
    #[default]
    SkipSeeds,
    /// Items `0..N`.
    All,
}

/// Configuration for the partitioning annealer and its driver loop.
///
/// The temperature follows a hyperbolic decay:
///
/// ```text
/// T(step) = T0 / (1 + k * step)
/// ```
///
/// `T0` must be on the scale of the item weights. Too small and uphill moves
/// are almost never taken; too large and the early search is a random walk.
///
/// # Examples
///
/// ```
/// use u_numpart::anneal::{AnnealConfig, MovePool};
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(500.0)
///     .with_decay(1e-3)
///     .with_move_pool(MovePool::All)
///     .with_max_steps(100_000)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert!((config.temperature_at(1000) - 250.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Starting temperature `T0`.
    pub initial_temperature: f64,

    /// Decay constant `k`. Higher = faster cooling.
    pub decay: f64,

    /// Move candidate policy.
    pub move_pool: MovePool,

    /// Step budget for the driver loop. 0 = no limit.
    pub max_steps: usize,

    /// Progress is logged every this many steps. 0 = never.
    pub report_interval: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 7000.0,
            decay: 1e-4,
            move_pool: MovePool::default(),
            max_steps: 0,
            report_interval: 1000,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_decay(mut self, k: f64) -> Self {
        self.decay = k;
        self
    }

    pub fn with_move_pool(mut self, pool: MovePool) -> Self {
        self.move_pool = pool;
        self
    }

    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }

    pub fn with_report_interval(mut self, n: usize) -> Self {
        self.report_interval = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Temperature at the given step.
    pub fn temperature_at(&self, step: usize) -> f64 {
        temperature(self.initial_temperature, self.decay, step)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            ));
        }
        if !self.decay.is_finite() || self.decay <= 0.0 {
            return Err(format!(
                "decay must be positive and finite, got {}",
                self.decay
            ));
        }
        Ok(())
    }
}

/// Hyperbolic cooling: `t0 / (1 + k * step)`.
pub(crate) fn temperature(t0: f64, k: f64, step: usize) -> f64 {
    t0 / (1.0 + k * step as f64)
}
