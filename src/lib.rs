//! Multi-way number partitioning by simulated annealing.
//!
//! Given a multiset of non-negative integer weights and a group count `M`,
//! assign every item to one of `M` groups so that the heaviest and the
//! lightest group differ as little as possible.
//!
//! - [`instance`]: validated instances and the `N M w_1 .. w_N` text format.
//! - [`anneal`]: the annealing engine and its driver loop.
//! - [`report`]: grouping a best assignment for display.
//!
//! # Examples
//!
//! ```
//! use u_numpart::anneal::{AnnealConfig, AnnealRunner};
//! use u_numpart::{Instance, Partition};
//!
//! let instance = Instance::parse("6 3  5 5 4 3 2 2").unwrap();
//! let config = AnnealConfig::default()
//!     .with_initial_temperature(5.0)
//!     .with_max_steps(20_000)
//!     .with_seed(1);
//!
//! let result = AnnealRunner::run(instance, &config);
//! let partition = Partition::from_result(&result);
//! assert_eq!(partition.energy(), result.best_energy);
//! ```

pub mod anneal;
pub mod instance;
pub mod report;

pub use anneal::Annealer;
pub use instance::{Instance, InstanceError};
pub use report::Partition;
