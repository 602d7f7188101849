//! Shop generation engine: tier ordering, quotas, sampling, builds and
//! rerolls. Pure functions; randomness comes in through [`RandomSource`].
//!
//! [`RandomSource`]: crate::random::RandomSource

pub mod builder;
pub mod planner;
pub mod pool;
pub mod quota;
pub mod reroll;
pub mod sampler;
pub mod tiers;
pub mod types;

pub use builder::{build_shop, sort_shop};
pub use reroll::find_replacement;
pub use types::*;
