//! Region/shop state machine: caches, reroll budget, purchases, undo.

pub mod logic;
pub mod types;

pub use types::*;
