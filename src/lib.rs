//! Tiershop - randomized per-region creature shops.
//!
//! The engine builds tier-quota shops from a catalog, supports rerolls,
//! purchases and undo, and keeps per-region shop caches in sync.

pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod random;
pub mod session;
pub mod shop;
pub mod state;

pub use catalog::{CatalogLoader, FileCatalogLoader, StaticCatalog};
pub use config::ShopConfig;
pub use error::{Result, ShopError};
pub use persistence::{FileStore, MemoryStore, ShopStore};
pub use random::{RandomSource, RngSource};
pub use session::ShopSession;
pub use shop::{Item, Shop, Slot};
pub use state::{BuyOutcome, RerollOutcome, ShopState};
