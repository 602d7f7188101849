//! Error type for the I/O edge of the crate (loading and persistence).
//!
//! The shop engine itself never fails: empty pools, missing funds and
//! exhausted rerolls are modeled as state, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("checksum verification failed")]
    Checksum,

    #[error("invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    Version { expected: u64, found: u64 },
}

pub type Result<T> = std::result::Result<T, ShopError>;
