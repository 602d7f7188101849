//! Save/load of [`ShopState`] behind a small store trait.

use crate::core::constants::SAVE_VERSION_MAGIC;
use crate::error::{Result, ShopError};
use crate::state::ShopState;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::cell::{Cell, RefCell};
use std::fs;
use std::io::{self, ErrorKind, Read, Write};
use std::path::PathBuf;

pub trait ShopStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<ShopState>>;
    fn save(&self, state: &ShopState) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Checksummed binary save file.
///
/// File format:
/// - Version magic (8 bytes)
/// - Data length (4 bytes)
/// - Serialized state (variable length)
/// - SHA256 checksum (32 bytes)
pub struct FileStore {
    save_path: PathBuf,
}

impl FileStore {
    /// Save file in the platform config directory.
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "tiershop").ok_or_else(|| {
            io::Error::new(ErrorKind::NotFound, "Could not determine config directory")
        })?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("state.dat"),
        })
    }

    pub fn with_path(save_path: PathBuf) -> Self {
        Self { save_path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.save_path
    }

    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }
}

impl ShopStore for FileStore {
    fn load(&self) -> Result<Option<ShopState>> {
        let mut file = match fs::File::open(&self.save_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SAVE_VERSION_MAGIC {
            return Err(ShopError::Version {
                expected: SAVE_VERSION_MAGIC,
                found: version,
            });
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        if stored_checksum != hasher.finalize().as_slice() {
            return Err(ShopError::Checksum);
        }

        Ok(Some(bincode::deserialize(&data)?))
    }

    fn save(&self, state: &ShopState) -> Result<()> {
        let data = bincode::serialize(state)?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        if let Some(parent) = self.save_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&self.save_path)?;
        file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.save_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store. `fail_writes` simulates a broken disk.
#[derive(Default)]
pub struct MemoryStore {
    state: RefCell<Option<ShopState>>,
    saves: Cell<usize>,
    pub fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ShopState) -> Self {
        let store = Self::new();
        store.state.replace(Some(state));
        store
    }

    pub fn saved(&self) -> Option<ShopState> {
        self.state.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ShopStore for MemoryStore {
    fn load(&self) -> Result<Option<ShopState>> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &ShopState) -> Result<()> {
        if self.fail_writes.get() {
            return Err(io::Error::new(ErrorKind::PermissionDenied, "write refused").into());
        }
        self.state.replace(Some(state.clone()));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.state.replace(None);
        Ok(())
    }
}
