//! Catalog and config loading.

use crate::config::ShopConfig;
use crate::core::constants::UNKNOWN_TIER;
use crate::error::Result;
use crate::shop::Item;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Supplies the item list and active configuration.
pub trait CatalogLoader {
    fn load(&self) -> Result<(Vec<Item>, ShopConfig)>;
}

/// Cleans loaded entries: trimmed names and regions, uppercase tiers, no id 0,
/// first occurrence wins for repeated ids.
pub fn normalize_catalog(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| item.id != 0 && seen.insert(item.id))
        .map(|mut item| {
            item.name = item.name.trim().to_string();
            item.tier = item.tier.trim().to_ascii_uppercase();
            if item.tier.is_empty() {
                item.tier = UNKNOWN_TIER.to_string();
            }
            item.regions = item
                .regions
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
            item
        })
        .collect()
}

/// Default data directory, `~/.tiershop`.
pub fn data_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home_dir.join(".tiershop"))
}

/// Reads a JSON item array and a JSON config. A missing or malformed config
/// falls back to defaults; a missing catalog is an error.
pub struct FileCatalogLoader {
    pub catalog_path: PathBuf,
    pub config_path: PathBuf,
}

impl FileCatalogLoader {
    pub fn new(catalog_path: PathBuf, config_path: PathBuf) -> Self {
        Self {
            catalog_path,
            config_path,
        }
    }

    /// `catalog.json` and `config.json` under [`data_dir`].
    pub fn from_data_dir() -> io::Result<Self> {
        let dir = data_dir()?;
        Ok(Self::new(dir.join("catalog.json"), dir.join("config.json")))
    }
}

impl CatalogLoader for FileCatalogLoader {
    fn load(&self) -> Result<(Vec<Item>, ShopConfig)> {
        let json = fs::read_to_string(&self.catalog_path)?;
        let items: Vec<Item> = serde_json::from_str(&json)?;
        let config = ShopConfig::load_or_default(&self.config_path);
        Ok((normalize_catalog(items), config))
    }
}

/// In-memory catalog, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    pub items: Vec<Item>,
    pub config: ShopConfig,
}

impl StaticCatalog {
    pub fn new(items: Vec<Item>, config: ShopConfig) -> Self {
        Self { items, config }
    }
}

impl CatalogLoader for StaticCatalog {
    fn load(&self) -> Result<(Vec<Item>, ShopConfig)> {
        Ok((normalize_catalog(self.items.clone()), self.config.clone().sanitized()))
    }
}
