//! Shop configuration: sizes, quotas, weights, regions and policy flags.
//!
//! Read-only to the engine. Loaded from JSON with camelCase keys; every
//! field has a default so partial files work.

use crate::core::constants::{
    DEFAULT_MINIMUM_QUOTA, DEFAULT_REGIONS, DEFAULT_REROLLS_PER_REGION, DEFAULT_SHOP_SIZE,
    DEFAULT_TIER_WEIGHTS, DEFAULT_UNDO_LIMIT,
};
use crate::error::Result;
use crate::shop::quota::{self, TierCounts, TierWeights};
use crate::shop::tiers::FallbackOrder;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::Path;

/// How per-tier counts are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuotaMode {
    /// Minimums as a floor, the rest filled by weighted draws.
    #[default]
    Minimums,
    /// Legacy: quota scaled to exactly the shop size, no weighted fill.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopConfig {
    pub shop_size: usize,
    pub quota: BTreeMap<String, f64>,
    pub tier_weights: BTreeMap<String, f64>,
    pub regions: Vec<String>,
    pub rerolls_per_region: u32,
    pub reroll_recharge_every_regions: usize,
    pub shop_refresh_every_regions: usize,
    pub reset_rerolls_on_manual_refresh: bool,
    pub allow_duplicates: bool,
    pub include_purchased_in_reroll_pool: bool,
    pub auto_refill_on_purchase: bool,
    pub tier_fallback: bool,
    pub fallback_order: FallbackOrder,
    pub quota_mode: QuotaMode,
    pub starting_money: u64,
    pub undo_limit: usize,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            shop_size: DEFAULT_SHOP_SIZE,
            quota: DEFAULT_MINIMUM_QUOTA
                .iter()
                .map(|(t, v)| (t.to_string(), *v))
                .collect(),
            tier_weights: DEFAULT_TIER_WEIGHTS
                .iter()
                .map(|(t, v)| (t.to_string(), *v))
                .collect(),
            regions: DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect(),
            rerolls_per_region: DEFAULT_REROLLS_PER_REGION,
            reroll_recharge_every_regions: 1,
            shop_refresh_every_regions: 1,
            reset_rerolls_on_manual_refresh: false,
            allow_duplicates: false,
            include_purchased_in_reroll_pool: false,
            auto_refill_on_purchase: false,
            tier_fallback: false,
            fallback_order: FallbackOrder::LowerFirst,
            quota_mode: QuotaMode::Minimums,
            starting_money: 0,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}

impl ShopConfig {
    /// Clamps values the engine cannot work with: at least one region,
    /// intervals and undo depth of at least 1.
    pub fn sanitized(mut self) -> Self {
        self.regions = self
            .regions
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if self.regions.is_empty() {
            self.regions = DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect();
        }
        self.reroll_recharge_every_regions = self.reroll_recharge_every_regions.max(1);
        self.shop_refresh_every_regions = self.shop_refresh_every_regions.max(1);
        self.undo_limit = self.undo_limit.max(1);
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: ShopConfig = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    /// Missing or malformed files fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("config {:?} unusable, using defaults: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn minimums(&self) -> TierCounts {
        quota::normalize_minimums(&self.quota)
    }

    pub fn weights(&self) -> TierWeights {
        quota::normalize_weights(&self.tier_weights)
    }

    pub fn region_name(&self, index: usize) -> Option<&str> {
        self.regions.get(index).map(String::as_str)
    }

    /// Regeneration group of a region index.
    pub fn group_of(&self, region_index: usize) -> usize {
        region_index / self.shop_refresh_every_regions.max(1)
    }

    /// Region indices sharing a regeneration group, clipped to the region list.
    pub fn group_members(&self, group: usize) -> Range<usize> {
        let width = self.shop_refresh_every_regions.max(1);
        let start = (group * width).min(self.regions.len());
        let end = (start + width).min(self.regions.len());
        start..end
    }
}
