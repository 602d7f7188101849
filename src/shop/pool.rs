//! The one eligibility filter shared by shop builds and rerolls.

use super::tiers;
use super::types::Item;
use crate::config::ShopConfig;
use std::collections::HashSet;

/// Which catalog entries may fill a slot.
#[derive(Debug, Clone, Copy)]
pub struct PoolQuery<'a> {
    pub region: &'a str,
    pub tier: &'a str,
    /// Ids to drop because they were already bought.
    pub exclude_purchased: Option<&'a HashSet<u32>>,
    /// Ids to drop because they are already showing in the shop.
    pub exclude_used: Option<&'a HashSet<u32>>,
    /// A single id to drop (the occupant being replaced).
    pub exclude_id: Option<u32>,
}

impl<'a> PoolQuery<'a> {
    pub fn new(region: &'a str, tier: &'a str) -> Self {
        Self {
            region,
            tier,
            exclude_purchased: None,
            exclude_used: None,
            exclude_id: None,
        }
    }

    /// Applies the config's purchase policy.
    pub fn purchased(mut self, purchased: &'a HashSet<u32>, config: &ShopConfig) -> Self {
        if !config.include_purchased_in_reroll_pool {
            self.exclude_purchased = Some(purchased);
        }
        self
    }

    /// Applies the config's duplicate policy.
    pub fn used(mut self, used: &'a HashSet<u32>, config: &ShopConfig) -> Self {
        if !config.allow_duplicates {
            self.exclude_used = Some(used);
        }
        self
    }

    pub fn excluding(mut self, id: Option<u32>) -> Self {
        self.exclude_id = id;
        self
    }

    pub fn for_tier(mut self, tier: &'a str) -> Self {
        self.tier = tier;
        self
    }

    fn admits(&self, item: &Item) -> bool {
        item.available_in(self.region)
            && item.is_tier(self.tier)
            && self.exclude_id != Some(item.id)
            && !self.exclude_purchased.is_some_and(|ids| ids.contains(&item.id))
            && !self.exclude_used.is_some_and(|ids| ids.contains(&item.id))
    }
}

/// Catalog entries matching `query`, in catalog order.
pub fn eligible_pool(catalog: &[Item], query: &PoolQuery) -> Vec<Item> {
    catalog
        .iter()
        .filter(|item| query.admits(item))
        .cloned()
        .collect()
}

/// Every tier that could matter in `region`: tiers of the region's items
/// plus tiers named by the config. Best first.
pub fn known_tiers(catalog: &[Item], region: &str, config: &ShopConfig) -> Vec<String> {
    let mut seen: HashSet<String> = catalog
        .iter()
        .filter(|item| item.available_in(region))
        .map(|item| item.tier.to_ascii_uppercase())
        .collect();
    seen.extend(config.minimums().into_keys());
    seen.extend(config.weights().into_keys());

    let mut out: Vec<String> = seen.into_iter().collect();
    tiers::sort_desc(&mut out);
    out
}
