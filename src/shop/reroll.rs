//! Single-slot replacement search.

use super::pool::{eligible_pool, known_tiers, PoolQuery};
use super::tiers;
use super::types::Item;
use crate::config::ShopConfig;
use crate::random::RandomSource;
use std::collections::HashSet;

/// A uniformly random replacement for a slot of `tier`, or `None` when no
/// candidate survives the filters.
///
/// `excluded` holds ids showing elsewhere in the shop (ignored when
/// duplicates are allowed); `forbidden` is the slot's current occupant and is
/// always dropped so a reroll visibly changes something.
#[allow(clippy::too_many_arguments)]
pub fn find_replacement<R: RandomSource + ?Sized>(
    catalog: &[Item],
    region: &str,
    tier: &str,
    excluded: &HashSet<u32>,
    purchased: &HashSet<u32>,
    forbidden: Option<u32>,
    config: &ShopConfig,
    rng: &mut R,
) -> Option<Item> {
    let query = PoolQuery::new(region, tier)
        .purchased(purchased, config)
        .used(excluded, config)
        .excluding(forbidden);

    let mut pool = eligible_pool(catalog, &query);
    if pool.is_empty() && config.tier_fallback {
        let known = known_tiers(catalog, region, config);
        for substitute in tiers::substitute_tiers(tier, &known, config.fallback_order) {
            pool = eligible_pool(catalog, &query.for_tier(&substitute));
            if !pool.is_empty() {
                break;
            }
        }
    }

    if pool.is_empty() {
        return None;
    }
    let pick = rng.index(pool.len());
    Some(pool.swap_remove(pick))
}
