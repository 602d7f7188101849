//! Builds one region's shop from the catalog, config and purchase history.

use super::planner::{fit_to_size, plan_tier_counts};
use super::pool::{eligible_pool, known_tiers, PoolQuery};
use super::quota::{normalize_quota, TierCounts};
use super::sampler::sample_without_replacement;
use super::tiers;
use super::types::{Item, Shop, Slot};
use crate::config::{QuotaMode, ShopConfig};
use crate::random::RandomSource;
use log::debug;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Picks made for one tier bucket.
struct TierDraw {
    picked: Vec<Slot>,
    /// Placeholders produced by duplicate handling, used only as filler.
    spare: Vec<Slot>,
}

/// Builds a shop of exactly `config.shop_size` slots, sorted best tier first.
pub fn build_shop<R: RandomSource + ?Sized>(
    catalog: &[Item],
    region: &str,
    config: &ShopConfig,
    purchased: &HashSet<u32>,
    rng: &mut R,
) -> Shop {
    let plan = tier_plan(config, rng);
    let mut order: Vec<String> = plan.keys().cloned().collect();
    tiers::sort_desc(&mut order);
    let known = if config.tier_fallback {
        known_tiers(catalog, region, config)
    } else {
        Vec::new()
    };

    let mut shop: Shop = Vec::with_capacity(config.shop_size);
    for tier in order {
        let need = plan.get(&tier).copied().unwrap_or(0) as usize;
        if need == 0 {
            continue;
        }
        let slots = fill_tier(catalog, region, &tier, need, config, purchased, &shop, &known, rng);
        shop.extend(slots);
    }

    sort_shop(&mut shop);
    debug!("built {} slot shop for {}", shop.len(), region);
    shop
}

fn tier_plan<R: RandomSource + ?Sized>(config: &ShopConfig, rng: &mut R) -> TierCounts {
    let mut plan = match config.quota_mode {
        QuotaMode::Minimums => {
            plan_tier_counts(config.shop_size, &config.minimums(), &config.weights(), rng)
        }
        QuotaMode::Strict => normalize_quota(&config.quota, config.shop_size),
    };
    fit_to_size(&mut plan, config.shop_size);
    plan
}

/// Exactly `need` slots for `tier`: its own items first, then placeholders.
/// With fallback on, a tier with no eligible entry at all borrows from
/// substitute tiers before any placeholder is made. A tier that is merely
/// short keeps its own placeholders.
#[allow(clippy::too_many_arguments)]
fn fill_tier<R: RandomSource + ?Sized>(
    catalog: &[Item],
    region: &str,
    tier: &str,
    need: usize,
    config: &ShopConfig,
    purchased: &HashSet<u32>,
    placed: &[Slot],
    known: &[String],
    rng: &mut R,
) -> Vec<Slot> {
    let mut used: HashSet<u32> = placed.iter().filter_map(Slot::item_id).collect();
    let draw = draw_tier(catalog, region, tier, need, config, purchased, &used, rng);
    let mut slots = draw.picked;
    let spare = draw.spare;

    let pool_empty = slots.is_empty() && spare.is_empty();
    if config.tier_fallback && pool_empty {
        for substitute in tiers::substitute_tiers(tier, known, config.fallback_order) {
            if slots.len() >= need {
                break;
            }
            used.extend(slots.iter().filter_map(Slot::item_id));
            let extra = draw_tier(
                catalog,
                region,
                &substitute,
                need - slots.len(),
                config,
                purchased,
                &used,
                rng,
            );
            if !extra.picked.is_empty() {
                debug!("tier {} short in {}, borrowed {} from {}", tier, region, extra.picked.len(), substitute);
            }
            slots.extend(extra.picked);
        }
    }

    if slots.len() < need && !spare.is_empty() {
        let filler = sample_without_replacement(&spare, need - slots.len(), Slot::same_identity, &[], rng);
        slots.extend(filler);
    }
    while slots.len() < need {
        slots.push(Slot::empty(tier, rng.unique_tag()));
    }
    slots
}

/// Real picks from one tier's pool, applying the duplicate policy.
#[allow(clippy::too_many_arguments)]
fn draw_tier<R: RandomSource + ?Sized>(
    catalog: &[Item],
    region: &str,
    tier: &str,
    need: usize,
    config: &ShopConfig,
    purchased: &HashSet<u32>,
    used: &HashSet<u32>,
    rng: &mut R,
) -> TierDraw {
    let query = PoolQuery::new(region, tier).purchased(purchased, config);
    let mut pool = eligible_pool(catalog, &query);

    if config.allow_duplicates {
        if !pool.is_empty() {
            while pool.len() < need {
                let clone = pool[rng.index(pool.len())].clone();
                pool.push(clone);
            }
        }
        let reals: Vec<Slot> = pool.into_iter().map(Slot::real).collect();
        // Every pool entry is its own draw; clones must not collapse.
        let picked = sample_without_replacement(&reals, need, |_, _| false, &[], rng);
        return TierDraw {
            picked,
            spare: Vec::new(),
        };
    }

    let mut seen = used.clone();
    let mut reals = Vec::new();
    let mut spare = Vec::new();
    for item in pool {
        if seen.insert(item.id) {
            reals.push(Slot::real(item));
        } else {
            spare.push(Slot::empty(tier, rng.unique_tag()));
        }
    }
    let picked = sample_without_replacement(&reals, need, Slot::same_identity, &[], rng);
    TierDraw { picked, spare }
}

/// Best tier first; real before placeholder; real slots by name.
pub fn sort_shop(shop: &mut Shop) {
    shop.sort_by(compare_slots);
}

fn compare_slots(a: &Slot, b: &Slot) -> Ordering {
    tiers::compare_desc(a.tier(), b.tier()).then_with(|| match (a, b) {
        (Slot::Real { item: x, .. }, Slot::Real { item: y, .. }) => x
            .name
            .to_lowercase()
            .cmp(&y.name.to_lowercase())
            .then(x.id.cmp(&y.id)),
        (Slot::Real { .. }, Slot::Empty { .. }) => Ordering::Less,
        (Slot::Empty { .. }, Slot::Real { .. }) => Ordering::Greater,
        (Slot::Empty { .. }, Slot::Empty { .. }) => Ordering::Equal,
    })
}
