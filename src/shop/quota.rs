//! Canonical per-tier minimums and weights from raw user configuration.

use super::tiers;
use crate::core::constants::DEFAULT_TIER_WEIGHTS;
use std::collections::BTreeMap;

/// Slot count per tier.
pub type TierCounts = BTreeMap<String, u32>;
/// Relative probability mass per tier.
pub type TierWeights = BTreeMap<String, f64>;

fn canonical_tier(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

fn floor_count(raw: f64) -> u32 {
    if raw.is_finite() && raw > 0.0 {
        raw.floor().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

pub fn default_weights() -> TierWeights {
    DEFAULT_TIER_WEIGHTS
        .iter()
        .map(|(tier, weight)| (tier.to_string(), *weight))
        .collect()
}

/// Minimum quota as a floor: uppercased keys, floored values, zero and
/// negative entries dropped. Not rescaled against the shop size.
pub fn normalize_minimums(raw: &BTreeMap<String, f64>) -> TierCounts {
    let mut out = TierCounts::new();
    for (tier, value) in raw {
        let count = floor_count(*value);
        if count == 0 {
            continue;
        }
        *out.entry(canonical_tier(tier)).or_insert(0) += count;
    }
    out
}

/// Built-in weights overlaid with the caller's. A zero total reverts to the
/// built-in table so the weighted draw always has mass.
pub fn normalize_weights(raw: &BTreeMap<String, f64>) -> TierWeights {
    let mut out = default_weights();
    for (tier, value) in raw {
        let weight = if value.is_finite() { value.max(0.0) } else { 0.0 };
        out.insert(canonical_tier(tier), weight);
    }
    if out.values().sum::<f64>() == 0.0 {
        return default_weights();
    }
    out
}

/// Strict quota: counts that sum to exactly `shop_size`. Excess is trimmed
/// from the lowest-priority tiers first; a deficit lands on the
/// lowest-priority tier present.
pub fn normalize_quota(raw: &BTreeMap<String, f64>, shop_size: usize) -> TierCounts {
    let mut counts = normalize_minimums(raw);
    if shop_size == 0 {
        return TierCounts::new();
    }
    let target = shop_size as u64;
    let total: u64 = counts.values().map(|&c| c as u64).sum();

    if total > target {
        trim_lowest_first(&mut counts, total - target);
    } else if total < target {
        let deficit = (target - total) as u32;
        let lowest = lowest_tier(&counts).unwrap_or_else(|| {
            let mut fallback: Vec<String> = default_weights().into_keys().collect();
            tiers::sort_asc(&mut fallback);
            fallback.remove(0)
        });
        *counts.entry(lowest).or_insert(0) += deficit;
    }
    counts
}

/// Removes `excess` slots walking from the lowest-priority tier upward.
/// Tiers that reach zero are dropped.
pub(crate) fn trim_lowest_first(counts: &mut TierCounts, mut excess: u64) {
    let mut order: Vec<String> = counts.keys().cloned().collect();
    tiers::sort_asc(&mut order);
    for tier in order {
        if excess == 0 {
            break;
        }
        if let Some(count) = counts.get_mut(&tier) {
            let cut = (*count as u64).min(excess);
            *count -= cut as u32;
            excess -= cut;
            if *count == 0 {
                counts.remove(&tier);
            }
        }
    }
}

fn lowest_tier(counts: &TierCounts) -> Option<String> {
    counts
        .keys()
        .min_by(|a, b| tiers::compare_desc(b, a))
        .cloned()
}
