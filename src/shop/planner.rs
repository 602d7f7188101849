//! Decides how many slots each tier gets for one shop build.

use super::quota::{trim_lowest_first, TierCounts, TierWeights};
use super::tiers;
use crate::random::RandomSource;

/// Minimums verbatim, plus one weighted draw per remaining slot.
///
/// Draws are with replacement: a tier can win many extra slots. The sum can
/// exceed `shop_size` when the minimums alone do; see [`fit_to_size`].
pub fn plan_tier_counts<R: RandomSource + ?Sized>(
    shop_size: usize,
    minimums: &TierCounts,
    weights: &TierWeights,
    rng: &mut R,
) -> TierCounts {
    let mut counts = minimums.clone();
    let guaranteed: usize = minimums.values().map(|&c| c as usize).sum();
    let remaining = shop_size.saturating_sub(guaranteed);
    if remaining == 0 {
        return counts;
    }

    let mut candidates: Vec<String> = minimums.keys().chain(weights.keys()).cloned().collect();
    tiers::sort_desc(&mut candidates);
    candidates.dedup();

    for _ in 0..remaining {
        if let Some(tier) = weighted_tier(&candidates, weights, rng) {
            *counts.entry(tier).or_insert(0) += 1;
        }
    }
    counts
}

/// One weighted pick over `candidates` (assumed best-first). With no weight
/// mass at all the first candidate wins without consuming a draw.
pub fn weighted_tier<R: RandomSource + ?Sized>(
    candidates: &[String],
    weights: &TierWeights,
    rng: &mut R,
) -> Option<String> {
    let weight_of = |tier: &String| weights.get(tier).copied().unwrap_or(0.0).max(0.0);
    let total: f64 = candidates.iter().map(weight_of).sum();
    if total <= 0.0 {
        return candidates.first().cloned();
    }

    let mut roll = rng.next_f64() * total;
    for tier in candidates {
        let weight = weight_of(tier);
        if weight <= 0.0 {
            continue;
        }
        if roll < weight {
            return Some(tier.clone());
        }
        roll -= weight;
    }
    // Float drift on a draw of ~1.0: last tier with mass.
    candidates.iter().rev().find(|t| weight_of(t) > 0.0).cloned()
}

/// Trims an over-committed plan from the lowest-priority tier upward so it
/// sums to exactly `shop_size`. Plans at or under size are left alone.
pub fn fit_to_size(counts: &mut TierCounts, shop_size: usize) {
    let total: u64 = counts.values().map(|&c| c as u64).sum();
    if total > shop_size as u64 {
        trim_lowest_first(counts, total - shop_size as u64);
    }
}
