//! Total order over tier labels: `S` first, then `A` through `Z`.
//! Anything else sorts last.

use crate::core::constants::{TOP_TIER, TOP_TIER_PRIORITY};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Rank of a tier label. Higher is better.
pub fn priority(tier: &str) -> u32 {
    let tier = tier.trim();
    if tier.eq_ignore_ascii_case(TOP_TIER) {
        return TOP_TIER_PRIORITY;
    }
    let mut chars = tier.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ ('a'..='z' | 'A'..='Z')), None) => 26 - (c.to_ascii_uppercase() as u32 - 'A' as u32),
        _ => 0,
    }
}

/// Best tier first; equal priorities fall back to label order.
pub fn compare_desc(a: &str, b: &str) -> Ordering {
    priority(b)
        .cmp(&priority(a))
        .then_with(|| a.to_ascii_uppercase().cmp(&b.to_ascii_uppercase()))
}

pub fn compare_asc(a: &str, b: &str) -> Ordering {
    compare_desc(b, a)
}

pub fn sort_desc(tiers: &mut [String]) {
    tiers.sort_by(|a, b| compare_desc(a, b));
}

pub fn sort_asc(tiers: &mut [String]) {
    tiers.sort_by(|a, b| compare_asc(a, b));
}

/// Which side of the ladder tier fallback searches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackOrder {
    /// Next lower tiers (closest first), then higher tiers (closest first).
    #[default]
    LowerFirst,
    /// Next higher tiers (closest first), then lower tiers (closest first).
    HigherFirst,
}

/// Tiers to try, in order, when `tier` has nothing to offer.
/// The original tier is never part of the result.
pub fn substitute_tiers(tier: &str, known: &[String], order: FallbackOrder) -> Vec<String> {
    let own = priority(tier);
    let mut lower: Vec<String> = known
        .iter()
        .filter(|t| !t.eq_ignore_ascii_case(tier) && priority(t) <= own)
        .cloned()
        .collect();
    let mut higher: Vec<String> = known
        .iter()
        .filter(|t| !t.eq_ignore_ascii_case(tier) && priority(t) > own)
        .cloned()
        .collect();
    sort_desc(&mut lower);
    sort_asc(&mut higher);

    match order {
        FallbackOrder::LowerFirst => lower.into_iter().chain(higher).collect(),
        FallbackOrder::HigherFirst => higher.into_iter().chain(lower).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_s_is_highest() {
        assert!(priority("S") > priority("A"));
        assert_eq!(priority("S"), TOP_TIER_PRIORITY);
    }

    #[test]
    fn test_letters_descend() {
        assert!(priority("A") > priority("B"));
        assert!(priority("B") > priority("C"));
        assert!(priority("Y") > priority("Z"));
        assert!(priority("Z") > 0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(priority("a"), priority("A"));
        assert_eq!(priority("s"), priority("S"));
    }

    #[test]
    fn test_other_inputs_are_lowest() {
        assert_eq!(priority(""), 0);
        assert_eq!(priority("AA"), 0);
        assert_eq!(priority("1"), 0);
        assert_eq!(priority("?"), 0);
    }

    #[test]
    fn test_sort_helpers() {
        let mut tiers = labels(&["C", "S", "A", "B"]);
        sort_desc(&mut tiers);
        assert_eq!(tiers, labels(&["S", "A", "B", "C"]));
        sort_asc(&mut tiers);
        assert_eq!(tiers, labels(&["C", "B", "A", "S"]));
    }

    #[test]
    fn test_substitutes_lower_first() {
        let known = labels(&["S", "A", "B", "C"]);
        assert_eq!(
            substitute_tiers("A", &known, FallbackOrder::LowerFirst),
            labels(&["B", "C", "S"])
        );
        assert_eq!(
            substitute_tiers("C", &known, FallbackOrder::LowerFirst),
            labels(&["B", "A", "S"])
        );
    }

    #[test]
    fn test_substitutes_higher_first() {
        let known = labels(&["S", "A", "B", "C"]);
        assert_eq!(
            substitute_tiers("B", &known, FallbackOrder::HigherFirst),
            labels(&["A", "S", "C"])
        );
    }
}
