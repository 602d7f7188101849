//! Integration tests: region cycling, purchases, rerolls and undo on the
//! pure state machine.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashSet};
use tiershop::random::RandomSource;
use tiershop::shop::{Item, Slot};
use tiershop::state::{HistoryKind, Snapshot};
use tiershop::{BuyOutcome, RerollOutcome, RngSource, ShopConfig, ShopState};

type TestRng = RngSource<ChaCha8Rng>;

fn rng(seed: u64) -> TestRng {
    RngSource::new(ChaCha8Rng::seed_from_u64(seed))
}

const REGIONS: [&str; 4] = ["A", "B", "C", "D"];

fn catalog() -> Vec<Item> {
    let mut items = Vec::new();
    for id in 1..=40u32 {
        let tier = match id % 4 {
            0 => "S",
            1 => "A",
            2 => "B",
            _ => "C",
        };
        items.push(Item {
            id,
            name: format!("Creature {id:02}"),
            tier: tier.to_string(),
            price: 10 * id as u64,
            regions: REGIONS.iter().map(|r| r.to_string()).collect(),
        });
    }
    items
}

fn config() -> ShopConfig {
    ShopConfig {
        shop_size: 6,
        quota: BTreeMap::from([("S".to_string(), 1.0), ("C".to_string(), 2.0)]),
        regions: REGIONS.iter().map(|r| r.to_string()).collect(),
        rerolls_per_region: 2,
        ..Default::default()
    }
}

fn travel(state: &mut ShopState, index: usize, catalog: &[Item], config: &ShopConfig, rng: &mut TestRng) {
    assert!(state.select_region(index, config));
    state.apply_selected_region(catalog, config, rng, 0);
}

fn first_real(state: &ShopState) -> usize {
    state.shop.iter().position(Slot::is_real).expect("shop has a real slot")
}

// =========================================================================
// Region regeneration cycling
// =========================================================================

#[test]
fn test_regeneration_groups_share_and_restore_shops() {
    let catalog = catalog();
    let config = ShopConfig {
        shop_refresh_every_regions: 2,
        ..config()
    };
    let mut rng = rng(1);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);

    travel(&mut state, 0, &catalog, &config, &mut rng);
    let shop_a = state.shop.clone();

    travel(&mut state, 1, &catalog, &config, &mut rng);
    assert_eq!(state.shop, shop_a, "A and B share group 0");

    travel(&mut state, 2, &catalog, &config, &mut rng);
    let shop_c = state.shop.clone();
    assert_eq!(state.group_cache.get(&1), Some(&shop_c));
    assert_eq!(state.region_cache.get(&3), Some(&shop_c));

    travel(&mut state, 0, &catalog, &config, &mut rng);
    assert_eq!(state.shop, shop_a, "A's cached shop is restored unchanged");
}

#[test]
fn test_caches_stay_in_sync_after_purchase() {
    let catalog = catalog();
    let config = ShopConfig {
        shop_refresh_every_regions: 2,
        ..config()
    };
    let mut rng = rng(2);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    state.money = 10_000;

    let index = first_real(&state);
    assert_eq!(state.buy(index, &catalog, &config, &mut rng, 5), BuyOutcome::Purchased);
    assert_eq!(state.region_cache.get(&0), Some(&state.shop));
    assert_eq!(state.region_cache.get(&1), Some(&state.shop));
    assert_eq!(state.group_cache.get(&0), Some(&state.shop));
}

// =========================================================================
// Purchases
// =========================================================================

#[test]
fn test_buy_with_autofill_off() {
    let catalog = catalog();
    let config = config();
    let mut rng = rng(3);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    state.money = 10_000;

    let index = first_real(&state);
    let item = state.shop[index].item().cloned().unwrap();
    let history_before = state.history.len();

    assert_eq!(state.buy(index, &catalog, &config, &mut rng, 42), BuyOutcome::Purchased);
    assert!(state.shop[index].is_purchased());
    assert_eq!(state.shop[index].item(), Some(&item));
    assert_eq!(state.money, 10_000 - item.price);
    assert_eq!(state.purchases.len(), 1);
    assert_eq!(state.purchases[0].item_id, item.id);
    assert_eq!(state.purchases[0].region, "A");
    assert_eq!(state.history.len(), history_before + 1);
    assert_eq!(state.history[0].kind, HistoryKind::Buy);

    assert_eq!(state.buy(index, &catalog, &config, &mut rng, 43), BuyOutcome::Ignored);
    assert_eq!(state.purchases.len(), 1);
}

#[test]
fn test_buy_with_autofill_replaces_slot() {
    let catalog = catalog();
    let config = ShopConfig {
        auto_refill_on_purchase: true,
        ..config()
    };
    let mut rng = rng(4);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    state.money = 10_000;

    let index = first_real(&state);
    let bought = state.shop[index].item_id().unwrap();
    let tier = state.shop[index].tier().to_string();

    assert_eq!(state.buy(index, &catalog, &config, &mut rng, 0), BuyOutcome::Refilled);
    let replacement = &state.shop[index];
    assert!(replacement.is_real());
    assert!(!replacement.is_purchased());
    assert_ne!(replacement.item_id(), Some(bought));
    assert_eq!(replacement.tier(), tier);

    let ids: Vec<u32> = state.shop.iter().filter_map(Slot::item_id).collect();
    let unique: HashSet<u32> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn test_buy_with_autofill_and_no_stock_leaves_placeholder() {
    let catalog: Vec<Item> = catalog().into_iter().filter(|i| i.id == 4).collect();
    let config = ShopConfig {
        shop_size: 1,
        quota: BTreeMap::from([("S".to_string(), 1.0)]),
        auto_refill_on_purchase: true,
        ..config()
    };
    let mut rng = rng(5);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    state.money = 1_000;

    assert_eq!(state.buy(0, &catalog, &config, &mut rng, 0), BuyOutcome::Emptied);
    assert!(!state.shop[0].is_real());
    assert_eq!(state.shop[0].tier(), "S");
}

#[test]
fn test_buy_placeholder_is_noop() {
    let config = ShopConfig {
        shop_size: 2,
        ..config()
    };
    let mut rng = rng(6);
    let mut state = ShopState::fresh("owner".into(), &[], &config, &mut rng);
    state.money = 1_000;
    assert_eq!(state.buy(0, &[], &config, &mut rng, 0), BuyOutcome::Ignored);
    assert!(state.undo_stack.is_empty());
    assert!(state.history.is_empty());
}

// =========================================================================
// Rerolls
// =========================================================================

#[test]
fn test_reroll_budget_bounds() {
    let catalog = catalog();
    let config = config();
    let mut rng = rng(7);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    let index = first_real(&state);

    assert_eq!(state.reroll(index, &catalog, &config, &mut rng, 0), RerollOutcome::Replaced);
    assert_eq!(state.reroll(index, &catalog, &config, &mut rng, 0), RerollOutcome::Replaced);
    assert_eq!(state.rerolls_used, 2);

    let before = state.shop.clone();
    let undo_depth = state.undo_stack.len();
    assert_eq!(state.reroll(index, &catalog, &config, &mut rng, 0), RerollOutcome::NoBudget);
    assert_eq!(state.rerolls_used, 2);
    assert_eq!(state.shop, before);
    assert_eq!(state.undo_stack.len(), undo_depth);
}

#[test]
fn test_reroll_exhaustion_keeps_budget_and_stack() {
    let catalog = vec![Item {
        id: 150,
        name: "Mewtwo".to_string(),
        tier: "S".to_string(),
        price: 5000,
        regions: vec!["A".to_string()],
    }];
    let config = ShopConfig {
        shop_size: 1,
        quota: BTreeMap::from([("S".to_string(), 1.0)]),
        ..config()
    };
    let mut rng = rng(8);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    assert_eq!(state.shop[0].item_id(), Some(150));

    assert_eq!(state.reroll(0, &catalog, &config, &mut rng, 0), RerollOutcome::Exhausted);
    assert!(state.shop[0].is_exhausted());
    assert_eq!(state.rerolls_used, 0);
    assert!(state.undo_stack.is_empty());
    assert_eq!(state.shop[0].item_id(), Some(150));
}

#[test]
fn test_reroll_replacement_is_new_and_unique() {
    let catalog = catalog();
    let config = ShopConfig {
        rerolls_per_region: 50,
        ..config()
    };
    let mut rng = rng(9);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    let index = first_real(&state);

    for _ in 0..20 {
        let old = state.shop[index].item_id();
        assert_eq!(state.reroll(index, &catalog, &config, &mut rng, 0), RerollOutcome::Replaced);
        assert_ne!(state.shop[index].item_id(), old);
        let ids: Vec<u32> = state.shop.iter().filter_map(Slot::item_id).collect();
        let unique: HashSet<u32> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }
}

// =========================================================================
// Undo
// =========================================================================

fn fields(state: &ShopState) -> Snapshot {
    state.snapshot()
}

fn assert_undo_restores<F>(op: F)
where
    F: FnOnce(&mut ShopState, &[Item], &ShopConfig, &mut TestRng),
{
    let catalog = catalog();
    let config = config();
    let mut rng = rng(10);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    state.money = 5_000;
    state.record(HistoryKind::Money, "seed money".to_string(), 0);

    let before = fields(&state);
    op(&mut state, &catalog, &config, &mut rng);
    assert_ne!(fields(&state), before, "operation should change something");

    let history_before_undo = state.history.clone();
    assert!(state.undo(99));
    assert_eq!(fields(&state), before);
    assert_eq!(state.history.len(), history_before_undo.len() + 1);
    assert_eq!(state.history[0].kind, HistoryKind::Undo);
    assert_eq!(&state.history[1..], &history_before_undo[..]);
}

#[test]
fn test_undo_buy() {
    assert_undo_restores(|state, catalog, config, rng| {
        let index = first_real(state);
        state.buy(index, catalog, config, rng, 1);
    });
}

#[test]
fn test_undo_reroll() {
    assert_undo_restores(|state, catalog, config, rng| {
        let index = first_real(state);
        state.reroll(index, catalog, config, rng, 1);
    });
}

#[test]
fn test_undo_region_change() {
    assert_undo_restores(|state, catalog, config, rng| {
        state.select_region(2, config);
        state.apply_selected_region(catalog, config, rng, 1);
    });
}

#[test]
fn test_undo_refresh() {
    assert_undo_restores(|state, catalog, config, rng| {
        state.refresh(catalog, config, rng, 1);
    });
}

#[test]
fn test_undo_money() {
    assert_undo_restores(|state, _, config, _| {
        state.add_money(250, config, 1);
    });
}

#[test]
fn test_undo_empty_stack_is_noop() {
    let mut state = ShopState::new("owner".into(), 0);
    assert!(!state.undo(0));
    assert!(state.history.is_empty());
}

#[test]
fn test_undo_walks_back_multiple_steps() {
    let catalog = catalog();
    let config = config();
    let mut rng = rng(11);
    let mut state = ShopState::fresh("owner".into(), &catalog, &config, &mut rng);
    let start = state.snapshot();

    state.add_money(100, &config, 1);
    state.add_money(200, &config, 2);
    state.refresh(&catalog, &config, &mut rng, 3);

    assert!(state.undo(4));
    assert_eq!(state.money, 300);
    assert!(state.undo(5));
    assert!(state.undo(6));
    assert_eq!(state.snapshot(), start);
    assert!(!state.undo(7));
}

#[test]
fn test_scripted_random_source() {
    struct Scripted {
        draws: Vec<f64>,
        tags: u32,
    }
    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            if self.draws.is_empty() {
                0.0
            } else {
                self.draws.remove(0)
            }
        }
        fn unique_tag(&mut self) -> String {
            self.tags += 1;
            format!("tag-{}", self.tags)
        }
    }

    let config = ShopConfig {
        shop_size: 2,
        quota: BTreeMap::new(),
        ..config()
    };
    let mut rng = Scripted {
        draws: vec![0.0, 0.0],
        tags: 0,
    };
    let state = ShopState::fresh("owner".into(), &[], &config, &mut rng);
    // Both weighted draws at 0.0 land on the best tier with mass: S.
    assert!(state.shop.iter().all(|s| s.tier() == "S" && !s.is_real()));
    assert_eq!(rng.tags, 2);
}
