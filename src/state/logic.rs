//! Region and shop transitions. Pure: no I/O, time is passed in as
//! milliseconds, randomness through [`RandomSource`].

use super::types::{settled, BuyOutcome, HistoryKind, PurchaseRecord, RerollOutcome, ShopState};
use crate::config::ShopConfig;
use crate::core::constants::EXHAUSTED_CLEAR_MS;
use crate::random::RandomSource;
use crate::shop::{build_shop, find_replacement, Item, Shop, Slot};

impl ShopState {
    /// A fresh state positioned on the first region with its shop built.
    pub fn fresh<R: RandomSource + ?Sized>(
        owner_id: String,
        catalog: &[Item],
        config: &ShopConfig,
        rng: &mut R,
    ) -> Self {
        let mut state = ShopState::new(owner_id, config.starting_money);
        if let Some(region) = config.region_name(0) {
            state.shop = build_shop(catalog, region, config, &state.purchased_ids(), rng);
            state.visit_region(region, config);
            state.propagate_to_group(config);
        }
        state
    }

    /// Rebuilds the active shop when a resumed state no longer matches
    /// `config.shop_size`. Caches and undo snapshots built under the old size
    /// are dropped. Returns whether a rebuild happened.
    pub fn conform_to_config<R: RandomSource + ?Sized>(
        &mut self,
        catalog: &[Item],
        config: &ShopConfig,
        rng: &mut R,
    ) -> bool {
        if self.shop.len() == config.shop_size {
            return false;
        }
        let Some(region) = self.current_region(config) else {
            return false;
        };
        self.shop = build_shop(catalog, region, config, &self.purchased_ids(), rng);
        self.region_cache.clear();
        self.group_cache.clear();
        self.undo_stack.clear();
        self.exhausted_timers.clear();
        self.propagate_to_group(config);
        true
    }

    /// Non-committing: only moves the selection.
    pub fn select_region(&mut self, index: usize, config: &ShopConfig) -> bool {
        if index >= config.regions.len() {
            return false;
        }
        self.selected_region_index = index;
        true
    }

    /// Moves to the selected region. Cached shops win over fresh builds:
    /// region cache, then group cache, then a new build.
    pub fn apply_selected_region<R: RandomSource + ?Sized>(
        &mut self,
        catalog: &[Item],
        config: &ShopConfig,
        rng: &mut R,
        now: i64,
    ) {
        let target = self.selected_region_index;
        let Some(region) = config.region_name(target) else {
            return;
        };
        self.push_undo(config);

        let group = config.group_of(target);
        let shop = match self
            .region_cache
            .get(&target)
            .or_else(|| self.group_cache.get(&group))
        {
            Some(cached) => cached.clone(),
            None => build_shop(catalog, region, config, &self.purchased_ids(), rng),
        };
        self.current_region_index = target;
        self.shop = shop;

        let recharged = self.visit_region(region, config);
        self.propagate_to_group(config);

        let mut message = format!("Moved to {}", region);
        if recharged {
            message.push_str(", rerolls recharged");
        }
        self.record(HistoryKind::Region, message, now);
    }

    /// Rebuilds the active region's shop, bypassing the caches. With a
    /// pending region selection this applies the selection instead.
    pub fn refresh<R: RandomSource + ?Sized>(
        &mut self,
        catalog: &[Item],
        config: &ShopConfig,
        rng: &mut R,
        now: i64,
    ) {
        if self.selected_region_index != self.current_region_index {
            self.apply_selected_region(catalog, config, rng, now);
            return;
        }
        let Some(region) = self.current_region(config) else {
            return;
        };
        self.push_undo(config);

        self.shop = build_shop(catalog, region, config, &self.purchased_ids(), rng);
        let current = self.current_region_index;
        self.exhausted_timers.retain(|(r, _), _| *r != current);
        if config.reset_rerolls_on_manual_refresh {
            self.rerolls_used = 0;
        }
        self.propagate_to_group(config);
        self.record(HistoryKind::Refresh, format!("Refreshed shop in {}", region), now);
    }

    /// Adjusts money, never below zero. Zero is a no-op.
    pub fn add_money(&mut self, amount: i64, config: &ShopConfig, now: i64) -> bool {
        if amount == 0 {
            return false;
        }
        self.push_undo(config);
        self.money = if amount > 0 {
            self.money.saturating_add(amount as u64)
        } else {
            self.money.saturating_sub(amount.unsigned_abs())
        };
        let message = format!("Money {:+} (now {})", amount, self.money);
        self.record(HistoryKind::Money, message, now);
        true
    }

    pub fn buy<R: RandomSource + ?Sized>(
        &mut self,
        index: usize,
        catalog: &[Item],
        config: &ShopConfig,
        rng: &mut R,
        now: i64,
    ) -> BuyOutcome {
        let Some(Slot::Real {
            item,
            purchased: false,
            ..
        }) = self.shop.get(index)
        else {
            return BuyOutcome::Ignored;
        };
        let item = item.clone();
        let Some(region) = self.current_region(config) else {
            return BuyOutcome::Ignored;
        };

        if item.price > self.money {
            let message = format!(
                "Cannot afford {} ({} needed, {} available)",
                item.name, item.price, self.money
            );
            self.record(HistoryKind::Buy, message, now);
            return BuyOutcome::InsufficientFunds;
        }

        self.push_undo(config);
        self.exhausted_timers.remove(&(self.current_region_index, index));
        self.money -= item.price;
        self.purchases
            .insert(0, PurchaseRecord::new(&item, region, now));

        let outcome = if config.auto_refill_on_purchase {
            let excluded = self.visible_ids_except(index);
            let purchased = self.purchased_ids();
            match find_replacement(
                catalog,
                region,
                &item.tier,
                &excluded,
                &purchased,
                Some(item.id),
                config,
                rng,
            ) {
                Some(next) => {
                    self.shop[index] = Slot::real(next);
                    BuyOutcome::Refilled
                }
                None => {
                    self.shop[index] = Slot::empty(&item.tier, rng.unique_tag());
                    BuyOutcome::Emptied
                }
            }
        } else {
            self.shop[index].mark_purchased();
            BuyOutcome::Purchased
        };

        self.propagate_to_group(config);
        let message = format!("Bought {} [{}] for {}", item.name, item.tier, item.price);
        self.record(HistoryKind::Buy, message, now);
        outcome
    }

    pub fn reroll<R: RandomSource + ?Sized>(
        &mut self,
        index: usize,
        catalog: &[Item],
        config: &ShopConfig,
        rng: &mut R,
        now: i64,
    ) -> RerollOutcome {
        if self.rerolls_used >= config.rerolls_per_region {
            return RerollOutcome::NoBudget;
        }
        let Some(Slot::Real {
            item,
            purchased: false,
            ..
        }) = self.shop.get(index)
        else {
            return RerollOutcome::Ignored;
        };
        let old = item.clone();
        let Some(region) = self.current_region(config) else {
            return RerollOutcome::Ignored;
        };

        let key = (self.current_region_index, index);
        self.exhausted_timers.remove(&key);

        let excluded = self.visible_ids_except(index);
        let purchased = self.purchased_ids();
        let Some(next) = find_replacement(
            catalog,
            region,
            &old.tier,
            &excluded,
            &purchased,
            Some(old.id),
            config,
            rng,
        ) else {
            self.shop[index].set_exhausted(true);
            self.exhausted_timers.insert(key, now + EXHAUSTED_CLEAR_MS);
            return RerollOutcome::Exhausted;
        };

        self.push_undo(config);
        self.rerolls_used += 1;
        let message = format!(
            "Rerolled {} into {} ({}/{})",
            old.name, next.name, self.rerolls_used, config.rerolls_per_region
        );
        self.shop[index] = Slot::real(next);
        self.propagate_to_group(config);
        self.record(HistoryKind::Reroll, message, now);
        RerollOutcome::Replaced
    }

    /// Restores the latest snapshot. History is only appended to.
    pub fn undo(&mut self, now: i64) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        self.restore(snapshot);
        self.record(HistoryKind::Undo, "Undid last action".to_string(), now);
        true
    }

    /// Clears exhausted flags whose delay has elapsed. Returns how many
    /// timers fired.
    pub fn clear_expired_flags(&mut self, now: i64) -> usize {
        let due: Vec<_> = self
            .exhausted_timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| *key)
            .collect();
        for (region_index, slot_index) in &due {
            self.exhausted_timers.remove(&(*region_index, *slot_index));
            if *region_index == self.current_region_index {
                if let Some(slot) = self.shop.get_mut(*slot_index) {
                    slot.set_exhausted(false);
                }
            }
        }
        due.len()
    }

    /// Marks `region` visited in the current recharge cycle. Completing the
    /// cycle resets the reroll budget and starts a new, empty cycle.
    fn visit_region(&mut self, region: &str, config: &ShopConfig) -> bool {
        if self
            .visited_regions
            .iter()
            .any(|r| r.eq_ignore_ascii_case(region))
        {
            return false;
        }
        self.visited_regions.push(region.to_string());
        if self.visited_regions.len() >= config.reroll_recharge_every_regions.max(1) {
            self.rerolls_used = 0;
            self.visited_regions.clear();
            return true;
        }
        false
    }

    /// Writes the active shop into the group cache and every region cache of
    /// the active region's regeneration group.
    fn propagate_to_group(&mut self, config: &ShopConfig) {
        let group = config.group_of(self.current_region_index);
        let cached: Shop = settled(&self.shop);
        for region_index in config.group_members(group) {
            self.region_cache.insert(region_index, cached.clone());
        }
        self.group_cache.insert(group, cached);
    }
}
