//! Persistent shop state, undo snapshots, purchases and the history log.

use crate::config::ShopConfig;
use crate::shop::{Item, Shop, Slot};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// `(region index, slot index)`.
pub type SlotKey = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryKind {
    Money,
    Buy,
    Reroll,
    Region,
    Refresh,
    Reset,
    Undo,
}

impl HistoryKind {
    pub fn name(&self) -> &'static str {
        match self {
            HistoryKind::Money => "money",
            HistoryKind::Buy => "buy",
            HistoryKind::Reroll => "reroll",
            HistoryKind::Region => "region",
            HistoryKind::Refresh => "refresh",
            HistoryKind::Reset => "reset",
            HistoryKind::Undo => "undo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub timestamp: i64,
    pub kind: HistoryKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub timestamp: i64,
    pub region: String,
    pub item_id: u32,
    pub name: String,
    pub tier: String,
    pub price: u64,
}

impl PurchaseRecord {
    pub fn new(item: &Item, region: &str, timestamp: i64) -> Self {
        Self {
            timestamp,
            region: region.to_string(),
            item_id: item.id,
            name: item.name.clone(),
            tier: item.tier.clone(),
            price: item.price,
        }
    }
}

/// Everything undo restores. The history log is not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_region_index: usize,
    pub selected_region_index: usize,
    pub shop: Shop,
    pub group_cache: BTreeMap<usize, Shop>,
    pub region_cache: BTreeMap<usize, Shop>,
    pub visited_regions: Vec<String>,
    pub rerolls_used: u32,
    pub money: u64,
    pub purchases: Vec<PurchaseRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyOutcome {
    /// Slot kept its item, now flagged purchased.
    Purchased,
    /// Slot refilled with a fresh candidate.
    Refilled,
    /// Auto-refill found nothing; slot became a placeholder.
    Emptied,
    InsufficientFunds,
    /// Out of range, placeholder or already purchased.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerollOutcome {
    Replaced,
    /// No candidate; slot flagged, budget untouched.
    Exhausted,
    NoBudget,
    /// Out of range, placeholder or purchased slot.
    Ignored,
}

/// The whole mutable state of one owner's shop session.
///
/// `purchases` and `history` are most-recent-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopState {
    pub owner_id: String,
    pub current_region_index: usize,
    pub selected_region_index: usize,
    pub shop: Shop,
    pub group_cache: BTreeMap<usize, Shop>,
    pub region_cache: BTreeMap<usize, Shop>,
    pub visited_regions: Vec<String>,
    pub rerolls_used: u32,
    pub money: u64,
    pub purchases: Vec<PurchaseRecord>,
    pub history: Vec<HistoryEvent>,
    pub undo_stack: VecDeque<Snapshot>,
    /// Pending auto-clear deadlines (ms) for exhausted flags. Not persisted.
    #[serde(skip)]
    pub exhausted_timers: HashMap<SlotKey, i64>,
}

impl ShopState {
    pub fn new(owner_id: String, money: u64) -> Self {
        Self {
            owner_id,
            current_region_index: 0,
            selected_region_index: 0,
            shop: Vec::new(),
            group_cache: BTreeMap::new(),
            region_cache: BTreeMap::new(),
            visited_regions: Vec::new(),
            rerolls_used: 0,
            money,
            purchases: Vec::new(),
            history: Vec::new(),
            undo_stack: VecDeque::new(),
            exhausted_timers: HashMap::new(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_region_index: self.current_region_index,
            selected_region_index: self.selected_region_index,
            shop: settled(&self.shop),
            group_cache: self.group_cache.clone(),
            region_cache: self.region_cache.clone(),
            visited_regions: self.visited_regions.clone(),
            rerolls_used: self.rerolls_used,
            money: self.money,
            purchases: self.purchases.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.current_region_index = snapshot.current_region_index;
        self.selected_region_index = snapshot.selected_region_index;
        self.shop = snapshot.shop;
        self.group_cache = snapshot.group_cache;
        self.region_cache = snapshot.region_cache;
        self.visited_regions = snapshot.visited_regions;
        self.rerolls_used = snapshot.rerolls_used;
        self.money = snapshot.money;
        self.purchases = snapshot.purchases;
        self.exhausted_timers.clear();
    }

    /// Pushes a snapshot of the current state, dropping the oldest beyond
    /// `config.undo_limit`.
    pub fn push_undo(&mut self, config: &ShopConfig) {
        let snapshot = self.snapshot();
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > config.undo_limit.max(1) {
            self.undo_stack.pop_front();
        }
    }

    pub fn record(&mut self, kind: HistoryKind, message: String, timestamp: i64) {
        self.history.insert(
            0,
            HistoryEvent {
                timestamp,
                kind,
                message,
            },
        );
    }

    pub fn purchased_ids(&self) -> HashSet<u32> {
        self.purchases.iter().map(|p| p.item_id).collect()
    }

    /// Ids of real slots other than `skip`.
    pub fn visible_ids_except(&self, skip: usize) -> HashSet<u32> {
        self.shop
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .filter_map(|(_, slot)| slot.item_id())
            .collect()
    }

    pub fn current_region<'a>(&self, config: &'a ShopConfig) -> Option<&'a str> {
        config.region_name(self.current_region_index)
    }

    pub fn selected_group(&self, config: &ShopConfig) -> usize {
        config.group_of(self.selected_region_index)
    }

    pub fn rerolls_left(&self, config: &ShopConfig) -> u32 {
        config.rerolls_per_region.saturating_sub(self.rerolls_used)
    }

    /// Whether a loaded state still fits `config`'s region list.
    pub fn fits(&self, config: &ShopConfig) -> bool {
        self.current_region_index < config.regions.len()
            && self.selected_region_index < config.regions.len()
    }
}

/// Copy of `shop` with transient exhausted flags cleared.
pub fn settled(shop: &[Slot]) -> Shop {
    shop.iter()
        .cloned()
        .map(|mut slot| {
            slot.set_exhausted(false);
            slot
        })
        .collect()
}
