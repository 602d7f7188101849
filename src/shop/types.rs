use serde::{Deserialize, Serialize};

/// Catalog entry. Loaded once, never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub tier: String,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub regions: Vec<String>,
}

impl Item {
    /// Case-insensitive region membership.
    pub fn available_in(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r.eq_ignore_ascii_case(region))
    }

    pub fn is_tier(&self, tier: &str) -> bool {
        self.tier.eq_ignore_ascii_case(tier)
    }
}

/// One position in a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    Real {
        item: Item,
        purchased: bool,
        exhausted: bool,
    },
    /// Nothing of this tier was available. `tag` keeps placeholders of the
    /// same tier distinguishable from each other.
    Empty { tier: String, tag: String },
}

impl Slot {
    pub fn real(item: Item) -> Self {
        Slot::Real {
            item,
            purchased: false,
            exhausted: false,
        }
    }

    pub fn empty(tier: &str, tag: String) -> Self {
        Slot::Empty {
            tier: tier.to_string(),
            tag,
        }
    }

    pub fn tier(&self) -> &str {
        match self {
            Slot::Real { item, .. } => &item.tier,
            Slot::Empty { tier, .. } => tier,
        }
    }

    pub fn item(&self) -> Option<&Item> {
        match self {
            Slot::Real { item, .. } => Some(item),
            Slot::Empty { .. } => None,
        }
    }

    pub fn item_id(&self) -> Option<u32> {
        self.item().map(|item| item.id)
    }

    pub fn name(&self) -> &str {
        match self {
            Slot::Real { item, .. } => &item.name,
            Slot::Empty { .. } => "",
        }
    }

    pub fn price(&self) -> u64 {
        self.item().map(|item| item.price).unwrap_or(0)
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Slot::Real { .. })
    }

    pub fn is_purchased(&self) -> bool {
        matches!(self, Slot::Real { purchased: true, .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Slot::Real { exhausted: true, .. })
    }

    pub fn set_exhausted(&mut self, value: bool) {
        if let Slot::Real { exhausted, .. } = self {
            *exhausted = value;
        }
    }

    pub fn mark_purchased(&mut self) {
        if let Slot::Real {
            purchased,
            exhausted,
            ..
        } = self
        {
            *purchased = true;
            *exhausted = false;
        }
    }

    /// Identity used for de-duplication: item id for real slots, tag for
    /// placeholders. A real slot never matches a placeholder.
    pub fn same_identity(&self, other: &Slot) -> bool {
        match (self, other) {
            (Slot::Real { item: a, .. }, Slot::Real { item: b, .. }) => a.id == b.id,
            (Slot::Empty { tag: a, .. }, Slot::Empty { tag: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Short one-line description for logs and the terminal front end.
    pub fn label(&self) -> String {
        match self {
            Slot::Real {
                item,
                purchased: true,
                ..
            } => format!("[{}] {} (purchased)", item.tier, item.name),
            Slot::Real {
                item,
                exhausted: true,
                ..
            } => format!("[{}] {} - {} (no replacement)", item.tier, item.name, item.price),
            Slot::Real { item, .. } => format!("[{}] {} - {}", item.tier, item.name, item.price),
            Slot::Empty { tier, .. } => format!("[{}] no items of this tier", tier),
        }
    }
}

pub type Shop = Vec<Slot>;
