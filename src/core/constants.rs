// Tier labels
pub const TOP_TIER: &str = "S";
pub const UNKNOWN_TIER: &str = "?";
pub const TOP_TIER_PRIORITY: u32 = 100;

/// Built-in weight table, also the fallback when configured weights sum to 0.
pub const DEFAULT_TIER_WEIGHTS: [(&str, f64); 4] = [("C", 40.0), ("B", 30.0), ("A", 20.0), ("S", 10.0)];
pub const DEFAULT_MINIMUM_QUOTA: [(&str, f64); 4] = [("S", 1.0), ("A", 1.0), ("B", 1.0), ("C", 2.0)];

// Shop defaults
pub const DEFAULT_SHOP_SIZE: usize = 10;
pub const DEFAULT_REROLLS_PER_REGION: u32 = 3;
pub const DEFAULT_UNDO_LIMIT: usize = 20;
pub const DEFAULT_REGIONS: [&str; 9] = [
    "Kanto", "Johto", "Hoenn", "Sinnoh", "Unova", "Kalos", "Alola", "Galar", "Paldea",
];

// Exhausted reroll flag auto-clear delay
pub const EXHAUSTED_CLEAR_MS: i64 = 1500;

// Save file framing
pub const SAVE_VERSION_MAGIC: u64 = 0x5449_4552_5348_4F50; // "TIERSHOP"
