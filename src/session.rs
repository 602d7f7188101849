//! Orchestration around the pure [`ShopState`] transitions: loads the
//! catalog and saved state, then saves after every mutation. Persistence is
//! best-effort; failures are logged and the in-memory state stays
//! authoritative.

use crate::catalog::CatalogLoader;
use crate::config::ShopConfig;
use crate::persistence::ShopStore;
use crate::random::RandomSource;
use crate::shop::Item;
use crate::state::{BuyOutcome, HistoryKind, RerollOutcome, ShopState};
use log::{debug, info, warn};

pub struct ShopSession<S: ShopStore, R: RandomSource> {
    catalog: Vec<Item>,
    config: ShopConfig,
    state: ShopState,
    store: S,
    rng: R,
}

impl<S: ShopStore, R: RandomSource> ShopSession<S, R> {
    /// Loads catalog, config and saved state, falling back to defaults on
    /// any failure, and makes sure there is a shop of the configured size
    /// to show.
    pub fn bootstrap<L: CatalogLoader + ?Sized>(loader: &L, store: S, mut rng: R) -> Self {
        let (catalog, config) = match loader.load() {
            Ok((catalog, config)) => (catalog, config.sanitized()),
            Err(e) => {
                warn!("catalog unavailable, starting empty: {}", e);
                (Vec::new(), ShopConfig::default())
            }
        };

        let saved = match store.load() {
            Ok(saved) => saved,
            Err(e) => {
                warn!("saved state unreadable, starting fresh: {}", e);
                None
            }
        };

        let state = match saved {
            Some(mut state) if state.fits(&config) => {
                state.rerolls_used = state.rerolls_used.min(config.rerolls_per_region);
                if state.conform_to_config(&catalog, &config, &mut rng) {
                    info!("shop size changed, rebuilt shop for {}", state.owner_id);
                }
                info!("resumed shop for {}", state.owner_id);
                state
            }
            Some(_) => {
                warn!("saved state does not match region list, starting fresh");
                ShopState::fresh(rng.unique_tag(), &catalog, &config, &mut rng)
            }
            None => ShopState::fresh(rng.unique_tag(), &catalog, &config, &mut rng),
        };

        let session = Self {
            catalog,
            config,
            state,
            store,
            rng,
        };
        session.persist();
        session
    }

    pub fn state(&self) -> &ShopState {
        &self.state
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[Item] {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn select_region(&mut self, index: usize) -> bool {
        let changed = self.state.select_region(index, &self.config);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn apply_selected_region(&mut self, now: i64) {
        self.state
            .apply_selected_region(&self.catalog, &self.config, &mut self.rng, now);
        if let Some(region) = self.state.current_region(&self.config) {
            info!("region applied: {}", region);
        }
        self.persist();
    }

    pub fn refresh(&mut self, now: i64) {
        self.state
            .refresh(&self.catalog, &self.config, &mut self.rng, now);
        info!("shop refreshed");
        self.persist();
    }

    pub fn add_money(&mut self, amount: i64, now: i64) -> bool {
        let changed = self.state.add_money(amount, &self.config, now);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn buy(&mut self, index: usize, now: i64) -> BuyOutcome {
        let outcome = self
            .state
            .buy(index, &self.catalog, &self.config, &mut self.rng, now);
        debug!("buy slot {}: {:?}", index, outcome);
        if outcome != BuyOutcome::Ignored {
            self.persist();
        }
        outcome
    }

    pub fn reroll(&mut self, index: usize, now: i64) -> RerollOutcome {
        let outcome = self
            .state
            .reroll(index, &self.catalog, &self.config, &mut self.rng, now);
        debug!("reroll slot {}: {:?}", index, outcome);
        if outcome == RerollOutcome::Replaced {
            self.persist();
        }
        outcome
    }

    pub fn undo(&mut self, now: i64) -> bool {
        let undone = self.state.undo(now);
        if undone {
            self.persist();
        }
        undone
    }

    /// Fires due exhausted-flag timers. Call from the front end's loop.
    pub fn tick(&mut self, now: i64) -> usize {
        self.state.clear_expired_flags(now)
    }

    /// Wipes saved and in-memory state and starts over from the config.
    /// The reset event is the only history entry that survives.
    pub fn reset(&mut self, now: i64) {
        if let Err(e) = self.store.clear() {
            warn!("could not clear saved state: {}", e);
        }
        let owner_id = self.state.owner_id.clone();
        self.state = ShopState::fresh(owner_id, &self.catalog, &self.config, &mut self.rng);
        self.state
            .record(HistoryKind::Reset, "Shop reset".to_string(), now);
        info!("shop reset");
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.state) {
            warn!("failed to save shop state: {}", e);
        }
    }
}
