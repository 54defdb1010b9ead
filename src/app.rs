//! Application state
//!
//! The single owner of everything that outlives a round: auth flag, coins,
//! owned and equipped cosmetics, selected difficulty and history. Every
//! mutation writes the keys it touched.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::difficulty::Difficulty;
use crate::history::{History, HistoryEntry};
use crate::leaderboard::{self, PlayerStats, Standing};
use crate::persistence::{self, KeyValueStore, keys};
use crate::platform::{self, Clock};
use crate::rewards::RoundReward;
use crate::shop::{self, ItemKind, ItemStatus, ShopError, ShopItem};
use crate::sim::{RoundEvent, RoundSummary};

/// Display name used for the player's leaderboard row
pub const PLAYER_NAME: &str = "You";

/// Persisted player profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub is_authed: bool,
    pub coins: u64,
    pub owned_item_ids: Vec<String>,
    pub equipped_button_skin_id: String,
    pub equipped_arena_theme_id: String,
    pub selected_difficulty: Difficulty,
    pub history: History,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            is_authed: false,
            coins: 0,
            owned_item_ids: Vec::new(),
            equipped_button_skin_id: shop::DEFAULT_BUTTON_SKIN_ID.to_string(),
            equipped_arena_theme_id: shop::DEFAULT_ARENA_THEME_ID.to_string(),
            selected_difficulty: Difficulty::DEFAULT,
            history: History::new(),
        }
    }
}

impl Profile {
    /// Load every key, falling back per key when missing or corrupt
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let profile = Self {
            is_authed: persistence::read_bool(store, keys::AUTH),
            coins: persistence::read_u64(store, keys::COINS, 0),
            owned_item_ids: persistence::read_json_array(store, keys::OWNED_ITEMS),
            equipped_button_skin_id: persistence::read_string(
                store,
                keys::EQUIPPED_BUTTON_SKIN,
                shop::DEFAULT_BUTTON_SKIN_ID,
            ),
            equipped_arena_theme_id: persistence::read_string(
                store,
                keys::EQUIPPED_ARENA_THEME,
                shop::DEFAULT_ARENA_THEME_ID,
            ),
            selected_difficulty: store
                .get(keys::SELECTED_DIFFICULTY)
                .map(|id| Difficulty::from_id(&id))
                .unwrap_or_default(),
            history: History::load(store),
        };
        log::info!(
            "Loaded profile ({} coins, {} items owned)",
            profile.coins,
            profile.owned_item_ids.len()
        );
        profile
    }

    /// Write every key
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        self.save_auth(store);
        self.save_wallet(store);
        self.save_equipped(store);
        self.save_difficulty(store);
        self.history.save(store);
    }

    fn save_auth(&self, store: &mut dyn KeyValueStore) {
        let value = if self.is_authed { "true" } else { "false" };
        persistence::write_string(store, keys::AUTH, value);
    }

    fn save_wallet(&self, store: &mut dyn KeyValueStore) {
        persistence::write_string(store, keys::COINS, &self.coins.to_string());
        persistence::write_json(store, keys::OWNED_ITEMS, &self.owned_item_ids);
    }

    fn save_equipped(&self, store: &mut dyn KeyValueStore) {
        persistence::write_string(
            store,
            keys::EQUIPPED_BUTTON_SKIN,
            &self.equipped_button_skin_id,
        );
        persistence::write_string(
            store,
            keys::EQUIPPED_ARENA_THEME,
            &self.equipped_arena_theme_id,
        );
    }

    fn save_difficulty(&self, store: &mut dyn KeyValueStore) {
        persistence::write_string(
            store,
            keys::SELECTED_DIFFICULTY,
            self.selected_difficulty.as_str(),
        );
    }
}

/// Profile plus the store and clock it persists through
pub struct App {
    profile: Profile,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    rng: Pcg32,
}

impl App {
    /// Load the profile from `store`
    pub fn load(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let profile = Profile::load(store.as_ref());
        let rng = Pcg32::seed_from_u64(platform::time_seed(clock.as_ref()));
        Self {
            profile,
            store,
            clock,
            rng,
        }
    }

    /// Platform store and system clock
    pub fn load_default() -> Self {
        Self::load(platform::default_store(), Box::new(platform::SystemClock))
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn coins(&self) -> u64 {
        self.profile.coins
    }

    pub fn is_authed(&self) -> bool {
        self.profile.is_authed
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        self.profile.selected_difficulty
    }

    pub fn history(&self) -> &History {
        &self.profile.history
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn login(&mut self) {
        self.profile.is_authed = true;
        self.profile.save_auth(self.store.as_mut());
        log::info!("Logged in");
    }

    pub fn logout(&mut self) {
        self.profile.is_authed = false;
        self.profile.save_auth(self.store.as_mut());
        log::info!("Logged out");
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.profile.selected_difficulty = difficulty;
        self.profile.save_difficulty(self.store.as_mut());
    }

    pub fn add_coins(&mut self, amount: u64) {
        self.profile.coins = self.profile.coins.saturating_add(amount);
        self.profile.save_wallet(self.store.as_mut());
    }

    /// Credit a finished round and append it to history
    pub fn record_round(&mut self, summary: &RoundSummary) -> HistoryEntry {
        let played_at_ms = self.clock.now_ms();
        let reward = RoundReward::from_summary(summary, played_at_ms, &mut self.rng);

        self.profile.coins = self.profile.coins.saturating_add(reward.coins_earned);
        self.profile.history.push(reward.entry.clone());
        self.profile.save_wallet(self.store.as_mut());
        self.profile.history.save(self.store.as_mut());

        log::info!(
            "Round recorded: score {}, +{} coins ({} total)",
            reward.entry.score,
            reward.coins_earned,
            self.profile.coins
        );
        reward.entry
    }

    /// Record every round completed in a batch of engine events
    pub fn handle_events(&mut self, events: &[RoundEvent]) -> Vec<HistoryEntry> {
        events
            .iter()
            .filter_map(|event| match event {
                RoundEvent::RoundComplete(summary) => Some(self.record_round(summary)),
                _ => None,
            })
            .collect()
    }

    /// Buy an item; nothing changes on failure
    pub fn purchase(&mut self, item_id: &str) -> Result<&'static ShopItem, ShopError> {
        let item = lookup(item_id)?;
        if let Err(err) = item.check_purchase(self.profile.coins, &self.profile.owned_item_ids) {
            log::debug!("Purchase of '{}' refused: {}", item_id, err);
            return Err(err);
        }

        self.profile.coins -= item.cost;
        self.profile.owned_item_ids.push(item.id.to_string());
        self.profile.save_wallet(self.store.as_mut());
        log::info!("Purchased '{}' for {} coins", item.id, item.cost);
        Ok(item)
    }

    /// Equip an owned item into its slot; nothing changes on failure
    pub fn equip(&mut self, item_id: &str) -> Result<&'static ShopItem, ShopError> {
        let item = lookup(item_id)?;
        if !item.is_owned(&self.profile.owned_item_ids) {
            log::debug!("Equip of '{}' refused: {}", item_id, ShopError::NotOwned);
            return Err(ShopError::NotOwned);
        }

        let slot = match item.kind {
            ItemKind::ButtonSkin => &mut self.profile.equipped_button_skin_id,
            ItemKind::ArenaTheme => &mut self.profile.equipped_arena_theme_id,
        };
        *slot = item.id.to_string();
        self.profile.save_equipped(self.store.as_mut());
        log::info!("Equipped '{}'", item.id);
        Ok(item)
    }

    /// Equipped skin, or the built-in one when the stored id is not a skin
    pub fn equipped_button_skin(&self) -> &'static ShopItem {
        equipped_or_default(
            &self.profile.equipped_button_skin_id,
            ItemKind::ButtonSkin,
            shop::DEFAULT_BUTTON_SKIN_ID,
        )
    }

    /// Equipped theme, or the built-in one when the stored id is not a theme
    pub fn equipped_arena_theme(&self) -> &'static ShopItem {
        equipped_or_default(
            &self.profile.equipped_arena_theme_id,
            ItemKind::ArenaTheme,
            shop::DEFAULT_ARENA_THEME_ID,
        )
    }

    pub fn item_status(&self, item: &ShopItem) -> ItemStatus {
        ItemStatus::for_item(
            item,
            self.profile.coins,
            &self.profile.owned_item_ids,
            self.equipped_button_skin().id,
            self.equipped_arena_theme().id,
        )
    }

    pub fn player_stats(&self) -> PlayerStats {
        PlayerStats::from_history(self.profile.history.iter())
    }

    pub fn standings(&self) -> Vec<Standing> {
        leaderboard::standings(PLAYER_NAME, &self.player_stats())
    }
}

fn lookup(item_id: &str) -> Result<&'static ShopItem, ShopError> {
    shop::find_item(item_id).ok_or_else(|| {
        log::debug!("Unknown shop item '{}'", item_id);
        ShopError::UnknownItem(item_id.to_string())
    })
}

fn equipped_or_default(id: &str, kind: ItemKind, default_id: &str) -> &'static ShopItem {
    shop::find_item(id)
        .filter(|item| item.kind == kind)
        .or_else(|| shop::find_item(default_id))
        .unwrap_or(&shop::categories()[0].items[0])
}
