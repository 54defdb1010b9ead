//! Browser bindings
//!
//! The host page owns rendering and the animation frame loop; it forwards
//! input here, calls `tick` each frame and draws from `snapshot_json`.

use glam::{UVec2, Vec2};
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::consts::DEFAULT_ARENA_SIZE;
use crate::difficulty::Difficulty;
use crate::platform;
use crate::shop;
use crate::sim::{GameState, KeyPress, TickInput, tick};

/// Module start hook: logger and panic hook, once per page
#[wasm_bindgen(start)]
pub fn wasm_main() {
    platform::web::init_logging();
    log::info!("Clickaway starting...");
}

/// One mounted game view plus the persisted profile
#[wasm_bindgen]
pub struct WebGame {
    app: App,
    state: GameState,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let app = App::load_default();
        let seed = platform::time_seed(&platform::SystemClock);
        let state = GameState::new(app.selected_difficulty(), DEFAULT_ARENA_SIZE, seed);
        log::info!("Clickaway initialized with seed: {}", seed);
        WebGame {
            app,
            state,
            input: TickInput::default(),
        }
    }

    /// Queue a round start for the next tick
    pub fn start(&mut self) {
        self.input.start = true;
    }

    /// Queue a press at arena-relative coordinates
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.input.pointer_down.push(Vec2::new(x, y));
    }

    pub fn key_down(&mut self, key: String, repeat: bool) {
        self.input.keys.push(KeyPress { key, repeat });
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.input.arena_size = Some(UVec2::new(width, height));
    }

    /// Change difficulty now; false mid-round or for unknown ids
    pub fn select_difficulty(&mut self, id: &str) -> bool {
        let Some(difficulty) = Difficulty::parse(id) else {
            log::debug!("Unknown difficulty '{}'", id);
            return false;
        };
        match self.state.select_difficulty(difficulty) {
            Ok(()) => {
                self.app.select_difficulty(difficulty);
                true
            }
            Err(err) => {
                log::debug!("Difficulty change rejected: {}", err);
                false
            }
        }
    }

    /// Apply queued input and advance by `dt_ms`; records finished rounds
    pub fn tick(&mut self, dt_ms: f64) {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input, dt_ms.max(0.0) as u64);
        let events = self.state.drain_events();
        self.app.handle_events(&events);
    }

    /// Cancel every timer (view torn down)
    pub fn unmount(&mut self) {
        self.state.unmount();
    }

    pub fn snapshot_json(&self) -> String {
        to_json(&self.state.snapshot())
    }

    pub fn profile_json(&self) -> String {
        to_json(self.app.profile())
    }

    pub fn standings_json(&self) -> String {
        to_json(&self.app.standings())
    }

    pub fn shop_json(&self) -> String {
        let cards: Vec<_> = shop::items()
            .map(|item| serde_json::json!({ "item": item, "status": self.app.item_status(item) }))
            .collect();
        to_json(&cards)
    }

    pub fn purchase(&mut self, id: &str) -> bool {
        self.app.purchase(id).is_ok()
    }

    pub fn equip(&mut self, id: &str) -> bool {
        self.app.equip(id).is_ok()
    }

    pub fn login(&mut self) {
        self.app.login();
    }

    pub fn logout(&mut self) {
        self.app.logout();
    }

    pub fn coins(&self) -> f64 {
        self.app.coins() as f64
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::warn!("Snapshot encoding failed: {}", err);
        "null".to_string()
    })
}
