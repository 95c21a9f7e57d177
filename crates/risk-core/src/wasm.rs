//! WebAssembly bindings for the Risk engine.
//!
//! This module exposes a simulated game to JavaScript through wasm-bindgen.
//! Every seat is played by a seeded `RandomBot`; the browser only watches.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::bot::Seats;
#[cfg(feature = "wasm")]
use crate::config::GameConfig;
#[cfg(feature = "wasm")]
use crate::game::GameState;
#[cfg(feature = "wasm")]
use crate::player::PlayerColor;
#[cfg(feature = "wasm")]
use crate::territory::Territory;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn parse_territory(name: &str) -> Result<Territory, JsValue> {
    name.parse::<Territory>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
    seats: Seats,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a new game with the specified number of players
    #[wasm_bindgen(constructor)]
    pub fn new(player_count: u8, seed: Option<u64>) -> Result<WasmGame, JsValue> {
        let config = GameConfig {
            player_count,
            seed,
            ..GameConfig::default()
        };
        let bot_seed = seed.unwrap_or_else(rand::random);
        let state = GameState::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(WasmGame {
            state,
            seats: Seats::random(player_count, bot_seed),
        })
    }

    /// Run one phase, returns events JSON or error
    pub fn step(&mut self) -> Result<String, JsValue> {
        match self.state.step(&mut self.seats) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Step failed: {}", e))),
        }
    }

    /// Run the rest of the current player's turn, returns events JSON or error
    #[wasm_bindgen(js_name = playTurn)]
    pub fn play_turn(&mut self) -> Result<String, JsValue> {
        match self.state.play_turn(&mut self.seats) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Turn failed: {}", e))),
        }
    }

    /// Get the current game state as JSON (for rendering)
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Owner of a territory by display name
    pub fn owner(&self, name: &str) -> Result<Option<u8>, JsValue> {
        Ok(self.state.owner(parse_territory(name)?))
    }

    /// Troops on a territory by display name
    pub fn troops(&self, name: &str) -> Result<u32, JsValue> {
        Ok(self.state.troops(parse_territory(name)?))
    }

    /// Neighbor names as a JSON array
    pub fn neighbors(&self, name: &str) -> Result<String, JsValue> {
        let names: Vec<&str> = self
            .state
            .neighbors_of(parse_territory(name)?)
            .iter()
            .map(|t| t.name())
            .collect();
        Ok(serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Get a specific player's stats as JSON
    #[wasm_bindgen(js_name = playerStats)]
    pub fn player_stats(&self, player: u8) -> String {
        serde_json::to_string(&self.state.player_stats(player)).unwrap_or_else(|_| "{}".to_string())
    }

    /// RGB color for a seat, as `0xRRGGBB`
    #[wasm_bindgen(js_name = playerColor)]
    pub fn player_color(&self, player: u8) -> u32 {
        PlayerColor::for_player(player).hex_code()
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Get the winner (if game is finished)
    pub fn winner(&self) -> Option<u8> {
        self.state.winner()
    }
}
