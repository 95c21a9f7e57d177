//! Game configuration.

use crate::player::{MAX_PLAYERS, MIN_PLAYERS};
use serde::{Deserialize, Serialize};

/// Chance that an attacker leaves one extra troop behind after a conquest.
///
/// Only applies when more than `threshold` troops could move in. This is a
/// house rule; set `probability` to `0.0` to always move everything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConquestFallback {
    pub threshold: u32,
    pub probability: f64,
}

impl ConquestFallback {
    /// Move every available troop into conquered territory
    pub const DISABLED: ConquestFallback = ConquestFallback {
        threshold: u32::MAX,
        probability: 0.0,
    };
}

impl Default for ConquestFallback {
    fn default() -> Self {
        Self {
            threshold: 3,
            probability: 0.5,
        }
    }
}

/// Settings for a single game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of seats, `MIN_PLAYERS..=MAX_PLAYERS`
    pub player_count: u8,
    /// RNG seed; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Troops each player places during setup
    pub initial_troops_per_player: u32,
    pub conquest_fallback: ConquestFallback,
    /// Cards a player must hold before a set is redeemed
    pub min_cards_for_redemption: usize,
    /// Redemption passes granted to a player who eliminates an opponent
    pub elimination_bonus_passes: u32,
}

impl GameConfig {
    /// Default settings for `player_count` players
    pub fn with_players(player_count: u8) -> Self {
        Self {
            player_count,
            ..Default::default()
        }
    }

    /// Same config with a fixed seed
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn has_valid_player_count(&self) -> bool {
        (MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count)
    }

    /// Setup gives every player one territory, so each needs a troop for it
    pub fn has_valid_setup_troops(&self) -> bool {
        self.initial_troops_per_player >= 1
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: MAX_PLAYERS,
            seed: None,
            initial_troops_per_player: 20,
            conquest_fallback: ConquestFallback::default(),
            min_cards_for_redemption: 5,
            elimination_bonus_passes: 2,
        }
    }
}
