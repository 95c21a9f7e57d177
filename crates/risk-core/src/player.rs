//! Player identity and derived per-player summaries.
//!
//! Players carry no state of their own: everything about a player is
//! derived from the board (territories, troops) and the deck (cards).

use serde::{Deserialize, Serialize};

/// Player identifier, `1..=MAX_PLAYERS`
pub type PlayerId = u8;

/// Most players a game supports
pub const MAX_PLAYERS: u8 = 6;

/// Fewest players a game supports
pub const MIN_PLAYERS: u8 = 2;

/// Player color for UI rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl PlayerColor {
    /// Get color for a player id
    pub fn for_player(id: PlayerId) -> Self {
        match id.saturating_sub(1) % MAX_PLAYERS {
            0 => PlayerColor::Red,
            1 => PlayerColor::Blue,
            2 => PlayerColor::Green,
            3 => PlayerColor::Yellow,
            4 => PlayerColor::Purple,
            _ => PlayerColor::Orange,
        }
    }

    /// RGB code for rendering
    pub fn hex_code(&self) -> u32 {
        match self {
            PlayerColor::Red => 0xD62828,
            PlayerColor::Blue => 0x1D4ED8,
            PlayerColor::Green => 0x2E9E44,
            PlayerColor::Yellow => 0xE9C400,
            PlayerColor::Purple => 0x7B3FA0,
            PlayerColor::Orange => 0xF28C28,
        }
    }
}

/// Summary shown in a renderer's info panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: PlayerId,
    pub troop_total: u32,
    pub territory_count: u32,
    pub card_count: u32,
}

impl PlayerStats {
    /// A player with no territories is out of the game
    pub fn is_eliminated(&self) -> bool {
        self.territory_count == 0
    }
}

/// All valid ids for a game with `player_count` players
pub fn player_ids(player_count: u8) -> impl Iterator<Item = PlayerId> {
    1..=player_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_are_distinct_per_seat() {
        let colors: Vec<PlayerColor> = player_ids(MAX_PLAYERS)
            .map(PlayerColor::for_player)
            .collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(PlayerColor::for_player(1), PlayerColor::Red);
        assert_eq!(PlayerColor::for_player(6), PlayerColor::Orange);
    }

    #[test]
    fn test_eliminated_stats() {
        let stats = PlayerStats {
            player: 4,
            ..Default::default()
        };
        assert!(stats.is_eliminated());
    }
}
