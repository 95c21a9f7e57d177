//! Decisions a strategy hands to the engine, and the events the engine
//! emits while applying them.
//!
//! Renderers consume `GameEvent`s to animate state changes; they never
//! feed anything back into the engine.

use crate::cards::CardId;
use crate::game::TurnPhase;
use crate::player::PlayerId;
use crate::territory::Territory;
use serde::{Deserialize, Serialize};

// ==================== Decisions ====================

/// Put `troops` new troops on `territory`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub territory: Territory,
    pub troops: u32,
}

impl Placement {
    pub fn new(territory: Territory, troops: u32) -> Self {
        Self { territory, troops }
    }
}

/// Attack `to` from `from`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackChoice {
    pub from: Territory,
    pub to: Territory,
}

/// Move `troops` from `from` to `to` through owned territory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortifyMove {
    pub from: Territory,
    pub to: Territory,
    pub troops: u32,
}

/// The territories a renderer should highlight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub origin: Option<Territory>,
    pub target: Option<Territory>,
}

impl Selection {
    pub fn between(origin: Territory, target: Territory) -> Self {
        Self {
            origin: Some(origin),
            target: Some(target),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.origin.is_none() && self.target.is_none()
    }
}

// ==================== Events ====================

/// Events that occur as the engine advances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A territory gained a troop during setup
    TerritoryClaimed {
        territory: Territory,
        player: PlayerId,
        troops: u32,
    },

    /// Troops granted at the start of a turn
    ReinforcementsGranted {
        player: PlayerId,
        territory_bonus: u32,
        continent_bonus: u32,
        card_bonus: u32,
    },

    /// New troops were placed
    Reinforced {
        player: PlayerId,
        territory: Territory,
        troops: u32,
    },

    /// Three cards went back to the pool for a troop bonus
    CardSetRedeemed {
        player: PlayerId,
        cards: [CardId; 3],
        bonus: u32,
        /// Extra troops placed directly on pictured territories the player owns
        territory_bonuses: Vec<(Territory, u32)>,
    },

    /// One round of dice was resolved
    AttackResolved {
        attacker: PlayerId,
        defender: PlayerId,
        from: Territory,
        to: Territory,
        attacker_rolls: Vec<u8>,
        defender_rolls: Vec<u8>,
        attacker_losses: u32,
        defender_losses: u32,
    },

    /// A territory changed hands
    TerritoryConquered {
        player: PlayerId,
        previous_owner: PlayerId,
        from: Territory,
        territory: Territory,
        troops_moved: u32,
    },

    /// A card was drawn from the pool
    CardAwarded { player: PlayerId, card: CardId },

    /// A player lost their last territory
    PlayerEliminated {
        player: PlayerId,
        by: PlayerId,
        cards_transferred: Vec<CardId>,
    },

    /// Troops moved between connected territories
    Fortified {
        player: PlayerId,
        from: Territory,
        to: Territory,
        troops: u32,
    },

    /// A phase ended without any action
    PhaseSkipped { player: PlayerId, phase: TurnPhase },

    /// Turn ended
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
        turn: u32,
    },

    /// A player owns every claimed territory
    GameWon { player: PlayerId },
}

impl GameEvent {
    /// Whether the event changes who owns a territory
    pub fn changes_ownership(&self) -> bool {
        matches!(
            self,
            GameEvent::TerritoryClaimed { .. } | GameEvent::TerritoryConquered { .. }
        )
    }
}
