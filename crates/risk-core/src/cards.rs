//! Territory cards and the deck that tracks who holds them.
//!
//! This module contains:
//! - Card kinds (infantry, cavalry, artillery and wildcards)
//! - The fixed 44-card deck with per-card holder tracking
//! - Set scoring for three-card redemptions

use crate::player::PlayerId;
use crate::territory::{Territory, TERRITORY_COUNT};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of wildcards in the deck
pub const WILDCARD_COUNT: usize = 2;

/// Total deck size: one card per territory plus the wildcards
pub const DECK_SIZE: usize = TERRITORY_COUNT + WILDCARD_COUNT;

/// The symbol printed on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Infantry,
    Cavalry,
    Artillery,
    /// Joker, matches any other kind when forming a set
    Wild,
}

impl CardKind {
    /// Bonus for three cards of this kind
    fn matching_set_score(self) -> u32 {
        match self {
            CardKind::Infantry => 4,
            CardKind::Cavalry => 6,
            CardKind::Artillery => 8,
            CardKind::Wild => ONE_OF_EACH_SCORE,
        }
    }
}

/// Bonus for one infantry, one cavalry and one artillery
pub const ONE_OF_EACH_SCORE: u32 = 10;

/// Identity of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardId {
    Territory(Territory),
    Wild(u8),
}

impl CardId {
    /// The territory pictured on the card, if any
    pub fn territory(self) -> Option<Territory> {
        match self {
            CardId::Territory(t) => Some(t),
            CardId::Wild(_) => None,
        }
    }
}

/// A single card and its current holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    /// `None` while the card sits in the unowned pool
    pub holder: Option<PlayerId>,
}

impl Card {
    pub fn is_wild(&self) -> bool {
        self.kind == CardKind::Wild
    }
}

/// Score a three-card combination.
///
/// Wildcards stand in for whatever kind completes the set: when the
/// non-wild cards are pairwise different the set counts as one of each,
/// when they all agree it counts as three of that kind.
pub fn score_set(kinds: [CardKind; 3]) -> u32 {
    let fixed: Vec<CardKind> = kinds.into_iter().filter(|k| *k != CardKind::Wild).collect();

    let pairwise_distinct = fixed
        .iter()
        .enumerate()
        .all(|(i, a)| fixed[i + 1..].iter().all(|b| a != b));
    if pairwise_distinct {
        return ONE_OF_EACH_SCORE;
    }

    match fixed.first() {
        Some(&first) if fixed.iter().all(|k| *k == first) => first.matching_set_score(),
        _ => 0,
    }
}

/// The full deck. Cards never leave it; only their holder changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Create the standard deck with every card unowned
    pub fn standard() -> Self {
        let mut cards: Vec<Card> = Territory::ALL
            .into_iter()
            .map(|t| Card {
                id: CardId::Territory(t),
                kind: t.card_kind(),
                holder: None,
            })
            .collect();

        cards.extend((0..WILDCARD_COUNT as u8).map(|i| Card {
            id: CardId::Wild(i),
            kind: CardKind::Wild,
            holder: None,
        }));

        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card by identity
    pub fn get(&self, id: CardId) -> &Card {
        self.cards
            .iter()
            .find(|c| c.id == id)
            .unwrap_or_else(|| panic!("card {:?} is not part of the deck", id))
    }

    /// All cards in deck order
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards held by a player, in deck order
    pub fn hand_of(&self, player: PlayerId) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| c.holder == Some(player))
            .copied()
            .collect()
    }

    /// Number of cards a player holds
    pub fn count_of(&self, player: PlayerId) -> usize {
        self.cards.iter().filter(|c| c.holder == Some(player)).count()
    }

    /// Number of cards nobody holds
    pub fn unowned_count(&self) -> usize {
        self.cards.iter().filter(|c| c.holder.is_none()).count()
    }

    /// Hand a uniformly random unowned card to a player.
    /// Returns `None` when the pool is exhausted.
    pub fn award_random<R: Rng + ?Sized>(&mut self, player: PlayerId, rng: &mut R) -> Option<Card> {
        let pool: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.holder.is_none())
            .map(|(i, _)| i)
            .collect();

        let &index = pool.choose(rng)?;
        self.cards[index].holder = Some(player);
        Some(self.cards[index])
    }

    /// Move every card held by `from` into the hand of `to`.
    /// Returns the transferred card identities.
    pub fn transfer_all(&mut self, from: PlayerId, to: PlayerId) -> Vec<CardId> {
        let mut moved = Vec::new();
        for card in self.cards.iter_mut().filter(|c| c.holder == Some(from)) {
            card.holder = Some(to);
            moved.push(card.id);
        }
        moved
    }

    /// Return cards to the unowned pool
    pub fn release(&mut self, ids: &[CardId]) {
        for card in self.cards.iter_mut().filter(|c| ids.contains(&c.id)) {
            card.holder = None;
        }
    }

    /// Give a specific card to a player (setup helper for scripted games)
    pub fn give(&mut self, id: CardId, player: PlayerId) {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .unwrap_or_else(|| panic!("card {:?} is not part of the deck", id));
        card.holder = Some(player);
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}
