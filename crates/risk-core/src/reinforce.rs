//! Reinforcement troops: territory and continent bonuses, card sets, and
//! validation of where new troops go.

use crate::actions::Placement;
use crate::board::Board;
use crate::cards::{score_set, Card, CardId, Deck};
use crate::game::GameError;
use crate::player::PlayerId;
use crate::territory::Territory;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fewest troops a player ever receives from territory count
pub const MIN_TERRITORY_BONUS: u32 = 3;

/// Troops placed on a redeemed card's territory when its holder owns it
pub const PICTURED_TERRITORY_BONUS: u32 = 2;

/// `max(3, owned / 3)`
pub fn territory_bonus(board: &Board, player: PlayerId) -> u32 {
    (board.territory_count(player) / 3).max(MIN_TERRITORY_BONUS)
}

/// Sum of bonuses of every fully owned continent
pub fn continent_bonus(board: &Board, player: PlayerId) -> u32 {
    board.continents_of(player).iter().map(|c| c.bonus()).sum()
}

/// Troops a player receives at the start of a turn, before cards
pub fn bonus_troops(board: &Board, player: PlayerId) -> u32 {
    territory_bonus(board, player) + continent_bonus(board, player)
}

/// Three cards chosen for redemption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    pub cards: [CardId; 3],
    pub score: u32,
    pub has_wild: bool,
}

/// Pick the highest-scoring three cards from a hand.
///
/// On equal scores a set without a wildcard wins; otherwise the first set
/// found keeps its place. Returns `None` when no set scores anything.
pub fn best_set(hand: &[Card]) -> Option<CardSet> {
    let mut best: Option<CardSet> = None;

    for i in 0..hand.len() {
        for j in i + 1..hand.len() {
            for k in j + 1..hand.len() {
                let trio = [hand[i], hand[j], hand[k]];
                let candidate = CardSet {
                    cards: trio.map(|c| c.id),
                    score: score_set(trio.map(|c| c.kind)),
                    has_wild: trio.iter().any(Card::is_wild),
                };

                let better = match &best {
                    None => true,
                    Some(current) => {
                        candidate.score > current.score
                            || (candidate.score == current.score
                                && current.has_wild
                                && !candidate.has_wild)
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }
        }
    }

    best.filter(|set| set.score > 0)
}

/// Result of handing in a card set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub player: PlayerId,
    pub cards: [CardId; 3],
    /// Troops the player gets to distribute
    pub bonus: u32,
    /// Troops already placed on pictured territories
    pub territory_bonuses: Vec<(Territory, u32)>,
}

/// Return a set to the pool and place the pictured-territory bonus
pub fn redeem(board: &mut Board, deck: &mut Deck, player: PlayerId, set: &CardSet) -> Redemption {
    for id in set.cards {
        assert_eq!(
            deck.get(id).holder,
            Some(player),
            "player {} does not hold {:?}",
            player,
            id
        );
    }

    deck.release(&set.cards);

    let mut territory_bonuses = Vec::new();
    for territory in set.cards.iter().filter_map(|id| id.territory()) {
        if board.is_owned_by(territory, player) {
            board.add_troops(territory, PICTURED_TERRITORY_BONUS);
            territory_bonuses.push((territory, PICTURED_TERRITORY_BONUS));
        }
    }

    debug!(player, score = set.score, ?territory_bonuses, "Card set redeemed");

    Redemption {
        player,
        cards: set.cards,
        bonus: set.score,
        territory_bonuses,
    }
}

/// Redeem the best set if the player holds at least `min_cards` cards
pub fn card_set_bonus(
    board: &mut Board,
    deck: &mut Deck,
    player: PlayerId,
    min_cards: usize,
) -> Option<Redemption> {
    if deck.count_of(player) < min_cards {
        return None;
    }
    let set = best_set(&deck.hand_of(player))?;
    Some(redeem(board, deck, player, &set))
}

/// Check that placements put exactly `total` troops on the player's territories
pub fn validate_placements(
    board: &Board,
    player: PlayerId,
    placements: &[Placement],
    total: u32,
) -> Result<(), GameError> {
    for placement in placements {
        if !board.is_owned_by(placement.territory, player) {
            return Err(GameError::IllegalDecision(format!(
                "player {} cannot reinforce {}",
                player, placement.territory
            )));
        }
        if placement.troops == 0 {
            return Err(GameError::IllegalDecision(format!(
                "empty placement on {}",
                placement.territory
            )));
        }
    }

    let placed: u32 = placements.iter().map(|p| p.troops).sum();
    if placed != total {
        return Err(GameError::IllegalDecision(format!(
            "placed {} troops, expected {}",
            placed, total
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;
    use crate::territory::{Continent, Territory as T};
    use pretty_assertions::assert_eq;

    fn card(id: CardId, kind: CardKind) -> Card {
        Card {
            id,
            kind,
            holder: Some(1),
        }
    }

    fn territory_card(t: Territory) -> Card {
        card(CardId::Territory(t), t.card_kind())
    }

    fn own_continent(board: &mut Board, continent: Continent, player: PlayerId) {
        for t in continent.territories() {
            board.set_territory(*t, Some(player), 1);
        }
    }

    #[test]
    fn test_minimum_bonus() {
        let mut board = Board::new();
        board.set_territory(T::Peru, Some(1), 1);
        assert_eq!(bonus_troops(&board, 1), 3);
    }

    #[test]
    fn test_territory_bonus_scales() {
        let mut board = Board::new();
        for t in Territory::ALL.iter().take(14) {
            board.set_territory(*t, Some(1), 1);
        }
        assert_eq!(territory_bonus(&board, 1), 4);
    }

    #[test]
    fn test_australia_bonus() {
        let mut board = Board::new();
        own_continent(&mut board, Continent::Australia, 1);
        assert_eq!(continent_bonus(&board, 1), 2);
        assert_eq!(bonus_troops(&board, 1), 5);
    }

    #[test]
    fn test_asia_bonus() {
        let mut board = Board::new();
        own_continent(&mut board, Continent::Asia, 2);
        // 12 territories -> 4, plus 7
        assert_eq!(bonus_troops(&board, 2), 11);
    }

    #[test]
    fn test_best_set_needs_three_cards() {
        let hand = vec![territory_card(T::Peru), territory_card(T::Japan)];
        assert_eq!(best_set(&hand), None);
    }

    #[test]
    fn test_best_set_none_without_score() {
        let hand = vec![
            card(CardId::Territory(T::Peru), CardKind::Infantry),
            card(CardId::Territory(T::Japan), CardKind::Infantry),
            card(CardId::Territory(T::Siam), CardKind::Cavalry),
        ];
        assert_eq!(best_set(&hand), None);
    }

    #[test]
    fn test_best_set_picks_highest() {
        let hand = vec![
            card(CardId::Territory(T::Peru), CardKind::Infantry),
            card(CardId::Territory(T::Japan), CardKind::Infantry),
            card(CardId::Territory(T::Siam), CardKind::Infantry),
            card(CardId::Territory(T::Ural), CardKind::Artillery),
            card(CardId::Territory(T::Egypt), CardKind::Cavalry),
        ];
        let set = best_set(&hand).unwrap();
        assert_eq!(set.score, 10);
        assert!(set.cards.contains(&CardId::Territory(T::Ural)));
        assert!(set.cards.contains(&CardId::Territory(T::Egypt)));
    }

    #[test]
    fn test_best_set_prefers_no_wildcard_on_tie() {
        let hand = vec![
            card(CardId::Wild(0), CardKind::Wild),
            card(CardId::Territory(T::Peru), CardKind::Infantry),
            card(CardId::Territory(T::Japan), CardKind::Cavalry),
            card(CardId::Territory(T::Siam), CardKind::Artillery),
        ];
        let set = best_set(&hand).unwrap();
        assert_eq!(set.score, 10);
        assert!(!set.has_wild);
    }

    #[test]
    fn test_redeem_returns_cards_and_places_bonus() {
        let mut board = Board::new();
        board.set_territory(T::Peru, Some(1), 1);
        board.set_territory(T::Japan, Some(2), 1);

        let mut deck = Deck::standard();
        let ids = [
            CardId::Territory(T::Peru),
            CardId::Territory(T::Japan),
            CardId::Wild(0),
        ];
        for id in ids {
            deck.give(id, 1);
        }

        let set = CardSet {
            cards: ids,
            score: 10,
            has_wild: true,
        };
        let redemption = redeem(&mut board, &mut deck, 1, &set);

        assert_eq!(redemption.bonus, 10);
        assert_eq!(redemption.territory_bonuses, vec![(T::Peru, 2)]);
        assert_eq!(board.troops(T::Peru), 3);
        assert_eq!(board.troops(T::Japan), 1);
        assert_eq!(deck.count_of(1), 0);
    }

    #[test]
    fn test_card_set_bonus_threshold() {
        let mut board = Board::new();
        let mut deck = Deck::standard();
        let infantry: Vec<Territory> = Territory::ALL
            .into_iter()
            .filter(|t| t.card_kind() == CardKind::Infantry)
            .take(4)
            .collect();
        for t in &infantry {
            deck.give(CardId::Territory(*t), 1);
        }

        assert_eq!(card_set_bonus(&mut board, &mut deck, 1, 5), None);

        deck.give(CardId::Wild(1), 1);
        let redemption = card_set_bonus(&mut board, &mut deck, 1, 5).unwrap();
        // three infantry beat infantry + infantry + wild on the tie
        assert_eq!(redemption.bonus, 4);
        assert!(!redemption.cards.contains(&CardId::Wild(1)));
        assert_eq!(deck.count_of(1), 2);
    }

    #[test]
    fn test_validate_placements() {
        let mut board = Board::new();
        board.set_territory(T::Peru, Some(1), 1);
        board.set_territory(T::Brazil, Some(2), 1);

        let ok = [Placement::new(T::Peru, 3)];
        assert!(validate_placements(&board, 1, &ok, 3).is_ok());

        let short = [Placement::new(T::Peru, 2)];
        assert!(validate_placements(&board, 1, &short, 3).is_err());

        let foreign = [Placement::new(T::Brazil, 3)];
        assert!(validate_placements(&board, 1, &foreign, 3).is_err());

        let empty = [Placement::new(T::Peru, 0), Placement::new(T::Peru, 3)];
        assert!(validate_placements(&board, 1, &empty, 3).is_err());
    }
}
