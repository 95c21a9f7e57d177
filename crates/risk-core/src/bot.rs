//! Decision policies that drive the engine.
//!
//! This module provides:
//! - `Strategy`: the seam between the rule engine and whoever decides
//! - `RandomBot`: the reference policy (random, with a weak-target attack)
//! - `PassiveBot`: reinforces and never moves, handy for scripted seats
//! - `Seats`: one strategy per player

use crate::actions::{AttackChoice, FortifyMove, Placement};
use crate::board::Board;
use crate::connectivity::{fortify_amount_range, fortify_origins, preferred_destinations};
use crate::player::PlayerId;
use crate::territory::Territory;
use rand::prelude::*;

/// Makes every decision the engine delegates during a turn.
///
/// Strategies only see the board. Decisions the engine rejects surface as
/// `GameError::IllegalDecision` from `GameState::step`.
pub trait Strategy {
    /// Split `troops` new troops over the player's territories.
    /// The placements must sum to exactly `troops`.
    fn place_reinforcements(&mut self, board: &Board, player: PlayerId, troops: u32)
        -> Vec<Placement>;

    /// Pick the next attack, or `None` to stop attacking
    fn choose_attack(&mut self, board: &Board, player: PlayerId) -> Option<AttackChoice>;

    /// Pick the single end-of-turn troop move, or `None` to skip it
    fn choose_fortify(&mut self, board: &Board, player: PlayerId) -> Option<FortifyMove>;
}

/// Territories worth reinforcing: the frontier, or everything when the
/// player has no frontier left
fn reinforcement_targets(board: &Board, player: PlayerId) -> Vec<Territory> {
    let frontier = board.frontier_of(player);
    if frontier.is_empty() {
        board.territories_of(player)
    } else {
        frontier
    }
}

/// Reference strategy with its own seeded RNG
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomBot {
    fn place_reinforcements(
        &mut self,
        board: &Board,
        player: PlayerId,
        troops: u32,
    ) -> Vec<Placement> {
        let targets = reinforcement_targets(board, player);
        let mut placements = Vec::new();
        let mut remaining = troops;

        while remaining > 0 {
            let Some(&territory) = targets.choose(&mut self.rng) else {
                break;
            };
            let amount = self.rng.gen_range(1..=remaining);
            placements.push(Placement::new(territory, amount));
            remaining -= amount;
        }

        placements
    }

    fn choose_attack(&mut self, board: &Board, player: PlayerId) -> Option<AttackChoice> {
        let mut targets: Vec<Territory> = board
            .territories_of(player)
            .into_iter()
            .filter(|t| board.troops(*t) > 1)
            .flat_map(|t| board.enemy_neighbors(t, player))
            .collect();
        targets.sort();
        targets.dedup();

        let weakest = targets.iter().map(|t| board.troops(*t)).min()?;
        let weakest_targets: Vec<Territory> = targets
            .into_iter()
            .filter(|t| board.troops(*t) == weakest)
            .collect();
        let &to = weakest_targets.choose(&mut self.rng)?;

        // max_by_key keeps the last maximum, so reverse to keep the first
        let from = to
            .neighbors()
            .iter()
            .rev()
            .copied()
            .filter(|n| board.is_owned_by(*n, player) && board.troops(*n) > 1)
            .max_by_key(|n| board.troops(*n))?;

        Some(AttackChoice { from, to })
    }

    fn choose_fortify(&mut self, board: &Board, player: PlayerId) -> Option<FortifyMove> {
        let origins = fortify_origins(board, player);
        let &from = origins.choose(&mut self.rng)?;
        let &to = preferred_destinations(board, from).choose(&mut self.rng)?;
        let range = fortify_amount_range(board, from)?;
        let troops = self.rng.gen_range(range);
        Some(FortifyMove { from, to, troops })
    }
}

/// Puts every reinforcement on its first frontier territory and never
/// attacks or fortifies
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveBot;

impl Strategy for PassiveBot {
    fn place_reinforcements(
        &mut self,
        board: &Board,
        player: PlayerId,
        troops: u32,
    ) -> Vec<Placement> {
        reinforcement_targets(board, player)
            .first()
            .map(|t| vec![Placement::new(*t, troops)])
            .unwrap_or_default()
    }

    fn choose_attack(&mut self, _board: &Board, _player: PlayerId) -> Option<AttackChoice> {
        None
    }

    fn choose_fortify(&mut self, _board: &Board, _player: PlayerId) -> Option<FortifyMove> {
        None
    }
}

/// A strategy that can be moved between threads with its game
pub type BoxedStrategy = Box<dyn Strategy + Send + Sync>;

/// One strategy per seat, dispatched by player id
pub struct Seats {
    seats: Vec<BoxedStrategy>,
}

impl Seats {
    /// Seat `i` (0-based) controls player `i + 1`
    pub fn new(seats: Vec<BoxedStrategy>) -> Self {
        Self { seats }
    }

    /// Every seat gets a `RandomBot` seeded from `seed` and its player id
    pub fn random(player_count: u8, seed: u64) -> Self {
        Self::new(
            (1..=player_count)
                .map(|p| {
                    Box::new(RandomBot::with_seed(seed.wrapping_add(p as u64))) as BoxedStrategy
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    fn seat(&mut self, player: PlayerId) -> &mut dyn Strategy {
        let index = (player as usize).saturating_sub(1);
        assert!(index < self.seats.len(), "no strategy seated for player {}", player);
        self.seats[index].as_mut()
    }
}

impl Strategy for Seats {
    fn place_reinforcements(
        &mut self,
        board: &Board,
        player: PlayerId,
        troops: u32,
    ) -> Vec<Placement> {
        self.seat(player).place_reinforcements(board, player, troops)
    }

    fn choose_attack(&mut self, board: &Board, player: PlayerId) -> Option<AttackChoice> {
        self.seat(player).choose_attack(board, player)
    }

    fn choose_fortify(&mut self, board: &Board, player: PlayerId) -> Option<FortifyMove> {
        self.seat(player).choose_fortify(board, player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::fortify_destinations;
    use crate::territory::{Continent, Territory as T};
    use pretty_assertions::assert_eq;

    fn duel() -> Board {
        let mut board = Board::new();
        board.set_territory(T::Alaska, Some(1), 5);
        board.set_territory(T::Alberta, Some(1), 2);
        board.set_territory(T::NorthwestTerritory, Some(1), 1);
        board.set_territory(T::Kamchatka, Some(2), 4);
        board.set_territory(T::Ontario, Some(2), 1);
        board.set_territory(T::WesternUnitedStates, Some(2), 3);
        board
    }

    #[test]
    fn test_reinforcements_sum_and_stay_on_frontier() {
        let mut bot = RandomBot::with_seed(42);
        let mut board = Board::new();
        for t in Continent::Australia.territories() {
            board.set_territory(*t, Some(1), 1);
        }
        board.set_territory(T::Siam, Some(2), 1);

        for troops in 1..20 {
            let placements = bot.place_reinforcements(&board, 1, troops);
            assert_eq!(placements.iter().map(|p| p.troops).sum::<u32>(), troops);
            assert!(placements.iter().all(|p| p.territory == T::Indonesia && p.troops > 0));
        }
    }

    #[test]
    fn test_attack_targets_weakest_from_strongest() {
        let mut bot = RandomBot::with_seed(1);
        let board = duel();
        // Ontario (1 troop) borders Alberta and Northwest Territory;
        // only Alberta can attack
        let choice = bot.choose_attack(&board, 1).unwrap();
        assert_eq!(
            choice,
            AttackChoice {
                from: T::Alberta,
                to: T::Ontario,
            }
        );
    }

    #[test]
    fn test_attack_from_strongest_neighbor() {
        let mut bot = RandomBot::with_seed(1);
        let mut board = duel();
        board.set_territory(T::Ontario, Some(2), 9);
        board.set_territory(T::WesternUnitedStates, Some(2), 9);
        // Kamchatka is now the weakest target; Alaska is its only owned neighbor
        let choice = bot.choose_attack(&board, 1).unwrap();
        assert_eq!(choice.to, T::Kamchatka);
        assert_eq!(choice.from, T::Alaska);
    }

    #[test]
    fn test_no_attack_without_troops() {
        let mut bot = RandomBot::with_seed(1);
        let mut board = duel();
        board.set_territory(T::Alaska, Some(1), 1);
        board.set_territory(T::Alberta, Some(1), 1);
        assert_eq!(bot.choose_attack(&board, 1), None);
    }

    #[test]
    fn test_fortify_is_always_legal() {
        let mut bot = RandomBot::with_seed(9);
        let board = duel();
        for _ in 0..50 {
            let mv = bot.choose_fortify(&board, 1).unwrap();
            assert!(fortify_destinations(&board, mv.from).contains(&mv.to));
            let range = fortify_amount_range(&board, mv.from).unwrap();
            assert!(range.contains(&mv.troops));
        }
    }

    #[test]
    fn test_seats_dispatch_by_player() {
        let mut seats = Seats::new(vec![
            Box::new(PassiveBot),
            Box::new(RandomBot::with_seed(3)),
        ]);
        let board = duel();
        assert_eq!(seats.len(), 2);
        assert_eq!(seats.choose_attack(&board, 1), None);
        assert!(seats.choose_attack(&board, 2).is_some());
    }
}
