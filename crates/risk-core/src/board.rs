//! Board state: who owns each territory and how many troops sit there.
//!
//! This module contains:
//! - Per-territory mutable state (owner, troop count)
//! - Ownership queries (territories, continents, frontier, winner)
//! - Initial population of an empty board
//! - A JSON-friendly snapshot for renderers
//!
//! The adjacency itself is static and lives in [`crate::territory`].

use crate::player::{player_ids, PlayerId, PlayerStats};
use crate::territory::{Continent, Territory, TERRITORY_COUNT};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Owner and troops of one territory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryState {
    /// `None` while unclaimed
    pub owner: Option<PlayerId>,
    pub troops: u32,
}

/// One claim made while populating the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub territory: Territory,
    pub player: PlayerId,
    /// Troop count after the claim
    pub troops: u32,
}

/// The mutable half of the board graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Indexed by `Territory::index`
    territories: Vec<TerritoryState>,
}

impl Board {
    /// Create a board with every territory unclaimed
    pub fn new() -> Self {
        Self {
            territories: vec![TerritoryState::default(); TERRITORY_COUNT],
        }
    }

    // ==================== Query Methods ====================

    /// State of a territory
    pub fn get(&self, territory: Territory) -> TerritoryState {
        self.territories[territory.index()]
    }

    pub fn owner(&self, territory: Territory) -> Option<PlayerId> {
        self.get(territory).owner
    }

    pub fn troops(&self, territory: Territory) -> u32 {
        self.get(territory).troops
    }

    pub fn neighbors(&self, territory: Territory) -> &'static [Territory] {
        territory.neighbors()
    }

    pub fn is_adjacent(&self, a: Territory, b: Territory) -> bool {
        a.borders(b)
    }

    /// Whether `territory` is held by `player`
    pub fn is_owned_by(&self, territory: Territory, player: PlayerId) -> bool {
        self.owner(territory) == Some(player)
    }

    /// Territories owned by a player, in territory order
    pub fn territories_of(&self, player: PlayerId) -> Vec<Territory> {
        Territory::ALL
            .into_iter()
            .filter(|t| self.is_owned_by(*t, player))
            .collect()
    }

    /// Number of territories owned by a player
    pub fn territory_count(&self, player: PlayerId) -> u32 {
        Territory::ALL
            .iter()
            .filter(|t| self.is_owned_by(**t, player))
            .count() as u32
    }

    /// Total troops a player has on the board
    pub fn troop_total(&self, player: PlayerId) -> u32 {
        Territory::ALL
            .iter()
            .filter(|t| self.is_owned_by(**t, player))
            .map(|t| self.troops(*t))
            .sum()
    }

    /// Continents where every territory belongs to the player
    pub fn continents_of(&self, player: PlayerId) -> Vec<Continent> {
        Continent::ALL
            .into_iter()
            .filter(|c| c.territories().iter().all(|t| self.is_owned_by(*t, player)))
            .collect()
    }

    /// An owned territory whose every neighbor has the same owner
    pub fn is_interior(&self, territory: Territory) -> bool {
        match self.owner(territory) {
            Some(owner) => territory
                .neighbors()
                .iter()
                .all(|n| self.is_owned_by(*n, owner)),
            None => false,
        }
    }

    /// Whether some neighbor is held by a different player.
    /// Unclaimed neighbors cannot be attacked and do not count.
    pub fn has_enemy_neighbor(&self, territory: Territory) -> bool {
        match self.owner(territory) {
            Some(owner) => !self.enemy_neighbors(territory, owner).is_empty(),
            None => false,
        }
    }

    /// Neighbors of `territory` held by someone other than `player`
    pub fn enemy_neighbors(&self, territory: Territory, player: PlayerId) -> Vec<Territory> {
        territory
            .neighbors()
            .iter()
            .copied()
            .filter(|n| matches!(self.owner(*n), Some(o) if o != player))
            .collect()
    }

    /// Owned territories that touch at least one foreign territory
    pub fn frontier_of(&self, player: PlayerId) -> Vec<Territory> {
        self.territories_of(player)
            .into_iter()
            .filter(|t| !self.is_interior(*t))
            .collect()
    }

    /// The only owner left on the board, ignoring unclaimed territories.
    /// `None` when nobody owns anything or two or more players remain.
    pub fn single_owner(&self) -> Option<PlayerId> {
        let mut owners = self.territories.iter().filter_map(|s| s.owner);
        let first = owners.next()?;
        owners.all(|o| o == first).then_some(first)
    }

    /// Players in `1..=player_count` that still hold territory
    pub fn live_players(&self, player_count: u8) -> Vec<PlayerId> {
        player_ids(player_count)
            .filter(|p| self.territory_count(*p) > 0)
            .collect()
    }

    /// Troop and territory totals for a player (cards are filled in by the game)
    pub fn player_stats(&self, player: PlayerId) -> PlayerStats {
        PlayerStats {
            player,
            troop_total: self.troop_total(player),
            territory_count: self.territory_count(player),
            card_count: 0,
        }
    }

    /// Sum of troops over every territory
    pub fn total_troops(&self) -> u32 {
        self.territories.iter().map(|s| s.troops).sum()
    }

    // ==================== Mutation Methods ====================

    /// Overwrite a territory's owner and troops.
    ///
    /// Panics if the result would break the ownership invariant
    /// (unclaimed with troops, or claimed with none).
    pub fn set_territory(&mut self, territory: Territory, owner: Option<PlayerId>, troops: u32) {
        match owner {
            Some(_) => assert!(troops >= 1, "{} cannot be held with 0 troops", territory),
            None => assert_eq!(troops, 0, "unclaimed {} cannot hold troops", territory),
        }
        self.territories[territory.index()] = TerritoryState { owner, troops };
    }

    /// Add troops to an owned territory
    pub fn add_troops(&mut self, territory: Territory, troops: u32) {
        let state = &mut self.territories[territory.index()];
        assert!(state.owner.is_some(), "cannot reinforce unclaimed {}", territory);
        state.troops += troops;
    }

    /// Remove troops from an owned territory, which must keep at least one
    pub fn remove_troops(&mut self, territory: Territory, troops: u32) {
        let state = &mut self.territories[territory.index()];
        assert!(
            state.troops > troops,
            "{} has {} troops, cannot remove {}",
            territory,
            state.troops,
            troops
        );
        state.troops -= troops;
    }

    // ==================== Setup ====================

    /// Populate an empty board.
    ///
    /// Every player first receives one random territory with a single troop.
    /// Then, round after round, each player still below `troops_per_player`
    /// adds one troop to a random territory that is either unclaimed or
    /// already theirs, claiming it if needed. Every player ends with exactly
    /// `troops_per_player` troops.
    pub fn populate_initial<R: Rng + ?Sized>(
        &mut self,
        player_count: u8,
        troops_per_player: u32,
        rng: &mut R,
    ) -> Vec<Claim> {
        assert!(
            (player_count as usize) <= TERRITORY_COUNT,
            "more players than territories"
        );
        assert!(troops_per_player >= 1, "players need at least one troop");

        let mut claims = Vec::new();
        let mut shuffled = Territory::ALL.to_vec();
        shuffled.shuffle(rng);

        for (player, territory) in player_ids(player_count).zip(shuffled) {
            self.set_territory(territory, Some(player), 1);
            claims.push(Claim {
                territory,
                player,
                troops: 1,
            });
        }

        let mut placed: Vec<u32> = vec![1; player_count as usize];

        while placed.iter().any(|&n| n < troops_per_player) {
            for player in player_ids(player_count) {
                let slot = (player - 1) as usize;
                if placed[slot] >= troops_per_player {
                    continue;
                }

                let available: Vec<Territory> = Territory::ALL
                    .into_iter()
                    .filter(|t| self.owner(*t).map_or(true, |o| o == player))
                    .collect();

                let Some(&territory) = available.choose(rng) else {
                    continue;
                };

                if self.owner(territory).is_none() {
                    self.set_territory(territory, Some(player), 1);
                } else {
                    self.add_troops(territory, 1);
                }
                placed[slot] += 1;

                claims.push(Claim {
                    territory,
                    player,
                    troops: self.troops(territory),
                });
            }
        }

        claims
    }

    /// Convert to a JSON-friendly list with names for renderers
    pub fn snapshot(&self) -> Vec<TerritoryJson> {
        Territory::ALL
            .into_iter()
            .map(|t| TerritoryJson {
                territory: t,
                name: t.name().to_string(),
                continent: t.continent(),
                owner: self.owner(t),
                troops: self.troops(t),
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renderer-facing view of a single territory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryJson {
    pub territory: Territory,
    pub name: String,
    pub continent: Continent,
    pub owner: Option<PlayerId>,
    pub troops: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::territory::Territory as T;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board_owned_by(player: PlayerId) -> Board {
        let mut board = Board::new();
        for t in Territory::ALL {
            board.set_territory(t, Some(player), 1);
        }
        board
    }

    #[test]
    fn test_new_board_is_unclaimed() {
        let board = Board::new();
        assert!(Territory::ALL.iter().all(|t| board.owner(*t).is_none()));
        assert_eq!(board.total_troops(), 0);
        assert_eq!(board.single_owner(), None);
    }

    #[test]
    fn test_continents_of() {
        let mut board = Board::new();
        for t in Continent::Australia.territories() {
            board.set_territory(*t, Some(2), 3);
        }
        board.set_territory(T::Siam, Some(2), 1);

        assert_eq!(board.continents_of(2), vec![Continent::Australia]);
        assert!(board.continents_of(1).is_empty());
    }

    #[test]
    fn test_interior_and_frontier() {
        let mut board = Board::new();
        for t in Continent::Australia.territories() {
            board.set_territory(*t, Some(1), 2);
        }

        // Indonesia borders Siam, which is unclaimed
        assert!(!board.is_interior(T::Indonesia));
        assert!(board.is_interior(T::EasternAustralia));
        assert!(board.is_interior(T::NewGuinea));
        assert_eq!(board.frontier_of(1), vec![T::Indonesia]);
        assert!(!board.has_enemy_neighbor(T::Indonesia));

        board.set_territory(T::Siam, Some(2), 1);
        assert!(board.has_enemy_neighbor(T::Indonesia));
        assert_eq!(board.enemy_neighbors(T::Indonesia, 1), vec![T::Siam]);
        assert!(!board.has_enemy_neighbor(T::WesternAustralia));
    }

    #[test]
    fn test_single_owner() {
        let board = board_owned_by(3);
        assert_eq!(board.single_owner(), Some(3));

        let mut board = Board::new();
        board.set_territory(T::Peru, Some(4), 2);
        assert_eq!(board.single_owner(), Some(4));

        board.set_territory(T::Japan, Some(5), 2);
        assert_eq!(board.single_owner(), None);
    }

    #[test]
    #[should_panic]
    fn test_owned_territory_needs_troops() {
        let mut board = Board::new();
        board.set_territory(T::Peru, Some(1), 0);
    }

    #[test]
    #[should_panic]
    fn test_cannot_strip_last_troop() {
        let mut board = Board::new();
        board.set_territory(T::Peru, Some(1), 3);
        board.remove_troops(T::Peru, 3);
    }

    #[test]
    fn test_populate_initial() {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(42);
        let claims = board.populate_initial(6, 20, &mut rng);

        for player in 1..=6 {
            assert!(board.territory_count(player) >= 1);
            assert_eq!(board.troop_total(player), 20);
        }
        assert_eq!(board.total_troops(), 120);
        assert_eq!(claims.len(), 120);

        for t in Territory::ALL {
            let state = board.get(t);
            assert_eq!(state.owner.is_none(), state.troops == 0);
        }
    }

    #[test]
    fn test_populate_is_deterministic_for_seed() {
        let mut a = Board::new();
        let mut b = Board::new();
        a.populate_initial(4, 20, &mut StdRng::seed_from_u64(9));
        b.populate_initial(4, 20, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_snapshot_names() {
        let mut board = Board::new();
        board.set_territory(T::NewGuinea, Some(2), 5);
        let snapshot = board.snapshot();
        let entry = &snapshot[T::NewGuinea.index()];
        assert_eq!(entry.name, "New Guinea");
        assert_eq!(entry.owner, Some(2));
        assert_eq!(entry.troops, 5);
        assert_eq!(entry.continent, Continent::Australia);
    }
}
