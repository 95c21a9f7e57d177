//! Core game state machine.
//!
//! This module contains the main `GameState` struct and the turn engine that
//! sequences reinforcement, combat and fortification until one player owns
//! the world.

use crate::actions::{GameEvent, Selection};
use crate::board::{Board, TerritoryJson};
use crate::bot::Strategy;
use crate::cards::{Card, Deck};
use crate::combat;
use crate::config::GameConfig;
use crate::connectivity;
use crate::player::{player_ids, PlayerColor, PlayerId, PlayerStats};
use crate::reinforce::{self, Redemption};
use crate::territory::Territory;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Where the current player is within their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Board not yet populated
    Setup,
    /// Receive and place new troops
    Reinforce,
    /// Attack until the strategy stops or may no longer continue
    Attack,
    /// One optional troop move, then the turn passes
    Fortify,
    /// Game is over
    GameOver { winner: PlayerId },
}

/// Errors returned by the engine
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    #[error("Game is over")]
    GameOver,

    #[error("Invalid player count {0}, expected 2 to 6")]
    InvalidPlayerCount(u8),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown territory: {0}")]
    UnknownTerritory(String),

    #[error("Illegal decision: {0}")]
    IllegalDecision(String),
}

/// The complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// The game board
    pub board: Board,
    /// All 44 cards and their holders
    pub deck: Deck,
    pub config: GameConfig,
    /// Player whose turn it is
    pub current_player: PlayerId,
    pub phase: TurnPhase,
    /// Turn number (starts at 1)
    pub turn: u32,
    /// Whether the current player redeemed a set this turn
    pub card_redeemed_this_turn: bool,
    /// Whether the current player conquered a territory this turn
    pub conquered_this_turn: bool,
    /// Last highlighted origin and target
    pub selection: Selection,
    #[serde(skip)]
    rng: StdRng,
}

impl GameState {
    /// Create a new game with an empty board, waiting for setup
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        if !config.has_valid_player_count() {
            return Err(GameError::InvalidPlayerCount(config.player_count));
        }
        if !config.has_valid_setup_troops() {
            return Err(GameError::InvalidConfig(
                "initial_troops_per_player must be at least 1".to_string(),
            ));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            board: Board::new(),
            deck: Deck::standard(),
            config,
            current_player: 1,
            phase: TurnPhase::Setup,
            turn: 1,
            card_redeemed_this_turn: false,
            conquered_this_turn: false,
            selection: Selection::default(),
            rng,
        })
    }

    /// Start from an already populated board, skipping setup.
    /// The first player holding territory moves first.
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self, GameError> {
        let mut game = Self::new(config)?;
        game.board = board;
        game.phase = TurnPhase::Reinforce;
        game.current_player = game
            .board
            .live_players(game.config.player_count)
            .first()
            .copied()
            .unwrap_or(1);
        Ok(game)
    }

    /// Get the number of players
    pub fn player_count(&self) -> u8 {
        self.config.player_count
    }

    // ==================== Queries ====================

    pub fn owner(&self, territory: Territory) -> Option<PlayerId> {
        self.board.owner(territory)
    }

    pub fn troops(&self, territory: Territory) -> u32 {
        self.board.troops(territory)
    }

    pub fn neighbors_of(&self, territory: Territory) -> &'static [Territory] {
        self.board.neighbors(territory)
    }

    pub fn player_stats(&self, player: PlayerId) -> PlayerStats {
        PlayerStats {
            card_count: self.deck.count_of(player) as u32,
            ..self.board.player_stats(player)
        }
    }

    pub fn all_player_stats(&self) -> Vec<PlayerStats> {
        player_ids(self.player_count())
            .map(|p| self.player_stats(p))
            .collect()
    }

    /// Check if the game is finished
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver { .. })
    }

    /// Get the winner if the game is finished
    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            TurnPhase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Territories a renderer should highlight
    pub fn highlighted(&self) -> Selection {
        self.selection
    }

    pub fn cards_of(&self, player: PlayerId) -> Vec<Card> {
        self.deck.hand_of(player)
    }

    /// Everything a renderer needs to draw the current frame
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            current_player: self.current_player,
            turn: self.turn,
            territories: self.board.snapshot(),
            players: self.all_player_stats(),
            colors: player_ids(self.player_count())
                .map(PlayerColor::for_player)
                .collect(),
            selection: self.selection,
            unowned_cards: self.deck.unowned_count(),
        }
    }

    // ==================== Turn Engine ====================

    /// Execute the current phase and return what happened.
    ///
    /// An `IllegalDecision` error leaves the game in the phase it failed in;
    /// changes already applied during that phase are kept.
    pub fn step(&mut self, strategy: &mut dyn Strategy) -> Result<Vec<GameEvent>, GameError> {
        let mut events = match self.phase {
            TurnPhase::GameOver { .. } => return Err(GameError::GameOver),
            TurnPhase::Setup => self.run_setup(),
            TurnPhase::Reinforce => self.run_reinforce(strategy)?,
            TurnPhase::Attack => self.run_attack(strategy)?,
            TurnPhase::Fortify => self.run_fortify(strategy)?,
        };

        events.extend(self.check_win_condition());
        Ok(events)
    }

    /// Step until the turn passes to another player or the game ends
    pub fn play_turn(&mut self, strategy: &mut dyn Strategy) -> Result<Vec<GameEvent>, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }

        let turn = self.turn;
        let mut events = Vec::new();
        while !self.is_game_over() && self.turn == turn {
            events.extend(self.step(strategy)?);
        }
        Ok(events)
    }

    /// Play up to `max_turns` turns and return the winner, if any
    pub fn run(
        &mut self,
        strategy: &mut dyn Strategy,
        max_turns: u32,
    ) -> Result<Option<PlayerId>, GameError> {
        for _ in 0..max_turns {
            if self.is_game_over() {
                break;
            }
            self.play_turn(strategy)?;
        }
        Ok(self.winner())
    }

    fn run_setup(&mut self) -> Vec<GameEvent> {
        let claims = self.board.populate_initial(
            self.config.player_count,
            self.config.initial_troops_per_player,
            &mut self.rng,
        );
        debug!(claims = claims.len(), "Board populated");

        self.current_player = 1;
        self.phase = TurnPhase::Reinforce;

        claims
            .into_iter()
            .map(|c| GameEvent::TerritoryClaimed {
                territory: c.territory,
                player: c.player,
                troops: c.troops,
            })
            .collect()
    }

    fn run_reinforce(&mut self, strategy: &mut dyn Strategy) -> Result<Vec<GameEvent>, GameError> {
        let player = self.current_player;
        let mut events = Vec::new();

        if self.board.territory_count(player) == 0 {
            self.phase = TurnPhase::Attack;
            return Ok(vec![GameEvent::PhaseSkipped {
                player,
                phase: TurnPhase::Reinforce,
            }]);
        }

        let territory_bonus = reinforce::territory_bonus(&self.board, player);
        let continent_bonus = reinforce::continent_bonus(&self.board, player);

        let redemption = reinforce::card_set_bonus(
            &mut self.board,
            &mut self.deck,
            player,
            self.config.min_cards_for_redemption,
        );
        let card_bonus = redemption.as_ref().map_or(0, |r| r.bonus);
        if let Some(redemption) = redemption {
            self.card_redeemed_this_turn = true;
            events.push(redemption_event(redemption));
        }

        events.push(GameEvent::ReinforcementsGranted {
            player,
            territory_bonus,
            continent_bonus,
            card_bonus,
        });

        let total = territory_bonus + continent_bonus + card_bonus;
        debug!(player, total, "Reinforcing");
        events.extend(self.distribute(strategy, player, total)?);

        self.phase = TurnPhase::Attack;
        Ok(events)
    }

    /// Ask the strategy where `total` new troops go and place them
    fn distribute(
        &mut self,
        strategy: &mut dyn Strategy,
        player: PlayerId,
        total: u32,
    ) -> Result<Vec<GameEvent>, GameError> {
        if total == 0 {
            return Ok(Vec::new());
        }

        let placements = strategy.place_reinforcements(&self.board, player, total);
        reinforce::validate_placements(&self.board, player, &placements, total)?;

        let mut events = Vec::with_capacity(placements.len());
        for placement in placements {
            self.board.add_troops(placement.territory, placement.troops);
            self.selection = Selection {
                origin: Some(placement.territory),
                target: None,
            };
            events.push(GameEvent::Reinforced {
                player,
                territory: placement.territory,
                troops: placement.troops,
            });
        }
        Ok(events)
    }

    fn run_attack(&mut self, strategy: &mut dyn Strategy) -> Result<Vec<GameEvent>, GameError> {
        let player = self.current_player;
        let mut events = Vec::new();

        if self.can_attack_from_any(player, 1) {
            while let Some(choice) = strategy.choose_attack(&self.board, player) {
                combat::validate_attack(&self.board, player, choice.from, choice.to)?;
                self.selection = Selection::between(choice.from, choice.to);

                let outcome = combat::resolve_attack(
                    &mut self.board,
                    choice.from,
                    choice.to,
                    &mut self.rng,
                    &self.config.conquest_fallback,
                );

                events.push(GameEvent::AttackResolved {
                    attacker: player,
                    defender: outcome.previous_owner,
                    from: choice.from,
                    to: choice.to,
                    attacker_rolls: outcome.rolls.attacker.clone(),
                    defender_rolls: outcome.rolls.defender.clone(),
                    attacker_losses: outcome.losses.attacker,
                    defender_losses: outcome.losses.defender,
                });

                if outcome.conquered {
                    debug!(
                        player,
                        territory = %choice.to,
                        from = %choice.from,
                        "Territory conquered"
                    );
                    events.push(GameEvent::TerritoryConquered {
                        player,
                        previous_owner: outcome.previous_owner,
                        from: choice.from,
                        territory: choice.to,
                        troops_moved: outcome.troops_moved,
                    });
                    events.extend(self.after_conquest(strategy, player, outcome.previous_owner)?);
                }

                if self.board.single_owner().is_some() {
                    break;
                }

                let keep_going = if outcome.conquered {
                    self.can_attack_from_any(player, 2)
                } else {
                    self.board.troops(choice.from) > 2 && self.board.has_enemy_neighbor(choice.from)
                };
                if !keep_going {
                    break;
                }
            }
        }

        if events.is_empty() {
            events.push(GameEvent::PhaseSkipped {
                player,
                phase: TurnPhase::Attack,
            });
        }

        self.phase = TurnPhase::Fortify;
        Ok(events)
    }

    /// Whether some territory of `player` with more than `min_troops`
    /// troops borders an opponent
    fn can_attack_from_any(&self, player: PlayerId, min_troops: u32) -> bool {
        self.board
            .territories_of(player)
            .into_iter()
            .any(|t| self.board.troops(t) > min_troops && self.board.has_enemy_neighbor(t))
    }

    /// Card award, elimination transfer and elimination bonus passes
    fn after_conquest(
        &mut self,
        strategy: &mut dyn Strategy,
        player: PlayerId,
        defender: PlayerId,
    ) -> Result<Vec<GameEvent>, GameError> {
        let mut events = Vec::new();

        if !self.conquered_this_turn && !self.card_redeemed_this_turn {
            if let Some(card) = self.deck.award_random(player, &mut self.rng) {
                events.push(GameEvent::CardAwarded {
                    player,
                    card: card.id,
                });
            }
        }
        self.conquered_this_turn = true;

        if self.board.territory_count(defender) > 0 {
            return Ok(events);
        }

        let cards_transferred = self.deck.transfer_all(defender, player);
        debug!(
            player = defender,
            by = player,
            cards = cards_transferred.len(),
            "Player eliminated"
        );
        events.push(GameEvent::PlayerEliminated {
            player: defender,
            by: player,
            cards_transferred,
        });

        for _ in 0..self.config.elimination_bonus_passes {
            let Some(redemption) = reinforce::card_set_bonus(
                &mut self.board,
                &mut self.deck,
                player,
                self.config.min_cards_for_redemption,
            ) else {
                break;
            };
            self.card_redeemed_this_turn = true;
            let bonus = redemption.bonus;
            events.push(redemption_event(redemption));
            events.extend(self.distribute(strategy, player, bonus)?);
        }

        Ok(events)
    }

    fn run_fortify(&mut self, strategy: &mut dyn Strategy) -> Result<Vec<GameEvent>, GameError> {
        let player = self.current_player;
        let mut events = Vec::new();

        if !connectivity::fortify_origins(&self.board, player).is_empty() {
            if let Some(mv) = strategy.choose_fortify(&self.board, player) {
                if !self.board.is_owned_by(mv.from, player) {
                    return Err(GameError::IllegalDecision(format!(
                        "player {} does not own {}",
                        player, mv.from
                    )));
                }
                connectivity::fortify(&mut self.board, mv.from, mv.to, mv.troops)?;
                self.selection = Selection::between(mv.from, mv.to);
                events.push(GameEvent::Fortified {
                    player,
                    from: mv.from,
                    to: mv.to,
                    troops: mv.troops,
                });
            }
        }

        if events.is_empty() {
            events.push(GameEvent::PhaseSkipped {
                player,
                phase: TurnPhase::Fortify,
            });
        }

        events.push(self.end_turn());
        Ok(events)
    }

    fn end_turn(&mut self) -> GameEvent {
        let player = self.current_player;
        let next_player = self.next_live_player();
        let event = GameEvent::TurnEnded {
            player,
            next_player,
            turn: self.turn,
        };

        debug!(player, next_player, turn = self.turn, "Turn ended");

        self.current_player = next_player;
        self.turn += 1;
        self.card_redeemed_this_turn = false;
        self.conquered_this_turn = false;
        self.selection = Selection::default();
        self.phase = TurnPhase::Reinforce;
        event
    }

    /// The next player in seat order who still holds territory
    fn next_live_player(&self) -> PlayerId {
        let count = self.config.player_count;
        (1..=count)
            .map(|offset| (self.current_player - 1 + offset) % count + 1)
            .find(|p| self.board.territory_count(*p) > 0)
            .unwrap_or(self.current_player)
    }

    fn check_win_condition(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.phase == TurnPhase::Setup || self.is_game_over() {
            return events;
        }

        if let Some(winner) = self.board.single_owner() {
            debug!(winner, turn = self.turn, "Game won");
            self.phase = TurnPhase::GameOver { winner };
            events.push(GameEvent::GameWon { player: winner });
        }

        events
    }
}

fn redemption_event(redemption: Redemption) -> GameEvent {
    GameEvent::CardSetRedeemed {
        player: redemption.player,
        cards: redemption.cards,
        bonus: redemption.bonus,
        territory_bonuses: redemption.territory_bonuses,
    }
}

/// Serializable view of a game for renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: TurnPhase,
    pub current_player: PlayerId,
    pub turn: u32,
    pub territories: Vec<TerritoryJson>,
    pub players: Vec<PlayerStats>,
    /// Seat colors, indexed by player id minus one
    pub colors: Vec<PlayerColor>,
    pub selection: Selection,
    pub unowned_cards: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{AttackChoice, FortifyMove, Placement};
    use crate::bot::{PassiveBot, RandomBot};
    use crate::cards::{CardId, CardKind};
    use crate::territory::Territory as T;
    use pretty_assertions::assert_eq;

    /// Reinforces its first territory and repeats one attack
    struct Script {
        attack: Option<AttackChoice>,
        short_by: u32,
    }

    impl Script {
        fn attacking(from: Territory, to: Territory) -> Self {
            Self {
                attack: Some(AttackChoice { from, to }),
                short_by: 0,
            }
        }
    }

    impl Strategy for Script {
        fn place_reinforcements(
            &mut self,
            board: &Board,
            player: PlayerId,
            troops: u32,
        ) -> Vec<Placement> {
            let territory = board.territories_of(player)[0];
            vec![Placement::new(territory, troops - self.short_by)]
        }

        fn choose_attack(&mut self, board: &Board, player: PlayerId) -> Option<AttackChoice> {
            self.attack
                .filter(|c| !board.is_owned_by(c.to, player) && board.troops(c.from) > 1)
        }

        fn choose_fortify(&mut self, _board: &Board, _player: PlayerId) -> Option<FortifyMove> {
            None
        }
    }

    fn duel_board(attacker_troops: u32) -> Board {
        let mut board = Board::new();
        board.set_territory(T::Alaska, Some(1), attacker_troops);
        board.set_territory(T::Kamchatka, Some(2), 1);
        board
    }

    fn two_players() -> GameConfig {
        GameConfig::with_players(2).seeded(7)
    }

    #[test]
    fn test_new_game_starts_in_setup() {
        let game = GameState::new(GameConfig::default()).unwrap();
        assert_eq!(game.phase, TurnPhase::Setup);
        assert_eq!(game.turn, 1);
        assert_eq!(game.deck.unowned_count(), 44);
        assert_eq!(game.board.total_troops(), 0);
    }

    #[test]
    fn test_rejects_bad_player_count() {
        let err = GameState::new(GameConfig::with_players(7)).unwrap_err();
        assert_eq!(err, GameError::InvalidPlayerCount(7));
        assert!(GameState::new(GameConfig::with_players(1)).is_err());
    }

    #[test]
    fn test_setup_step() {
        let mut game = GameState::new(GameConfig::default().seeded(3)).unwrap();
        let events = game.step(&mut PassiveBot).unwrap();

        assert_eq!(events.len(), 120);
        assert!(events.iter().all(|e| e.changes_ownership()));
        assert_eq!(game.phase, TurnPhase::Reinforce);
        assert_eq!(game.current_player, 1);
        assert_eq!(game.board.total_troops(), 120);
    }

    #[test]
    fn test_reinforce_places_bonus() {
        let mut game = GameState::with_board(two_players(), duel_board(5)).unwrap();
        let events = game.step(&mut PassiveBot).unwrap();

        assert_eq!(game.troops(T::Alaska), 8);
        assert_eq!(game.phase, TurnPhase::Attack);
        assert!(events.contains(&GameEvent::Reinforced {
            player: 1,
            territory: T::Alaska,
            troops: 3,
        }));
    }

    #[test]
    fn test_short_placement_is_illegal() {
        let mut game = GameState::with_board(two_players(), duel_board(5)).unwrap();
        let mut script = Script {
            attack: None,
            short_by: 1,
        };
        assert!(matches!(
            game.step(&mut script),
            Err(GameError::IllegalDecision(_))
        ));
    }

    #[test]
    fn test_passive_turn_skips_attack_and_fortify() {
        let mut game = GameState::with_board(two_players(), duel_board(5)).unwrap();
        let events = game.play_turn(&mut PassiveBot).unwrap();

        assert!(events.contains(&GameEvent::PhaseSkipped {
            player: 1,
            phase: TurnPhase::Attack,
        }));
        assert!(events.contains(&GameEvent::PhaseSkipped {
            player: 1,
            phase: TurnPhase::Fortify,
        }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::TurnEnded {
                player: 1,
                next_player: 2,
                turn: 1,
            })
        );
        assert_eq!(game.current_player, 2);
        assert_eq!(game.turn, 2);
    }

    #[test]
    fn test_rotation_skips_players_without_territory() {
        let mut board = duel_board(5);
        board.set_territory(T::Kamchatka, Some(3), 1);
        let mut game = GameState::with_board(GameConfig::with_players(3).seeded(1), board).unwrap();

        game.play_turn(&mut PassiveBot).unwrap();
        assert_eq!(game.current_player, 3);
        game.play_turn(&mut PassiveBot).unwrap();
        assert_eq!(game.current_player, 1);
    }

    #[test]
    fn test_conquest_awards_card_and_eliminates() {
        let mut game = GameState::with_board(two_players(), duel_board(30)).unwrap();
        game.deck.give(CardId::Territory(T::Peru), 2);
        game.deck.give(CardId::Territory(T::Japan), 2);

        let mut script = Script::attacking(T::Alaska, T::Kamchatka);
        let events = game.play_turn(&mut script).unwrap();

        let awarded = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CardAwarded { .. }))
            .count();
        assert_eq!(awarded, 1);
        assert!(events.contains(&GameEvent::PlayerEliminated {
            player: 2,
            by: 1,
            cards_transferred: vec![CardId::Territory(T::Japan), CardId::Territory(T::Peru)],
        }));
        assert_eq!(events.last(), Some(&GameEvent::GameWon { player: 1 }));
        assert_eq!(game.deck.count_of(1), 3);
        assert_eq!(game.deck.count_of(2), 0);
        assert_eq!(game.winner(), Some(1));
        assert!(matches!(game.step(&mut script), Err(GameError::GameOver)));
    }

    #[test]
    fn test_no_card_after_redemption() {
        let mut game = GameState::with_board(two_players(), duel_board(30)).unwrap();
        let infantry: Vec<Territory> = Territory::ALL
            .into_iter()
            .filter(|t| t.card_kind() == CardKind::Infantry && *t != T::Alaska)
            .take(5)
            .collect();
        for t in &infantry {
            game.deck.give(CardId::Territory(*t), 1);
        }

        let mut script = Script::attacking(T::Alaska, T::Kamchatka);
        let events = game.play_turn(&mut script).unwrap();

        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::CardSetRedeemed { bonus: 4, .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::CardAwarded { .. })));
        assert!(game.card_redeemed_this_turn);
        assert_eq!(game.deck.count_of(1), 2);
        assert_eq!(game.winner(), Some(1));
    }

    #[test]
    fn test_elimination_bonus_redeems_inherited_cards() {
        let mut board = duel_board(30);
        board.set_territory(T::Peru, Some(3), 1);
        let mut game = GameState::with_board(GameConfig::with_players(3).seeded(2), board).unwrap();

        let infantry: Vec<Territory> = Territory::ALL
            .into_iter()
            .filter(|t| t.card_kind() == CardKind::Infantry)
            .take(7)
            .collect();
        for t in &infantry {
            game.deck.give(CardId::Territory(*t), 2);
        }

        let mut script = Script::attacking(T::Alaska, T::Kamchatka);
        let events = game.play_turn(&mut script).unwrap();

        // one awarded card plus seven inherited, then two sets of three infantry
        let bonuses: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::CardSetRedeemed { bonus, .. } => Some(*bonus),
                _ => None,
            })
            .collect();
        assert_eq!(bonuses, vec![4, 4]);
        assert_eq!(game.deck.count_of(1), 2);
        assert!(game.winner().is_none());
        assert_eq!(game.current_player, 3);
    }

    #[test]
    fn test_reinforce_skipped_without_territory() {
        let mut game = GameState::with_board(two_players(), Board::new()).unwrap();
        assert_eq!(game.current_player, 1);

        let events = game.step(&mut RandomBot::with_seed(1)).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::PhaseSkipped {
                player: 1,
                phase: TurnPhase::Reinforce,
            }]
        );
        assert_eq!(game.phase, TurnPhase::Attack);
        assert_eq!(game.board.total_troops(), 0);
    }

    #[test]
    fn test_zero_setup_troops_rejected() {
        let config = GameConfig {
            initial_troops_per_player: 0,
            ..GameConfig::with_players(4)
        };
        assert!(matches!(
            GameState::new(config),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_board_with_single_owner_ends_game() {
        let mut board = Board::new();
        for t in Territory::ALL {
            board.set_territory(t, Some(3), 1);
        }
        let mut game = GameState::with_board(GameConfig::with_players(4), board).unwrap();
        assert_eq!(game.current_player, 3);

        let events = game.step(&mut PassiveBot).unwrap();
        assert_eq!(events.last(), Some(&GameEvent::GameWon { player: 3 }));
        assert_eq!(game.winner(), Some(3));
        assert!(game.is_game_over());
        assert_eq!(game.step(&mut PassiveBot), Err(GameError::GameOver));
        assert_eq!(game.play_turn(&mut PassiveBot), Err(GameError::GameOver));
    }

    #[test]
    fn test_player_stats_include_cards() {
        let mut game = GameState::with_board(two_players(), duel_board(5)).unwrap();
        game.deck.give(CardId::Wild(0), 2);

        let stats = game.all_player_stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].troop_total, 5);
        assert_eq!(stats[1].card_count, 1);
        assert_eq!(game.cards_of(2)[0].id, CardId::Wild(0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let game = GameState::with_board(two_players(), duel_board(5)).unwrap();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.territories.len(), 42);
        assert_eq!(snapshot.phase, TurnPhase::Reinforce);
        assert_eq!(snapshot.colors, vec![PlayerColor::Red, PlayerColor::Blue]);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
