//! Simulated game rooms.

use risk_core::{
    GameConfig, GameError, GameEvent, GameSnapshot, GameState, PlayerId, PlayerStats, Seats,
    TurnPhase,
};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::protocol::{GameInfo, GameStatus};

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("Game not found")]
    GameNotFound,

    #[error("Not watching a game")]
    NotWatching,

    #[error("Game is already auto-playing")]
    AlreadyAutoPlaying,

    #[error(transparent)]
    Game(#[from] GameError),
}

/// A simulated game and the clients watching it.
pub struct GameRoom {
    pub id: Uuid,
    pub seed: Option<u64>,
    pub game: GameState,
    /// One bot per seat
    seats: Seats,
    pub spectators: HashSet<Uuid>,
    pub auto_playing: bool,
    /// Bumped on every auto-play start so stale timer tasks can tell they
    /// have been replaced
    auto_play_epoch: u64,
}

impl GameRoom {
    pub fn new(
        id: Uuid,
        creator: Uuid,
        player_count: u8,
        seed: Option<u64>,
    ) -> Result<Self, RoomError> {
        let config = GameConfig {
            player_count,
            seed,
            ..GameConfig::default()
        };
        let game = GameState::new(config)?;
        let bot_seed = seed.unwrap_or_else(rand::random);

        let mut spectators = HashSet::new();
        spectators.insert(creator);

        Ok(Self {
            id,
            seed,
            game,
            seats: Seats::random(player_count, bot_seed),
            spectators,
            auto_playing: false,
            auto_play_epoch: 0,
        })
    }

    pub fn spectator_count(&self) -> usize {
        self.spectators.len()
    }

    pub fn add_spectator(&mut self, client_id: Uuid) {
        self.spectators.insert(client_id);
    }

    /// Returns true if nobody is watching anymore
    pub fn remove_spectator(&mut self, client_id: Uuid) -> bool {
        self.spectators.remove(&client_id);
        self.spectators.is_empty()
    }

    /// Run one phase
    pub fn step(&mut self) -> Result<Vec<GameEvent>, RoomError> {
        let events = self.game.step(&mut self.seats)?;
        if self.game.is_game_over() {
            self.auto_playing = false;
        }
        Ok(events)
    }

    /// Run the rest of the current turn
    pub fn play_turn(&mut self) -> Result<Vec<GameEvent>, RoomError> {
        let events = self.game.play_turn(&mut self.seats)?;
        if self.game.is_game_over() {
            self.auto_playing = false;
        }
        Ok(events)
    }

    /// Returns the epoch the timer task must hold on to
    pub fn start_auto_play(&mut self) -> Result<u64, RoomError> {
        if self.game.is_game_over() {
            return Err(GameError::GameOver.into());
        }
        if self.auto_playing {
            return Err(RoomError::AlreadyAutoPlaying);
        }
        self.auto_playing = true;
        self.auto_play_epoch += 1;
        Ok(self.auto_play_epoch)
    }

    /// Whether the timer task started at `epoch` should keep stepping
    pub fn is_auto_playing(&self, epoch: u64) -> bool {
        self.auto_playing && self.auto_play_epoch == epoch
    }

    pub fn stop_auto_play(&mut self) {
        self.auto_playing = false;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    pub fn stats(&self) -> Vec<PlayerStats> {
        self.game.all_player_stats()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.game.winner()
    }

    pub fn status(&self) -> GameStatus {
        if self.game.is_game_over() {
            GameStatus::Finished
        } else if self.auto_playing {
            GameStatus::AutoPlaying
        } else if self.game.phase == TurnPhase::Setup {
            GameStatus::Waiting
        } else {
            GameStatus::Running
        }
    }

    pub fn to_info(&self) -> GameInfo {
        GameInfo {
            id: self.id,
            player_count: self.game.player_count(),
            seed: self.seed,
            turn: self.game.turn,
            spectators: self.spectator_count(),
            status: self.status(),
        }
    }
}
