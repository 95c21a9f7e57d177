//! WebSocket protocol messages for watching simulated Risk games.

use risk_core::{GameEvent, GameSnapshot, PlayerId, PlayerStats};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Create a new simulated game and start watching it
    CreateGame { player_count: u8, seed: Option<u64> },

    /// Watch an existing game
    WatchGame { game_id: Uuid },

    /// Stop watching the current game
    LeaveGame,

    /// Advance the watched game by one phase
    Step,

    /// Advance the watched game by one player's turn
    PlayTurn,

    /// Step the watched game on a timer; 0 stops it
    AutoPlay { interval_ms: u64 },

    /// Request the current state of the watched game
    GetState,

    /// Request game list
    ListGames,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned client ID
    Welcome { client_id: Uuid },

    /// Game created successfully
    GameCreated { game_id: Uuid },

    /// Now watching a game
    Watching { game: GameInfo },

    /// Stopped watching
    LeftGame,

    /// Full state for rendering
    GameState { state: GameSnapshot },

    /// Events produced by the last step
    Events { events: Vec<GameEvent> },

    /// Per-player summary for info panels
    Stats { players: Vec<PlayerStats> },

    /// List of games
    GameList { games: Vec<GameInfo> },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,

    /// Game finished
    GameOver { winner: PlayerId, turn: u32 },
}

/// Game information for lobby listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: Uuid,
    pub player_count: u8,
    pub seed: Option<u64>,
    pub turn: u32,
    pub spectators: usize,
    pub status: GameStatus,
}

/// Game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Created, board not yet populated
    Waiting,
    /// Advanced manually by spectators
    Running,
    /// Advanced by a timer
    AutoPlaying,
    Finished,
}
