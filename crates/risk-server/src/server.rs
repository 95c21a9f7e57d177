//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, GameInfo, ServerMessage};
use crate::room::{GameRoom, RoomError};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use risk_core::{GameEvent, PlayerId};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Fastest auto-play pace a client may request
const MIN_AUTO_PLAY_INTERVAL_MS: u64 = 10;

/// Server state shared across all connections.
pub struct ServerState {
    /// All active games
    pub games: DashMap<Uuid, GameRoom>,
    /// Mapping from client ID to the game they watch
    pub watching: DashMap<Uuid, Uuid>,
    /// Mapping from client ID to their message sender
    pub client_senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
            watching: DashMap::new(),
            client_senders: DashMap::new(),
        }
    }

    /// Send a message to a specific client.
    pub fn send_to_client(&self, client_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.client_senders.get(&client_id) {
            let _ = sender.send(msg);
        }
    }

    pub fn send_error(&self, client_id: Uuid, err: RoomError) {
        self.send_to_client(
            client_id,
            ServerMessage::Error {
                message: err.to_string(),
            },
        );
    }

    /// Broadcast a message to every spectator of a game.
    pub fn broadcast_to_game(&self, game_id: Uuid, msg: ServerMessage) {
        let spectators: Vec<Uuid> = match self.games.get(&game_id) {
            Some(room) => room.spectators.iter().copied().collect(),
            None => return,
        };
        for client_id in spectators {
            self.send_to_client(client_id, msg.clone());
        }
    }

    /// List every hosted game.
    pub fn list_games(&self) -> Vec<GameInfo> {
        self.games.iter().map(|r| r.to_info()).collect()
    }

    /// The game a client is watching.
    pub fn watched_game(&self, client_id: Uuid) -> Result<Uuid, RoomError> {
        self.watching
            .get(&client_id)
            .map(|g| *g)
            .ok_or(RoomError::NotWatching)
    }

    /// Advance a game with `advance` and push the results to its spectators.
    ///
    /// The room lock is held only while the engine runs.
    pub fn advance_game<F>(&self, game_id: Uuid, advance: F) -> Result<(), RoomError>
    where
        F: FnOnce(&mut GameRoom) -> Result<Vec<GameEvent>, RoomError>,
    {
        let (events, snapshot, stats) = {
            let mut room = self.games.get_mut(&game_id).ok_or(RoomError::GameNotFound)?;
            let events = advance(&mut room)?;
            (events, room.snapshot(), room.stats())
        };

        let finished: Option<PlayerId> = events.iter().find_map(|e| match e {
            GameEvent::GameWon { player } => Some(*player),
            _ => None,
        });
        let turn = snapshot.turn;

        self.broadcast_to_game(game_id, ServerMessage::Events { events });
        self.broadcast_to_game(game_id, ServerMessage::GameState { state: snapshot });
        self.broadcast_to_game(game_id, ServerMessage::Stats { players: stats });

        if let Some(winner) = finished {
            info!(%game_id, winner, turn, "Game finished");
            self.broadcast_to_game(game_id, ServerMessage::GameOver { winner, turn });
        }

        Ok(())
    }

    /// Stop watching the current game, dropping it once nobody watches.
    pub fn leave_game(&self, client_id: Uuid) -> bool {
        let Some((_, game_id)) = self.watching.remove(&client_id) else {
            return false;
        };

        let should_remove = match self.games.get_mut(&game_id) {
            Some(mut room) => room.remove_spectator(client_id),
            None => false,
        };

        if should_remove {
            self.games.remove(&game_id);
            info!(%game_id, "Game closed, no spectators left");
        } else {
            self.broadcast_game_info(game_id);
        }
        true
    }

    fn broadcast_game_info(&self, game_id: Uuid) {
        let info = match self.games.get(&game_id) {
            Some(room) => room.to_info(),
            None => return,
        };
        self.broadcast_to_game(game_id, ServerMessage::Watching { game: info });
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Risk server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let client_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.client_senders.insert(client_id, tx);

    let welcome = ServerMessage::Welcome { client_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(client_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", client_id, e);
                    state.send_to_client(
                        client_id,
                        ServerMessage::Error {
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", client_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_client(client_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    state.leave_game(client_id);
    state.client_senders.remove(&client_id);
    send_task.abort();

    info!("Connection closed for {}", client_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(client_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    let result = match msg {
        ClientMessage::CreateGame { player_count, seed } => {
            create_game(client_id, player_count, seed, state)
        }

        ClientMessage::WatchGame { game_id } => watch_game(client_id, game_id, state),

        ClientMessage::LeaveGame => {
            if state.leave_game(client_id) {
                state.send_to_client(client_id, ServerMessage::LeftGame);
                Ok(())
            } else {
                Err(RoomError::NotWatching)
            }
        }

        ClientMessage::Step => state
            .watched_game(client_id)
            .and_then(|game_id| state.advance_game(game_id, |room| room.step())),

        ClientMessage::PlayTurn => state
            .watched_game(client_id)
            .and_then(|game_id| state.advance_game(game_id, |room| room.play_turn())),

        ClientMessage::AutoPlay { interval_ms } => state
            .watched_game(client_id)
            .and_then(|game_id| set_auto_play(game_id, interval_ms, state)),

        ClientMessage::GetState => state.watched_game(client_id).and_then(|game_id| {
            let (snapshot, stats) = {
                let room = state.games.get(&game_id).ok_or(RoomError::GameNotFound)?;
                (room.snapshot(), room.stats())
            };
            state.send_to_client(client_id, ServerMessage::GameState { state: snapshot });
            state.send_to_client(client_id, ServerMessage::Stats { players: stats });
            Ok(())
        }),

        ClientMessage::ListGames => {
            let games = state.list_games();
            state.send_to_client(client_id, ServerMessage::GameList { games });
            Ok(())
        }

        ClientMessage::Ping => {
            state.send_to_client(client_id, ServerMessage::Pong);
            Ok(())
        }
    };

    if let Err(e) = result {
        state.send_error(client_id, e);
    }
}

fn create_game(
    client_id: Uuid,
    player_count: u8,
    seed: Option<u64>,
    state: &Arc<ServerState>,
) -> Result<(), RoomError> {
    state.leave_game(client_id);

    let game_id = Uuid::new_v4();
    let room = GameRoom::new(game_id, client_id, player_count, seed)?;
    let info = room.to_info();
    let snapshot = room.snapshot();

    state.games.insert(game_id, room);
    state.watching.insert(client_id, game_id);
    info!(%game_id, player_count, ?seed, "Game created");

    state.send_to_client(client_id, ServerMessage::GameCreated { game_id });
    state.send_to_client(client_id, ServerMessage::Watching { game: info });
    state.send_to_client(client_id, ServerMessage::GameState { state: snapshot });
    Ok(())
}

fn watch_game(client_id: Uuid, game_id: Uuid, state: &Arc<ServerState>) -> Result<(), RoomError> {
    if !state.games.contains_key(&game_id) {
        return Err(RoomError::GameNotFound);
    }
    if state.watched_game(client_id).ok() != Some(game_id) {
        state.leave_game(client_id);
    }

    let snapshot = {
        let mut room = state.games.get_mut(&game_id).ok_or(RoomError::GameNotFound)?;
        room.add_spectator(client_id);
        room.snapshot()
    };
    state.watching.insert(client_id, game_id);

    state.broadcast_game_info(game_id);
    state.send_to_client(client_id, ServerMessage::GameState { state: snapshot });
    Ok(())
}

fn set_auto_play(
    game_id: Uuid,
    interval_ms: u64,
    state: &Arc<ServerState>,
) -> Result<(), RoomError> {
    let epoch = {
        let mut room = state.games.get_mut(&game_id).ok_or(RoomError::GameNotFound)?;
        if interval_ms == 0 {
            room.stop_auto_play();
            None
        } else {
            Some(room.start_auto_play()?)
        }
    };

    match epoch {
        Some(epoch) => {
            let interval = Duration::from_millis(interval_ms.max(MIN_AUTO_PLAY_INTERVAL_MS));
            spawn_auto_play(Arc::clone(state), game_id, epoch, interval);
        }
        None => info!(%game_id, "Auto-play paused"),
    }
    state.broadcast_game_info(game_id);
    Ok(())
}

/// Step a game on a timer until it ends, is paused or is closed.
fn spawn_auto_play(state: Arc<ServerState>, game_id: Uuid, epoch: u64, interval: Duration) {
    tokio::spawn(async move {
        info!(%game_id, ?interval, "Auto-play started");
        loop {
            tokio::time::sleep(interval).await;

            let running = state
                .games
                .get(&game_id)
                .map(|room| room.is_auto_playing(epoch))
                .unwrap_or(false);
            if !running {
                break;
            }

            if let Err(e) = state.advance_game(game_id, |room| room.step()) {
                warn!(%game_id, "Auto-play halted: {}", e);
                if let Some(mut room) = state.games.get_mut(&game_id) {
                    room.stop_auto_play();
                }
                state.broadcast_to_game(
                    game_id,
                    ServerMessage::Error {
                        message: e.to_string(),
                    },
                );
                break;
            }
        }
        info!(%game_id, "Auto-play finished");
    });
}
