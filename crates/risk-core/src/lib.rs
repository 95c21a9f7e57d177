//! Risk - a rule engine for six-player Risk simulations
//!
//! This crate provides the core game logic, including:
//! - The fixed 42-territory world map and its continents
//! - Board state with ownership and troop counts
//! - Dice combat, reinforcement bonuses and card sets
//! - Connectivity-constrained fortification
//! - A turn state machine driven by an injectable strategy
//!
//! # Architecture
//!
//! The engine is synchronous and deterministic for a given seed. It can be
//! compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly for in-browser renderers
//!
//! # Modules
//!
//! - [`territory`]: Territories, continents and the adjacency graph
//! - [`board`]: Ownership, troops and derived board queries
//! - [`cards`]: The card deck and set scoring
//! - [`combat`]: Dice allocation and attack resolution
//! - [`reinforce`]: Reinforcement bonuses and card redemption
//! - [`connectivity`]: Same-owner reachability and fortify moves
//! - [`bot`]: Strategies that make decisions for each seat
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod bot;
pub mod cards;
pub mod combat;
pub mod config;
pub mod connectivity;
pub mod game;
pub mod player;
pub mod reinforce;
pub mod territory;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{AttackChoice, FortifyMove, GameEvent, Placement, Selection};
pub use board::{Board, TerritoryJson, TerritoryState};
pub use bot::{BoxedStrategy, PassiveBot, RandomBot, Seats, Strategy};
pub use cards::{Card, CardId, CardKind, Deck};
pub use combat::AttackOutcome;
pub use config::{ConquestFallback, GameConfig};
pub use game::{GameError, GameSnapshot, GameState, TurnPhase};
pub use player::{PlayerColor, PlayerId, PlayerStats};
pub use reinforce::Redemption;
pub use territory::{Continent, Territory};
