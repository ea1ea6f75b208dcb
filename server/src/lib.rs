//! # Word Game Server Library
//!
//! Authoritative server for a multiplayer, turn-based word guessing game.
//! Clients connect over TCP, claim a unique name, then take turns guessing
//! letters of a hidden word until it is revealed or the shared guess budget
//! runs out.
//!
//! ## Architecture Design
//!
//! ### Single-Threaded Event Loop
//! All game state lives in one [`engine::GameEngine`] owned by the event loop
//! in [`network::Server`]. The loop handles one readiness event at a time to
//! completion (accept, data, close, or I/O failure), so no locking is needed
//! and every invariant holds between events. There is no idle timeout: a slow
//! client simply keeps its turn.
//!
//! ### Rosters and Turns
//! A connection sits in the Lobby until it claims a name, then joins the
//! Active Roster at the head of the rotation. Only a wrong guess passes the
//! turn; a correct guess lets the same player go again.
//!
//! ### Failure Handling
//! Writes go through the [`messaging::Transport`] seam. A failed write, a
//! failed read or an orderly close all end up in the engine's disconnect
//! handler, which fixes up the turn before removing the player. A failure is
//! never fatal to the server.
//!
//! ## Module Organization
//!
//! - `client_manager`: connection registry, Lobby, Active Roster and turn pointer
//! - `game`: the round state machine
//! - `dictionary`: word selection for new rounds
//! - `messaging`: outgoing delivery seam
//! - `engine`: name claims, guesses and disconnect handling
//! - `network`: TCP listener and connection tasks
//! - `config`, `error`: command line options and error types
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::dictionary::Dictionary;
//! use server::network::Server;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let words = Dictionary::load("dictionary.txt")?;
//!     let mut server = Server::new("127.0.0.1:30001", Box::new(words), 4).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod game;
pub mod messaging;
pub mod network;
