//! Protocol state engine for the word game
//!
//! The engine owns the registry, the current round and the word source. The
//! event loop feeds it connection events one at a time:
//! - a new connection ([`GameEngine::handle_connect`])
//! - bytes read from a connection ([`GameEngine::handle_data`])
//! - an orderly close or a failed read or write
//!
//! Lines from Lobby connections are name claims, lines from the Active Roster
//! are guesses. Every outgoing message goes through one send primitive that
//! runs the disconnect handler when delivery fails, so a vanished peer is
//! cleaned up wherever it is noticed.

use crate::client_manager::{ClientId, ClientManager, Membership};
use crate::dictionary::WordSource;
use crate::game::{GameState, GuessOutcome, GuessRejection};
use crate::messaging::Transport;
use log::{debug, info, warn};
use shared::messages;
use std::collections::HashSet;
use std::io;
use std::net::SocketAddr;

pub struct GameEngine<T: Transport> {
    clients: ClientManager,
    game: GameState,
    words: Box<dyn WordSource>,
    transport: T,
    max_guesses: u32,
    /// Players whose disconnect is being processed
    leaving: HashSet<ClientId>,
}

impl<T: Transport> GameEngine<T> {
    /// Creates an engine and starts the first round.
    pub fn new(transport: T, mut words: Box<dyn WordSource>, max_guesses: u32) -> Self {
        let game = GameState::new(&words.next_word(), max_guesses);
        Self {
            clients: ClientManager::new(),
            game,
            words,
            transport,
            max_guesses,
            leaving: HashSet::new(),
        }
    }

    /// Registry of connections, rosters and the turn pointer.
    pub fn clients(&self) -> &ClientManager {
        &self.clients
    }

    /// The round in progress.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Used by the event loop to register freshly accepted connections.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Registers an accepted connection in the Lobby and greets it.
    ///
    /// The connection is registered before the greeting goes out so that a
    /// failed greeting takes the regular disconnect path.
    pub fn handle_connect(&mut self, id: ClientId, addr: SocketAddr) {
        self.clients.add_client(id, addr);
        self.send_to(id, messages::WELCOME);
    }

    /// Buffers freshly read bytes and processes every complete line.
    pub fn handle_data(&mut self, id: ClientId, data: &[u8]) {
        let Some(client) = self.clients.get_mut(id) else {
            debug!("[{}] Dropping {} bytes for unknown connection", id, data.len());
            return;
        };
        debug!("[{}] Read {} bytes", id, data.len());
        client.buffer.push(data);

        loop {
            // The connection may disappear while one of its lines is handled.
            let Some(client) = self.clients.get_mut(id) else {
                break;
            };
            match client.buffer.next_line() {
                Ok(Some(line)) => {
                    debug!("[{}] Found new line {:?}", id, line);
                    self.handle_line(id, &line);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("[{}] {}", id, e);
                    self.send_to(id, messages::LINE_TOO_LONG);
                    self.disconnect(id);
                    break;
                }
            }
        }
    }

    /// The peer closed its end of the connection.
    pub fn handle_closed(&mut self, id: ClientId) {
        info!("[{}] Connection closed by peer", id);
        self.disconnect(id);
    }

    /// Reading failed; only this connection is dropped.
    pub fn handle_read_error(&mut self, id: ClientId, error: &io::Error) {
        warn!("[{}] Read failed: {}", id, error);
        self.disconnect(id);
    }

    /// A write queued earlier failed after [`Transport::send`] accepted it.
    pub fn handle_write_error(&mut self, id: ClientId, error: &io::Error) {
        warn!("[{}] Write failed: {}", id, error);
        self.disconnect(id);
    }

    fn handle_line(&mut self, id: ClientId, line: &str) {
        match self.clients.membership(id) {
            Some(Membership::Lobby) => self.handle_name(id, line),
            Some(Membership::Active) => self.handle_guess(id, line),
            None => {}
        }
    }

    /// Processes a name claim from a Lobby connection.
    fn handle_name(&mut self, id: ClientId, line: &str) {
        let name = shared::truncate_name(line);

        if name.is_empty() {
            info!("[{}] Entered an empty name", id);
            self.send_to(id, messages::EMPTY_NAME);
            return;
        }
        if self.clients.name_taken(&name) {
            info!("[{}] Entered a name already in use: {}", id, name);
            self.send_to(id, messages::NAME_TAKEN);
            return;
        }
        if !self.clients.promote(id, name.clone()) {
            return;
        }

        self.broadcast(&messages::joined(&name));
        let status = self.game.status_message();
        if self.send_to(id, &status) {
            self.announce_turn();
        }
    }

    /// Processes a guess line from an Active Roster member.
    fn handle_guess(&mut self, id: ClientId, line: &str) {
        if self.clients.turn() != Some(id) {
            debug!("[{}] Input outside of their turn", id);
            self.send_to(id, messages::NOT_YOUR_TURN);
            return;
        }

        let outcome = match self.game.guess(line) {
            Ok(outcome) => outcome,
            Err(GuessRejection::Invalid) => {
                debug!("[{}] Invalid guess {:?}", id, line);
                self.send_to(id, messages::INVALID_GUESS);
                return;
            }
            Err(GuessRejection::AlreadyGuessed) => {
                debug!("[{}] Repeated guess {:?}", id, line);
                self.send_to(id, messages::ALREADY_GUESSED);
                return;
            }
        };

        let name = self.clients.name(id).to_string();
        match outcome {
            GuessOutcome::Miss | GuessOutcome::Exhausted => {
                info!(
                    "[{}] {} guessed {:?} wrong, {} guesses left",
                    id,
                    name,
                    line,
                    self.game.guesses_left()
                );
                self.pass_turn();
                self.send_to(id, messages::NOT_IN_WORD);

                if outcome == GuessOutcome::Exhausted {
                    info!("Guesses exhausted, the word was {}", self.game.word());
                    let word = self.game.word().to_string();
                    self.broadcast(&messages::lost(&name, &word));
                    self.start_new_round();
                } else {
                    self.broadcast_status();
                    self.announce_turn();
                }
            }
            GuessOutcome::Hit => {
                info!("[{}] {} guessed {:?} correctly, guessing again", id, name, line);
                self.broadcast(messages::GOOD_GUESS);
                self.broadcast_status();
                self.announce_turn();
            }
            GuessOutcome::Solved => {
                info!("[{}] {} has won, the word was {}", id, name, self.game.word());
                self.announce_winner(id, &name);
                self.start_new_round();
            }
        }
    }

    /// Replaces the round with a fresh word; rosters and turn carry over.
    fn start_new_round(&mut self) {
        self.broadcast(messages::NEW_GAME);
        let word = self.words.next_word();
        self.game = GameState::new(&word, self.max_guesses);
        self.broadcast_status();
        self.announce_turn();
    }

    /// Moves the turn on, skipping players who are on their way out.
    fn pass_turn(&mut self) {
        self.clients.advance_turn();
        for _ in 0..self.clients.roster_len() {
            match self.clients.turn() {
                Some(turn) if self.leaving.contains(&turn) => self.clients.advance_turn(),
                _ => break,
            }
        }
    }

    /// Drops a connection and reconciles rosters, turn and announcements.
    ///
    /// A Lobby connection is simply removed. For a player, the goodbye goes
    /// out first, then the turn moves on if they held it, then they are
    /// removed and the turn is announced again. Failed writes during this
    /// recurse for the other connection but never for `id` itself.
    pub fn disconnect(&mut self, id: ClientId) {
        if self.leaving.contains(&id) {
            return;
        }
        match self.clients.membership(id) {
            None => {}
            Some(Membership::Lobby) => {
                info!("[{}] Removed from the lobby", id);
                self.clients.remove_client(id);
                self.transport.close(id);
            }
            Some(Membership::Active) => {
                self.leaving.insert(id);
                let name = self.clients.name(id).to_string();
                info!("[{}] {} has left", id, name);

                self.broadcast(&messages::goodbye(&name));
                if self.clients.turn() == Some(id) {
                    self.pass_turn();
                }
                self.clients.remove_client(id);
                self.transport.close(id);
                self.leaving.remove(&id);

                self.announce_turn();
            }
        }
    }

    /// Sends one message; a failure disconnects the recipient.
    ///
    /// Returns whether the message was handed over.
    fn send_to(&mut self, id: ClientId, message: &str) -> bool {
        if !self.clients.contains(id) || self.leaving.contains(&id) {
            return false;
        }
        match self.transport.send(id, message) {
            Ok(()) => true,
            Err(e) => {
                warn!("[{}] Write to client failed: {}", id, e);
                self.disconnect(id);
                false
            }
        }
    }

    /// Sends `message` to every player, continuing past failed recipients.
    fn broadcast(&mut self, message: &str) {
        for id in self.clients.roster() {
            self.send_to(id, message);
        }
    }

    fn broadcast_status(&mut self) {
        let status = self.game.status_message();
        self.broadcast(&status);
    }

    fn announce_winner(&mut self, winner: ClientId, name: &str) {
        let others = messages::winner(name);
        for id in self.clients.roster() {
            let message = if id == winner {
                messages::YOU_WIN
            } else {
                others.as_str()
            };
            self.send_to(id, message);
        }
    }

    /// Tells the turn holder to guess and everyone else whose turn it is.
    ///
    /// Nothing is sent while the holder is leaving: their disconnect moves
    /// the turn on and announces it once they are gone.
    fn announce_turn(&mut self) {
        let turn = self.clients.turn();
        if turn.map_or(false, |holder| self.leaving.contains(&holder)) {
            return;
        }
        let others = match turn {
            Some(holder) => messages::turn_of(self.clients.name(holder)),
            None => messages::NO_PLAYER.to_string(),
        };

        for id in self.clients.roster() {
            if self.leaving.contains(&id) {
                continue;
            }
            let message = if Some(id) == turn {
                messages::YOUR_GUESS
            } else {
                others.as_str()
            };
            // The failed recipient's disconnect announces the turn again.
            if !self.send_to(id, message) {
                return;
            }
        }
    }
}
