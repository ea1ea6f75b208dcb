//! Connection registry for the word game server
//!
//! Every live connection is owned by exactly one of two rosters:
//! - the Lobby, holding connections that have not claimed a name yet
//! - the Active Roster, the ordered rotation of named players
//!
//! The registry also keeps the turn pointer, which designates the Active
//! Roster member whose guess is being solicited. Removal never leaves the
//! pointer dangling.

use log::{info, warn};
use shared::{LineBuffer, MAX_BUF};
use std::collections::{HashMap, HashSet, VecDeque};
use std::net::SocketAddr;

/// Server-assigned connection identifier.
pub type ClientId = u32;

/// Which roster currently owns a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Lobby,
    Active,
}

/// A connected client
#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    pub addr: SocketAddr,
    /// Bytes received but not yet framed into a line
    pub buffer: LineBuffer,
    /// Empty until the client leaves the Lobby
    pub name: String,
}

impl Client {
    /// Creates an unnamed client with an empty line buffer
    ///
    /// The buffer holds at most `MAX_BUF` bytes, the same limit the
    /// connection's reads are framed against.
    pub fn new(id: ClientId, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            buffer: LineBuffer::new(MAX_BUF),
            name: String::new(),
        }
    }
}

/// Owns all connections, both rosters and the turn pointer.
#[derive(Debug, Default)]
pub struct ClientManager {
    clients: HashMap<ClientId, Client>,
    lobby: HashSet<ClientId>,
    /// Turn order; index 0 is the head of the rotation
    roster: VecDeque<ClientId>,
    turn: Option<ClientId>,
}

impl ClientManager {
    /// Creates an empty registry with nobody holding the turn
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly accepted connection in the Lobby.
    pub fn add_client(&mut self, id: ClientId, addr: SocketAddr) {
        info!("[{}] Client connected from {}", id, addr);
        self.clients.insert(id, Client::new(id, addr));
        self.lobby.insert(id);
    }

    /// Which roster owns a connection
    ///
    /// Returns `None` for ids that were never registered or have already
    /// been removed. A live connection is always in exactly one roster.
    pub fn membership(&self, id: ClientId) -> Option<Membership> {
        if self.lobby.contains(&id) {
            Some(Membership::Lobby)
        } else if self.roster.contains(&id) {
            Some(Membership::Active)
        } else {
            None
        }
    }

    /// True while the connection is registered, in either roster
    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Mutable access to a client, mainly for feeding its line buffer
    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// Name of a connection, empty for unknown or unnamed ones.
    pub fn name(&self, id: ClientId) -> &str {
        self.clients.get(&id).map_or("", |client| client.name.as_str())
    }

    /// True when an Active Roster member already uses exactly this name.
    pub fn name_taken(&self, name: &str) -> bool {
        self.roster
            .iter()
            .filter_map(|id| self.clients.get(id))
            .any(|client| client.name == name)
    }

    /// Moves a Lobby connection into the Active Roster under `name`.
    ///
    /// The player is inserted at the head of the rotation. If nobody held
    /// the turn, the new player gets it. Returns false when `id` is not in
    /// the Lobby.
    pub fn promote(&mut self, id: ClientId, name: String) -> bool {
        if !self.lobby.remove(&id) {
            return false;
        }
        let Some(client) = self.clients.get_mut(&id) else {
            return false;
        };

        info!("[{}] {} has joined the game", id, name);
        client.name = name;
        self.roster.push_front(id);
        if self.turn.is_none() {
            self.turn = Some(id);
        }
        true
    }

    /// The Active Roster member whose guess is being solicited
    ///
    /// Empty only when the Active Roster is empty. Whenever it is set, it
    /// names a current roster member.
    pub fn turn(&self) -> Option<ClientId> {
        self.turn
    }

    /// Passes the turn to the next player in rotation order, wrapping from
    /// the last player back to the head. A sole player keeps the turn.
    pub fn advance_turn(&mut self) {
        let Some(current) = self.turn else {
            return;
        };

        self.turn = match self.roster.iter().position(|&id| id == current) {
            Some(index) => self.roster.get((index + 1) % self.roster.len()).copied(),
            None => {
                warn!("[{}] Turn holder missing from roster", current);
                self.roster.front().copied()
            }
        };
    }

    /// Snapshot of the Active Roster in rotation order.
    pub fn roster(&self) -> Vec<ClientId> {
        self.roster.iter().copied().collect()
    }

    /// Number of named players
    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// Number of connections still waiting to claim a name
    pub fn lobby_len(&self) -> usize {
        self.lobby.len()
    }

    /// Removes a connection from whichever roster owns it.
    ///
    /// Callers that want the turn to pass on should call
    /// [`advance_turn`](Self::advance_turn) first. If the removed connection
    /// still holds the turn afterwards (it was the only player), the turn
    /// pointer becomes empty.
    pub fn remove_client(&mut self, id: ClientId) -> Option<Client> {
        let client = self.clients.remove(&id)?;
        self.lobby.remove(&id);
        self.roster.retain(|&member| member != id);

        if self.turn == Some(id) {
            self.turn = self.roster.front().copied();
        }

        info!("[{}] Client from {} removed", id, client.addr);
        Some(client)
    }
}
