//! Server network layer: TCP accept loop and per-connection I/O tasks
//!
//! The event loop is the only place game state changes. It waits, without a
//! timeout, on two sources at once: the listener and a channel fed by the
//! connection tasks. Each connection gets a reader task that forwards raw
//! chunks and a writer task that drains a queue of outgoing messages; neither
//! touches the rosters or the round.

use crate::client_manager::ClientId;
use crate::config::ServerConfig;
use crate::dictionary::WordSource;
use crate::engine::GameEngine;
use crate::error::ServerError;
use crate::messaging::Transport;
use log::{debug, info, warn};
use shared::MAX_BUF;
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Events sent from connection tasks to the event loop
#[derive(Debug)]
pub enum ServerMessage {
    Received { client_id: ClientId, data: Vec<u8> },
    /// The peer closed its side (a zero-byte read)
    Closed { client_id: ClientId },
    ReadFailed { client_id: ClientId, error: io::Error },
    /// A queued message could not be written out
    WriteFailed { client_id: ClientId, error: io::Error },
}

struct Connection {
    outgoing: mpsc::UnboundedSender<String>,
    reader: JoinHandle<()>,
}

/// [`Transport`] over accepted TCP streams.
///
/// Sending queues the whole message for the connection's writer task, so
/// a message is either delivered in full or reported as a write failure.
pub struct TcpTransport {
    connections: HashMap<ClientId, Connection>,
    events: mpsc::UnboundedSender<ServerMessage>,
}

impl TcpTransport {
    /// Creates a transport whose connection tasks report to `events`.
    pub fn new(events: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            connections: HashMap::new(),
            events,
        }
    }

    /// Starts the reader and writer tasks for an accepted stream.
    pub fn register(&mut self, client_id: ClientId, stream: TcpStream) {
        let (read_half, write_half) = stream.into_split();
        let (outgoing, queue) = mpsc::unbounded_channel();

        let reader = tokio::spawn(read_loop(client_id, read_half, self.events.clone()));
        tokio::spawn(write_loop(client_id, write_half, queue, self.events.clone()));

        self.connections.insert(client_id, Connection { outgoing, reader });
    }
}

#[cfg(test)]
impl TcpTransport {
    fn len(&self) -> usize {
        self.connections.len()
    }

    fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, id: ClientId, message: &str) -> io::Result<()> {
        let connection = self
            .connections
            .get(&id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "unknown connection"))?;

        connection
            .outgoing
            .send(message.to_string())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "connection writer stopped"))
    }

    fn close(&mut self, id: ClientId) {
        if let Some(connection) = self.connections.remove(&id) {
            // The writer flushes what is queued, then shuts the socket down.
            connection.reader.abort();
            debug!("[{}] Connection closed", id);
        }
    }
}

/// Forwards everything read from one connection to the event loop.
async fn read_loop(
    client_id: ClientId,
    mut reader: OwnedReadHalf,
    events: mpsc::UnboundedSender<ServerMessage>,
) {
    let mut buffer = [0u8; MAX_BUF];

    loop {
        let message = match reader.read(&mut buffer).await {
            Ok(0) => ServerMessage::Closed { client_id },
            Ok(len) => ServerMessage::Received {
                client_id,
                data: buffer[..len].to_vec(),
            },
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => ServerMessage::ReadFailed { client_id, error },
        };

        let finished = !matches!(message, ServerMessage::Received { .. });
        if events.send(message).is_err() || finished {
            break;
        }
    }
}

/// Writes queued messages to one connection until the queue closes or a
/// write fails.
async fn write_loop(
    client_id: ClientId,
    mut writer: OwnedWriteHalf,
    mut queue: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<ServerMessage>,
) {
    while let Some(message) = queue.recv().await {
        if let Err(error) = writer.write_all(message.as_bytes()).await {
            let _ = events.send(ServerMessage::WriteFailed { client_id, error });
            return;
        }
    }

    if let Err(e) = writer.shutdown().await {
        debug!("[{}] Shutdown failed: {}", client_id, e);
    }
}

/// Word game server bound to a listening socket
pub struct Server {
    listener: TcpListener,
    engine: GameEngine<TcpTransport>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    next_client_id: ClientId,
}

impl Server {
    /// Binds `addr` and prepares the first round.
    ///
    /// Words for every round come from `words`; each round allows
    /// `max_guesses` wrong guesses. Binding errors are returned as
    /// [`ServerError::Io`].
    pub async fn new(
        addr: &str,
        words: Box<dyn WordSource>,
        max_guesses: u32,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let engine = GameEngine::new(TcpTransport::new(server_tx), words, max_guesses);

        Ok(Server {
            listener,
            engine,
            server_rx,
            next_client_id: 1,
        })
    }

    /// Binds the address and guess budget named in `config`.
    pub async fn bind(config: &ServerConfig, words: Box<dyn WordSource>) -> Result<Self, ServerError> {
        Self::new(&config.bind_address(), words, config.guesses).await
    }

    /// Address actually bound, useful when asking for port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn engine(&self) -> &GameEngine<TcpTransport> {
        &self.engine
    }

    /// Hands out the next free connection id, wrapping around after
    /// `ClientId::MAX` and skipping ids still in use.
    fn next_id(&mut self) -> ClientId {
        loop {
            let id = self.next_client_id;
            self.next_client_id = self.next_client_id.wrapping_add(1);
            if !self.engine.clients().contains(id) {
                return id;
            }
        }
    }

    fn accept(&mut self, stream: TcpStream, addr: SocketAddr) {
        let client_id = self.next_id();

        self.engine.transport_mut().register(client_id, stream);
        self.engine.handle_connect(client_id, addr);
    }

    fn handle_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Received { client_id, data } => {
                self.engine.handle_data(client_id, &data);
            }
            ServerMessage::Closed { client_id } => {
                self.engine.handle_closed(client_id);
            }
            ServerMessage::ReadFailed { client_id, error } => {
                self.engine.handle_read_error(client_id, &error);
            }
            ServerMessage::WriteFailed { client_id, error } => {
                self.engine.handle_write_error(client_id, &error);
            }
        }
    }

    /// Main server loop. Handles one event to completion before waiting
    /// for the next; runs until the task is dropped.
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Server started successfully");

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!("A new client is connecting from {}", addr);
                        self.accept(stream, addr);
                    }
                    Err(e) => {
                        warn!("Error accepting connection: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                },

                Some(message) = self.server_rx.recv() => {
                    self.handle_message(message);
                }
            }
        }
    }
}
