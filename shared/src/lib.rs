//! Protocol pieces shared by the word game server and its terminal client.
//!
//! The wire protocol is plain text. Every logical message in either
//! direction ends with a network newline (`\r\n`). Clients send one name
//! line after connecting and then one single-letter guess per line; the
//! server answers with the prompts and announcements in [`messages`].

pub mod framing;
pub mod messages;

pub use framing::{FrameError, LineBuffer};

/// Port used when neither the build nor the command line picks one.
pub const DEFAULT_PORT: u16 = 30001;

/// Bytes a single connection may buffer while waiting for a network newline.
pub const MAX_BUF: usize = 256;

/// Storage size for a player name, terminator included. Names keep at most
/// `MAX_NAME - 1` characters.
pub const MAX_NAME: usize = 30;

/// Wrong guesses allowed per round unless configured otherwise.
pub const MAX_GUESSES: u32 = 4;

/// Mask character standing in for an unrevealed letter.
pub const FILLER: char = '-';

/// Message terminator used in both directions.
pub const NETWORK_NEWLINE: &str = "\r\n";

/// Listening port baked in at build time.
///
/// Setting `WORDSRV_PORT` while compiling overrides [`DEFAULT_PORT`]; an
/// unparsable value falls back to the default.
pub fn default_port() -> u16 {
    option_env!("WORDSRV_PORT")
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Keeps at most `MAX_NAME - 1` characters of a requested name.
pub fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_NAME - 1).collect()
}
