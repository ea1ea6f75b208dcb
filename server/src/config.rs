//! Command-line configuration for the server binary.

use clap::Parser;
use shared::{default_port, MAX_GUESSES};
use std::path::PathBuf;

/// Multiplayer word guessing server
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Newline-separated word list to pick hidden words from
    pub dictionary: PathBuf,

    /// Address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = default_port())]
    pub port: u16,

    /// Wrong guesses allowed per round
    #[arg(
        short,
        long,
        default_value_t = MAX_GUESSES,
        value_parser = clap::value_parser!(u32).range(1..=26)
    )]
    pub guesses: u32,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
