//! # Word Game Client Library
//!
//! Terminal client for the word game server. The protocol is plain text, so
//! the client stays thin: it prints every line the server sends and forwards
//! every line typed on stdin, terminated with a network newline.
//!
//! ## Module Organization
//!
//! - `input`: turning typed lines into protocol lines
//! - `network`: the connection and the two relay directions
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     client::network::run("127.0.0.1:30001").await
//! }
//! ```

pub mod input;
pub mod network;
