//! Error types for server setup and operation.

use std::io;
use std::path::PathBuf;

/// Failure while loading the word list.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("cannot read dictionary {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("dictionary {} holds no lowercase words", .path.display())]
    Empty { path: PathBuf },
}

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Socket setup or listener failure
    #[error("network error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}
