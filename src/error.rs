use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Domain errors surfaced to callers. Every case except `Store` is
/// recoverable by adjusting the input and retrying. Cloneable so a
/// single failure can reach every waiter on an attempt.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the record store itself. Corruption is fatal at open time;
/// the store never silently resets a collection it cannot parse. Sources
/// sit behind `Arc` so the variants stay cloneable.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("corrupt collection {collection} at {path}: {source}")]
    Corrupt {
        collection: &'static str,
        path: PathBuf,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("could not encode collection {collection}: {source}")]
    Encode {
        collection: &'static str,
        #[source]
        source: Arc<serde_json::Error>,
    },
}
