//! Errors of the persistence layer
//!
//! None of them is fatal: the gateway turns each of them into a fallback, or into an empty collection and a user-visible notice.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// The error type used at the store seams.
///
/// It is `Send + Sync` so that it can be held across `.await` points in `async_trait` futures
pub type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug)]
pub enum PersistenceError {
    /// No remote store is configured. This is expected, and silently selects the local store
    RemoteUnavailable,
    /// The remote store has been reached, but the operation failed
    RemoteOperationFailed(BoxError),
    /// The local store could not be read or written
    LocalStoreFailed(BoxError),
    /// The local blob exists but is not a valid collection
    ParseFailure(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::RemoteUnavailable => write!(f, "remote store unavailable"),
            PersistenceError::RemoteOperationFailed(err) => write!(f, "remote operation failed: {}", err),
            PersistenceError::LocalStoreFailed(err) => write!(f, "local store failed: {}", err),
            PersistenceError::ParseFailure(err) => write!(f, "unable to parse local data: {}", err),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PersistenceError::RemoteUnavailable => None,
            PersistenceError::RemoteOperationFailed(err) => Some(err.as_ref()),
            PersistenceError::LocalStoreFailed(err) => Some(err.as_ref()),
            PersistenceError::ParseFailure(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::ParseFailure(err)
    }
}
