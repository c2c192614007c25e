use std::fmt;

use crate::assets::AssetId;
use crate::resolver::ResolveError;

/// Errors surfaced by request handling.
///
/// Not being signed in is deliberately absent: the guard reports that as a
/// [`GuardResult::Halt`](crate::GuardResult::Halt).
#[derive(Debug)]
pub enum Error {
    /// The principal resolver could not answer.
    Resolve(ResolveError),
    /// An asset id did not match any record.
    AssetNotFound(AssetId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Resolve(e) => write!(f, "resolution failed: {}", e),
            Error::AssetNotFound(id) => write!(f, "asset {} not found", id),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Resolve(e) => Some(e),
            Error::AssetNotFound(_) => None,
        }
    }
}

impl From<ResolveError> for Error {
    fn from(e: ResolveError) -> Self {
        Error::Resolve(e)
    }
}
