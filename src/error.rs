use thiserror::Error;

use crate::handle::{ArenaId, Handle};

#[derive(Debug, Error)]
pub enum Error {
    #[error("capacity must be at least 1")]
    InvalidCapacity,
    #[error("heap is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("heap is empty")]
    EmptyHeap,
    #[error("no samples have been added")]
    Empty,
    #[error("{0:?} does not name an element of this heap")]
    UnknownHandle(Handle),
    #[error("heap is bound to {expected:?}, got {found:?}")]
    ForeignArena { expected: ArenaId, found: ArenaId },
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid sample {token:?} at position {position}")]
    Parse { token: String, position: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
