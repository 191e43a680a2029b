//! Error types for the Quarry engine

use thiserror::Error;

/// Errors surfaced to callers.
///
/// Only data-dependent failures are reported this way. Malformed call
/// sequences (undo with nothing to undo, board sizes out of range) are
/// caller bugs and panic instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid {game} move notation '{text}'")]
    InvalidMoveNotation { game: &'static str, text: String },

    #[error("unknown game '{0}'")]
    UnknownGame(String),

    #[error("invalid board validation level '{0}' (expected 0-2, none, basic or full)")]
    InvalidValidationLevel(String),

    #[error("cannot split a node that already has children")]
    NodeHasChildren,
}

pub type Result<T> = std::result::Result<T, Error>;
