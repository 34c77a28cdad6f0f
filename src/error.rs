//! Error types for board construction and guaranteed-start generation.

use thiserror::Error;

/// Rejected [`BoardSize`](crate::types::BoardSize) parameters.
///
/// Invalid combinations are refused at construction time, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardSizeError {
    #[error("board dimensions must be positive")]
    ZeroDimension,
    #[error("mine count must be positive")]
    NoMines,
    #[error("mine count must leave at least one safe cell")]
    TooManyMines,
}

/// The guaranteed-start generation loop was cancelled before a solvable
/// board was found. The game stays in its pre-start state; no partial
/// board is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("board generation was interrupted")]
pub struct GenerationInterrupted;
