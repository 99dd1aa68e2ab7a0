use std::io;

/// Everything that can go wrong outside of normal play.
///
/// Walking into a wall or running out of thread are not errors; those are
/// reported through [`crate::session::MoveOutcome`] and the session status.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("level must be at least 1, got {0}")]
    InvalidLevel(u32),

    #[error("maze needs at least one room per side, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("thread length must be positive, got {0}")]
    InvalidThread(u32),

    #[error("grid row {row} has length {len}, expected {expected}")]
    RaggedGrid {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("unknown grid character {0:?}")]
    BadGridChar(char),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, GameError>;
