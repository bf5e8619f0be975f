use std::path::PathBuf;

/// A move the match refused. The board and turn are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range (0-6)")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("the round is over; start a new round first")]
    RoundOver,
}

/// Errors that can occur when setting up a match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("player name must not be empty")]
    EmptyName,

    #[error("player name {0:?} contains a reserved character (',' ':' or a line break)")]
    ReservedCharacter(String),

    #[error("both players are named {0:?}")]
    DuplicateName(String),
}

/// Reasons a snapshot cannot be turned back into a match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("player one must play X and player two O")]
    PieceMismatch,

    #[error("column {0} has a piece floating above an empty cell")]
    FloatingPiece(usize),

    #[error("X has {x} pieces and O has {o}; X moves first so that cannot happen")]
    ImbalancedPieces { x: usize, o: usize },

    #[error("both players have four in a row")]
    TwoWinners,

    #[error("current turn names {0:?}, who is not playing")]
    UnknownCurrentTurn(String),

    #[error("current turn is {found:?} but {expected:?} should be to move")]
    TurnMismatch { expected: String, found: String },
}

/// Errors that can occur while reading or writing saves, scores and history.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("save #{index} not found ({available} available)")]
    MissingRecord { index: usize, available: usize },

    #[error("save #{index} is corrupt: {reason}")]
    CorruptRecord { index: usize, reason: String },

    #[error("scores line {line} is corrupt: {reason}")]
    CorruptScores { line: usize, reason: String },
}

/// Errors that can occur when starting or resuming a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
