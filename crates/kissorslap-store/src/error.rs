use thiserror::Error;

use kissorslap_shared::{ParseError, ProfileError};

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// UUID parsing error.
    #[error("UUID error: {0}")]
    Uuid(#[from] uuid::Error),

    /// Chrono parsing error.
    #[error("Timestamp parse error: {0}")]
    ChronoParse(#[from] chrono::ParseError),

    /// A stored value does not decode into its domain type.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// The acting (authenticated) user has no row.
    #[error("User not found")]
    UserNotFound,

    /// The user being acted on has no row.
    #[error("Target user not found")]
    TargetNotFound,

    #[error("Cannot interact with yourself")]
    SelfInteraction,

    #[error("Insufficient points: balance {balance}, required {required}")]
    InsufficientPoints { balance: i64, required: i64 },

    #[error("You have already acted on this user")]
    AlreadyActed,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Profile is incomplete: missing {0}")]
    IncompleteProfile(&'static str),

    #[error("Not a member of this chat")]
    NotChatMember,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl From<ParseError> for StoreError {
    fn from(e: ParseError) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
