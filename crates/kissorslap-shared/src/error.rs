use thiserror::Error;

/// A stored or submitted enum value that is not one of the known variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} value: {value:?}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },

    #[error("Username can only contain letters, numbers, and underscores")]
    UsernameCharset,

    #[error("Bio must be at most {max} characters")]
    BioTooLong { max: usize },

    #[error("You must be at least {min} years old")]
    Underage { min: i32 },

    #[error("Birthday cannot be in the future")]
    BirthdayInFuture,
}
