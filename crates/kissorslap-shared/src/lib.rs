//! # kissorslap-shared
//!
//! Domain vocabulary shared by the store and the HTTP server: identifiers,
//! action/status enums, point constants, the pairwise resolution table and
//! profile validation rules.

pub mod constants;
pub mod error;
pub mod profile;
pub mod resolution;
pub mod types;

pub use error::{ParseError, ProfileError};
pub use resolution::{resolve, Outcome};
pub use types::{
    Action, ChatId, Gender, GenderPreference, InteractionId, InteractionResult,
    InteractionStatus, Side, UserId, canonical_pair,
};
