//! # kissorslap-store
//!
//! SQLite-backed datastore for Kiss or Slap. The crate exposes a
//! synchronous `Database` handle that wraps a `rusqlite::Connection` and
//! provides typed operations for every domain model. Every mutation that
//! touches points or interaction state runs inside a single immediate
//! transaction.

pub mod candidates;
pub mod chats;
pub mod database;
pub mod interactions;
pub mod leaderboard;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod users;

mod error;
mod rows;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
