//! v001 -- Initial schema creation.
//!
//! Creates the four core tables: `users`, `chats`, `interactions` and
//! `messages`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id                TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    outside_id        TEXT NOT NULL UNIQUE,       -- identity provider subject
    username          TEXT UNIQUE,                -- set during onboarding
    name              TEXT,
    bio               TEXT,
    gender            TEXT CHECK (gender IN ('MALE', 'FEMALE')),
    gender_preference TEXT CHECK (gender_preference IN ('MALE', 'FEMALE', 'BOTH')),
    birthday          TEXT,                       -- YYYY-MM-DD
    age               INTEGER,
    is_complete       INTEGER NOT NULL DEFAULT 0, -- boolean 0/1
    points            INTEGER NOT NULL DEFAULT 0,
    hot_score         INTEGER NOT NULL DEFAULT 0,
    karma_score       INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,              -- RFC-3339
    updated_at        TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Chats (one per MUTUAL_KISS interaction)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS chats (
    id         TEXT PRIMARY KEY NOT NULL,         -- UUID v4
    user1_id   TEXT NOT NULL,
    user2_id   TEXT NOT NULL,
    created_at TEXT NOT NULL,

    FOREIGN KEY (user1_id) REFERENCES users(id),
    FOREIGN KEY (user2_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_chats_user1 ON chats(user1_id);
CREATE INDEX IF NOT EXISTS idx_chats_user2 ON chats(user2_id);

-- ----------------------------------------------------------------
-- Interactions
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS interactions (
    id           TEXT PRIMARY KEY NOT NULL,       -- UUID v4
    user1_id     TEXT NOT NULL,                   -- first to act
    user2_id     TEXT NOT NULL,
    pair_low     TEXT NOT NULL,                   -- min(user1_id, user2_id)
    pair_high    TEXT NOT NULL,                   -- max(user1_id, user2_id)
    user1_action TEXT CHECK (user1_action IN ('KISS', 'SLAP')),
    user2_action TEXT CHECK (user2_action IN ('KISS', 'SLAP')),
    status       TEXT NOT NULL DEFAULT 'PENDING'
                 CHECK (status IN ('PENDING', 'COMPLETE')),
    result       TEXT CHECK (result IN ('MUTUAL_KISS', 'MUTUAL_SLAP', 'KISS_SLAP', 'SLAP_KISS')),
    chat_id      TEXT UNIQUE,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,

    CHECK (user1_id <> user2_id),
    CHECK (pair_low < pair_high),
    FOREIGN KEY (user1_id) REFERENCES users(id),
    FOREIGN KEY (user2_id) REFERENCES users(id),
    FOREIGN KEY (chat_id) REFERENCES chats(id)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_interactions_pair
    ON interactions(pair_low, pair_high);
CREATE INDEX IF NOT EXISTS idx_interactions_user1 ON interactions(user1_id, status);
CREATE INDEX IF NOT EXISTS idx_interactions_user2 ON interactions(user2_id, status);

-- ----------------------------------------------------------------
-- Messages (append-only)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    seq       INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order
    id        TEXT NOT NULL UNIQUE,               -- UUID v4
    chat_id   TEXT NOT NULL,
    sender_id TEXT NOT NULL,
    content   TEXT NOT NULL,
    timestamp TEXT NOT NULL,

    FOREIGN KEY (chat_id) REFERENCES chats(id),
    FOREIGN KEY (sender_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_messages_chat_seq ON messages(chat_id, seq DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
