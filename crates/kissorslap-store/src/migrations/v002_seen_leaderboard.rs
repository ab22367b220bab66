use rusqlite::Connection;

const UP_SQL: &str = r#"
-- Candidates a viewer has already been shown and passed on
CREATE TABLE IF NOT EXISTS seen_by (
    user_id         TEXT NOT NULL,            -- FK -> users(id), the candidate
    seen_by_user_id TEXT NOT NULL,            -- FK -> users(id), the viewer
    created_at      TEXT NOT NULL,

    PRIMARY KEY (seen_by_user_id, user_id),
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (seen_by_user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_users_leaderboard
    ON users(is_complete, points DESC, created_at ASC);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
