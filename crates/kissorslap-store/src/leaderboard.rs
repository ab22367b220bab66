//! Points leaderboard over users who finished onboarding.

use rusqlite::{params, OptionalExtension};

use kissorslap_shared::UserId;

use crate::database::Database;
use crate::error::Result;
use crate::models::{LeaderboardEntry, LeaderboardPage};
use crate::rows::uuid_col;

/// Actions other users have taken on `u.id`, on either side of the pair.
const ENTRY_SELECT: &str = r#"
SELECT u.id, u.username, u.name, u.points, u.hot_score, u.karma_score,
       (SELECT COUNT(*) FROM interactions i
         WHERE (i.user2_id = u.id AND i.user1_action IS NOT NULL)
            OR (i.user1_id = u.id AND i.user2_action IS NOT NULL)
       ) AS received
FROM users u
"#;

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<LeaderboardEntry> {
    Ok(LeaderboardEntry {
        id: UserId(uuid_col(row, 0)?),
        username: row.get(1)?,
        name: row.get(2)?,
        points: row.get(3)?,
        hot_score: row.get(4)?,
        karma_score: row.get(5)?,
        total_interactions_received: row.get(6)?,
    })
}

impl Database {
    /// One page of the leaderboard, 1-based. Pages past the end come back
    /// empty with the real `total_pages`.
    pub fn leaderboard(&self, viewer: UserId, page: u32, page_size: u32) -> Result<LeaderboardPage> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let conn = self.conn();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE is_complete = 1",
            [],
            |row| row.get(0),
        )?;
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        let total_pages = total.div_ceil(page_size).max(1);

        let offset = i64::from(page - 1) * i64::from(page_size);
        let mut stmt = conn.prepare(&format!(
            "{ENTRY_SELECT} WHERE u.is_complete = 1
             ORDER BY u.points DESC, u.created_at ASC, u.id ASC
             LIMIT ?1 OFFSET ?2"
        ))?;
        let users = stmt
            .query_map(params![page_size, offset], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let current_user = conn
            .query_row(
                &format!("{ENTRY_SELECT} WHERE u.id = ?1 AND u.is_complete = 1"),
                params![viewer.to_string()],
                row_to_entry,
            )
            .optional()?;

        let current_user_rank = match &current_user {
            Some(entry) => {
                let ahead: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM users WHERE is_complete = 1 AND points > ?1",
                    params![entry.points],
                    |row| row.get(0),
                )?;
                Some(u32::try_from(ahead + 1).unwrap_or(u32::MAX))
            }
            None => None,
        };

        Ok(LeaderboardPage {
            users,
            current_page: page,
            total_pages,
            current_user_rank,
            current_user,
        })
    }
}
