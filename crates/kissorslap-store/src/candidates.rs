//! Candidate stack selection and the viewer's seen-set.
//!
//! Reads are not locked: a stack may be slightly stale by the time the
//! viewer acts on it, and the submission path re-checks everything.

use rusqlite::params;
use tracing::debug;

use kissorslap_shared::UserId;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Candidate;
use crate::rows::{format_ts, now, opt_enum_col, uuid_col};
use crate::users::fetch_user;

/// A user is eligible for viewer `?1` when:
/// - they are someone else and have finished onboarding,
/// - the viewer has not already been shown them (seen-set), and
/// - no interaction with the viewer exists, or one exists that is still
///   PENDING and waiting on the viewer.
///
/// Users who have already acted on the viewer come first.
const CANDIDATES_SQL: &str = r#"
SELECT u.id, u.username, u.name, u.bio, u.gender, u.gender_preference, u.age,
       u.hot_score, u.karma_score,
       EXISTS (
           SELECT 1 FROM interactions i
           WHERE i.status = 'PENDING'
             AND ((i.user1_id = u.id AND i.user2_id = ?1
                   AND i.user1_action IS NOT NULL AND i.user2_action IS NULL)
               OR (i.user2_id = u.id AND i.user1_id = ?1
                   AND i.user2_action IS NOT NULL AND i.user1_action IS NULL))
       ) AS other_user_acted
FROM users u
WHERE u.id <> ?1
  AND u.is_complete = 1
  AND NOT EXISTS (
      SELECT 1 FROM seen_by s
      WHERE s.seen_by_user_id = ?1 AND s.user_id = u.id
  )
  AND NOT EXISTS (
      SELECT 1 FROM interactions i
      WHERE i.pair_low = MIN(u.id, ?1) AND i.pair_high = MAX(u.id, ?1)
        AND NOT (
            i.status = 'PENDING'
            AND (CASE WHEN i.user1_id = ?1 THEN i.user1_action ELSE i.user2_action END) IS NULL
        )
  )
ORDER BY other_user_acted DESC, u.created_at ASC, u.id ASC
LIMIT ?2
"#;

impl Database {
    /// The ordered stack of users `viewer` may act on next, at most `limit`.
    /// Each call re-reads current state; no cursor is kept between calls.
    pub fn list_candidates(&self, viewer: UserId, limit: u32) -> Result<Vec<Candidate>> {
        let mut stmt = self.conn().prepare(CANDIDATES_SQL)?;
        let rows = stmt.query_map(params![viewer.to_string(), limit], |row| {
            Ok(Candidate {
                id: UserId(uuid_col(row, 0)?),
                username: row.get(1)?,
                name: row.get(2)?,
                bio: row.get(3)?,
                gender: opt_enum_col(row, 4)?,
                gender_preference: opt_enum_col(row, 5)?,
                age: row.get(6)?,
                hot_score: row.get(7)?,
                karma_score: row.get(8)?,
                other_user_acted: row.get(9)?,
            })
        })?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row?);
        }
        debug!(viewer = %viewer, count = candidates.len(), "candidate stack built");
        Ok(candidates)
    }

    /// Record that `viewer` has been shown `user` and passed. Idempotent.
    pub fn mark_seen(&mut self, viewer: UserId, user: UserId) -> Result<()> {
        if viewer == user {
            return Err(StoreError::SelfInteraction);
        }
        let tx = self.immediate()?;
        if fetch_user(&tx, viewer)?.is_none() {
            return Err(StoreError::UserNotFound);
        }
        if fetch_user(&tx, user)?.is_none() {
            return Err(StoreError::TargetNotFound);
        }
        tx.execute(
            "INSERT INTO seen_by (user_id, seen_by_user_id, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(seen_by_user_id, user_id) DO NOTHING",
            params![user.to_string(), viewer.to_string(), format_ts(now())],
        )?;
        tx.commit()?;
        Ok(())
    }
}
