//! User rows: creation on first authentication, onboarding/profile writes and
//! point operations that happen outside the interaction engine.

use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::info;

use kissorslap_shared::constants::{DEFAULT_HOT_SCORE, DEFAULT_KARMA_SCORE};
use kissorslap_shared::profile::{normalize_username, validate_bio, validate_birthday};
use kissorslap_shared::UserId;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{ProfileUpdate, User};
use crate::rows::{
    enum_as_opt, format_ts, now, opt_date_col, opt_enum_col, or_not_found, ts_col, uuid_col,
};

pub(crate) const USER_COLUMNS: &str = "id, outside_id, username, name, bio, gender, \
     gender_preference, birthday, age, is_complete, points, hot_score, karma_score, \
     created_at, updated_at";

pub(crate) fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(uuid_col(row, 0)?),
        outside_id: row.get(1)?,
        username: row.get(2)?,
        name: row.get(3)?,
        bio: row.get(4)?,
        gender: opt_enum_col(row, 5)?,
        gender_preference: opt_enum_col(row, 6)?,
        birthday: opt_date_col(row, 7)?,
        age: row.get(8)?,
        is_complete: row.get(9)?,
        points: row.get(10)?,
        hot_score: row.get(11)?,
        karma_score: row.get(12)?,
        created_at: ts_col(row, 13)?,
        updated_at: ts_col(row, 14)?,
    })
}

pub(crate) fn fetch_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    Ok(conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.to_string()],
            row_to_user,
        )
        .optional()?)
}

/// Current balance, or `UserNotFound`.
pub(crate) fn fetch_points(conn: &Connection, id: UserId) -> Result<i64> {
    conn.query_row(
        "SELECT points FROM users WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    )
    .map_err(|e| or_not_found(e, StoreError::UserNotFound))
}

/// Add `delta` (possibly negative) to a balance unconditionally.
pub(crate) fn add_points(conn: &Connection, id: UserId, delta: i64) -> Result<()> {
    let affected = conn.execute(
        "UPDATE users SET points = points + ?1, updated_at = ?2 WHERE id = ?3",
        params![delta, format_ts(now()), id.to_string()],
    )?;
    if affected == 0 {
        return Err(StoreError::UserNotFound);
    }
    Ok(())
}

/// Subtract `amount` only if the balance covers it.
pub(crate) fn debit_points(conn: &Connection, id: UserId, amount: i64) -> Result<i64> {
    let affected = conn.execute(
        "UPDATE users SET points = points - ?1, updated_at = ?2
         WHERE id = ?3 AND points >= ?1",
        params![amount, format_ts(now()), id.to_string()],
    )?;
    if affected == 0 {
        let balance = fetch_points(conn, id)?;
        return Err(StoreError::InsufficientPoints {
            balance,
            required: amount,
        });
    }
    fetch_points(conn, id)
}

impl Database {
    // ------------------------------------------------------------------
    // Create / Read
    // ------------------------------------------------------------------

    /// Return the user for an identity-provider subject, creating it with
    /// `starting_points` on first sight.
    pub fn ensure_user(&mut self, outside_id: &str, starting_points: i64) -> Result<User> {
        let tx = self.immediate()?;
        let ts = format_ts(now());
        let id = UserId::new();

        let created = tx.execute(
            "INSERT INTO users (id, outside_id, points, hot_score, karma_score, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(outside_id) DO NOTHING",
            params![
                id.to_string(),
                outside_id,
                starting_points,
                DEFAULT_HOT_SCORE,
                DEFAULT_KARMA_SCORE,
                ts,
            ],
        )?;

        let user = tx
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE outside_id = ?1"),
                params![outside_id],
                row_to_user,
            )
            .map_err(|e| or_not_found(e, StoreError::UserNotFound))?;
        tx.commit()?;

        if created > 0 {
            info!(user = %user.id, points = starting_points, "created user on first authentication");
        }
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Result<User> {
        fetch_user(self.conn(), id)?.ok_or(StoreError::UserNotFound)
    }

    pub fn get_user_by_outside_id(&self, outside_id: &str) -> Result<User> {
        self.conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE outside_id = ?1"),
                params![outside_id],
                row_to_user,
            )
            .map_err(|e| or_not_found(e, StoreError::UserNotFound))
    }

    // ------------------------------------------------------------------
    // Onboarding / profile
    // ------------------------------------------------------------------

    /// Set a unique, validated username. Re-setting one's own current name
    /// is allowed.
    pub fn set_username(&mut self, id: UserId, requested: &str) -> Result<User> {
        let username = normalize_username(requested)?;
        let tx = self.immediate()?;

        let taken: Option<String> = tx
            .query_row(
                "SELECT id FROM users WHERE username = ?1 AND id <> ?2",
                params![username, id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(StoreError::UsernameTaken);
        }

        let affected = tx
            .execute(
                "UPDATE users SET username = ?1, updated_at = ?2 WHERE id = ?3",
                params![username, format_ts(now()), id.to_string()],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    StoreError::UsernameTaken
                }
                other => StoreError::Sqlite(other),
            })?;
        if affected == 0 {
            return Err(StoreError::UserNotFound);
        }

        let user = fetch_user(&tx, id)?.ok_or(StoreError::UserNotFound)?;
        tx.commit()?;
        Ok(user)
    }

    /// Apply a partial profile edit. `today` anchors the age check.
    pub fn update_profile(
        &mut self,
        id: UserId,
        update: &ProfileUpdate,
        today: NaiveDate,
    ) -> Result<User> {
        let name = update.name.as_deref().map(str::trim);
        let bio = update.bio.as_deref().map(str::trim);

        if let Some(bio) = bio {
            validate_bio(bio)?;
        }
        let age = update
            .birthday
            .map(|b| validate_birthday(b, today))
            .transpose()?;

        let tx = self.immediate()?;
        let affected = tx.execute(
            "UPDATE users SET
                 name = CASE WHEN ?1 THEN NULLIF(?2, '') ELSE name END,
                 bio = CASE WHEN ?3 THEN NULLIF(?4, '') ELSE bio END,
                 gender = COALESCE(?5, gender),
                 gender_preference = COALESCE(?6, gender_preference),
                 birthday = COALESCE(?7, birthday),
                 age = COALESCE(?8, age),
                 updated_at = ?9
             WHERE id = ?10",
            params![
                name.is_some(),
                name,
                bio.is_some(),
                bio,
                enum_as_opt(update.gender),
                enum_as_opt(update.gender_preference),
                update.birthday.map(|b| b.format("%Y-%m-%d").to_string()),
                age,
                format_ts(now()),
                id.to_string(),
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::UserNotFound);
        }

        let user = fetch_user(&tx, id)?.ok_or(StoreError::UserNotFound)?;
        tx.commit()?;
        Ok(user)
    }

    /// Mark onboarding finished once every required field is present.
    pub fn complete_onboarding(&mut self, id: UserId) -> Result<User> {
        let tx = self.immediate()?;
        let user = fetch_user(&tx, id)?.ok_or(StoreError::UserNotFound)?;

        if user.username.is_none() {
            return Err(StoreError::IncompleteProfile("username"));
        }
        if user.gender.is_none() {
            return Err(StoreError::IncompleteProfile("gender"));
        }
        if user.gender_preference.is_none() {
            return Err(StoreError::IncompleteProfile("genderPreference"));
        }
        if user.birthday.is_none() {
            return Err(StoreError::IncompleteProfile("birthday"));
        }

        tx.execute(
            "UPDATE users SET is_complete = 1, updated_at = ?1 WHERE id = ?2",
            params![format_ts(now()), id.to_string()],
        )?;
        let user = fetch_user(&tx, id)?.ok_or(StoreError::UserNotFound)?;
        tx.commit()?;

        info!(user = %id, "onboarding complete");
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Points and scores
    // ------------------------------------------------------------------

    /// Credit purchased points. Returns the new balance.
    pub fn credit_points(&mut self, id: UserId, points: i64) -> Result<i64> {
        if points <= 0 {
            return Err(StoreError::InvalidAmount);
        }
        let tx = self.immediate()?;
        add_points(&tx, id, points)?;
        let balance = fetch_points(&tx, id)?;
        tx.commit()?;

        info!(user = %id, points, balance, "points credited");
        Ok(balance)
    }

    /// Debit points for a cash-out. Returns the new balance.
    pub fn withdraw_points(&mut self, id: UserId, amount: i64) -> Result<i64> {
        if amount <= 0 {
            return Err(StoreError::InvalidAmount);
        }
        let tx = self.immediate()?;
        let balance = debit_points(&tx, id, amount)?;
        tx.commit()?;

        info!(user = %id, amount, balance, "points withdrawn");
        Ok(balance)
    }

    /// Shift the hot / karma counters by the given deltas.
    pub fn adjust_scores(&mut self, id: UserId, hot_delta: i64, karma_delta: i64) -> Result<User> {
        let tx = self.immediate()?;
        let affected = tx.execute(
            "UPDATE users SET hot_score = hot_score + ?1, karma_score = karma_score + ?2,
                 updated_at = ?3
             WHERE id = ?4",
            params![hot_delta, karma_delta, format_ts(now()), id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::UserNotFound);
        }
        let user = fetch_user(&tx, id)?.ok_or(StoreError::UserNotFound)?;
        tx.commit()?;
        Ok(user)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use kissorslap_shared::{Gender, GenderPreference};

    pub const TODAY: (i32, u32, u32) = (2026, 10, 14);

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
    }

    /// Create a user who has finished onboarding.
    pub fn onboarded(db: &mut Database, username: &str, points: i64) -> User {
        let user = db.ensure_user(&format!("did:test:{username}"), points).unwrap();
        db.set_username(user.id, username).unwrap();
        db.update_profile(
            user.id,
            &ProfileUpdate {
                name: Some(username.to_uppercase()),
                bio: None,
                gender: Some(Gender::Female),
                gender_preference: Some(GenderPreference::Both),
                birthday: NaiveDate::from_ymd_opt(1995, 3, 1),
            },
            today(),
        )
        .unwrap();
        db.complete_onboarding(user.id).unwrap()
    }
}
