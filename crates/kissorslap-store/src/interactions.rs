//! Pairwise interaction records and the submit/resolve state machine.
//!
//! One row exists per unordered pair of users (enforced by the unique
//! `(pair_low, pair_high)` index). The first user to act on the pair is
//! stored as `user1`; an empty record opened by `get_or_create_interaction`
//! is flipped onto whoever acts on it first. A record moves `PENDING -> COMPLETE` exactly once,
//! when the second side's action lands; points and chat provisioning are
//! applied in the same transaction as that transition.
//!
//! Every write is a conditional update checked by its affected-row count,
//! so a competing writer can never apply a fee, an action or a payout a
//! second time; a zero-row update aborts the whole transaction.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use kissorslap_shared::{
    canonical_pair, resolve, Action, ChatId, InteractionId, InteractionStatus, Side, UserId,
};

use crate::chats::create_chat;
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Interaction, InteractionHistoryEntry, SubmitOutcome};
use crate::rows::{
    enum_col, format_ts, now, opt_enum_col, opt_uuid_col, or_not_found, ts_col, uuid_col,
};
use crate::users::{add_points, debit_points, fetch_points, fetch_user};

pub(crate) const INTERACTION_COLUMNS: &str = "id, user1_id, user2_id, user1_action, \
     user2_action, status, result, chat_id, created_at, updated_at";

pub(crate) fn row_to_interaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Interaction> {
    Ok(Interaction {
        id: InteractionId(uuid_col(row, 0)?),
        user1_id: UserId(uuid_col(row, 1)?),
        user2_id: UserId(uuid_col(row, 2)?),
        user1_action: opt_enum_col(row, 3)?,
        user2_action: opt_enum_col(row, 4)?,
        status: enum_col(row, 5)?,
        result: opt_enum_col(row, 6)?,
        chat_id: opt_uuid_col(row, 7)?.map(ChatId),
        created_at: ts_col(row, 8)?,
        updated_at: ts_col(row, 9)?,
    })
}

fn action_column(side: Side) -> &'static str {
    match side {
        Side::User1 => "user1_action",
        Side::User2 => "user2_action",
    }
}

pub(crate) fn fetch_interaction(conn: &Connection, id: InteractionId) -> Result<Interaction> {
    conn.query_row(
        &format!("SELECT {INTERACTION_COLUMNS} FROM interactions WHERE id = ?1"),
        params![id.to_string()],
        row_to_interaction,
    )
    .map_err(|e| or_not_found(e, StoreError::NotFound))
}

/// The record for the unordered pair `{a, b}`, whichever side each is on.
pub(crate) fn find_between(conn: &Connection, a: UserId, b: UserId) -> Result<Option<Interaction>> {
    let (low, high) = canonical_pair(a, b);
    Ok(conn
        .query_row(
            &format!(
                "SELECT {INTERACTION_COLUMNS} FROM interactions
                 WHERE pair_low = ?1 AND pair_high = ?2"
            ),
            params![low.to_string(), high.to_string()],
            row_to_interaction,
        )
        .optional()?)
}

/// Look up the pair's record or insert a fresh one with `acting` as user1.
/// Returns the record and the side `acting` occupies.
pub(crate) fn get_or_create(
    conn: &Connection,
    acting: UserId,
    target: UserId,
) -> Result<(Interaction, Side)> {
    if acting == target {
        return Err(StoreError::SelfInteraction);
    }

    if find_between(conn, acting, target)?.is_none() {
        let (low, high) = canonical_pair(acting, target);
        let ts = format_ts(now());
        let created = conn.execute(
            "INSERT INTO interactions
                 (id, user1_id, user2_id, pair_low, pair_high, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING', ?6, ?6)
             ON CONFLICT(pair_low, pair_high) DO NOTHING",
            params![
                InteractionId::new().to_string(),
                acting.to_string(),
                target.to_string(),
                low.to_string(),
                high.to_string(),
                ts,
            ],
        )?;
        if created > 0 {
            debug!(user1 = %acting, user2 = %target, "interaction record created");
        }
    }

    let interaction = find_between(conn, acting, target)?.ok_or(StoreError::NotFound)?;
    let side = interaction
        .side_of(acting)
        .ok_or_else(|| StoreError::Corrupt(format!("interaction {} lost its pair", interaction.id)))?;
    Ok((interaction, side))
}

/// Put the first actor on an empty record onto `user1`. Records that
/// already carry an action are returned as they are.
fn orient_for_first_action(
    conn: &Connection,
    interaction: Interaction,
    side: Side,
    acting: UserId,
) -> Result<(Interaction, Side)> {
    let untouched = interaction.user1_action.is_none() && interaction.user2_action.is_none();
    if side == Side::User1 || !untouched {
        return Ok((interaction, side));
    }

    // SQLite evaluates every SET expression against the pre-update row.
    conn.execute(
        "UPDATE interactions SET user1_id = user2_id, user2_id = user1_id
         WHERE id = ?1 AND status = 'PENDING'
           AND user1_action IS NULL AND user2_action IS NULL",
        params![interaction.id.to_string()],
    )?;

    let interaction = fetch_interaction(conn, interaction.id)?;
    let side = interaction
        .side_of(acting)
        .ok_or_else(|| StoreError::Corrupt(format!("interaction {} lost its pair", interaction.id)))?;
    Ok((interaction, side))
}

/// Drive a record to COMPLETE if both actions are present. No-op on a
/// record that is already COMPLETE or still waiting on one side.
pub(crate) fn resolve_in(conn: &Connection, interaction: Interaction) -> Result<Interaction> {
    if interaction.is_complete() {
        return Ok(interaction);
    }
    let (Some(a1), Some(a2)) = (interaction.user1_action, interaction.user2_action) else {
        return Ok(interaction);
    };

    let outcome = resolve(a1, a2);
    let ts = format_ts(now());

    let transitioned = conn.execute(
        "UPDATE interactions SET status = 'COMPLETE', result = ?1, updated_at = ?2
         WHERE id = ?3 AND status = 'PENDING'
           AND user1_action IS NOT NULL AND user2_action IS NOT NULL",
        params![outcome.result.as_str(), ts, interaction.id.to_string()],
    )?;
    if transitioned == 0 {
        // Someone else completed it; their payout stands.
        return fetch_interaction(conn, interaction.id);
    }

    add_points(conn, interaction.user1_id, outcome.user1_delta)?;
    add_points(conn, interaction.user2_id, outcome.user2_delta)?;

    if outcome.opens_chat && interaction.chat_id.is_none() {
        let chat = create_chat(conn, interaction.user1_id, interaction.user2_id)?;
        let linked = conn.execute(
            "UPDATE interactions SET chat_id = ?1 WHERE id = ?2 AND chat_id IS NULL",
            params![chat.id.to_string(), interaction.id.to_string()],
        )?;
        if linked == 0 {
            return Err(StoreError::Corrupt(format!(
                "interaction {} already has a chat",
                interaction.id
            )));
        }
    }

    let resolved = fetch_interaction(conn, interaction.id)?;
    info!(
        interaction = %resolved.id,
        result = %outcome.result,
        user1 = %resolved.user1_id,
        user2 = %resolved.user2_id,
        user1_delta = outcome.user1_delta,
        user2_delta = outcome.user2_delta,
        chat = ?resolved.chat_id.map(|c| c.to_string()),
        "interaction resolved"
    );
    Ok(resolved)
}

impl Database {
    /// Return the pair's record, creating an empty PENDING one (with
    /// `acting` as user1) if none exists yet. The returned side is always
    /// looked up from the record, never assumed from call order.
    pub fn get_or_create_interaction(
        &mut self,
        acting: UserId,
        target: UserId,
    ) -> Result<(Interaction, Side)> {
        let tx = self.immediate()?;
        if fetch_user(&tx, acting)?.is_none() {
            return Err(StoreError::UserNotFound);
        }
        if fetch_user(&tx, target)?.is_none() {
            return Err(StoreError::TargetNotFound);
        }
        let found = get_or_create(&tx, acting, target)?;
        tx.commit()?;
        Ok(found)
    }

    pub fn get_interaction(&self, id: InteractionId) -> Result<Interaction> {
        fetch_interaction(self.conn(), id)
    }

    pub fn find_interaction_between(&self, a: UserId, b: UserId) -> Result<Option<Interaction>> {
        find_between(self.conn(), a, b)
    }

    /// Record `acting`'s action on `target`, charging `fee`, and resolve the
    /// pair if the other side has already acted.
    ///
    /// All checks run before any write; any failure leaves both users and
    /// the record exactly as they were.
    pub fn submit_action(
        &mut self,
        acting: UserId,
        target: UserId,
        action: Action,
        fee: i64,
    ) -> Result<SubmitOutcome> {
        if acting == target {
            return Err(StoreError::SelfInteraction);
        }

        let tx = self.immediate()?;

        let actor = fetch_user(&tx, acting)?.ok_or(StoreError::UserNotFound)?;
        if fetch_user(&tx, target)?.is_none() {
            return Err(StoreError::TargetNotFound);
        }
        if actor.points < fee {
            debug!(user = %acting, balance = actor.points, fee, "submission rejected: insufficient points");
            return Err(StoreError::InsufficientPoints {
                balance: actor.points,
                required: fee,
            });
        }

        let (interaction, side) = get_or_create(&tx, acting, target)?;
        let (interaction, side) = orient_for_first_action(&tx, interaction, side, acting)?;
        if interaction.action_of(side).is_some() || interaction.is_complete() {
            debug!(user = %acting, interaction = %interaction.id, "submission rejected: already acted");
            return Err(StoreError::AlreadyActed);
        }

        debit_points(&tx, acting, fee)?;

        let column = action_column(side);
        let recorded = tx.execute(
            &format!(
                "UPDATE interactions SET {column} = ?1, updated_at = ?2
                 WHERE id = ?3 AND {column} IS NULL AND status = 'PENDING'"
            ),
            params![action.as_str(), format_ts(now()), interaction.id.to_string()],
        )?;
        if recorded == 0 {
            return Err(StoreError::AlreadyActed);
        }

        let interaction = resolve_in(&tx, fetch_interaction(&tx, interaction.id)?)?;
        let new_points = fetch_points(&tx, acting)?;
        tx.commit()?;

        info!(
            user = %acting,
            target = %target,
            action = %action,
            fee,
            status = %interaction.status,
            "action recorded"
        );

        Ok(SubmitOutcome {
            side,
            result: interaction.result,
            chat_id: interaction.chat_id,
            new_points,
            interaction,
        })
    }

    /// Resolve a record whose two actions are both set. Calling this on a
    /// COMPLETE record returns it unchanged and moves no points.
    pub fn resolve_interaction(&mut self, id: InteractionId) -> Result<Interaction> {
        let tx = self.immediate()?;
        let interaction = resolve_in(&tx, fetch_interaction(&tx, id)?)?;
        tx.commit()?;
        Ok(interaction)
    }

    /// Every record `user` is part of, newest activity first, as seen from
    /// `user`'s side. The counterpart's action is withheld until COMPLETE.
    pub fn list_interactions(&self, user: UserId) -> Result<Vec<InteractionHistoryEntry>> {
        let mut stmt = self.conn().prepare(
            "SELECT i.id,
                    CASE WHEN i.user1_id = ?1 THEN i.user2_id ELSE i.user1_id END,
                    u.username,
                    CASE WHEN i.user1_id = ?1 THEN i.user1_action ELSE i.user2_action END,
                    CASE WHEN i.user1_id = ?1 THEN i.user2_action ELSE i.user1_action END,
                    i.status, i.result, i.chat_id, i.updated_at
             FROM interactions i
             JOIN users u
               ON u.id = CASE WHEN i.user1_id = ?1 THEN i.user2_id ELSE i.user1_id END
             WHERE i.user1_id = ?1 OR i.user2_id = ?1
             ORDER BY i.updated_at DESC, i.id",
        )?;

        let rows = stmt.query_map(params![user.to_string()], |row| {
            let status: InteractionStatus = enum_col(row, 5)?;
            let other_user_action = match status {
                InteractionStatus::Complete => opt_enum_col(row, 4)?,
                InteractionStatus::Pending => None,
            };
            Ok(InteractionHistoryEntry {
                interaction_id: InteractionId(uuid_col(row, 0)?),
                other_user_id: UserId(uuid_col(row, 1)?),
                other_username: row.get(2)?,
                current_user_action: opt_enum_col(row, 3)?,
                other_user_action,
                status,
                result: opt_enum_col(row, 6)?,
                chat_id: opt_uuid_col(row, 7)?.map(ChatId),
                updated_at: ts_col(row, 8)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::test_support::onboarded;
    use kissorslap_shared::InteractionResult;

    const FEE: i64 = 10;

    fn count_interactions(db: &Database) -> i64 {
        db.conn()
            .query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))
            .unwrap()
    }

    fn count_chats(db: &Database) -> i64 {
        db.conn()
            .query_row("SELECT COUNT(*) FROM chats", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_get_or_create_single_record_per_pair() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        let (first, side_a) = db.get_or_create_interaction(a.id, b.id).unwrap();
        let (again, side_a2) = db.get_or_create_interaction(a.id, b.id).unwrap();
        let (reverse, side_b) = db.get_or_create_interaction(b.id, a.id).unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(first.id, reverse.id);
        assert_eq!(side_a, Side::User1);
        assert_eq!(side_a2, Side::User1);
        assert_eq!(side_b, Side::User2);
        assert_eq!(first.status, InteractionStatus::Pending);
        assert_eq!(first.user1_action, None);
        assert_eq!(count_interactions(&db), 1);
    }

    #[test]
    fn test_get_or_create_rejects_self() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        assert!(matches!(
            db.get_or_create_interaction(a.id, a.id),
            Err(StoreError::SelfInteraction)
        ));
    }

    #[test]
    fn test_first_action_stays_pending() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        let outcome = db.submit_action(a.id, b.id, Action::Kiss, FEE).unwrap();
        assert_eq!(outcome.result, None);
        assert_eq!(outcome.chat_id, None);
        assert_eq!(outcome.side, Side::User1);
        assert_eq!(outcome.new_points, 90);
        assert_eq!(outcome.interaction.status, InteractionStatus::Pending);
        assert_eq!(outcome.interaction.user1_action, Some(Action::Kiss));
        assert_eq!(outcome.interaction.user2_action, None);
        assert_eq!(db.get_user(b.id).unwrap().points, 100);
    }

    #[test]
    fn test_mutual_kiss_pays_both_and_opens_chat() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        db.submit_action(a.id, b.id, Action::Kiss, FEE).unwrap();
        let outcome = db.submit_action(b.id, a.id, Action::Kiss, FEE).unwrap();

        assert_eq!(outcome.result, Some(InteractionResult::MutualKiss));
        assert_eq!(outcome.side, Side::User2);
        assert!(outcome.chat_id.is_some());
        assert_eq!(outcome.interaction.status, InteractionStatus::Complete);
        // 100 - fee + 10 for both.
        assert_eq!(outcome.new_points, 100);
        assert_eq!(db.get_user(a.id).unwrap().points, 100);
        assert_eq!(count_chats(&db), 1);

        let chat = db.get_chat(outcome.chat_id.unwrap()).unwrap();
        assert!(chat.has_member(a.id) && chat.has_member(b.id));
    }

    #[test]
    fn test_slap_kiss_pays_the_slapper() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        db.submit_action(a.id, b.id, Action::Slap, FEE).unwrap();
        let outcome = db.submit_action(b.id, a.id, Action::Kiss, FEE).unwrap();

        assert_eq!(outcome.result, Some(InteractionResult::SlapKiss));
        assert_eq!(outcome.chat_id, None);
        assert_eq!(db.get_user(a.id).unwrap().points, 100 - FEE + 15);
        assert_eq!(db.get_user(b.id).unwrap().points, 100 - FEE);
        assert_eq!(outcome.new_points, 100 - FEE);
        assert_eq!(count_chats(&db), 0);
    }

    #[test]
    fn test_kiss_slap_and_mutual_slap() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);
        let c = onboarded(&mut db, "cat", 100);

        db.submit_action(a.id, b.id, Action::Kiss, FEE).unwrap();
        let rug = db.submit_action(b.id, a.id, Action::Slap, FEE).unwrap();
        assert_eq!(rug.result, Some(InteractionResult::KissSlap));
        assert_eq!(rug.new_points, 100 - FEE + 15);
        assert_eq!(db.get_user(a.id).unwrap().points, 100 - FEE);

        db.submit_action(c.id, a.id, Action::Slap, FEE).unwrap();
        let slap = db.submit_action(a.id, c.id, Action::Slap, FEE).unwrap();
        assert_eq!(slap.result, Some(InteractionResult::MutualSlap));
        assert_eq!(slap.side, Side::User2);
        assert_eq!(db.get_user(c.id).unwrap().points, 100 - FEE + 5);
        assert_eq!(db.get_user(a.id).unwrap().points, 100 - 2 * FEE + 5);
    }

    #[test]
    fn test_duplicate_submission_rejected_and_charged_once() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        db.submit_action(a.id, b.id, Action::Kiss, FEE).unwrap();
        assert!(matches!(
            db.submit_action(a.id, b.id, Action::Kiss, FEE),
            Err(StoreError::AlreadyActed)
        ));
        assert!(matches!(
            db.submit_action(a.id, b.id, Action::Slap, FEE),
            Err(StoreError::AlreadyActed)
        ));
        assert_eq!(db.get_user(a.id).unwrap().points, 90);
    }

    #[test]
    fn test_complete_interaction_is_terminal() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        db.submit_action(a.id, b.id, Action::Kiss, FEE).unwrap();
        let done = db.submit_action(b.id, a.id, Action::Kiss, FEE).unwrap();

        for (who, other) in [(a.id, b.id), (b.id, a.id)] {
            assert!(matches!(
                db.submit_action(who, other, Action::Slap, FEE),
                Err(StoreError::AlreadyActed)
            ));
        }
        let after = db.get_interaction(done.interaction.id).unwrap();
        assert_eq!(after, done.interaction);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        db.submit_action(a.id, b.id, Action::Kiss, FEE).unwrap();
        let done = db.submit_action(b.id, a.id, Action::Kiss, FEE).unwrap();
        let points_before = (
            db.get_user(a.id).unwrap().points,
            db.get_user(b.id).unwrap().points,
        );

        let again = db.resolve_interaction(done.interaction.id).unwrap();
        let twice = db.resolve_interaction(done.interaction.id).unwrap();

        assert_eq!(again, done.interaction);
        assert_eq!(twice.chat_id, done.chat_id);
        assert_eq!(
            points_before,
            (
                db.get_user(a.id).unwrap().points,
                db.get_user(b.id).unwrap().points
            )
        );
        assert_eq!(count_chats(&db), 1);
    }

    #[test]
    fn test_resolve_pending_is_noop() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        let pending = db.submit_action(a.id, b.id, Action::Slap, FEE).unwrap();
        let resolved = db.resolve_interaction(pending.interaction.id).unwrap();
        assert_eq!(resolved.status, InteractionStatus::Pending);
        assert_eq!(resolved.result, None);
    }

    #[test]
    fn test_insufficient_points_changes_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 9);
        let b = onboarded(&mut db, "bea", 100);

        match db.submit_action(a.id, b.id, Action::Kiss, FEE) {
            Err(StoreError::InsufficientPoints { balance, required }) => {
                assert_eq!((balance, required), (9, FEE));
            }
            other => panic!("expected InsufficientPoints, got {other:?}"),
        }
        assert_eq!(count_interactions(&db), 0);
        assert_eq!(db.get_user(a.id).unwrap().points, 9);
    }

    #[test]
    fn test_second_actor_needs_points_too() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 5);

        let pending = db.submit_action(a.id, b.id, Action::Kiss, FEE).unwrap();
        assert!(matches!(
            db.submit_action(b.id, a.id, Action::Kiss, FEE),
            Err(StoreError::InsufficientPoints { .. })
        ));
        let after = db.get_interaction(pending.interaction.id).unwrap();
        assert_eq!(after.status, InteractionStatus::Pending);
        assert_eq!(after.user2_action, None);
        assert_eq!(db.get_user(b.id).unwrap().points, 5);
    }

    #[test]
    fn test_exact_balance_is_enough() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", FEE);
        let b = onboarded(&mut db, "bea", 100);

        let outcome = db.submit_action(a.id, b.id, Action::Slap, FEE).unwrap();
        assert_eq!(outcome.new_points, 0);
    }

    #[test]
    fn test_validation_errors() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);

        assert!(matches!(
            db.submit_action(a.id, a.id, Action::Kiss, FEE),
            Err(StoreError::SelfInteraction)
        ));
        assert!(matches!(
            db.submit_action(a.id, UserId::new(), Action::Kiss, FEE),
            Err(StoreError::TargetNotFound)
        ));
        assert!(matches!(
            db.submit_action(UserId::new(), a.id, Action::Kiss, FEE),
            Err(StoreError::UserNotFound)
        ));
        assert_eq!(db.get_user(a.id).unwrap().points, 100);
        assert_eq!(count_interactions(&db), 0);
    }

    #[test]
    fn test_list_interactions_from_each_side() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);
        let c = onboarded(&mut db, "cat", 100);

        db.submit_action(a.id, c.id, Action::Kiss, FEE).unwrap();
        db.submit_action(b.id, c.id, Action::Slap, FEE).unwrap();
        let done = db.submit_action(c.id, b.id, Action::Kiss, FEE).unwrap();

        let for_c = db.list_interactions(c.id).unwrap();
        assert_eq!(for_c.len(), 2);
        // The completed pair was touched last.
        assert_eq!(for_c[0].interaction_id, done.interaction.id);
        assert_eq!(for_c[0].other_user_id, b.id);
        assert_eq!(for_c[0].other_username.as_deref(), Some("bea"));
        assert_eq!(for_c[0].current_user_action, Some(Action::Kiss));
        assert_eq!(for_c[0].other_user_action, Some(Action::Slap));
        assert_eq!(for_c[0].result, Some(InteractionResult::SlapKiss));

        // ana's kiss is still unanswered, so cat cannot see it.
        assert_eq!(for_c[1].other_username.as_deref(), Some("ana"));
        assert_eq!(for_c[1].status, InteractionStatus::Pending);
        assert_eq!(for_c[1].current_user_action, None);
        assert_eq!(for_c[1].other_user_action, None);
        assert_eq!(for_c[1].result, None);

        let for_a = db.list_interactions(a.id).unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].other_user_id, c.id);
        assert_eq!(for_a[0].current_user_action, Some(Action::Kiss));
    }

    #[test]
    fn test_list_interactions_reports_chat() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);
        let loner = onboarded(&mut db, "dan", 100);

        db.submit_action(a.id, b.id, Action::Kiss, FEE).unwrap();
        let done = db.submit_action(b.id, a.id, Action::Kiss, FEE).unwrap();

        let entries = db.list_interactions(b.id).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].chat_id, done.chat_id);
        assert_eq!(entries[0].result, Some(InteractionResult::MutualKiss));
        assert!(db.list_interactions(loner.id).unwrap().is_empty());
    }

    #[test]
    fn test_open_record_is_flipped_onto_first_actor() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        let (opened, side) = db.get_or_create_interaction(a.id, b.id).unwrap();
        assert_eq!(side, Side::User1);
        assert_eq!(opened.user1_id, a.id);

        let outcome = db.submit_action(b.id, a.id, Action::Kiss, FEE).unwrap();
        assert_eq!(outcome.interaction.id, opened.id);
        assert_eq!(outcome.side, Side::User1);
        assert_eq!(outcome.interaction.user1_id, b.id);
        assert_eq!(outcome.interaction.user2_id, a.id);
        assert_eq!(outcome.interaction.user1_action, Some(Action::Kiss));
        assert_eq!(outcome.result, None);

        // The result is now named from the first actor's side.
        let done = db.submit_action(a.id, b.id, Action::Slap, FEE).unwrap();
        assert_eq!(done.side, Side::User2);
        assert_eq!(done.result, Some(InteractionResult::KissSlap));
        assert_eq!(db.get_user(a.id).unwrap().points, 100 - FEE + 15);
        assert_eq!(db.get_user(b.id).unwrap().points, 100 - FEE);
        assert_eq!(count_interactions(&db), 1);
    }

    #[test]
    fn test_acted_record_is_not_flipped() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);

        db.submit_action(a.id, b.id, Action::Slap, FEE).unwrap();
        let (record, side) = db.get_or_create_interaction(b.id, a.id).unwrap();
        assert_eq!(side, Side::User2);
        assert_eq!(record.user1_id, a.id);
        assert_eq!(record.user1_action, Some(Action::Slap));
    }
}
