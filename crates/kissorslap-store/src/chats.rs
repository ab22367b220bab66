//! Chat provisioning and per-user chat listings.
//!
//! A chat is only ever created from inside the interaction resolution
//! transaction, for a MUTUAL_KISS record whose `chat_id` is still null.

use rusqlite::{params, Connection};
use tracing::info;

use kissorslap_shared::{ChatId, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::messages::latest_message;
use crate::models::{Chat, ChatSummary};
use crate::rows::{format_ts, now, or_not_found, ts_col, uuid_col};

pub(crate) fn create_chat(conn: &Connection, user1: UserId, user2: UserId) -> Result<Chat> {
    let chat = Chat {
        id: ChatId::new(),
        user1_id: user1,
        user2_id: user2,
        created_at: now(),
    };

    conn.execute(
        "INSERT INTO chats (id, user1_id, user2_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            chat.id.to_string(),
            chat.user1_id.to_string(),
            chat.user2_id.to_string(),
            format_ts(chat.created_at),
        ],
    )?;

    info!(chat = %chat.id, user1 = %user1, user2 = %user2, "chat created");
    Ok(chat)
}

pub(crate) fn fetch_chat(conn: &Connection, id: ChatId) -> Result<Chat> {
    conn.query_row(
        "SELECT id, user1_id, user2_id, created_at FROM chats WHERE id = ?1",
        params![id.to_string()],
        row_to_chat,
    )
    .map_err(|e| or_not_found(e, StoreError::NotFound))
}

impl Database {
    pub fn get_chat(&self, id: ChatId) -> Result<Chat> {
        fetch_chat(self.conn(), id)
    }

    /// Chat `id`, provided `user` is one of its two members.
    pub fn get_chat_for_member(&self, id: ChatId, user: UserId) -> Result<Chat> {
        let chat = self.get_chat(id)?;
        if !chat.has_member(user) {
            return Err(StoreError::NotChatMember);
        }
        Ok(chat)
    }

    /// Every chat `user` is a member of, most recently active first.
    pub fn list_chats(&self, user: UserId) -> Result<Vec<ChatSummary>> {
        let mut stmt = self.conn().prepare(
            "SELECT c.id, c.user1_id, c.user2_id, c.created_at, u.username
             FROM chats c
             JOIN users u
               ON u.id = CASE WHEN c.user1_id = ?1 THEN c.user2_id ELSE c.user1_id END
             WHERE c.user1_id = ?1 OR c.user2_id = ?1
             ORDER BY MAX(c.created_at, COALESCE(
                 (SELECT MAX(m.timestamp) FROM messages m WHERE m.chat_id = c.id), ''
             )) DESC, c.created_at DESC, c.id",
        )?;

        let rows = stmt.query_map(params![user.to_string()], |row| {
            let chat = row_to_chat(row)?;
            let other_username: Option<String> = row.get(4)?;
            Ok((chat, other_username))
        })?;

        let mut chats = Vec::new();
        for row in rows {
            let (chat, other_username) = row?;
            let other_user_id = if chat.user1_id == user {
                chat.user2_id
            } else {
                chat.user1_id
            };
            chats.push(ChatSummary {
                chat_id: chat.id,
                other_user_id,
                other_username,
                last_message: latest_message(self.conn(), chat.id)?,
            });
        }
        Ok(chats)
    }
}

/// Map a `rusqlite::Row` to a [`Chat`].
fn row_to_chat(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chat> {
    Ok(Chat {
        id: ChatId(uuid_col(row, 0)?),
        user1_id: UserId(uuid_col(row, 1)?),
        user2_id: UserId(uuid_col(row, 2)?),
        created_at: ts_col(row, 3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::test_support::onboarded;
    use kissorslap_shared::Action;

    fn matched(db: &mut Database, a: UserId, b: UserId) -> ChatId {
        db.submit_action(a, b, Action::Kiss, 10).unwrap();
        db.submit_action(b, a, Action::Kiss, 10)
            .unwrap()
            .chat_id
            .unwrap()
    }

    #[test]
    fn test_list_chats_shows_other_member() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);
        let c = onboarded(&mut db, "cat", 100);

        let ab = matched(&mut db, a.id, b.id);
        let ca = matched(&mut db, c.id, a.id);

        let chats = db.list_chats(a.id).unwrap();
        assert_eq!(chats.len(), 2);
        assert!(chats.iter().all(|c| c.last_message.is_none()));

        db.append_message(ab, b.id, "hi ana").unwrap();
        let chats = db.list_chats(a.id).unwrap();
        assert_eq!(chats[0].chat_id, ab);
        assert_eq!(chats[0].other_user_id, b.id);
        assert_eq!(chats[0].other_username.as_deref(), Some("bea"));
        assert_eq!(
            chats[0].last_message.as_ref().map(|m| m.message.content.as_str()),
            Some("hi ana")
        );
        assert_eq!(
            chats[0]
                .last_message
                .as_ref()
                .and_then(|m| m.sender_username.as_deref()),
            Some("bea")
        );
        assert_eq!(chats[1].chat_id, ca);
        assert_eq!(chats[1].other_user_id, c.id);

        assert_eq!(db.list_chats(b.id).unwrap().len(), 1);
    }

    #[test]
    fn test_new_match_sorts_above_older_conversation() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);
        let c = onboarded(&mut db, "cat", 100);

        let ab = matched(&mut db, a.id, b.id);
        db.append_message(ab, a.id, "first").unwrap();
        let ac = matched(&mut db, a.id, c.id);

        let chats = db.list_chats(a.id).unwrap();
        assert_eq!(chats[0].chat_id, ac);
        assert!(chats[0].last_message.is_none());
        assert_eq!(chats[1].chat_id, ab);

        db.append_message(ab, b.id, "still here").unwrap();
        let chats = db.list_chats(a.id).unwrap();
        assert_eq!(chats[0].chat_id, ab);
        let last = chats[0].last_message.as_ref().unwrap();
        assert_eq!(last.message.sender_id, b.id);
        assert_eq!(last.sender_username.as_deref(), Some("bea"));
    }

    #[test]
    fn test_chat_membership() {
        let mut db = Database::open_in_memory().unwrap();
        let a = onboarded(&mut db, "ana", 100);
        let b = onboarded(&mut db, "bea", 100);
        let c = onboarded(&mut db, "cat", 100);

        let ab = matched(&mut db, a.id, b.id);
        assert!(db.get_chat_for_member(ab, a.id).is_ok());
        assert!(matches!(
            db.get_chat_for_member(ab, c.id),
            Err(StoreError::NotChatMember)
        ));
        assert!(matches!(
            db.get_chat(ChatId::new()),
            Err(StoreError::NotFound)
        ));
    }
}
