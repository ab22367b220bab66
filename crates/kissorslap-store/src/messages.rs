//! Append-only chat messages.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use kissorslap_shared::constants::MAX_MESSAGE_LEN;
use kissorslap_shared::{ChatId, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{LastMessage, Message};
use crate::rows::{format_ts, now, ts_col, uuid_col};

const MESSAGE_COLUMNS: &str = "seq, id, chat_id, sender_id, content, timestamp";

/// The chat's newest message, with its sender's current username.
pub(crate) fn latest_message(conn: &Connection, chat: ChatId) -> Result<Option<LastMessage>> {
    Ok(conn
        .query_row(
            "SELECT m.seq, m.id, m.chat_id, m.sender_id, m.content, m.timestamp, u.username
             FROM messages m
             LEFT JOIN users u ON u.id = m.sender_id
             WHERE m.chat_id = ?1 ORDER BY m.seq DESC LIMIT 1",
            params![chat.to_string()],
            |row| {
                Ok(LastMessage {
                    message: row_to_message(row)?,
                    sender_username: row.get(6)?,
                })
            },
        )
        .optional()?)
}

impl Database {
    /// Append a message from `sender`, who must be a member of the chat.
    pub fn append_message(&mut self, chat: ChatId, sender: UserId, content: &str) -> Result<Message> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::InvalidMessage("message is empty".into()));
        }
        if content.chars().count() > MAX_MESSAGE_LEN {
            return Err(StoreError::InvalidMessage(format!(
                "message exceeds {MAX_MESSAGE_LEN} characters"
            )));
        }

        let tx = self.immediate()?;
        let room = crate::chats::fetch_chat(&tx, chat)?;
        if !room.has_member(sender) {
            return Err(StoreError::NotChatMember);
        }

        let id = Uuid::new_v4();
        let timestamp = now();
        tx.execute(
            "INSERT INTO messages (id, chat_id, sender_id, content, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id.to_string(),
                chat.to_string(),
                sender.to_string(),
                content,
                format_ts(timestamp),
            ],
        )?;
        let seq = tx.last_insert_rowid();
        tx.commit()?;

        debug!(chat = %chat, sender = %sender, seq, "message appended");

        Ok(Message {
            seq,
            id,
            chat_id: chat,
            sender_id: sender,
            content: content.to_string(),
            timestamp,
        })
    }

    /// Up to `limit` messages in chronological order, optionally only those
    /// older than `before` (a `seq`), for paging backwards.
    pub fn list_messages(
        &self,
        chat: ChatId,
        viewer: UserId,
        limit: u32,
        before: Option<i64>,
    ) -> Result<Vec<Message>> {
        self.get_chat_for_member(chat, viewer)?;

        let mut stmt = self.conn().prepare(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE chat_id = ?1 AND seq < ?2
             ORDER BY seq DESC
             LIMIT ?3"
        ))?;

        let rows = stmt.query_map(
            params![chat.to_string(), before.unwrap_or(i64::MAX), limit],
            row_to_message,
        )?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        messages.reverse();
        Ok(messages)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        seq: row.get(0)?,
        id: uuid_col(row, 1)?,
        chat_id: ChatId(uuid_col(row, 2)?),
        sender_id: UserId(uuid_col(row, 3)?),
        content: row.get(4)?,
        timestamp: ts_col(row, 5)?,
    })
}
