//! Domain model structs persisted in the SQLite database.
//!
//! Every struct derives `Serialize` so it can be handed directly to the HTTP
//! layer; field names are camelCase on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use kissorslap_shared::{
    Action, ChatId, Gender, GenderPreference, InteractionId, InteractionResult,
    InteractionStatus, Side, UserId,
};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Subject id issued by the identity provider.
    pub outside_id: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub gender_preference: Option<GenderPreference>,
    pub birthday: Option<NaiveDate>,
    pub age: Option<i32>,
    /// Onboarding finished; only complete users are shown as candidates.
    pub is_complete: bool,
    pub points: i64,
    pub hot_score: i64,
    pub karma_score: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile edit. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub gender_preference: Option<GenderPreference>,
    pub birthday: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

/// One unordered pair's mutual action state.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: InteractionId,
    /// Whoever acted first on the pair. An empty record is re-oriented
    /// onto its first actor when that action lands.
    pub user1_id: UserId,
    pub user2_id: UserId,
    pub user1_action: Option<Action>,
    pub user2_action: Option<Action>,
    pub status: InteractionStatus,
    pub result: Option<InteractionResult>,
    pub chat_id: Option<ChatId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Interaction {
    /// Which side `user` occupies, if they are part of this pair.
    pub fn side_of(&self, user: UserId) -> Option<Side> {
        if user == self.user1_id {
            Some(Side::User1)
        } else if user == self.user2_id {
            Some(Side::User2)
        } else {
            None
        }
    }

    pub fn user_on(&self, side: Side) -> UserId {
        match side {
            Side::User1 => self.user1_id,
            Side::User2 => self.user2_id,
        }
    }

    pub fn action_of(&self, side: Side) -> Option<Action> {
        match side {
            Side::User1 => self.user1_action,
            Side::User2 => self.user2_action,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == InteractionStatus::Complete
    }

    /// The record as `viewer` may see it: the counterpart's action stays
    /// hidden until the pair is COMPLETE.
    pub fn redacted_for(mut self, viewer: UserId) -> Self {
        if self.is_complete() {
            return self;
        }
        match self.side_of(viewer) {
            Some(Side::User1) => self.user2_action = None,
            Some(Side::User2) => self.user1_action = None,
            None => {
                self.user1_action = None;
                self.user2_action = None;
            }
        }
        self
    }
}

/// One of the viewer's interactions, seen from the viewer's side.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionHistoryEntry {
    pub interaction_id: InteractionId,
    pub other_user_id: UserId,
    pub other_username: Option<String>,
    pub current_user_action: Option<Action>,
    /// Hidden while the record is PENDING.
    pub other_user_action: Option<Action>,
    pub status: InteractionStatus,
    pub result: Option<InteractionResult>,
    pub chat_id: Option<ChatId>,
    pub updated_at: DateTime<Utc>,
}

/// What a single action submission produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub interaction: Interaction,
    /// The submitting user's side.
    pub side: Side,
    /// `None` while the other side has not acted yet.
    pub result: Option<InteractionResult>,
    pub chat_id: Option<ChatId>,
    /// Submitting user's balance after the fee and any payout.
    pub new_points: i64,
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: UserId,
    pub username: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub gender_preference: Option<GenderPreference>,
    pub age: Option<i32>,
    pub hot_score: i64,
    pub karma_score: i64,
    /// The candidate has already acted on the viewer, who has yet to respond.
    pub other_user_acted: bool,
}

// ---------------------------------------------------------------------------
// Chat / Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: ChatId,
    pub user1_id: UserId,
    pub user2_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    pub fn has_member(&self, user: UserId) -> bool {
        self.user1_id == user || self.user2_id == user
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Insertion order within the database; strictly increasing.
    pub seq: i64,
    pub id: uuid::Uuid,
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A chat as listed for one participant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub chat_id: ChatId,
    pub other_user_id: UserId,
    pub other_username: Option<String>,
    pub last_message: Option<LastMessage>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    #[serde(flatten)]
    pub message: Message,
    pub sender_username: Option<String>,
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: UserId,
    pub username: Option<String>,
    pub name: Option<String>,
    pub points: i64,
    pub hot_score: i64,
    pub karma_score: i64,
    pub total_interactions_received: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPage {
    pub users: Vec<LeaderboardEntry>,
    pub current_page: u32,
    pub total_pages: u32,
    /// `None` if the viewer has not completed onboarding.
    pub current_user_rank: Option<u32>,
    pub current_user: Option<LeaderboardEntry>,
}
