use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifecycle: `booked` is the only initial state, `completed` and
/// `canceled` are terminal. Transitions are forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Booked,
    Completed,
    Canceled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Booked => "booked",
            SessionStatus::Completed => "completed",
            SessionStatus::Canceled => "canceled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "booked" => Some(SessionStatus::Booked),
            "completed" => Some(SessionStatus::Completed),
            "canceled" => Some(SessionStatus::Canceled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Canceled)
    }
}

/// One scheduled (or past) meeting between exactly one user and one trainer.
///
/// `trainer_name` and `trainer_avatar_url` are denormalized at creation for
/// read convenience and never re-synced afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub session_type: Option<String>,
    pub notes: Option<String>,
    pub status: SessionStatus,
    pub trainer_name: Option<String>,
    pub trainer_avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input to the booking workflow. `time` must match one of the trainer's
/// advertised slot descriptors exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub trainer_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub session_type: Option<String>,
    pub notes: Option<String>,
}
