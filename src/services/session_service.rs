//! Session Lifecycle Manager: session creation and status transitions.

use std::sync::Arc;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::models::{BookingRequest, Session, SessionStatus};
use crate::services::errors::SessionError;
use crate::store::MarketplaceStore;

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn MarketplaceStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Create a `booked` session. Rejects past dates (`InvalidSlot`) and a
    /// second `booked` session on the same `(trainer, date, time)` triple
    /// (`ConflictingBooking`).
    pub async fn create_session(&self, request: &BookingRequest) -> Result<Session, SessionError> {
        if request.date < Utc::now().date_naive() {
            return Err(SessionError::InvalidSlot);
        }

        if self
            .store
            .find_booked_session(request.trainer_id, request.date, &request.time)
            .await?
            .is_some()
        {
            return Err(SessionError::ConflictingBooking);
        }

        let trainer = self
            .store
            .get_trainer(request.trainer_id)
            .await?
            .ok_or(SessionError::TrainerNotFound)?;

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            trainer_id: request.trainer_id,
            user_id: request.user_id,
            date: request.date,
            time: request.time.clone(),
            session_type: request.session_type.clone(),
            notes: request.notes.clone(),
            status: SessionStatus::Booked,
            trainer_name: Some(trainer.name),
            trainer_avatar_url: trainer.avatar_url,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_session(&session).await?;
        Ok(session)
    }

    /// Cancel a `booked` session that has not started yet. A session in a
    /// terminal state, or one whose date/time has passed, fails with
    /// `AlreadyFinalized`.
    pub async fn cancel_session(&self, session_id: Uuid) -> Result<Session, SessionError> {
        let session = self
            .store
            .get_session(session_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        if session.status != SessionStatus::Booked || !is_upcoming(&session, Utc::now()) {
            return Err(SessionError::AlreadyFinalized);
        }

        self.store
            .update_session_status(session_id, SessionStatus::Canceled)
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Mark a `booked` session completed. Any other starting state is an
    /// `InvalidTransition`; terminal states have no way out.
    pub async fn complete_session(&self, session_id: Uuid) -> Result<Session, SessionError> {
        let session = self
            .store
            .get_session(session_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        if session.status != SessionStatus::Booked {
            return Err(SessionError::InvalidTransition);
        }

        self.store
            .update_session_status(session_id, SessionStatus::Completed)
            .await?
            .ok_or(SessionError::NotFound)
    }

    pub async fn get_session(&self, session_id: Uuid) -> Result<Session, SessionError> {
        self.store
            .get_session(session_id)
            .await?
            .ok_or(SessionError::NotFound)
    }

    pub async fn sessions_for_user(&self, user_id: Uuid) -> Result<Vec<Session>, SessionError> {
        Ok(self.store.list_sessions_for_user(user_id).await?)
    }

    pub async fn sessions_for_trainer(
        &self,
        trainer_id: Uuid,
    ) -> Result<Vec<Session>, SessionError> {
        Ok(self.store.list_sessions_for_trainer(trainer_id).await?)
    }

    /// A trainer's `booked` sessions on one date, ordered by slot string
    /// (the expert dashboard's day view).
    pub async fn trainer_sessions_on(
        &self,
        trainer_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Session>, SessionError> {
        let mut sessions: Vec<Session> = self
            .store
            .list_sessions_for_trainer(trainer_id)
            .await?
            .into_iter()
            .filter(|s| s.date == date && s.status == SessionStatus::Booked)
            .collect();
        sessions.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(sessions)
    }
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("time regex"))
}

/// First `HH:MM` token in a slot descriptor, if any. Slot strings are
/// otherwise opaque.
fn slot_start_time(slot: &str) -> Option<NaiveTime> {
    let captures = time_regex().captures(slot)?;
    NaiveTime::parse_from_str(&format!("{}:{}", &captures[1], &captures[2]), "%H:%M").ok()
}

/// A session counts as upcoming while its date is ahead of today; on the
/// session's own date the slot's start time decides when one can be parsed,
/// and an unparseable slot keeps the session cancellable.
fn is_upcoming(session: &Session, now: DateTime<Utc>) -> bool {
    let today = now.date_naive();
    if session.date != today {
        return session.date > today;
    }
    match slot_start_time(&session.time) {
        Some(start) => start > now.time(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};

    fn session_at(date: NaiveDate, time: &str) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date,
            time: time.to_string(),
            session_type: None,
            notes: None,
            status: SessionStatus::Booked,
            trainer_name: None,
            trainer_avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_slot_start_time_parsing() {
        assert_eq!(
            slot_start_time("10:00"),
            NaiveTime::from_hms_opt(10, 0, 0)
        );
        assert_eq!(
            slot_start_time("Mon 9:30"),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(
            slot_start_time("Mon-Fri 07:00-15:00"),
            NaiveTime::from_hms_opt(7, 0, 0)
        );
        assert_eq!(slot_start_time("sometime soon"), None);
    }

    #[test]
    fn test_upcoming_by_date() {
        let now = Utc::now();
        let tomorrow = session_at(now.date_naive() + Duration::days(1), "10:00");
        let yesterday = session_at(now.date_naive() - Duration::days(1), "10:00");

        assert!(is_upcoming(&tomorrow, now));
        assert!(!is_upcoming(&yesterday, now));
    }

    #[test]
    fn test_same_day_uses_slot_start() {
        let now = Utc::now();
        let today = now.date_naive();

        let later = session_at(today, "23:59");
        let earlier = session_at(today, "00:00");
        let opaque = session_at(today, "whenever works");

        assert!(is_upcoming(&later, now) || now.time() >= NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert!(!is_upcoming(&earlier, now) || now.time() < NaiveTime::from_hms_opt(0, 0, 1).unwrap());
        assert!(is_upcoming(&opaque, now));
    }
}
