//! Session state machine: forward-only transitions and the cancellation
//! window.

mod common;

use assert_matches::assert_matches;

use common::{days_from_today, memory_store, seed_session, seed_trainer, seed_user};
use matchfit::models::{BookingRequest, SessionStatus};
use matchfit::services::errors::SessionError;
use matchfit::services::SessionService;

#[tokio::test]
async fn test_create_session_denormalizes_trainer_fields() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &["Mon 10:00"]).await;
    let user = seed_user(&store, "Jordan Reyes").await;
    let sessions = SessionService::new(store.clone());

    let session = sessions
        .create_session(&BookingRequest {
            trainer_id: trainer.id,
            user_id: user.id,
            date: days_from_today(1),
            time: "Mon 10:00".to_string(),
            session_type: Some("Strength".to_string()),
            notes: None,
        })
        .await
        .unwrap();

    assert_eq!(session.status, SessionStatus::Booked);
    assert_eq!(session.trainer_name.as_deref(), Some("Maya Chen"));
    assert_eq!(session.session_type.as_deref(), Some("Strength"));
}

#[tokio::test]
async fn test_create_session_rejects_conflicting_triple() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &[]).await;
    let user = seed_user(&store, "Jordan Reyes").await;
    let other = seed_user(&store, "Sam Okafor").await;
    let sessions = SessionService::new(store.clone());

    let date = days_from_today(1);
    seed_session(&store, &trainer, &other, date, "Mon 10:00", SessionStatus::Booked).await;

    let result = sessions
        .create_session(&BookingRequest {
            trainer_id: trainer.id,
            user_id: user.id,
            date,
            time: "Mon 10:00".to_string(),
            session_type: None,
            notes: None,
        })
        .await;
    assert_matches!(result, Err(SessionError::ConflictingBooking));

    // A canceled session releases the triple.
    let canceled_date = days_from_today(2);
    seed_session(
        &store,
        &trainer,
        &other,
        canceled_date,
        "Mon 10:00",
        SessionStatus::Canceled,
    )
    .await;
    let rebook = sessions
        .create_session(&BookingRequest {
            trainer_id: trainer.id,
            user_id: user.id,
            date: canceled_date,
            time: "Mon 10:00".to_string(),
            session_type: None,
            notes: None,
        })
        .await;
    assert!(rebook.is_ok());
}

#[tokio::test]
async fn test_future_session_cancels_exactly_once() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &[]).await;
    let user = seed_user(&store, "Jordan Reyes").await;
    let sessions = SessionService::new(store.clone());

    let session =
        seed_session(&store, &trainer, &user, days_from_today(1), "Mon 10:00", SessionStatus::Booked)
            .await;

    let canceled = sessions.cancel_session(session.id).await.unwrap();
    assert_eq!(canceled.status, SessionStatus::Canceled);

    let again = sessions.cancel_session(session.id).await;
    assert_matches!(again, Err(SessionError::AlreadyFinalized));
}

#[tokio::test]
async fn test_past_session_cannot_be_canceled() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &[]).await;
    let user = seed_user(&store, "Jordan Reyes").await;
    let sessions = SessionService::new(store.clone());

    let session =
        seed_session(&store, &trainer, &user, days_from_today(-1), "Mon 10:00", SessionStatus::Booked)
            .await;

    let result = sessions.cancel_session(session.id).await;
    assert_matches!(result, Err(SessionError::AlreadyFinalized));

    // Still booked; completion remains possible after the fact.
    let completed = sessions.complete_session(session.id).await.unwrap();
    assert_eq!(completed.status, SessionStatus::Completed);
}

#[tokio::test]
async fn test_terminal_states_have_no_way_out() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &[]).await;
    let user = seed_user(&store, "Jordan Reyes").await;
    let sessions = SessionService::new(store.clone());

    let completed =
        seed_session(&store, &trainer, &user, days_from_today(1), "Mon 10:00", SessionStatus::Completed)
            .await;
    let canceled =
        seed_session(&store, &trainer, &user, days_from_today(1), "Wed 14:00", SessionStatus::Canceled)
            .await;

    assert_matches!(
        sessions.complete_session(completed.id).await,
        Err(SessionError::InvalidTransition)
    );
    assert_matches!(
        sessions.complete_session(canceled.id).await,
        Err(SessionError::InvalidTransition)
    );
    assert_matches!(
        sessions.cancel_session(completed.id).await,
        Err(SessionError::AlreadyFinalized)
    );
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let store = memory_store();
    let sessions = SessionService::new(store.clone());

    assert_matches!(
        sessions.cancel_session(uuid::Uuid::new_v4()).await,
        Err(SessionError::NotFound)
    );
    assert_matches!(
        sessions.complete_session(uuid::Uuid::new_v4()).await,
        Err(SessionError::NotFound)
    );
}

#[tokio::test]
async fn test_trainer_day_view_lists_booked_sessions_in_slot_order() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &[]).await;
    let user = seed_user(&store, "Jordan Reyes").await;
    let sessions = SessionService::new(store.clone());

    let date = days_from_today(1);
    seed_session(&store, &trainer, &user, date, "14:00", SessionStatus::Booked).await;
    seed_session(&store, &trainer, &user, date, "09:00", SessionStatus::Booked).await;
    seed_session(&store, &trainer, &user, date, "11:00", SessionStatus::Canceled).await;
    seed_session(&store, &trainer, &user, days_from_today(2), "08:00", SessionStatus::Booked).await;

    let day = sessions.trainer_sessions_on(trainer.id, date).await.unwrap();
    let times: Vec<&str> = day.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(times, vec!["09:00", "14:00"]);
}
