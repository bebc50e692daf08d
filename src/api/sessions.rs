use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::post,
    Extension, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{
    jwt_auth_middleware, require_role, AuthError, AuthService, UserRole, UserSession,
};
use crate::models::{BookingRequest, Session};
use crate::services::errors::{BookingError, SessionError};
use crate::services::{BookingService, SessionService};

#[derive(Clone)]
pub struct SessionsState {
    pub booking: BookingService,
    pub sessions: SessionService,
}

/// The booking form payload; the booking user is always the caller.
#[derive(Debug, Deserialize)]
struct BookSessionRequest {
    trainer_id: Uuid,
    date: NaiveDate,
    time: String,
    session_type: Option<String>,
    notes: Option<String>,
}

pub fn session_routes(state: SessionsState, auth_service: AuthService) -> Router {
    Router::new()
        .route("/", post(book_session).get(list_sessions))
        .route("/:id/cancel", post(cancel_session))
        .route(
            "/:id/complete",
            post(complete_session).route_layer(middleware::from_fn(require_role(
                UserRole::Trainer,
            ))),
        )
        .layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Book a session with a trainer
#[tracing::instrument(skip(state, session, request))]
async fn book_session(
    State(state): State<SessionsState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<BookSessionRequest>,
) -> Result<(StatusCode, Json<Session>), BookingError> {
    let booked = state
        .booking
        .book(BookingRequest {
            trainer_id: request.trainer_id,
            user_id: session.user_id,
            date: request.date,
            time: request.time,
            session_type: request.session_type,
            notes: request.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(booked)))
}

/// The caller's sessions: a trainer sees their client bookings, everyone
/// else their own.
#[tracing::instrument(skip(state, session))]
async fn list_sessions(
    State(state): State<SessionsState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<Session>>, SessionError> {
    let sessions = match session.role {
        UserRole::Trainer => state.sessions.sessions_for_trainer(session.user_id).await?,
        _ => state.sessions.sessions_for_user(session.user_id).await?,
    };
    Ok(Json(sessions))
}

/// Cancel an upcoming booked session (either participant may cancel)
#[tracing::instrument(skip(state, session))]
async fn cancel_session(
    State(state): State<SessionsState>,
    Extension(session): Extension<UserSession>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, Response> {
    let existing = state
        .sessions
        .get_session(session_id)
        .await
        .map_err(IntoResponse::into_response)?;
    ensure_participant(&session, &existing).map_err(IntoResponse::into_response)?;

    let canceled = state
        .sessions
        .cancel_session(session_id)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(canceled))
}

/// Mark a booked session completed (the session's trainer only)
#[tracing::instrument(skip(state, session))]
async fn complete_session(
    State(state): State<SessionsState>,
    Extension(session): Extension<UserSession>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, Response> {
    let existing = state
        .sessions
        .get_session(session_id)
        .await
        .map_err(IntoResponse::into_response)?;
    if existing.trainer_id != session.user_id && session.role != UserRole::Admin {
        return Err(AuthError::InsufficientPermissions.into_response());
    }

    let completed = state
        .sessions
        .complete_session(session_id)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(completed))
}

fn ensure_participant(session: &UserSession, existing: &Session) -> Result<(), AuthError> {
    if existing.user_id == session.user_id
        || existing.trainer_id == session.user_id
        || session.role == UserRole::Admin
    {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions)
    }
}
