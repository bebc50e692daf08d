//! Error taxonomy for the booking workflow and its supporting services.
//!
//! Callers need to tell three situations apart: nothing happened and the
//! input should be corrected (validation), nothing happened and a re-fetch +
//! retry may succeed (contention), and the booking stands but a follow-up
//! step failed (`LinkUpdateFailed`). The HTTP mappings below keep those
//! distinct.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::Session;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("slot descriptor must not be empty")]
    EmptySlot,
    #[error("slot already advertised")]
    DuplicateSlot,
    #[error("slot not found")]
    SlotNotFound,
    #[error("availability changed concurrently, re-fetch and retry")]
    ConcurrentUpdate,
    #[error("trainer not found")]
    TrainerNotFound,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
    #[error("session date must not be in the past")]
    InvalidSlot,
    #[error("trainer already has a booked session for this slot")]
    ConflictingBooking,
    #[error("session is already finalized")]
    AlreadyFinalized,
    #[error("invalid status transition")]
    InvalidTransition,
    #[error("trainer not found")]
    TrainerNotFound,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("user not found")]
    UserNotFound,
    #[error("trainer not found")]
    TrainerNotFound,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum CertificationError {
    #[error("certification name must not be empty")]
    EmptyName,
    #[error("certification already added")]
    DuplicateCertification,
    #[error("trainer not found")]
    TrainerNotFound,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("user not found")]
    NotFound,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("name must not be empty")]
    EmptyName,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("trainer not found")]
    NotFound,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking validation failed: {0}")]
    Validation(String),
    #[error("requested slot is not offered by this trainer")]
    SlotNotOffered,
    #[error("slot is no longer available")]
    SlotUnavailable,
    #[error("trainer already has a booked session for this slot")]
    ConflictingBooking,
    #[error("trainer not found")]
    TrainerNotFound,
    #[error("user not found")]
    UserNotFound,
    /// Partial success: the session exists and the slot stays consumed. The
    /// relationship link may be retried idempotently; nothing is rolled back.
    #[error("booking succeeded but the relationship update failed")]
    LinkUpdateFailed {
        session: Box<Session>,
        #[source]
        source: LinkError,
    },
    #[error(transparent)]
    Session(SessionError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

fn store_error_response(err: &StoreError) -> (StatusCode, &'static str) {
    match err {
        StoreError::NotFound => (StatusCode::NOT_FOUND, "Record not found"),
        StoreError::Duplicate(_) => (StatusCode::CONFLICT, "Duplicate record"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Storage error"),
    }
}

fn error_body(status: StatusCode, error: &str, message: String) -> Response {
    let body = Json(json!({
        "error": error,
        "message": message,
    }));
    (status, body).into_response()
}

impl IntoResponse for SlotError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            SlotError::EmptySlot => (StatusCode::BAD_REQUEST, "Invalid slot"),
            SlotError::DuplicateSlot => (StatusCode::CONFLICT, "Duplicate slot"),
            SlotError::SlotNotFound => (StatusCode::NOT_FOUND, "Slot not found"),
            SlotError::ConcurrentUpdate => (StatusCode::CONFLICT, "Availability changed"),
            SlotError::TrainerNotFound => (StatusCode::NOT_FOUND, "Trainer not found"),
            SlotError::Store(err) => store_error_response(err),
        };
        error_body(status, error, self.to_string())
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            SessionError::NotFound => (StatusCode::NOT_FOUND, "Session not found"),
            SessionError::InvalidSlot => (StatusCode::BAD_REQUEST, "Invalid session date"),
            SessionError::ConflictingBooking => (StatusCode::CONFLICT, "Conflicting booking"),
            SessionError::AlreadyFinalized => (StatusCode::CONFLICT, "Session already finalized"),
            SessionError::InvalidTransition => (StatusCode::CONFLICT, "Invalid transition"),
            SessionError::TrainerNotFound => (StatusCode::NOT_FOUND, "Trainer not found"),
            SessionError::Store(err) => store_error_response(err),
        };
        error_body(status, error, self.to_string())
    }
}

impl IntoResponse for CertificationError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            CertificationError::EmptyName => (StatusCode::BAD_REQUEST, "Invalid certification"),
            CertificationError::DuplicateCertification => {
                (StatusCode::CONFLICT, "Duplicate certification")
            }
            CertificationError::TrainerNotFound => (StatusCode::NOT_FOUND, "Trainer not found"),
            CertificationError::Store(err) => store_error_response(err),
        };
        error_body(status, error, self.to_string())
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ProfileError::NotFound => (StatusCode::NOT_FOUND, "User not found"),
            ProfileError::InvalidEmail => (StatusCode::BAD_REQUEST, "Invalid email"),
            ProfileError::EmptyName => (StatusCode::BAD_REQUEST, "Invalid name"),
            ProfileError::Store(err) => store_error_response(err),
        };
        error_body(status, error, self.to_string())
    }
}

impl IntoResponse for TrainerError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            TrainerError::NotFound => (StatusCode::NOT_FOUND, "Trainer not found"),
            TrainerError::Store(err) => store_error_response(err),
        };
        error_body(status, error, self.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        match self {
            // Degraded success: the caller must learn the session was
            // created even though the link step failed.
            BookingError::LinkUpdateFailed { session, source } => {
                let body = Json(json!({
                    "error": "Link update failed",
                    "message": format!(
                        "booking succeeded, relationship record may be stale: {source}"
                    ),
                    "session": *session,
                }));
                (StatusCode::MULTI_STATUS, body).into_response()
            }
            other => {
                let (status, error) = match &other {
                    BookingError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
                    BookingError::SlotNotOffered => (StatusCode::BAD_REQUEST, "Slot not offered"),
                    BookingError::SlotUnavailable => (StatusCode::CONFLICT, "Slot unavailable"),
                    BookingError::ConflictingBooking => {
                        (StatusCode::CONFLICT, "Conflicting booking")
                    }
                    BookingError::TrainerNotFound => (StatusCode::NOT_FOUND, "Trainer not found"),
                    BookingError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
                    BookingError::Session(_) => (StatusCode::CONFLICT, "Booking failed"),
                    BookingError::Store(err) => store_error_response(err),
                    BookingError::LinkUpdateFailed { .. } => {
                        (StatusCode::MULTI_STATUS, "Link update failed")
                    }
                };
                error_body(status, error, other.to_string())
            }
        }
    }
}
