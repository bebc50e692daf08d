use axum::{
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{jwt_auth_middleware, AuthError, AuthService, MessageResponse, UserRole, UserSession};
use crate::models::Trainer;
use crate::services::errors::{SlotError, TrainerError};
use crate::services::{AvailabilityService, CertificationService, TrainerService};

#[derive(Clone)]
pub struct TrainersState {
    pub trainers: TrainerService,
    pub availability: AvailabilityService,
    pub certifications: CertificationService,
}

#[derive(Debug, Deserialize)]
struct SlotRequest {
    slot: String,
}

#[derive(Debug, Deserialize)]
struct CertificationRequest {
    name: String,
}

/// Trainer browsing plus trainer-owned schedule and credential management
pub fn trainer_routes(state: TrainersState, auth_service: AuthService) -> Router {
    Router::new()
        .route("/", get(list_trainers))
        .route("/:id", get(get_trainer))
        .route(
            "/:id/availability",
            get(list_slots).post(add_slot).delete(remove_slot),
        )
        .route(
            "/:id/certifications",
            get(list_certifications)
                .post(add_certification)
                .delete(remove_certification),
        )
        .layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Only the trainer themselves (or an admin) may mutate schedule and
/// credentials.
fn ensure_owner(session: &UserSession, trainer_id: Uuid) -> Result<(), AuthError> {
    if session.user_id == trainer_id || session.role == UserRole::Admin {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions)
    }
}

/// The match grid: a plain listing of every trainer
#[tracing::instrument(skip(state))]
async fn list_trainers(
    State(state): State<TrainersState>,
) -> Result<Json<Vec<Trainer>>, TrainerError> {
    let trainers = state.trainers.list_trainers().await?;
    Ok(Json(trainers))
}

#[tracing::instrument(skip(state))]
async fn get_trainer(
    State(state): State<TrainersState>,
    Path(trainer_id): Path<Uuid>,
) -> Result<Json<Trainer>, TrainerError> {
    let trainer = state.trainers.get_trainer(trainer_id).await?;
    Ok(Json(trainer))
}

#[tracing::instrument(skip(state))]
async fn list_slots(
    State(state): State<TrainersState>,
    Path(trainer_id): Path<Uuid>,
) -> Result<Json<Vec<String>>, SlotError> {
    let slots = state.availability.list_slots(trainer_id).await?;
    Ok(Json(slots))
}

#[tracing::instrument(skip(state, session, request))]
async fn add_slot(
    State(state): State<TrainersState>,
    Extension(session): Extension<UserSession>,
    Path(trainer_id): Path<Uuid>,
    Json(request): Json<SlotRequest>,
) -> Result<Json<MessageResponse>, Response> {
    ensure_owner(&session, trainer_id).map_err(IntoResponse::into_response)?;
    state
        .availability
        .add_slot(trainer_id, &request.slot)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(MessageResponse {
        message: "Slot added".to_string(),
    }))
}

#[tracing::instrument(skip(state, session, request))]
async fn remove_slot(
    State(state): State<TrainersState>,
    Extension(session): Extension<UserSession>,
    Path(trainer_id): Path<Uuid>,
    Json(request): Json<SlotRequest>,
) -> Result<Json<MessageResponse>, Response> {
    ensure_owner(&session, trainer_id).map_err(IntoResponse::into_response)?;
    state
        .availability
        .remove_slot(trainer_id, &request.slot)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(MessageResponse {
        message: "Slot removed".to_string(),
    }))
}

#[tracing::instrument(skip(state))]
async fn list_certifications(
    State(state): State<TrainersState>,
    Path(trainer_id): Path<Uuid>,
) -> Result<Json<Vec<String>>, Response> {
    let certifications = state
        .certifications
        .list_certifications(trainer_id)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(certifications))
}

#[tracing::instrument(skip(state, session, request))]
async fn add_certification(
    State(state): State<TrainersState>,
    Extension(session): Extension<UserSession>,
    Path(trainer_id): Path<Uuid>,
    Json(request): Json<CertificationRequest>,
) -> Result<Json<MessageResponse>, Response> {
    ensure_owner(&session, trainer_id).map_err(IntoResponse::into_response)?;
    state
        .certifications
        .add_certification(trainer_id, &request.name)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(MessageResponse {
        message: "Certification added".to_string(),
    }))
}

#[tracing::instrument(skip(state, session, request))]
async fn remove_certification(
    State(state): State<TrainersState>,
    Extension(session): Extension<UserSession>,
    Path(trainer_id): Path<Uuid>,
    Json(request): Json<CertificationRequest>,
) -> Result<Json<MessageResponse>, Response> {
    ensure_owner(&session, trainer_id).map_err(IntoResponse::into_response)?;
    state
        .certifications
        .remove_certification(trainer_id, &request.name)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(MessageResponse {
        message: "Certification removed".to_string(),
    }))
}
