use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::dashboard::dashboard_routes;
use super::health::health_check;
use super::sessions::{session_routes, SessionsState};
use super::trainers::{trainer_routes, TrainersState};
use super::users::user_routes;
use crate::auth::{cors_layer, security_headers_layer, AuthService};
use crate::services::{
    AvailabilityService, BookingService, CertificationService, SessionService, StatsService,
    TrainerService, UserService,
};
use crate::store::MarketplaceStore;

/// Build the full application router over any store backend.
pub fn create_routes(store: Arc<dyn MarketplaceStore>, jwt_secret: &str) -> Router {
    let auth_service = AuthService::new(store.clone(), jwt_secret);

    let trainers_state = TrainersState {
        trainers: TrainerService::new(store.clone()),
        availability: AvailabilityService::new(store.clone()),
        certifications: CertificationService::new(store.clone()),
    };
    let sessions_state = SessionsState {
        booking: BookingService::new(store.clone()),
        sessions: SessionService::new(store.clone()),
    };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(auth_service.clone()))
        .nest(
            "/api/trainers",
            trainer_routes(trainers_state, auth_service.clone()),
        )
        .nest(
            "/api/sessions",
            session_routes(sessions_state, auth_service.clone()),
        )
        .nest(
            "/api/dashboard",
            dashboard_routes(StatsService::new(store.clone()), auth_service.clone()),
        )
        .nest(
            "/api/users",
            user_routes(UserService::new(store), auth_service),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(security_headers_layer())
}
