use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};

use crate::auth::{jwt_auth_middleware, require_role, AuthService, UserRole, UserSession};
use crate::services::errors::{ProfileError, TrainerError};
use crate::services::stats_service::{ClientDashboard, TrainerDashboard};
use crate::services::StatsService;

pub fn dashboard_routes(stats_service: StatsService, auth_service: AuthService) -> Router {
    Router::new()
        .route("/client", get(client_dashboard))
        .route(
            "/trainer",
            get(trainer_dashboard)
                .route_layer(middleware::from_fn(require_role(UserRole::Trainer))),
        )
        .layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(stats_service)
}

#[tracing::instrument(skip(stats_service, session))]
async fn client_dashboard(
    State(stats_service): State<StatsService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<ClientDashboard>, ProfileError> {
    let dashboard = stats_service.client_dashboard(session.user_id).await?;
    Ok(Json(dashboard))
}

#[tracing::instrument(skip(stats_service, session))]
async fn trainer_dashboard(
    State(stats_service): State<StatsService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<TrainerDashboard>, TrainerError> {
    let dashboard = stats_service.trainer_dashboard(session.user_id).await?;
    Ok(Json(dashboard))
}
