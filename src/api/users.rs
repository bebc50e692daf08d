use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, put},
    Extension, Router,
};

use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::models::{UpdatePreferences, UpdateUserProfile, User};
use crate::services::errors::ProfileError;
use crate::services::UserService;

pub fn user_routes(user_service: UserService, auth_service: AuthService) -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/preferences", put(update_preferences))
        .layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(user_service)
}

#[tracing::instrument(skip(user_service, session))]
async fn get_me(
    State(user_service): State<UserService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<User>, ProfileError> {
    let user = user_service.get_profile(session.user_id).await?;
    Ok(Json(user))
}

#[tracing::instrument(skip(user_service, session, update))]
async fn update_me(
    State(user_service): State<UserService>,
    Extension(session): Extension<UserSession>,
    Json(update): Json<UpdateUserProfile>,
) -> Result<Json<User>, ProfileError> {
    let user = user_service.update_profile(session.user_id, update).await?;
    Ok(Json(user))
}

/// The get-matched preferences step
#[tracing::instrument(skip(user_service, session, preferences))]
async fn update_preferences(
    State(user_service): State<UserService>,
    Extension(session): Extension<UserSession>,
    Json(preferences): Json<UpdatePreferences>,
) -> Result<Json<User>, ProfileError> {
    let user = user_service
        .update_preferences(session.user_id, preferences)
        .await?;
    Ok(Json(user))
}
