use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::auth::{
    extract_user_session, jwt_auth_middleware, rate_limit_middleware, AccountInfo, AuthError,
    AuthResponse, AuthService, LoginRequest, RateLimiter, RefreshTokenRequest, RegisterRequest,
    TokenResponse,
};

/// Authentication routes
pub fn auth_routes(auth_service: AuthService) -> Router {
    let rate_limiter = RateLimiter::new(5, Duration::from_secs(300));

    Router::new()
        .route(
            "/register",
            post(register).route_layer(middleware::from_fn_with_state(
                rate_limiter.clone(),
                rate_limit_middleware,
            )),
        )
        .route(
            "/login",
            post(login).route_layer(middleware::from_fn_with_state(
                rate_limiter,
                rate_limit_middleware,
            )),
        )
        .route("/refresh", post(refresh_token))
        .route(
            "/profile",
            get(get_profile).route_layer(middleware::from_fn_with_state(
                auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .with_state(auth_service)
}

/// Register a new account
#[tracing::instrument(skip(auth_service, request))]
async fn register(
    State(auth_service): State<AuthService>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = auth_service.register(request).await?;
    Ok(Json(response))
}

/// Login with email and password
#[tracing::instrument(skip(auth_service, request))]
async fn login(
    State(auth_service): State<AuthService>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

/// Refresh access token
#[tracing::instrument(skip(auth_service, request))]
async fn refresh_token(
    State(auth_service): State<AuthService>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = auth_service.refresh_token(request).await?;
    Ok(Json(response))
}

/// Account info for the authenticated caller
#[tracing::instrument(skip(auth_service, request))]
async fn get_profile(
    State(auth_service): State<AuthService>,
    request: Request,
) -> Result<Json<AccountInfo>, AuthError> {
    let session = extract_user_session(&request)?;
    let info = auth_service.profile(session.user_id).await?;
    Ok(Json(info))
}
