// Authentication and request identity

pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use errors::AuthError;
pub use jwt::{extract_bearer_token, JwtService};
pub use middleware::{
    cors_layer, extract_user_session, jwt_auth_middleware, rate_limit_middleware, require_role,
    security_headers_layer, RateLimiter,
};
pub use models::{
    Account, AccountInfo, AuthResponse, Claims, LoginRequest, MessageResponse,
    RefreshTokenRequest, RegisterRequest, TokenResponse, UserRole, UserSession,
};
pub use service::AuthService;
