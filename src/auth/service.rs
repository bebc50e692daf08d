use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{
    Account, AccountInfo, AuthError, AuthResponse, JwtService, LoginRequest, RefreshTokenRequest,
    RegisterRequest, TokenResponse, UserRole,
};
use crate::models::validation::{is_valid_email, normalize_email};
use crate::models::{Trainer, User};
use crate::store::{MarketplaceStore, StoreError};

/// Identity provider for the marketplace. Tokens are stateless: refresh
/// tokens are validated by signature alone and logout is a client-side
/// token discard.
#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    store: Arc<dyn MarketplaceStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn MarketplaceStore>, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            store,
        }
    }

    /// Register a new account and its marketplace profile. The profile row
    /// (User for clients, Trainer for trainers) shares the account id.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AuthError::NameValidation("name must not be empty".into()));
        }

        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(AuthError::EmailValidation(format!(
                "not a valid email address: {email}"
            )));
        }

        if self.store.get_account_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&request.password)?;
        let role = request.role.unwrap_or(UserRole::Client);
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: email.clone(),
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_account(&account)
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => AuthError::EmailAlreadyExists,
                other => AuthError::Store(other),
            })?;

        self.create_profile(&account, name).await?;

        let (access_token, refresh_token) =
            self.jwt_service
                .create_token_pair(account.id, &account.email, role)?;

        info!(account_id = %account.id, role = role.as_str(), "account registered");

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
            user: AccountInfo {
                id: account.id,
                email: account.email,
                role,
                created_at: account.created_at,
                updated_at: account.updated_at,
            },
        })
    }

    /// Login with email and password
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);
        let account = self
            .store
            .get_account_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, refresh_token) =
            self.jwt_service
                .create_token_pair(account.id, &account.email, account.role)?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
            user: AccountInfo {
                id: account.id,
                email: account.email,
                role: account.role,
                created_at: account.created_at,
                updated_at: account.updated_at,
            },
        })
    }

    /// Exchange a valid refresh token for a fresh access token
    pub async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<TokenResponse, AuthError> {
        let claims = self.jwt_service.validate_token(&request.refresh_token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let access_token =
            self.jwt_service
                .create_access_token(user_id, &claims.email, claims.role)?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
        })
    }

    /// Account info for an authenticated session
    pub async fn profile(&self, account_id: Uuid) -> Result<AccountInfo, AuthError> {
        let account = self
            .store
            .get_account(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(AccountInfo {
            id: account.id,
            email: account.email,
            role: account.role,
            created_at: account.created_at,
            updated_at: account.updated_at,
        })
    }

    /// Validate a bearer token and produce the request context
    pub async fn validate_session(
        &self,
        token: &str,
    ) -> Result<crate::auth::UserSession, AuthError> {
        self.jwt_service.extract_user_session(token)
    }

    async fn create_profile(&self, account: &Account, name: &str) -> Result<(), AuthError> {
        match account.role {
            UserRole::Trainer => {
                let trainer = Trainer {
                    id: account.id,
                    name: name.to_string(),
                    avatar_url: None,
                    role_title: None,
                    rating: None,
                    experience_years: None,
                    bio: None,
                    specialties: vec![],
                    certifications: vec![],
                    available_hours: vec![],
                    clients: vec![],
                    created_at: account.created_at,
                    updated_at: account.updated_at,
                };
                self.store.insert_trainer(&trainer).await?;
            }
            UserRole::Client | UserRole::Admin => {
                let user = User {
                    id: account.id,
                    name: name.to_string(),
                    email: account.email.clone(),
                    avatar_url: None,
                    age: None,
                    gender: None,
                    location: None,
                    fitness_level: None,
                    goals: String::new(),
                    experts: vec![],
                    created_at: account.created_at,
                    updated_at: account.updated_at,
                };
                self.store.insert_user(&user).await?;
            }
        }
        Ok(())
    }
}
