//! Client profile management.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::validation::{is_valid_email, normalize_email};
use crate::models::{UpdatePreferences, UpdateUserProfile, User};
use crate::services::errors::ProfileError;
use crate::store::MarketplaceStore;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn MarketplaceStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, ProfileError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: UpdateUserProfile,
    ) -> Result<User, ProfileError> {
        let name = update.name.as_deref().map(str::trim);
        if matches!(name, Some("")) {
            return Err(ProfileError::EmptyName);
        }

        let email = match update.email.as_deref() {
            Some(email) => {
                let email = normalize_email(email);
                if !is_valid_email(&email) {
                    return Err(ProfileError::InvalidEmail);
                }
                Some(email)
            }
            None => None,
        };

        self.store
            .update_user_profile(user_id, name, email.as_deref())
            .await?
            .ok_or(ProfileError::NotFound)
    }

    /// The get-matched preferences step: persist goals and fitness level
    /// before showing the trainer grid.
    pub async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: UpdatePreferences,
    ) -> Result<User, ProfileError> {
        self.store
            .update_user_preferences(
                user_id,
                preferences.goals.trim(),
                preferences.fitness_level,
            )
            .await?
            .ok_or(ProfileError::NotFound)
    }
}
