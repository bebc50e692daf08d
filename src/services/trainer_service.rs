//! Trainer profile reads for the match grid and trainer pages.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::Trainer;
use crate::services::errors::TrainerError;
use crate::store::MarketplaceStore;

#[derive(Clone)]
pub struct TrainerService {
    store: Arc<dyn MarketplaceStore>,
}

impl TrainerService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    pub async fn get_trainer(&self, trainer_id: Uuid) -> Result<Trainer, TrainerError> {
        self.store
            .get_trainer(trainer_id)
            .await?
            .ok_or(TrainerError::NotFound)
    }

    /// All trainers, ordered by name. This is a plain listing: there is no
    /// ranking or preference matching behind the match grid.
    pub async fn list_trainers(&self) -> Result<Vec<Trainer>, TrainerError> {
        Ok(self.store.list_trainers().await?)
    }
}
