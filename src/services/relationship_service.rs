//! Relationship Linker: the bidirectional client/trainer association
//! implied by shared session history.

use std::sync::Arc;

use uuid::Uuid;

use crate::services::errors::LinkError;
use crate::store::MarketplaceStore;

#[derive(Clone)]
pub struct RelationshipService {
    store: Arc<dyn MarketplaceStore>,
}

impl RelationshipService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Idempotently ensure `trainer_id ∈ user.experts` and
    /// `user_id ∈ trainer.clients`. The underlying fields are list-typed,
    /// so membership is checked before every insert; calling this any
    /// number of times yields at most one entry per side.
    ///
    /// Cancellation never unlinks: the relationship persists as history.
    pub async fn link_after_booking(
        &self,
        user_id: Uuid,
        trainer_id: Uuid,
    ) -> Result<(), LinkError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(LinkError::UserNotFound)?;
        if !user.experts.contains(&trainer_id) {
            let mut experts = user.experts;
            experts.push(trainer_id);
            self.store.update_user_experts(user_id, &experts).await?;
        }

        let trainer = self
            .store
            .get_trainer(trainer_id)
            .await?
            .ok_or(LinkError::TrainerNotFound)?;
        if !trainer.clients.contains(&user_id) {
            let mut clients = trainer.clients;
            clients.push(user_id);
            self.store
                .update_trainer_clients(trainer_id, &clients)
                .await?;
        }

        Ok(())
    }
}
