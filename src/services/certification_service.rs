//! Trainer credential management.

use std::sync::Arc;

use uuid::Uuid;

use crate::services::errors::CertificationError;
use crate::store::MarketplaceStore;

#[derive(Clone)]
pub struct CertificationService {
    store: Arc<dyn MarketplaceStore>,
}

impl CertificationService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Certifications in insertion order.
    pub async fn list_certifications(
        &self,
        trainer_id: Uuid,
    ) -> Result<Vec<String>, CertificationError> {
        let trainer = self
            .store
            .get_trainer(trainer_id)
            .await?
            .ok_or(CertificationError::TrainerNotFound)?;
        Ok(trainer.certifications)
    }

    /// Append a credential. Duplicate names (case-sensitive exact match)
    /// are rejected and leave the list unchanged.
    pub async fn add_certification(
        &self,
        trainer_id: Uuid,
        name: &str,
    ) -> Result<(), CertificationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CertificationError::EmptyName);
        }

        let trainer = self
            .store
            .get_trainer(trainer_id)
            .await?
            .ok_or(CertificationError::TrainerNotFound)?;
        if trainer.certifications.iter().any(|c| c == name) {
            return Err(CertificationError::DuplicateCertification);
        }

        let mut certifications = trainer.certifications;
        certifications.push(name.to_string());
        self.store
            .update_trainer_certifications(trainer_id, &certifications)
            .await?;
        Ok(())
    }

    /// Remove a credential. Removing a name that is not present is a no-op.
    pub async fn remove_certification(
        &self,
        trainer_id: Uuid,
        name: &str,
    ) -> Result<(), CertificationError> {
        let name = name.trim();
        let trainer = self
            .store
            .get_trainer(trainer_id)
            .await?
            .ok_or(CertificationError::TrainerNotFound)?;

        let certifications: Vec<String> = trainer
            .certifications
            .iter()
            .filter(|c| c.as_str() != name)
            .cloned()
            .collect();
        if certifications.len() == trainer.certifications.len() {
            return Ok(());
        }

        self.store
            .update_trainer_certifications(trainer_id, &certifications)
            .await?;
        Ok(())
    }
}
