//! Availability Ledger: owns a trainer's set of open slot descriptors.
//!
//! Slots are opaque strings (`"Mon-Fri 07:00-15:00"`) matched exactly.
//! Mutations go through a compare-and-swap on the pre-image of
//! `available_hours`, so two bookings racing for the same slot resolve
//! first-writer-wins; the loser never silently overwrites.

use std::sync::Arc;

use uuid::Uuid;

use crate::services::errors::SlotError;
use crate::store::MarketplaceStore;

#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn MarketplaceStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Current slots, lexicographically sorted for display. Always re-reads
    /// the store; availability is contended and must not be cached.
    pub async fn list_slots(&self, trainer_id: Uuid) -> Result<Vec<String>, SlotError> {
        let trainer = self
            .store
            .get_trainer(trainer_id)
            .await?
            .ok_or(SlotError::TrainerNotFound)?;
        let mut slots = trainer.available_hours;
        slots.sort();
        Ok(slots)
    }

    pub async fn add_slot(&self, trainer_id: Uuid, slot: &str) -> Result<(), SlotError> {
        let slot = slot.trim();
        if slot.is_empty() {
            return Err(SlotError::EmptySlot);
        }

        let trainer = self
            .store
            .get_trainer(trainer_id)
            .await?
            .ok_or(SlotError::TrainerNotFound)?;
        if trainer.available_hours.iter().any(|s| s == slot) {
            return Err(SlotError::DuplicateSlot);
        }

        let mut next = trainer.available_hours.clone();
        next.push(slot.to_string());

        let swapped = self
            .store
            .swap_trainer_hours(trainer_id, &trainer.available_hours, &next)
            .await?;
        if !swapped {
            return Err(SlotError::ConcurrentUpdate);
        }
        Ok(())
    }

    /// Consume a slot. This is the single enforcement point against
    /// double-selling: the booking workflow calls it before any other write.
    /// A lost swap means a concurrent booking got there first and is
    /// reported as `SlotNotFound`.
    pub async fn remove_slot(&self, trainer_id: Uuid, slot: &str) -> Result<(), SlotError> {
        let slot = slot.trim();
        if slot.is_empty() {
            return Err(SlotError::EmptySlot);
        }

        let trainer = self
            .store
            .get_trainer(trainer_id)
            .await?
            .ok_or(SlotError::TrainerNotFound)?;
        if !trainer.available_hours.iter().any(|s| s == slot) {
            return Err(SlotError::SlotNotFound);
        }

        let next: Vec<String> = trainer
            .available_hours
            .iter()
            .filter(|s| s.as_str() != slot)
            .cloned()
            .collect();

        let swapped = self
            .store
            .swap_trainer_hours(trainer_id, &trainer.available_hours, &next)
            .await?;
        if !swapped {
            return Err(SlotError::SlotNotFound);
        }
        Ok(())
    }
}
