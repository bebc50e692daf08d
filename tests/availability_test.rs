//! Availability ledger and certification list invariants.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use common::{memory_store, seed_trainer};
use matchfit::services::errors::{CertificationError, SlotError};
use matchfit::services::{AvailabilityService, CertificationService};
use matchfit::store::MarketplaceStore;

#[tokio::test]
async fn test_duplicate_slot_add_is_rejected() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &["Mon 10:00"]).await;
    let availability = AvailabilityService::new(store.clone());

    let result = availability.add_slot(trainer.id, "Mon 10:00").await;
    assert_matches!(result, Err(SlotError::DuplicateSlot));

    let stored = store.get_trainer(trainer.id).await.unwrap().unwrap();
    assert_eq!(stored.available_hours, vec!["Mon 10:00".to_string()]);
}

#[tokio::test]
async fn test_add_slot_trims_and_rejects_empty() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &[]).await;
    let availability = AvailabilityService::new(store.clone());

    assert_matches!(
        availability.add_slot(trainer.id, "   ").await,
        Err(SlotError::EmptySlot)
    );

    availability
        .add_slot(trainer.id, "  Mon-Fri 07:00-15:00 ")
        .await
        .unwrap();
    let stored = store.get_trainer(trainer.id).await.unwrap().unwrap();
    assert_eq!(
        stored.available_hours,
        vec!["Mon-Fri 07:00-15:00".to_string()]
    );
}

#[tokio::test]
async fn test_remove_slot_requires_presence() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &["Mon 10:00"]).await;
    let availability = AvailabilityService::new(store.clone());

    assert_matches!(
        availability.remove_slot(trainer.id, "Wed 14:00").await,
        Err(SlotError::SlotNotFound)
    );

    availability.remove_slot(trainer.id, "Mon 10:00").await.unwrap();
    let stored = store.get_trainer(trainer.id).await.unwrap().unwrap();
    assert!(stored.available_hours.is_empty());

    // Already consumed: a second removal reports the slot gone.
    assert_matches!(
        availability.remove_slot(trainer.id, "Mon 10:00").await,
        Err(SlotError::SlotNotFound)
    );
}

#[tokio::test]
async fn test_list_slots_sorts_for_display_without_rewriting_storage() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &["Wed 14:00", "Mon 10:00"]).await;
    let availability = AvailabilityService::new(store.clone());

    let listed = availability.list_slots(trainer.id).await.unwrap();
    assert_eq!(listed, vec!["Mon 10:00".to_string(), "Wed 14:00".to_string()]);

    // Storage keeps insertion order.
    let stored = store.get_trainer(trainer.id).await.unwrap().unwrap();
    assert_eq!(
        stored.available_hours,
        vec!["Wed 14:00".to_string(), "Mon 10:00".to_string()]
    );
}

#[tokio::test]
async fn test_certification_duplicates_are_rejected() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &[]).await;
    let certifications = CertificationService::new(store.clone());

    certifications
        .add_certification(trainer.id, "NASM-CPT")
        .await
        .unwrap();

    let duplicate = certifications.add_certification(trainer.id, "NASM-CPT").await;
    assert_matches!(duplicate, Err(CertificationError::DuplicateCertification));

    // Case-sensitive exact match: a different casing is a new credential.
    certifications
        .add_certification(trainer.id, "nasm-cpt")
        .await
        .unwrap();
    certifications
        .add_certification(trainer.id, "ACE Group Fitness")
        .await
        .unwrap();

    let listed = certifications.list_certifications(trainer.id).await.unwrap();
    assert_eq!(
        listed,
        vec![
            "NASM-CPT".to_string(),
            "nasm-cpt".to_string(),
            "ACE Group Fitness".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_certification_removal_is_a_noop_when_absent() {
    let store = memory_store();
    let trainer = seed_trainer(&store, "Maya Chen", &[]).await;
    let certifications = CertificationService::new(store.clone());

    certifications
        .add_certification(trainer.id, "NASM-CPT")
        .await
        .unwrap();

    certifications
        .remove_certification(trainer.id, "ACE Group Fitness")
        .await
        .unwrap();
    certifications
        .remove_certification(trainer.id, "NASM-CPT")
        .await
        .unwrap();

    let listed = certifications.list_certifications(trainer.id).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_unknown_trainer_surfaces_not_found() {
    let store = memory_store();
    let availability = AvailabilityService::new(store.clone());
    let certifications = CertificationService::new(store.clone());
    let ghost = uuid::Uuid::new_v4();

    assert_matches!(
        availability.list_slots(ghost).await,
        Err(SlotError::TrainerNotFound)
    );
    assert_matches!(
        availability.add_slot(ghost, "Mon 10:00").await,
        Err(SlotError::TrainerNotFound)
    );
    assert_matches!(
        certifications.add_certification(ghost, "NASM-CPT").await,
        Err(CertificationError::TrainerNotFound)
    );
}
