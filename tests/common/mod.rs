//! Shared fixtures for integration tests, all running against `MemoryStore`.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use matchfit::models::{Session, SessionStatus, Trainer, User};
use matchfit::store::{MarketplaceStore, MemoryStore};

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

pub async fn seed_trainer(store: &MemoryStore, name: &str, hours: &[&str]) -> Trainer {
    let now = Utc::now();
    let trainer = Trainer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        avatar_url: None,
        role_title: Some("Personal Trainer".to_string()),
        rating: Some(4.7),
        experience_years: Some(5),
        bio: None,
        specialties: vec!["Strength".to_string()],
        certifications: vec![],
        available_hours: hours.iter().map(|s| s.to_string()).collect(),
        clients: vec![],
        created_at: now,
        updated_at: now,
    };
    store.insert_trainer(&trainer).await.unwrap();
    trainer
}

pub async fn seed_user(store: &MemoryStore, name: &str) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        avatar_url: None,
        age: None,
        gender: None,
        location: None,
        fitness_level: None,
        goals: String::new(),
        experts: vec![],
        created_at: now,
        updated_at: now,
    };
    store.insert_user(&user).await.unwrap();
    user
}

/// Insert a session directly, bypassing the booking workflow. Used to set up
/// pre-existing state (conflicts, past sessions).
pub async fn seed_session(
    store: &MemoryStore,
    trainer: &Trainer,
    user: &User,
    date: NaiveDate,
    time: &str,
    status: SessionStatus,
) -> Session {
    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4(),
        trainer_id: trainer.id,
        user_id: user.id,
        date,
        time: time.to_string(),
        session_type: None,
        notes: None,
        status,
        trainer_name: Some(trainer.name.clone()),
        trainer_avatar_url: trainer.avatar_url.clone(),
        created_at: now,
        updated_at: now,
    };
    store.insert_session(&session).await.unwrap();
    session
}
