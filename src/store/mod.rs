//! Keyed record storage for marketplace entities.
//!
//! The trait abstracts over swappable backends: Postgres for deployments,
//! an in-memory map for tests and demos. The booking workflow only ever sees
//! this interface, so every backend must provide the same semantics —
//! in particular `swap_trainer_hours`, the compare-and-swap that makes slot
//! reservation first-writer-wins.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Account;
use crate::models::{FitnessLevel, Session, SessionStatus, Trainer, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate record: {0}")]
    Duplicate(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    // ========== Accounts ==========

    /// Insert a new account; fails with `Duplicate` when the email is taken.
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    // ========== Users ==========

    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn update_user_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError>;

    async fn update_user_preferences(
        &self,
        id: Uuid,
        goals: &str,
        fitness_level: FitnessLevel,
    ) -> Result<Option<User>, StoreError>;

    /// Replace the user's experts list wholesale.
    async fn update_user_experts(&self, id: Uuid, experts: &[Uuid]) -> Result<(), StoreError>;

    // ========== Trainers ==========

    async fn insert_trainer(&self, trainer: &Trainer) -> Result<(), StoreError>;

    async fn get_trainer(&self, id: Uuid) -> Result<Option<Trainer>, StoreError>;

    /// All trainers, ordered by name.
    async fn list_trainers(&self) -> Result<Vec<Trainer>, StoreError>;

    async fn update_trainer_clients(&self, id: Uuid, clients: &[Uuid]) -> Result<(), StoreError>;

    async fn update_trainer_certifications(
        &self,
        id: Uuid,
        certifications: &[String],
    ) -> Result<(), StoreError>;

    /// Compare-and-swap on `available_hours`: writes `next` only if the
    /// stored list still equals `expected`. Returns whether the swap took.
    async fn swap_trainer_hours(
        &self,
        id: Uuid,
        expected: &[String],
        next: &[String],
    ) -> Result<bool, StoreError>;

    // ========== Sessions ==========

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError>;

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    async fn update_session_status(
        &self,
        id: Uuid,
        status: SessionStatus,
    ) -> Result<Option<Session>, StoreError>;

    /// Sessions for a user, newest date first.
    async fn list_sessions_for_user(&self, user_id: Uuid) -> Result<Vec<Session>, StoreError>;

    /// Sessions for a trainer, newest date first.
    async fn list_sessions_for_trainer(&self, trainer_id: Uuid)
        -> Result<Vec<Session>, StoreError>;

    /// The `booked` session occupying `(trainer_id, date, time)`, if any.
    async fn find_booked_session(
        &self,
        trainer_id: Uuid,
        date: NaiveDate,
        time: &str,
    ) -> Result<Option<Session>, StoreError>;
}
