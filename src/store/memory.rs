//! In-memory store backend for tests and demo runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::Account;
use crate::models::{FitnessLevel, Session, SessionStatus, Trainer, User};
use crate::store::{MarketplaceStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    users: HashMap<Uuid, User>,
    trainers: HashMap<Uuid, Trainer>,
    sessions: HashMap<Uuid, Session>,
}

/// All tables behind one lock; a single booking touches several of them and
/// the write sections are short.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketplaceStore for MemoryStore {
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        if tables
            .accounts
            .values()
            .any(|a| a.email == account.email)
        {
            return Err(StoreError::Duplicate(account.email.clone()));
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.read().await.accounts.get(&id).cloned())
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner.write().await.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.inner.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(email) = email {
            user.email = email.to_string();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_user_preferences(
        &self,
        id: Uuid,
        goals: &str,
        fitness_level: FitnessLevel,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.inner.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        user.goals = goals.to_string();
        user.fitness_level = Some(fitness_level);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_user_experts(&self, id: Uuid, experts: &[Uuid]) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        let user = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.experts = experts.to_vec();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_trainer(&self, trainer: &Trainer) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .trainers
            .insert(trainer.id, trainer.clone());
        Ok(())
    }

    async fn get_trainer(&self, id: Uuid) -> Result<Option<Trainer>, StoreError> {
        Ok(self.inner.read().await.trainers.get(&id).cloned())
    }

    async fn list_trainers(&self) -> Result<Vec<Trainer>, StoreError> {
        let mut trainers: Vec<Trainer> =
            self.inner.read().await.trainers.values().cloned().collect();
        trainers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(trainers)
    }

    async fn update_trainer_clients(&self, id: Uuid, clients: &[Uuid]) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        let trainer = tables.trainers.get_mut(&id).ok_or(StoreError::NotFound)?;
        trainer.clients = clients.to_vec();
        trainer.updated_at = Utc::now();
        Ok(())
    }

    async fn update_trainer_certifications(
        &self,
        id: Uuid,
        certifications: &[String],
    ) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        let trainer = tables.trainers.get_mut(&id).ok_or(StoreError::NotFound)?;
        trainer.certifications = certifications.to_vec();
        trainer.updated_at = Utc::now();
        Ok(())
    }

    async fn swap_trainer_hours(
        &self,
        id: Uuid,
        expected: &[String],
        next: &[String],
    ) -> Result<bool, StoreError> {
        let mut tables = self.inner.write().await;
        let trainer = tables.trainers.get_mut(&id).ok_or(StoreError::NotFound)?;
        if trainer.available_hours != expected {
            return Ok(false);
        }
        trainer.available_hours = next.to_vec();
        trainer.updated_at = Utc::now();
        Ok(true)
    }

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.read().await.sessions.get(&id).cloned())
    }

    async fn update_session_status(
        &self,
        id: Uuid,
        status: SessionStatus,
    ) -> Result<Option<Session>, StoreError> {
        let mut tables = self.inner.write().await;
        let Some(session) = tables.sessions.get_mut(&id) else {
            return Ok(None);
        };
        session.status = status;
        session.updated_at = Utc::now();
        Ok(Some(session.clone()))
    }

    async fn list_sessions_for_user(&self, user_id: Uuid) -> Result<Vec<Session>, StoreError> {
        let mut sessions: Vec<Session> = self
            .inner
            .read()
            .await
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(sessions)
    }

    async fn list_sessions_for_trainer(
        &self,
        trainer_id: Uuid,
    ) -> Result<Vec<Session>, StoreError> {
        let mut sessions: Vec<Session> = self
            .inner
            .read()
            .await
            .sessions
            .values()
            .filter(|s| s.trainer_id == trainer_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(sessions)
    }

    async fn find_booked_session(
        &self,
        trainer_id: Uuid,
        date: NaiveDate,
        time: &str,
    ) -> Result<Option<Session>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .sessions
            .values()
            .find(|s| {
                s.trainer_id == trainer_id
                    && s.date == date
                    && s.time == time
                    && s.status == SessionStatus::Booked
            })
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn trainer_with_hours(hours: &[&str]) -> Trainer {
        let now = Utc::now();
        Trainer {
            id: Uuid::new_v4(),
            name: "Lina Moretti".to_string(),
            avatar_url: None,
            role_title: None,
            rating: Some(4.8),
            experience_years: Some(6),
            bio: None,
            specialties: vec![],
            certifications: vec![],
            available_hours: hours.iter().map(|s| s.to_string()).collect(),
            clients: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_swap_hours_takes_only_on_matching_pre_image() {
        let store = MemoryStore::new();
        let trainer = trainer_with_hours(&["Mon 10:00", "Wed 14:00"]);
        store.insert_trainer(&trainer).await.unwrap();

        let expected = vec!["Mon 10:00".to_string(), "Wed 14:00".to_string()];
        let next = vec!["Wed 14:00".to_string()];

        assert!(store
            .swap_trainer_hours(trainer.id, &expected, &next)
            .await
            .unwrap());

        // Second writer races with a stale pre-image and must lose.
        assert!(!store
            .swap_trainer_hours(trainer.id, &expected, &next)
            .await
            .unwrap());

        let stored = store.get_trainer(trainer.id).await.unwrap().unwrap();
        assert_eq!(stored.available_hours, vec!["Wed 14:00".to_string()]);
    }

    #[tokio::test]
    async fn test_swap_hours_unknown_trainer() {
        let store = MemoryStore::new();
        let result = store.swap_trainer_hours(Uuid::new_v4(), &[], &[]).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
