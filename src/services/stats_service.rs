//! Dashboard counters for both sides of the marketplace.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Session, SessionStatus};
use crate::services::errors::{ProfileError, TrainerError};
use crate::store::MarketplaceStore;

#[derive(Debug, Serialize)]
pub struct ClientDashboard {
    pub active_experts: usize,
    pub upcoming_sessions: usize,
    pub completed_sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct TrainerDashboard {
    pub todays_sessions: Vec<Session>,
    pub client_count: usize,
    pub completed_sessions: usize,
}

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn MarketplaceStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    pub async fn client_dashboard(&self, user_id: Uuid) -> Result<ClientDashboard, ProfileError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(ProfileError::NotFound)?;
        let sessions = self.store.list_sessions_for_user(user_id).await?;

        Ok(ClientDashboard {
            active_experts: user.experts.len(),
            upcoming_sessions: sessions
                .iter()
                .filter(|s| s.status == SessionStatus::Booked)
                .count(),
            completed_sessions: sessions
                .iter()
                .filter(|s| s.status == SessionStatus::Completed)
                .count(),
        })
    }

    pub async fn trainer_dashboard(
        &self,
        trainer_id: Uuid,
    ) -> Result<TrainerDashboard, TrainerError> {
        let trainer = self
            .store
            .get_trainer(trainer_id)
            .await?
            .ok_or(TrainerError::NotFound)?;
        let sessions = self.store.list_sessions_for_trainer(trainer_id).await?;

        let today = Utc::now().date_naive();
        let mut todays_sessions: Vec<Session> = sessions
            .iter()
            .filter(|s| s.date == today && s.status == SessionStatus::Booked)
            .cloned()
            .collect();
        todays_sessions.sort_by(|a, b| a.time.cmp(&b.time));

        Ok(TrainerDashboard {
            todays_sessions,
            client_count: trainer.clients.len(),
            completed_sessions: sessions
                .iter()
                .filter(|s| s.status == SessionStatus::Completed)
                .count(),
        })
    }
}
