//! Postgres store backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::auth::{Account, UserRole};
use crate::models::{FitnessLevel, Gender, Session, SessionStatus, Trainer, User};
use crate::store::{MarketplaceStore, StoreError};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SESSION_COLUMNS: &str = "id, trainer_id, user_id, date, time, session_type, notes, status, \
     trainer_name, trainer_avatar_url, created_at, updated_at";

const TRAINER_COLUMNS: &str = "id, name, avatar_url, role_title, rating, experience_years, bio, \
     specialties, certifications, available_hours, clients, created_at, updated_at";

const USER_COLUMNS: &str = "id, name, email, avatar_url, age, gender, location, fitness_level, \
     goals, experts, created_at, updated_at";

fn account_from_row(row: &PgRow) -> Result<Account, StoreError> {
    let role: String = row.try_get("role")?;
    Ok(Account {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: UserRole::from_str(&role)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown account role: {role}")))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let gender: Option<String> = row.try_get("gender")?;
    let fitness_level: Option<String> = row.try_get("fitness_level")?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        avatar_url: row.try_get("avatar_url")?,
        age: row.try_get("age")?,
        gender: gender
            .map(|g| {
                Gender::from_str(&g)
                    .ok_or_else(|| StoreError::Corrupt(format!("unknown gender: {g}")))
            })
            .transpose()?,
        location: row.try_get("location")?,
        fitness_level: fitness_level
            .map(|f| {
                FitnessLevel::from_str(&f)
                    .ok_or_else(|| StoreError::Corrupt(format!("unknown fitness level: {f}")))
            })
            .transpose()?,
        goals: row.try_get("goals")?,
        experts: row.try_get("experts")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn trainer_from_row(row: &PgRow) -> Result<Trainer, StoreError> {
    Ok(Trainer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        avatar_url: row.try_get("avatar_url")?,
        role_title: row.try_get("role_title")?,
        rating: row.try_get("rating")?,
        experience_years: row.try_get("experience_years")?,
        bio: row.try_get("bio")?,
        specialties: row.try_get("specialties")?,
        certifications: row.try_get("certifications")?,
        available_hours: row.try_get("available_hours")?,
        clients: row.try_get("clients")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn session_from_row(row: &PgRow) -> Result<Session, StoreError> {
    let status: String = row.try_get("status")?;
    Ok(Session {
        id: row.try_get("id")?,
        trainer_id: row.try_get("trainer_id")?,
        user_id: row.try_get("user_id")?,
        date: row.try_get("date")?,
        time: row.try_get("time")?,
        session_type: row.try_get("session_type")?,
        notes: row.try_get("notes")?,
        status: SessionStatus::from_str(&status)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown session status: {status}")))?,
        trainer_name: row.try_get("trainer_name")?,
        trainer_avatar_url: row.try_get("trainer_avatar_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl MarketplaceStore for PgStore {
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO accounts (id, email, password_hash, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Duplicate(account.email.clone())
            } else {
                StoreError::Database(err)
            }
        })?;
        Ok(())
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, role, created_at, updated_at
             FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| account_from_row(&r)).transpose()
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, role, created_at, updated_at
             FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| account_from_row(&r)).transpose()
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, avatar_url, age, gender, location, \
             fitness_level, goals, experts, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.avatar_url)
        .bind(user.age)
        .bind(user.gender.map(|g| g.as_str()))
        .bind(&user.location)
        .bind(user.fitness_level.map(|f| f.as_str()))
        .bind(&user.goals)
        .bind(&user.experts)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| user_from_row(&r)).transpose()
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| user_from_row(&r)).transpose()
    }

    async fn update_user_preferences(
        &self,
        id: Uuid,
        goals: &str,
        fitness_level: FitnessLevel,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE users
             SET goals = $2, fitness_level = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(goals)
        .bind(fitness_level.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| user_from_row(&r)).transpose()
    }

    async fn update_user_experts(&self, id: Uuid, experts: &[Uuid]) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET experts = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(experts)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_trainer(&self, trainer: &Trainer) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO trainers (id, name, avatar_url, role_title, rating, experience_years, \
             bio, specialties, certifications, available_hours, clients, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(trainer.id)
        .bind(&trainer.name)
        .bind(&trainer.avatar_url)
        .bind(&trainer.role_title)
        .bind(trainer.rating)
        .bind(trainer.experience_years)
        .bind(&trainer.bio)
        .bind(&trainer.specialties)
        .bind(&trainer.certifications)
        .bind(&trainer.available_hours)
        .bind(&trainer.clients)
        .bind(trainer.created_at)
        .bind(trainer.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_trainer(&self, id: Uuid) -> Result<Option<Trainer>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {TRAINER_COLUMNS} FROM trainers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| trainer_from_row(&r)).transpose()
    }

    async fn list_trainers(&self) -> Result<Vec<Trainer>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {TRAINER_COLUMNS} FROM trainers ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(trainer_from_row).collect()
    }

    async fn update_trainer_clients(&self, id: Uuid, clients: &[Uuid]) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE trainers SET clients = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(clients)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_trainer_certifications(
        &self,
        id: Uuid,
        certifications: &[String],
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE trainers SET certifications = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(certifications)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn swap_trainer_hours(
        &self,
        id: Uuid,
        expected: &[String],
        next: &[String],
    ) -> Result<bool, StoreError> {
        // The guard on the pre-image is what makes slot reservation
        // first-writer-wins; a stale writer affects zero rows.
        let result = sqlx::query(
            "UPDATE trainers SET available_hours = $2, updated_at = NOW()
             WHERE id = $1 AND available_hours = $3",
        )
        .bind(id)
        .bind(next)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Distinguish a lost race from a missing trainer.
        let exists = sqlx::query("SELECT 1 AS one FROM trainers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(false)
    }

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sessions (id, trainer_id, user_id, date, time, session_type, notes, \
             status, trainer_name, trainer_avatar_url, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(session.id)
        .bind(session.trainer_id)
        .bind(session.user_id)
        .bind(session.date)
        .bind(&session.time)
        .bind(&session.session_type)
        .bind(&session.notes)
        .bind(session.status.as_str())
        .bind(&session.trainer_name)
        .bind(&session.trainer_avatar_url)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| session_from_row(&r)).transpose()
    }

    async fn update_session_status(
        &self,
        id: Uuid,
        status: SessionStatus,
    ) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE sessions SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| session_from_row(&r)).transpose()
    }

    async fn list_sessions_for_user(&self, user_id: Uuid) -> Result<Vec<Session>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = $1 ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(session_from_row).collect()
    }

    async fn list_sessions_for_trainer(
        &self,
        trainer_id: Uuid,
    ) -> Result<Vec<Session>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE trainer_id = $1 ORDER BY date DESC"
        ))
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(session_from_row).collect()
    }

    async fn find_booked_session(
        &self,
        trainer_id: Uuid,
        date: NaiveDate,
        time: &str,
    ) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE trainer_id = $1 AND date = $2 AND time = $3 AND status = 'booked'
             LIMIT 1"
        ))
        .bind(trainer_id)
        .bind(date)
        .bind(time)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| session_from_row(&r)).transpose()
    }
}
