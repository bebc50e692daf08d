use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trainer profile.
///
/// `available_hours` keeps insertion order; callers that display it sort
/// lexicographically. `certifications` must never contain duplicates
/// (case-sensitive exact match). `clients`, like `User::experts`, is a set
/// stored as a list and is mutated only by the booking workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub role_title: Option<String>,
    pub rating: Option<f64>,
    pub experience_years: Option<i32>,
    pub bio: Option<String>,
    pub specialties: Vec<String>,
    pub certifications: Vec<String>,
    pub available_hours: Vec<String>,
    pub clients: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
