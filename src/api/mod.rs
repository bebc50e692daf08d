// API routes and handlers

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod routes;
pub mod sessions;
pub mod trainers;
pub mod users;
