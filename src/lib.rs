//! Shelfmark library catalogue service
//!
//! CRUD over authors, books and their copies, categories, genres, patrons
//! and publishers, stored in PostgreSQL and exposed as a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: repository::Repository,
    pub services: Arc<services::Services>,
}
