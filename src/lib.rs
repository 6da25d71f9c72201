//! Bookcase catalog server
//!
//! A REST JSON API for managing authors and their books, with filtered,
//! sorted and paginated listings.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
