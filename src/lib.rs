//! Bookshelf catalog server
//!
//! An in-memory book catalog exposed as a REST JSON API: add, list with
//! filters, get, update and delete book records.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state around an empty catalog
    pub fn new() -> Self {
        Self {
            services: Arc::new(services::Services::new(repository::Repository::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
