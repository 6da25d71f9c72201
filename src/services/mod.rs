//! Business logic services

pub mod authors;
pub mod books;

use crate::{listing::PageLimits, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, limits: PageLimits) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone(), limits),
            books: books::BooksService::new(repository.clone(), limits),
            repository,
        }
    }

    /// Whether the database answers
    pub async fn is_ready(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Readiness check failed: {}", e);
                false
            }
        }
    }
}
