//! Data models for Bookcase

pub mod author;
pub mod book;
pub mod claims;

// Re-export commonly used types
pub use author::{Author, AuthorResponse, AuthorSummary};
pub use book::{Book, BookResponse};
pub use claims::UserClaims;

use validator::ValidationError;

/// Reject names and titles made only of whitespace
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("This field cannot be blank.".into());
        return Err(error);
    }
    Ok(())
}
