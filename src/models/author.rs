//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{book::BookResponse, not_blank};
use crate::listing::{AuthorCriteria, Ordering, PageLimits, PageRequest};

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Author row joined with its aggregate book count
#[derive(Debug, Clone, FromRow)]
pub struct AuthorWithCount {
    #[sqlx(flatten)]
    pub author: Author,
    pub books_count: i64,
}

/// Author as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// First name and last name separated by a space
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_count: Option<i64>,
    /// Only present on the single-author endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AuthorWithCount> for AuthorResponse {
    fn from(row: AuthorWithCount) -> Self {
        let mut response = AuthorResponse::from(row.author);
        response.books_count = Some(row.books_count);
        response
    }
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            full_name: author.full_name(),
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            books_count: None,
            books: None,
            created_at: author.created_at,
            updated_at: author.updated_at,
        }
    }
}

/// Author summary embedded in book records
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            full_name: author.full_name(),
        }
    }
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(
        required(message = "The first name is required."),
        length(min = 1, max = 255, message = "The first name must be between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "The last name is required."),
        length(min = 1, max = 255, message = "The last name must be between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub last_name: Option<String>,
}

/// Update author request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(
        length(min = 1, max = 255, message = "The first name must be between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub first_name: Option<String>,
    #[validate(
        length(min = 1, max = 255, message = "The last name must be between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub last_name: Option<String>,
}

/// Author list query parameters.
///
/// Values stay raw strings so that malformed input degrades to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorListQuery {
    /// Substring of the first or last name
    pub search: Option<String>,
    /// One of `first_name`, `last_name`, `created_at`, `updated_at`
    pub sort: Option<String>,
    /// `asc` (default) or `desc`
    pub direction: Option<String>,
    /// Page number (default: 1)
    pub page: Option<String>,
    /// Records per page (default: 15, max: 100)
    pub per_page: Option<String>,
}

impl AuthorListQuery {
    pub fn criteria(&self) -> AuthorCriteria {
        AuthorCriteria::from_params(self.search.as_deref())
    }

    pub fn ordering(&self) -> Ordering {
        Ordering::for_authors(self.sort.as_deref(), self.direction.as_deref())
    }

    pub fn page_request(&self, limits: PageLimits) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.per_page.as_deref(), limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Author {
        Author {
            id: 1,
            first_name: "Victor".to_string(),
            last_name: "Hugo".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(author().full_name(), "Victor Hugo");
    }

    #[test]
    fn test_response_omits_unloaded_relations() {
        let value = serde_json::to_value(AuthorResponse::from(author())).unwrap();
        assert_eq!(value["full_name"], "Victor Hugo");
        assert!(value.get("books_count").is_none());
        assert!(value.get("books").is_none());

        let counted = AuthorResponse::from(AuthorWithCount {
            author: author(),
            books_count: 3,
        });
        assert_eq!(serde_json::to_value(counted).unwrap()["books_count"], 3);
    }

    #[test]
    fn test_create_requires_both_names() {
        let errors = CreateAuthor {
            first_name: None,
            last_name: None,
        }
        .validate()
        .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
    }

    #[test]
    fn test_name_max_length() {
        let errors = CreateAuthor {
            first_name: Some("a".repeat(256)),
            last_name: Some("Hugo".to_string()),
        }
        .validate()
        .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(!fields.contains_key("last_name"));

        assert!(UpdateAuthor {
            first_name: None,
            last_name: Some("b".repeat(255)),
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_whitespace_names_are_rejected() {
        let errors = CreateAuthor {
            first_name: Some("   ".to_string()),
            last_name: Some("Hugo".to_string()),
        }
        .validate()
        .unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));

        assert!(UpdateAuthor {
            first_name: None,
            last_name: Some(" \n ".to_string()),
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_list_query_resolution() {
        let query = AuthorListQuery {
            search: Some("".to_string()),
            sort: Some("last_name".to_string()),
            direction: Some("desc".to_string()),
            per_page: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(query.criteria().search, None);
        assert_eq!(query.ordering(), Ordering::for_authors(Some("last_name"), Some("desc")));
        assert_eq!(query.page_request(PageLimits::default()).per_page, 15);
    }
}
