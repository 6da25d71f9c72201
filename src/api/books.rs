//! Book endpoints

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    listing::{Page, PageUrl},
    models::book::{BookListQuery, BookResponse, CreateBook, UpdateBook},
};

use super::{ApiJson, ApiPath, AuthenticatedUser, DataResponse, MessageResponse};

/// List books with search, filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Paginated list of books", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<BookListQuery>,
) -> AppResult<Json<Page<BookResponse>>> {
    let url = PageUrl::new(uri.path(), uri.query());
    let page = state.services.books.list(&query, &url).await?;
    Ok(Json(page))
}

/// Get book details
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookData),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<DataResponse<BookResponse>>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(DataResponse::new(book)))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookData),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ApiJson(data): ApiJson<CreateBook>,
) -> AppResult<(StatusCode, Json<DataResponse<BookResponse>>)> {
    let book = state.services.books.create(data).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(book))))
}

/// Update a book; absent fields are kept
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookData),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(data): ApiJson<UpdateBook>,
) -> AppResult<Json<DataResponse<BookResponse>>> {
    let book = state.services.books.update(id, data).await?;
    Ok(Json(DataResponse::new(book)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted.".to_string(),
    }))
}
