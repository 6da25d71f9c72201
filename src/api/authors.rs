//! Author endpoints

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    listing::{Page, PageUrl},
    models::{
        author::{AuthorListQuery, AuthorResponse, CreateAuthor, UpdateAuthor},
        book::{BookResponse, PageQuery},
    },
};

use super::{ApiJson, ApiPath, AuthenticatedUser, DataResponse, MessageResponse};

/// List authors with search, sorting and pagination
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorListQuery),
    responses(
        (status = 200, description = "Paginated list of authors", body = AuthorPage)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AuthorListQuery>,
) -> AppResult<Json<Page<AuthorResponse>>> {
    let url = PageUrl::new(uri.path(), uri.query());
    let page = state.services.authors.list(&query, &url).await?;
    Ok(Json(page))
}

/// Get author details with books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorData),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<DataResponse<AuthorResponse>>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(DataResponse::new(author)))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorData),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ApiJson(data): ApiJson<CreateAuthor>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthorResponse>>)> {
    let author = state.services.authors.create(data).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(author))))
}

/// Update an author; absent fields are kept
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = AuthorData),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(data): ApiJson<UpdateAuthor>,
) -> AppResult<Json<DataResponse<AuthorResponse>>> {
    let author = state.services.authors.update(id, data).await?;
    Ok(Json(DataResponse::new(author)))
}

/// Delete an author without books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted", body = MessageResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Author still has books (AUTHOR_HAS_BOOKS)", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.services.authors.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Author deleted.".to_string(),
    }))
}

/// List the books of an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID"), PageQuery),
    responses(
        (status = 200, description = "Paginated books of the author", body = BookPage),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_author_books(
    State(state): State<crate::AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BookResponse>>> {
    let url = PageUrl::new(uri.path(), uri.query());
    let page = state.services.authors.list_books(id, &query, &url).await?;
    Ok(Json(page))
}
